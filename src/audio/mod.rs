pub mod mic;
pub mod player;
pub mod source;
pub mod wav;

pub use mic::MicCapture;
pub use player::AudioPlayer;
pub use source::{FileSource, MicSource, SpectrumSource};
pub use wav::AudioData;
