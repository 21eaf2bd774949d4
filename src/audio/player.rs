use anyhow::Context;
use rodio::{Decoder, OutputStream, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

/// Loops a track on the default output device and reports the playback clock.
pub struct AudioPlayer {
    _stream: OutputStream, // must stay alive for audio to keep playing
    sink: Sink,
    start: Instant,
}

impl AudioPlayer {
    pub fn start<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let (_stream, handle) =
            OutputStream::try_default().context("Failed to open audio output device")?;
        let sink = Sink::try_new(&handle).context("Failed to create audio sink")?;
        let file = BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {} for playback", path.display()))?,
        );
        let source = Decoder::new(file)
            .with_context(|| format!("Failed to decode {} for playback", path.display()))?;
        sink.append(source.repeat_infinite());
        log::info!("playing {}", path.display());
        Ok(Self {
            _stream,
            sink,
            start: Instant::now(),
        })
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    pub fn stop(&self) {
        self.sink.stop();
    }
}
