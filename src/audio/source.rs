use super::{AudioData, AudioPlayer, MicCapture};
use crate::analysis::Analyzer;
use std::path::{Path, PathBuf};

/// Anything that can hand the scene one magnitude frame per tick.
pub trait SpectrumSource {
    /// Starts playback or capture. Called once before the first `update`.
    fn setup(&mut self) -> anyhow::Result<()>;

    /// Advances analysis without blocking.
    fn update(&mut self);

    fn has_data(&self) -> bool;

    /// Latest frame, valid until the next `update`.
    fn data(&self) -> &[f32];

    fn shutdown(&mut self) {}
}

/// WAV track played through rodio and analysed at the playback position.
pub struct FileSource {
    path: PathBuf,
    audio: AudioData,
    analyzer: Analyzer,
    player: Option<AudioPlayer>,
    window: Vec<f32>,
    spectrum: Vec<f32>,
    ready: bool,
}

impl FileSource {
    /// Decodes the whole track up front so a bad file fails before the window opens.
    pub fn load<P: AsRef<Path>>(
        path: P,
        fft_size: usize,
        bins: usize,
        smoothing: f32,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let audio = AudioData::load_wav(&path)?;
        log::info!(
            "loaded {} ({:.1}s @ {} Hz)",
            path.display(),
            audio.duration_sec,
            audio.sample_rate
        );
        let analyzer = Analyzer::new(audio.sample_rate, fft_size, bins).with_smoothing(smoothing);
        Ok(Self {
            path,
            audio,
            analyzer,
            player: None,
            window: Vec::with_capacity(fft_size),
            spectrum: Vec::with_capacity(bins),
            ready: false,
        })
    }
}

impl SpectrumSource for FileSource {
    fn setup(&mut self) -> anyhow::Result<()> {
        self.player = Some(AudioPlayer::start(&self.path)?);
        Ok(())
    }

    fn update(&mut self) {
        let Some(player) = &self.player else {
            return;
        };
        self.audio
            .window_at_time(player.elapsed_secs(), self.analyzer.fft_size, &mut self.window);
        let bands = self.analyzer.analyze(&self.window);
        self.spectrum.clear();
        self.spectrum.extend_from_slice(bands);
        self.ready = true;
    }

    fn has_data(&self) -> bool {
        self.ready
    }

    fn data(&self) -> &[f32] {
        &self.spectrum
    }

    fn shutdown(&mut self) {
        if let Some(player) = self.player.take() {
            player.stop();
        }
        self.ready = false;
    }
}

/// Default input device, analysed over the latest `fft_size` captured samples.
pub struct MicSource {
    fft_size: usize,
    bins: usize,
    smoothing: f32,
    capture: Option<(MicCapture, Analyzer)>,
    window: Vec<f32>,
    spectrum: Vec<f32>,
    ready: bool,
}

impl MicSource {
    pub fn new(fft_size: usize, bins: usize, smoothing: f32) -> Self {
        Self {
            fft_size,
            bins,
            smoothing,
            capture: None,
            window: Vec::with_capacity(fft_size),
            spectrum: Vec::with_capacity(bins),
            ready: false,
        }
    }
}

impl SpectrumSource for MicSource {
    fn setup(&mut self) -> anyhow::Result<()> {
        let mic = MicCapture::start(self.fft_size)?;
        let analyzer =
            Analyzer::new(mic.sample_rate, self.fft_size, self.bins).with_smoothing(self.smoothing);
        self.capture = Some((mic, analyzer));
        Ok(())
    }

    fn update(&mut self) {
        let Some((mic, analyzer)) = &mut self.capture else {
            return;
        };
        // nothing captured yet, keep waiting
        if mic.read_window(&mut self.window) == 0 && !self.ready {
            return;
        }
        let bands = analyzer.analyze(&self.window);
        self.spectrum.clear();
        self.spectrum.extend_from_slice(bands);
        self.ready = true;
    }

    fn has_data(&self) -> bool {
        self.ready
    }

    fn data(&self) -> &[f32] {
        &self.spectrum
    }

    fn shutdown(&mut self) {
        self.capture = None;
        self.ready = false;
    }
}
