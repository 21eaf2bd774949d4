use anyhow::Context;
use hound::{SampleFormat, WavReader};
use std::path::Path;

/// Decoded track, downmixed to mono.
#[derive(Clone, Debug)]
pub struct AudioData {
    pub sample_rate: u32,
    pub samples_mono: Vec<f32>,
    pub duration_sec: f32,
}

impl AudioData {
    pub fn from_mono(sample_rate: u32, samples_mono: Vec<f32>) -> anyhow::Result<Self> {
        anyhow::ensure!(sample_rate > 0, "sample rate must be positive");
        anyhow::ensure!(!samples_mono.is_empty(), "audio track has no samples");
        let duration_sec = samples_mono.len() as f32 / sample_rate as f32;
        Ok(Self {
            sample_rate,
            samples_mono,
            duration_sec,
        })
    }

    pub fn load_wav<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let mut reader = WavReader::open(path)
            .with_context(|| format!("Failed to open WAV {}", path.display()))?;
        let spec = reader.spec();
        let channels = spec.channels as usize;
        anyhow::ensure!(channels > 0, "WAV {} declares zero channels", path.display());

        let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 16) => reader
                .samples::<i16>()
                .map(|s| s.map(|s| s as f32 / i16::MAX as f32))
                .collect::<Result<_, _>>()?,
            (SampleFormat::Int, bits @ (24 | 32)) => {
                let scale = (1i64 << (bits - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / scale))
                    .collect::<Result<_, _>>()?
            }
            (SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<_, _>>()?,
            (format, bits) => anyhow::bail!(
                "Unsupported WAV encoding in {}: {bits}-bit {format:?}",
                path.display()
            ),
        };

        let mono = interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        Self::from_mono(spec.sample_rate, mono)
            .with_context(|| format!("WAV {} is empty", path.display()))
    }

    /// Fills `out` with `n` samples centred on `t_sec`, wrapping around the track.
    pub fn window_at_time(&self, t_sec: f32, n: usize, out: &mut Vec<f32>) {
        out.clear();
        out.reserve(n);

        let t = t_sec.rem_euclid(self.duration_sec.max(0.000_1));
        let center = (t * self.sample_rate as f32) as isize;
        let half = (n as isize) / 2;
        let len = self.samples_mono.len() as isize;

        out.extend(
            (0..n as isize).map(|i| self.samples_mono[(center - half + i).rem_euclid(len) as usize]),
        );
    }
}
