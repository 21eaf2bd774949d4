use rustfft::{FftPlanner, num_complex::Complex32};
use std::sync::Arc;

/// Windowed FFT reduced to `bins` smoothed, log-spaced magnitude bands.
pub struct Analyzer {
    pub fft_size: usize,
    pub bins: usize,
    pub f_min: f32,
    pub f_max: f32,

    sample_rate: u32,
    hann: Vec<f32>,
    fft_buf: Vec<Complex32>,
    magnitudes: Vec<f32>,
    smoothed: Vec<f32>,
    alpha: f32,

    fft: Arc<dyn rustfft::Fft<f32>>,
}

impl Analyzer {
    pub fn new(sample_rate: u32, fft_size: usize, bins: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let n_max = (fft_size.max(2) - 1) as f32;
        let hann = (0..fft_size)
            .map(|n| 0.5 * (1.0 - (std::f32::consts::TAU * n as f32 / n_max).cos()))
            .collect();

        Self {
            fft_size,
            bins,
            f_min: 20.0,
            f_max: (sample_rate as f32 * 0.5).min(18_000.0),

            sample_rate,
            hann,
            fft_buf: vec![Complex32::new(0.0, 0.0); fft_size],
            magnitudes: vec![0.0; fft_size / 2],
            smoothed: vec![0.0; bins],
            alpha: 0.35,

            fft,
        }
    }

    /// Smoothing factor per frame, `1.0` disables smoothing.
    pub fn with_smoothing(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Frequency edges in Hz of band `b`.
    pub fn band_edges(&self, b: usize) -> (f32, f32) {
        let r = self.f_max / self.f_min;
        let t0 = b as f32 / self.bins as f32;
        let t1 = (b + 1) as f32 / self.bins as f32;
        (self.f_min * r.powf(t0), self.f_min * r.powf(t1))
    }

    /// `window` must hold `fft_size` samples; shorter windows are zero padded.
    pub fn analyze(&mut self, window: &[f32]) -> &[f32] {
        debug_assert!(window.len() <= self.fft_size);

        for (i, slot) in self.fft_buf.iter_mut().enumerate() {
            let x = window.get(i).copied().unwrap_or(0.0) * self.hann[i];
            *slot = Complex32::new(x, 0.0);
        }
        self.fft.process(&mut self.fft_buf);

        // normalized by fft_size so values stay in ~[0,1]
        let norm = 1.0 / (self.fft_size as f32 * 0.5);
        for (mag, c) in self.magnitudes.iter_mut().zip(&self.fft_buf) {
            *mag = c.norm() * norm;
        }

        for b in 0..self.bins {
            let (f0, f1) = self.band_edges(b);
            let (i0, i1) = self.freq_range_to_bin_range(f0, f1);
            let slice = &self.magnitudes[i0..i1];
            let avg = if slice.is_empty() {
                0.0
            } else {
                slice.iter().sum::<f32>() / slice.len() as f32
            };
            let band = avg.sqrt();
            self.smoothed[b] += self.alpha * (band - self.smoothed[b]);
        }

        &self.smoothed
    }

    fn freq_range_to_bin_range(&self, f0: f32, f1: f32) -> (usize, usize) {
        let sr = self.sample_rate as f32;
        let n = self.fft_size as f32;
        let half = self.magnitudes.len();
        if half == 0 {
            return (0, 0);
        }

        let i0 = ((f0 * n / sr).floor().max(0.0) as usize).min(half - 1);
        let mut i1 = ((f1 * n / sr).ceil().max(0.0) as usize).min(half);
        if i1 <= i0 {
            i1 = (i0 + 1).min(half);
        }
        (i0, i1)
    }
}
