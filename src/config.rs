use crate::geometry::{FillRule, Remap};
use clap::Parser;
use std::ops::RangeInclusive;
use std::path::PathBuf;

pub const ZOOM_RANGE: RangeInclusive<f32> = 0.1..=4.0;
pub const RADIUS_RANGE: RangeInclusive<f32> = 10.0..=800.0;
pub const POINTS_RANGE: RangeInclusive<usize> = 3..=720;
pub const STRIDE_RANGE: RangeInclusive<usize> = 1..=64;
pub const REMAP_IN_RANGE: RangeInclusive<f32> = 0.05..=2.0;
pub const REMAP_OUT_RANGE: RangeInclusive<f32> = 0.0..=1500.0;

#[derive(Debug, Parser)]
#[command(about = "Deforms a circle with the spectrum of an audio track")]
pub struct Cli {
    /// WAV file to play and analyse
    #[arg(long, default_value = "assets/song.wav")]
    pub audio: PathBuf,

    /// Analyse the default microphone instead of a file
    #[arg(long)]
    pub mic: bool,

    /// Samples per FFT window, a power of two
    #[arg(long, default_value_t = 2048)]
    pub fft_size: usize,

    /// Number of magnitude bands per frame
    #[arg(long, default_value_t = 256)]
    pub bins: usize,

    /// Per-frame smoothing factor of the bands, 1.0 disables smoothing
    #[arg(long, default_value_t = 0.35)]
    pub smoothing: f32,

    /// Clamp remapped magnitudes to the output range
    #[arg(long)]
    pub clamp: bool,

    /// Start with the mesh drawn as a wireframe
    #[arg(long)]
    pub wireframe: bool,

    /// Fill overlapping outlines with the nonzero rule instead of even-odd
    #[arg(long)]
    pub nonzero: bool,

    /// Start with the parameter panel hidden
    #[arg(long)]
    pub hide_panel: bool,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.fft_size >= 64 && self.fft_size.is_power_of_two(),
            "--fft-size must be a power of two >= 64, got {}",
            self.fft_size
        );
        anyhow::ensure!(self.bins >= 3, "--bins must be at least 3, got {}", self.bins);
        anyhow::ensure!(
            self.smoothing > 0.0 && self.smoothing <= 1.0,
            "--smoothing must be in (0, 1], got {}",
            self.smoothing
        );
        Ok(())
    }

    pub fn params(&self) -> Params {
        Params {
            wireframe: self.wireframe,
            fill_rule: if self.nonzero {
                FillRule::NonZero
            } else {
                FillRule::EvenOdd
            },
            clamp: self.clamp,
            show_panel: !self.hide_panel,
            ..Params::default()
        }
    }
}

/// Everything the panel can edit; read by the scene every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    pub zoom: f32,
    pub base_radius: f32,
    pub spectrum_radius: f32,
    pub base_points: usize,
    pub stride: usize,
    pub wireframe: bool,
    pub show_base: bool,
    pub fill_rule: FillRule,
    pub remap_in_max: f32,
    pub remap_out_max: f32,
    pub clamp: bool,
    pub hue: f32,
    pub show_panel: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            base_radius: 150.0,
            spectrum_radius: 200.0,
            base_points: 64,
            stride: 2,
            wireframe: false,
            show_base: true,
            fill_rule: FillRule::EvenOdd,
            remap_in_max: 0.8,
            remap_out_max: 500.0,
            clamp: false,
            hue: 0.55,
            show_panel: true,
        }
    }
}

impl Params {
    pub fn remap(&self) -> Remap {
        Remap::new(0.0, self.remap_in_max, 0.0, self.remap_out_max).clamped(self.clamp)
    }

    /// Pulls every field back into the range the panel allows.
    pub fn sanitized(mut self) -> Self {
        self.zoom = self.zoom.clamp(*ZOOM_RANGE.start(), *ZOOM_RANGE.end());
        self.base_radius = self.base_radius.clamp(*RADIUS_RANGE.start(), *RADIUS_RANGE.end());
        self.spectrum_radius = self
            .spectrum_radius
            .clamp(*RADIUS_RANGE.start(), *RADIUS_RANGE.end());
        self.base_points = self.base_points.clamp(*POINTS_RANGE.start(), *POINTS_RANGE.end());
        self.stride = self.stride.clamp(*STRIDE_RANGE.start(), *STRIDE_RANGE.end());
        self.remap_in_max = self
            .remap_in_max
            .clamp(*REMAP_IN_RANGE.start(), *REMAP_IN_RANGE.end());
        self.remap_out_max = self
            .remap_out_max
            .clamp(*REMAP_OUT_RANGE.start(), *REMAP_OUT_RANGE.end());
        self.hue = self.hue.rem_euclid(1.0);
        self
    }

    /// Fields that change the shape of the static base circle.
    pub fn base_key(&self) -> (u32, usize) {
        (self.base_radius.to_bits(), self.base_points)
    }

    /// Fields that change how outlines are combined into the mesh.
    pub fn fill_key(&self) -> (FillRule, bool) {
        (self.fill_rule, self.show_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn every_flag_has_help_text() {
        let cmd = Cli::command();
        for arg in cmd.get_arguments() {
            let id = arg.get_id().as_str();
            if id == "help" {
                continue;
            }
            assert!(arg.get_help().is_some(), "--{id} has no help text");
        }
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["circle_fft"]);
        assert_eq!(cli.audio, PathBuf::from("assets/song.wav"));
        assert!(!cli.mic);
        cli.validate().unwrap();
        let p = cli.params();
        assert_eq!(p.fill_rule, FillRule::EvenOdd);
        assert!(p.show_panel);
        assert_eq!(p.remap(), Remap::default());
    }

    #[test]
    fn cli_flags_seed_params() {
        let cli = Cli::parse_from([
            "circle_fft",
            "--mic",
            "--wireframe",
            "--nonzero",
            "--clamp",
            "--hide-panel",
            "--bins",
            "128",
        ]);
        let p = cli.params();
        assert!(cli.mic);
        assert_eq!(cli.bins, 128);
        assert!(p.wireframe && p.clamp && !p.show_panel);
        assert_eq!(p.fill_rule, FillRule::NonZero);
        assert!(p.remap().clamp);
    }

    #[test]
    fn bad_values_are_rejected() {
        let cli = Cli::parse_from(["circle_fft", "--fft-size", "1000"]);
        assert!(cli.validate().is_err());
        let cli = Cli::parse_from(["circle_fft", "--smoothing", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn sanitized_pulls_values_into_range() {
        let p = Params {
            zoom: 100.0,
            base_points: 0,
            stride: 0,
            hue: 1.25,
            ..Params::default()
        }
        .sanitized();
        assert_eq!(p.zoom, 4.0);
        assert_eq!(p.base_points, 3);
        assert_eq!(p.stride, 1);
        assert!((p.hue - 0.25).abs() < 1e-6);
    }
}
