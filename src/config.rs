use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::mel::MelParams;
use crate::error::{Error, Result};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub cover: CoverConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: u32,
    #[serde(default = "default_canvas_height")]
    pub height: u32,
    #[serde(default = "default_glitch_frames")]
    pub glitch_frames: usize,
    #[serde(default = "default_transition_frames")]
    pub transition_frames: usize,
    #[serde(default = "default_total_duration_ms")]
    pub total_duration_ms: u32,
    #[serde(default = "default_glitch_intensity")]
    pub glitch_intensity: f32,
    #[serde(default = "default_true")]
    pub color_offset: bool,
    #[serde(default = "default_true")]
    pub scan_lines: bool,
    #[serde(default = "default_frame_smear")]
    pub frame_smear: u32,
    #[serde(default = "default_transition_smear")]
    pub transition_smear: u32,
    #[serde(default = "default_video_fps")]
    pub video_fps: u32,
    #[serde(default = "default_video_duration_secs")]
    pub video_duration_secs: u32,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverConfig {
    #[serde(default = "default_saturation")]
    pub saturation: f32,
    #[serde(default = "default_identicon_size")]
    pub identicon_size: u32,
    #[serde(default = "default_identicon_scale")]
    pub identicon_scale: f32,
    #[serde(default = "default_spectrogram_alpha")]
    pub spectrogram_alpha: u8,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_height_inches")]
    pub height_inches: f32,
    #[serde(default = "default_min_width_inches")]
    pub min_width_inches: f32,
    #[serde(default = "default_max_width_inches")]
    pub max_width_inches: f32,
    #[serde(default = "default_seconds_per_inch")]
    pub seconds_per_inch: f32,
    #[serde(default = "default_n_fft")]
    pub n_fft: usize,
    #[serde(default = "default_hop_length")]
    pub hop_length: usize,
    #[serde(default = "default_n_mels")]
    pub n_mels: usize,
    #[serde(default = "default_fmax")]
    pub fmax: f32,
    #[serde(default = "default_top_db")]
    pub top_db: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            glitch_frames: default_glitch_frames(),
            transition_frames: default_transition_frames(),
            total_duration_ms: default_total_duration_ms(),
            glitch_intensity: default_glitch_intensity(),
            color_offset: true,
            scan_lines: true,
            frame_smear: default_frame_smear(),
            transition_smear: default_transition_smear(),
            video_fps: default_video_fps(),
            video_duration_secs: default_video_duration_secs(),
            seed: None,
        }
    }
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            saturation: default_saturation(),
            identicon_size: default_identicon_size(),
            identicon_scale: default_identicon_scale(),
            spectrogram_alpha: default_spectrogram_alpha(),
            dpi: default_dpi(),
            height_inches: default_height_inches(),
            min_width_inches: default_min_width_inches(),
            max_width_inches: default_max_width_inches(),
            seconds_per_inch: default_seconds_per_inch(),
            n_fft: default_n_fft(),
            hop_length: default_hop_length(),
            n_mels: default_n_mels(),
            fmax: default_fmax(),
            top_db: default_top_db(),
        }
    }
}

impl CanvasConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid_config("width", format!("canvas must be non-empty, got {}x{}", self.width, self.height)));
        }
        if self.glitch_frames == 0 {
            return Err(Error::invalid_config("glitch_frames", "must be at least 1"));
        }
        if self.video_fps == 0 {
            return Err(Error::invalid_config("video_fps", "must be at least 1"));
        }
        Ok(())
    }
}

impl CoverConfig {
    pub fn mel_params(&self) -> MelParams {
        MelParams {
            n_fft: self.n_fft,
            hop_length: self.hop_length,
            n_mels: self.n_mels,
            fmin: 0.0,
            fmax: self.fmax,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.mel_params().validate()?;
        if self.identicon_size == 0 {
            return Err(Error::invalid_config("identicon_size", "must be at least 1"));
        }
        if !(self.identicon_scale > 0.0 && self.identicon_scale <= 1.0) {
            return Err(Error::invalid_config("identicon_scale", format!("must be in (0, 1], got {}", self.identicon_scale)));
        }
        if self.dpi == 0 {
            return Err(Error::invalid_config("dpi", "must be at least 1"));
        }
        if !(self.height_inches > 0.0 && self.seconds_per_inch > 0.0) {
            return Err(Error::invalid_config("seconds_per_inch", "spectrogram layout values must be positive"));
        }
        if !(self.min_width_inches > 0.0 && self.min_width_inches <= self.max_width_inches) {
            return Err(Error::invalid_config(
                "min_width_inches",
                format!("must be positive and <= max_width_inches ({})", self.max_width_inches),
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool { true }
fn default_canvas_width() -> u32 { 720 }
fn default_canvas_height() -> u32 { 1280 }
fn default_glitch_frames() -> usize { 24 }
fn default_transition_frames() -> usize { 3 }
fn default_total_duration_ms() -> u32 { 8000 }
fn default_glitch_intensity() -> f32 { 3.0 }
fn default_frame_smear() -> u32 { 40 }
fn default_transition_smear() -> u32 { 30 }
fn default_video_fps() -> u32 { 30 }
fn default_video_duration_secs() -> u32 { 8 }

fn default_saturation() -> f32 { 1.0 }
fn default_identicon_size() -> u32 { 5000 }
fn default_identicon_scale() -> f32 { 0.4 }
fn default_spectrogram_alpha() -> u8 { 127 }
fn default_dpi() -> u32 { 100 }
fn default_height_inches() -> f32 { 10.0 }
fn default_min_width_inches() -> f32 { 10.0 }
fn default_max_width_inches() -> f32 { 40.0 }
fn default_seconds_per_inch() -> f32 { 4.0 }
fn default_n_fft() -> usize { 2048 }
fn default_hop_length() -> usize { 512 }
fn default_n_mels() -> usize { 128 }
fn default_fmax() -> f32 { 8000.0 }
fn default_top_db() -> f32 { 80.0 }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(err) => {
            log::warn!("Invalid config {}: {}", path.display(), err);
            None
        }
    }
}

/// Explicit path first, then `coverkit.toml` in the working directory, then
/// the per-user config locations.
pub fn find_config(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let local = PathBuf::from("coverkit.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("coverkit").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("coverkit").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    })
}
