use std::path::{Path, PathBuf};

use crate::audio::decode::decode_audio;
use crate::audio::fingerprint::Fingerprint;
use crate::audio::mel::mel_spectrogram;
use crate::config::CoverConfig;
use crate::error::{Error, Result};
use crate::identicon;
use crate::pipeline::file_stem;
use crate::process::ProcessRunner;
use crate::render::composite::{compose_cover, CompositeSettings};
use crate::render::spectrogram::{self, SpectrogramLayout};

#[derive(Debug)]
pub struct CoverOutputs {
    pub output_dir: PathBuf,
    pub cover: PathBuf,
    pub identicon: PathBuf,
    pub spectrogram_full: PathBuf,
    pub spectrogram_square: PathBuf,
    pub fingerprint: Fingerprint,
    /// Size of the spectrogram render before any padding.
    pub render_size: (u32, u32),
    /// Audio seconds covered by the square crop.
    pub segment_secs: (f64, f64),
}

/// `<parent>/id_<stem>_<ext>_v7_sat<saturation>`
pub fn default_output_dir(audio: &Path, saturation: f32) -> PathBuf {
    let stem = file_stem(audio);
    let ext = audio
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    audio
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("id_{}_{}_v7_sat{:?}", stem, ext, saturation))
}

pub struct CoverPipeline<'a, P: ProcessRunner + ?Sized> {
    config: &'a CoverConfig,
    runner: &'a P,
}

impl<'a, P: ProcessRunner + ?Sized> CoverPipeline<'a, P> {
    pub fn new(config: &'a CoverConfig, runner: &'a P) -> Self {
        Self { config, runner }
    }

    fn layout(&self) -> SpectrogramLayout {
        SpectrogramLayout {
            dpi: self.config.dpi,
            height_inches: self.config.height_inches,
            min_width_inches: self.config.min_width_inches,
            max_width_inches: self.config.max_width_inches,
            seconds_per_inch: self.config.seconds_per_inch,
        }
    }

    pub fn run(&self, audio_path: &Path, saturation: f32) -> Result<CoverOutputs> {
        let cfg = self.config;
        cfg.validate()?;
        if !audio_path.exists() {
            return Err(Error::MissingInput(audio_path.to_path_buf()));
        }

        let output_dir = default_output_dir(audio_path, saturation);
        log::info!("Creating output directory: {}", output_dir.display());
        std::fs::create_dir_all(&output_dir)?;

        log::info!("Analyzing audio fingerprint...");
        let fingerprint = Fingerprint::of_file(audio_path)?;
        log::info!("Audio hash: {}", fingerprint.short());

        let identicon_path = output_dir.join("identicon.png");
        let identicon_full = identicon::generate(self.runner, &fingerprint, cfg.identicon_size, &identicon_path)?;

        log::info!("Analyzing audio frequencies...");
        let audio = decode_audio(audio_path)?;
        let duration = audio.duration_secs();
        let db = mel_spectrogram(&audio, &cfg.mel_params())?.power_to_db(Some(cfg.top_db));

        let layout = self.layout();
        let (width, height) = layout.canvas_size(duration);
        log::info!(
            "Rendering spectrogram at {:.1}x{:.1} inches ({}x{} px)",
            layout.width_inches(duration),
            cfg.height_inches,
            width,
            height
        );
        let rendered = spectrogram::render(&db, width, height);
        let mut full = spectrogram::ensure_wide(rendered);
        if saturation != 1.0 {
            spectrogram::adjust_saturation(&mut full, saturation);
        }

        let spectrogram_full = output_dir.join("rectangle_spectrogram.png");
        full.save(&spectrogram_full)?;
        log::info!("Saved full spectrogram to {}", spectrogram_full.display());

        let segment = spectrogram::middle_square(&full, duration);
        let spectrogram_square = output_dir.join("spectrogram.png");
        segment.image.save(&spectrogram_square)?;

        log::info!("Compositing cover...");
        let cover = compose_cover(
            &identicon_full,
            &segment.image,
            &CompositeSettings {
                identicon_scale: cfg.identicon_scale,
                spectrogram_alpha: cfg.spectrogram_alpha,
            },
        );

        let cover_path = output_dir.join(format!("{}.png", file_stem(audio_path)));
        cover.image.save(&cover_path)?;
        cover.identicon.save(&identicon_path)?;

        log::info!("Album artwork written to {}", cover_path.display());

        Ok(CoverOutputs {
            output_dir,
            cover: cover_path,
            identicon: identicon_path,
            spectrogram_full,
            spectrogram_square,
            fingerprint,
            render_size: (width, height),
            segment_secs: (segment.start_secs, segment.end_secs),
        })
    }
}
