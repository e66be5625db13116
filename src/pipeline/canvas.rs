use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;

use crate::config::CanvasConfig;
use crate::encode::ffmpeg::{self, TranscodeSettings};
use crate::encode::gif::write_gif;
use crate::error::{Error, Result};
use crate::pipeline::file_stem;
use crate::process::ProcessRunner;
use crate::render::crossfade::{crossfade_frames, CrossfadeSettings};
use crate::render::glitch::{GlitchSettings, Glitcher};
use crate::render::resize::fit_cover;
use crate::render::sequence::{frame_delay_ms, FrameSequence};

/// Files produced by one canvas run. The video is best effort: the PNG and
/// GIF are valid even when transcoding failed.
#[derive(Debug)]
pub struct CanvasOutputs {
    pub output_dir: PathBuf,
    pub static_image: PathBuf,
    pub animation: PathBuf,
    pub video: Result<PathBuf>,
}

/// `<parent>/<stem>_canvas`
pub fn default_output_dir(input: &Path) -> PathBuf {
    let stem = file_stem(input);
    input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("{}_canvas", stem))
}

pub struct CanvasPipeline<'a, P: ProcessRunner + ?Sized> {
    config: &'a CanvasConfig,
    runner: &'a P,
}

impl<'a, P: ProcessRunner + ?Sized> CanvasPipeline<'a, P> {
    pub fn new(config: &'a CanvasConfig, runner: &'a P) -> Self {
        Self { config, runner }
    }

    pub fn run<R: Rng + ?Sized>(
        &self,
        input: &Path,
        output_dir: Option<&Path>,
        rng: &mut R,
    ) -> Result<CanvasOutputs> {
        let cfg = self.config;
        cfg.validate()?;
        if !input.exists() {
            return Err(Error::MissingInput(input.to_path_buf()));
        }

        let stem = file_stem(input);
        let output_dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_output_dir(input));
        std::fs::create_dir_all(&output_dir)?;

        log::info!("Opening {}", input.display());
        let source = image::open(input)?;
        let cropped = fit_cover(&source, cfg.width, cfg.height);

        let glitcher = Glitcher::new(GlitchSettings {
            intensity: cfg.glitch_intensity,
            color_offset: cfg.color_offset,
            scan_lines: cfg.scan_lines,
        });
        let glitched = glitcher.frames(&cropped, cfg.glitch_frames, rng);

        log::info!("Applying crossfade and smearing effects...");
        let settings = CrossfadeSettings {
            transition_frames: cfg.transition_frames,
            frame_smear: cfg.frame_smear,
            transition_smear: cfg.transition_smear,
        };
        let pb = ProgressBar::new(glitched.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta} remaining)")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        let smoothed = crossfade_frames(&glitched, &settings, rng, &pb)?;
        pb.finish_with_message("Frames complete");

        let delay = frame_delay_ms(cfg.total_duration_ms, smoothed.len());
        let sequence = FrameSequence::new(smoothed, delay)?;

        let static_image = output_dir.join(format!("{}_canvas_static.png", stem));
        let animation = output_dir.join(format!("{}_canvas.gif", stem));
        let video_path = output_dir.join(format!("{}_canvas.mp4", stem));

        log::info!("Saving output files...");
        cropped.save(&static_image)?;
        write_gif(&sequence, &animation)?;

        let transcode = TranscodeSettings {
            fps: cfg.video_fps,
            duration_secs: cfg.video_duration_secs,
        };
        let video = match ffmpeg::transcode(self.runner, &animation, &video_path, &transcode) {
            Ok(()) => Ok(video_path),
            Err(err) => {
                log::error!("Error converting to MP4: {}", err);
                Err(err)
            }
        };

        Ok(CanvasOutputs {
            output_dir,
            static_image,
            animation,
            video,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dir_sits_next_to_input() {
        assert_eq!(
            default_output_dir(Path::new("/art/cover.final.jpg")),
            PathBuf::from("/art/cover.final_canvas")
        );
        assert_eq!(default_output_dir(Path::new("cover.png")), PathBuf::from("cover_canvas"));
    }

    #[test]
    fn zero_glitch_frames_is_a_config_error() {
        let cfg = CanvasConfig { glitch_frames: 0, ..CanvasConfig::default() };
        let pipeline = CanvasPipeline::new(&cfg, &crate::process::SystemRunner);
        let err = pipeline
            .run(Path::new("/no/such/art.png"), None, &mut rand::rng())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { key: "glitch_frames", .. }));
    }

    #[test]
    fn missing_input_is_reported() {
        let cfg = CanvasConfig::default();
        let pipeline = CanvasPipeline::new(&cfg, &crate::process::SystemRunner);
        let mut rng = rand::rng();
        let err = pipeline
            .run(Path::new("/no/such/art.png"), None, &mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }
}
