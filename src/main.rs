mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io;
use std::path::PathBuf;

use cli::{CanvasArgs, Cli, Command, CoverArgs};
use coverkit::config::{self, Config};
use coverkit::encode::ffmpeg::ensure_ffmpeg;
use coverkit::pipeline::canvas::CanvasPipeline;
use coverkit::pipeline::cover::CoverPipeline;
use coverkit::process::SystemRunner;
use coverkit::prompt;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let config = match config::find_config(cli.config.clone()) {
        Some(path) => match config::load_config(&path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}", path.display());
                Config::default()
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Command::Canvas(args) => run_canvas(args, config),
        Command::Cover(args) => run_cover(args, config),
    }
}

fn read_path(question: &str) -> Result<PathBuf> {
    let answer = prompt::ask(&mut io::stdin().lock(), &mut io::stdout(), question)
        .context("Failed to read from stdin")?;
    Ok(prompt::clean_path(&answer))
}

fn run_canvas(args: CanvasArgs, config: Config) -> Result<()> {
    let runner = SystemRunner;
    ensure_ffmpeg(&runner).context("Please install FFmpeg to convert to MP4")?;

    let mut cfg = config.canvas;
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }

    let input = match args.input {
        Some(path) => path,
        None => read_path("Enter the path to your album artwork: ")?,
    };

    let mut rng = match cfg.seed {
        Some(seed) => {
            log::info!("Using seed {}", seed);
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_os_rng(),
    };

    let outputs = CanvasPipeline::new(&cfg, &runner)
        .run(&input, args.output_dir.as_deref(), &mut rng)
        .context("Failed to create canvas")?;

    log::info!("Static canvas generated at: {}", outputs.static_image.display());
    log::info!("GIF canvas generated at: {}", outputs.animation.display());
    match &outputs.video {
        Ok(path) => log::info!("MP4 canvas generated at: {}", path.display()),
        Err(err) => log::warn!("MP4 canvas was not generated: {}", err),
    }
    Ok(())
}

fn run_cover(args: CoverArgs, config: Config) -> Result<()> {
    let cfg = config.cover;

    let input = match args.input {
        Some(path) => path,
        None => read_path("Enter the path to your audio file: ")?,
    };

    let saturation = match args.saturation {
        Some(value) => prompt::clamp_saturation(value),
        None => {
            let question = format!(
                "Enter spectrogram saturation level (0.0 for grayscale, 1.0 for normal, default={:?}): ",
                cfg.saturation
            );
            let answer = prompt::ask(&mut io::stdin().lock(), &mut io::stdout(), &question)
                .context("Failed to read from stdin")?;
            prompt::parse_saturation(&answer, cfg.saturation)
        }
    };

    let runner = SystemRunner;
    let outputs = CoverPipeline::new(&cfg, &runner)
        .run(&input, saturation)
        .context("Failed to create album artwork")?;

    log::info!(
        "Spectrogram segment covers {:.2}s to {:.2}s",
        outputs.segment_secs.0,
        outputs.segment_secs.1
    );
    log::info!("Find your artwork at: {}", outputs.cover.display());
    Ok(())
}
