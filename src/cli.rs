use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "coverkit", about = "Album artwork and looping canvas generator")]
pub struct Cli {
    /// Config file (defaults to ./coverkit.toml or the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Turn a still image into a glitched, looping 720x1280 canvas video
    Canvas(CanvasArgs),
    /// Build a cover from an audio file's identicon and spectrogram
    Cover(CoverArgs),
}

#[derive(Args, Debug)]
pub struct CanvasArgs {
    /// Input image; prompted for when omitted
    pub input: Option<PathBuf>,

    /// Output directory (defaults to <stem>_canvas next to the input)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Seed for the glitch and smear effects
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct CoverArgs {
    /// Input audio file (WAV, MP3, FLAC, OGG); prompted for when omitted
    pub input: Option<PathBuf>,

    /// Spectrogram saturation (0.0 grayscale, 1.0 normal, up to 2.0)
    #[arg(short, long)]
    pub saturation: Option<f32>,
}
