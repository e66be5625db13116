pub mod ffmpeg;
pub mod gif;
