use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame};

use crate::error::Result;
use crate::render::sequence::FrameSequence;

/// NeuQuant speed, 1 (best) ..= 30 (fastest).
const QUANTIZE_SPEED: i32 = 10;

pub fn write_gif(sequence: &FrameSequence, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), QUANTIZE_SPEED);
    if sequence.looping {
        encoder.set_repeat(Repeat::Infinite)?;
    }

    let delay = Delay::from_numer_denom_ms(sequence.delay_ms, 1);
    let frames = sequence.frames().iter().map(|frame| {
        let rgba = DynamicImage::ImageRgb8(frame.clone()).to_rgba8();
        Frame::from_parts(rgba, 0, 0, delay)
    });
    encoder.encode_frames(frames)?;

    log::info!(
        "Wrote {} frames ({}ms each) to {}",
        sequence.len(),
        sequence.delay_ms,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgb, RgbImage};
    use std::io::BufReader;

    #[test]
    fn gif_round_trips_frame_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.gif");
        let frames: Vec<RgbImage> = (0..5)
            .map(|i| RgbImage::from_pixel(12, 20, Rgb([i * 40, 0, 255 - i * 40])))
            .collect();
        let seq = FrameSequence::new(frames, 83).unwrap();
        write_gif(&seq, &path).unwrap();

        let decoder = GifDecoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 5);
        assert_eq!(decoded[0].buffer().dimensions(), (12, 20));
    }
}
