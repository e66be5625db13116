use image::{ImageBuffer, Pixel};
use rand::Rng;

use crate::error::{EffectError, EffectOutcome};

/// Shortest run of rows a smear pass touches.
pub const MIN_RUN: u32 = 10;

/// Chance that each column index starts a smear run.
pub const COLUMN_PROBABILITY: f64 = 0.1;

/// Drag rows of the frame downward into smeared bands.
///
/// Each column is picked with probability [`COLUMN_PROBABILITY`] and gets a
/// run of `MIN_RUN..=strength` rows (never longer than the frame). Inside the
/// run every whole row is blended with the row above it, weight on the
/// original falling linearly from 1.0 at the top of the run. Rows are
/// processed top to bottom so the drag cascades, and channel values are
/// truncated back to `u8`.
pub fn smear<P, R>(
    frame: &ImageBuffer<P, Vec<u8>>,
    strength: u32,
    rng: &mut R,
) -> Result<ImageBuffer<P, Vec<u8>>, EffectError>
where
    P: Pixel<Subpixel = u8>,
    R: Rng + ?Sized,
{
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(EffectError::EmptyFrame);
    }
    if strength < MIN_RUN {
        return Err(EffectError::StrengthTooLow { strength, min_run: MIN_RUN });
    }
    if height < MIN_RUN {
        return Err(EffectError::FrameTooShort { height, min_run: MIN_RUN });
    }

    let stride = width as usize * P::CHANNEL_COUNT as usize;
    let mut out = frame.clone();
    let buf: &mut [u8] = &mut out;

    for _ in 0..width {
        if !rng.random_bool(COLUMN_PROBABILITY) {
            continue;
        }
        let run = rng.random_range(MIN_RUN..=strength).min(height);
        let y_start = rng.random_range(0..=height - run);

        for y in y_start.max(1)..y_start + run {
            let alpha = 1.0 - (y - y_start) as f32 / run as f32;
            let (above, rest) = buf.split_at_mut(y as usize * stride);
            let prev_row = &above[above.len() - stride..];
            for (cur, &prev) in rest[..stride].iter_mut().zip(prev_row) {
                let (c, p) = (*cur as f32, prev as f32);
                *cur = (p + alpha * (c - p)).clamp(0.0, 255.0) as u8;
            }
        }
    }

    Ok(out)
}

/// [`smear`], falling back to the untouched frame when the effect cannot run.
pub fn apply_smear<P, R>(
    frame: ImageBuffer<P, Vec<u8>>,
    strength: u32,
    rng: &mut R,
) -> EffectOutcome<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
    R: Rng + ?Sized,
{
    let result = smear(&frame, strength, rng);
    EffectOutcome::from_result(frame, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(y * 255 / height) as u8, (x * 255 / width) as u8, 128])
        })
    }

    #[test]
    fn preserves_dimensions_and_channels() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rgb = gradient(64, 48);
        let out = smear(&rgb, 40, &mut rng).unwrap();
        assert_eq!(out.dimensions(), rgb.dimensions());
        assert_eq!(out.as_raw().len(), rgb.as_raw().len());

        let rgba = RgbaImage::from_pixel(31, 17, Rgba([9, 8, 7, 200]));
        let out = smear(&rgba, 30, &mut rng).unwrap();
        assert_eq!(out.dimensions(), (31, 17));
        assert_eq!(out.as_raw().len(), 31 * 17 * 4);
    }

    #[test]
    fn black_frame_stays_black() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let black = RgbImage::new(120, 90);
        for _ in 0..5 {
            let out = smear(&black, 40, &mut rng).unwrap();
            assert!(out.as_raw().iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn uniform_frame_is_invariant() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let flat = RgbImage::from_pixel(80, 60, Rgb([200, 17, 99]));
        assert_eq!(smear(&flat, 40, &mut rng).unwrap(), flat);
    }

    #[test]
    fn same_seed_same_streaks() {
        let frame = gradient(100, 80);
        let a = smear(&frame, 40, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let b = smear(&frame, 40, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn streaks_change_a_gradient() {
        let frame = gradient(200, 100);
        let out = smear(&frame, 40, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        assert_ne!(out, frame);
    }

    #[test]
    fn smeared_rows_change_across_full_width() {
        // Every pixel in a row shares one value, so a blended row moves as a whole.
        let frame = RgbImage::from_fn(100, 60, |_, y| {
            let v = (y * 4) as u8;
            Rgb([v, v, v])
        });
        let out = smear(&frame, 40, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
        assert_ne!(out, frame);
        for y in 0..frame.height() {
            let changed = (0..frame.width())
                .filter(|&x| out.get_pixel(x, y) != frame.get_pixel(x, y))
                .count();
            assert!(changed == 0 || changed == 100, "row {y}: {changed}/100 columns changed");
            let first = out.get_pixel(0, y);
            assert!((0..frame.width()).all(|x| out.get_pixel(x, y) == first), "row {y} is uneven");
        }
    }

    #[test]
    fn blend_truncates_toward_zero() {
        // One column, ten rows: any pick is the run 0..10, so row 1 gets
        // alpha 0.9 and 0.9 * 255 = 229.5 is stored as 229.
        let frame = RgbImage::from_fn(1, 10, |_, y| if y == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) });
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut blended = 0;
        for _ in 0..200 {
            let v = smear(&frame, 10, &mut rng).unwrap().get_pixel(0, 1)[0];
            assert!(v == 255 || v == 229, "got {v}");
            if v == 229 {
                blended += 1;
            }
        }
        assert!(blended > 0);
    }

    #[test]
    fn short_frame_is_skipped() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let frame = RgbImage::from_pixel(20, 5, Rgb([1, 2, 3]));
        let outcome = apply_smear(frame.clone(), 40, &mut rng);
        assert!(!outcome.is_applied());
        assert_eq!(outcome.into_inner(), frame);
    }

    #[test]
    fn weak_strength_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let frame = RgbImage::new(20, 20);
        assert_eq!(
            smear(&frame, 5, &mut rng),
            Err(EffectError::StrengthTooLow { strength: 5, min_run: MIN_RUN })
        );
    }
}
