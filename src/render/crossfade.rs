use image::{Rgb, RgbImage};
use indicatif::ProgressBar;
use rand::Rng;

use super::sequence::ensure_uniform;
use super::smear::apply_smear;
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug)]
pub struct CrossfadeSettings {
    /// Interpolated frames inserted after every source frame.
    pub transition_frames: usize,
    /// Smear strength for source frames.
    pub frame_smear: u32,
    /// Smear strength for interpolated frames.
    pub transition_smear: u32,
}

impl Default for CrossfadeSettings {
    fn default() -> Self {
        Self {
            transition_frames: 3,
            frame_smear: 40,
            transition_smear: 30,
        }
    }
}

/// Blend weight of the `j`-th of `k` transition frames toward the next frame.
pub fn transition_alpha(j: usize, k: usize) -> f32 {
    (j + 1) as f32 / (k + 1) as f32
}

/// Linear blend `a·(1-alpha) + b·alpha`.
pub fn blend(a: &RgbImage, b: &RgbImage, alpha: f32) -> Result<RgbImage> {
    if a.dimensions() != b.dimensions() {
        return Err(Error::FrameMismatch {
            index: 1,
            got: b.dimensions(),
            expected: a.dimensions(),
        });
    }
    let (width, height) = a.dimensions();
    Ok(RgbImage::from_fn(width, height, |x, y| {
        let (pa, pb) = (a.get_pixel(x, y), b.get_pixel(x, y));
        Rgb(std::array::from_fn(|c| {
            let (u, v) = (pa[c] as f32, pb[c] as f32);
            (u + alpha * (v - u)).round().clamp(0.0, 255.0) as u8
        }))
    }))
}

/// Smear every frame and insert smeared crossfades between neighbours.
///
/// The sequence is treated as a loop: the last frame fades into the first.
/// Output length is `frames.len() * (transition_frames + 1)`.
pub fn crossfade_frames<R: Rng + ?Sized>(
    frames: &[RgbImage],
    settings: &CrossfadeSettings,
    rng: &mut R,
    progress: &ProgressBar,
) -> Result<Vec<RgbImage>> {
    ensure_uniform(frames)?;

    let n = frames.len();
    let k = settings.transition_frames;
    let mut out = Vec::with_capacity(n * (k + 1));

    for i in 0..n {
        let current = apply_smear(frames[i].clone(), settings.frame_smear, rng).into_inner();
        let next = apply_smear(frames[(i + 1) % n].clone(), settings.frame_smear, rng).into_inner();

        let transitions = (0..k)
            .map(|j| -> Result<RgbImage> {
                let mixed = blend(&current, &next, transition_alpha(j, k))?;
                Ok(apply_smear(mixed, settings.transition_smear, rng).into_inner())
            })
            .collect::<Result<Vec<_>>>()?;

        out.push(current);
        out.extend(transitions);
        progress.inc(1);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn flat(v: u8) -> RgbImage {
        RgbImage::from_pixel(16, 24, Rgb([v, v, v]))
    }

    fn run(frames: &[RgbImage], k: usize) -> Vec<RgbImage> {
        let settings = CrossfadeSettings { transition_frames: k, ..Default::default() };
        crossfade_frames(frames, &settings, &mut ChaCha8Rng::seed_from_u64(9), &ProgressBar::hidden())
            .unwrap()
    }

    #[test]
    fn output_length_is_n_times_k_plus_one() {
        let frames = vec![flat(0), flat(50), flat(100), flat(150), flat(200)];
        for k in 0..5 {
            assert_eq!(run(&frames, k).len(), frames.len() * (k + 1));
        }
    }

    #[test]
    fn alpha_steps_evenly() {
        assert_eq!(transition_alpha(0, 3), 0.25);
        assert_eq!(transition_alpha(1, 3), 0.5);
        assert_eq!(transition_alpha(2, 3), 0.75);
        assert_eq!(transition_alpha(0, 1), 0.5);
    }

    #[test]
    fn last_frame_wraps_to_first_with_same_alpha() {
        // Flat frames are unchanged by smearing, so values are predictable.
        let out = run(&[flat(0), flat(200)], 3);
        let values: Vec<u8> = out.iter().map(|f| f.get_pixel(3, 3)[0]).collect();
        assert_eq!(values, vec![0, 50, 100, 150, 200, 150, 100, 50]);
    }

    #[test]
    fn blend_endpoints() {
        let a = flat(10);
        let b = flat(250);
        assert_eq!(blend(&a, &b, 0.0).unwrap(), a);
        assert_eq!(blend(&a, &b, 1.0).unwrap(), b);
        assert_eq!(blend(&a, &b, 0.5).unwrap().get_pixel(0, 0)[0], 130);
    }

    #[test]
    fn blend_refuses_mismatched_frames() {
        let err = blend(&flat(10), &RgbImage::new(8, 8), 0.5).unwrap_err();
        assert!(matches!(
            err,
            Error::FrameMismatch { got: (8, 8), expected: (16, 24), .. }
        ));
    }

    #[test]
    fn dimensions_survive() {
        let out = run(&[flat(1), flat(2)], 2);
        assert!(out.iter().all(|f| f.dimensions() == (16, 24)));
    }

    #[test]
    fn rejects_bad_input() {
        let settings = CrossfadeSettings::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let hidden = ProgressBar::hidden();
        assert!(matches!(
            crossfade_frames(&[], &settings, &mut rng, &hidden),
            Err(Error::EmptySequence)
        ));
        let mixed = [flat(0), RgbImage::new(8, 8)];
        assert!(matches!(
            crossfade_frames(&mixed, &settings, &mut rng, &hidden),
            Err(Error::FrameMismatch { .. })
        ));
    }
}
