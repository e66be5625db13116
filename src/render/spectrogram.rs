use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::colormap::magma;
use crate::audio::mel::MelSpectrogram;

/// Physical layout of the rendered spectrogram.
#[derive(Clone, Copy, Debug)]
pub struct SpectrogramLayout {
    pub dpi: u32,
    pub height_inches: f32,
    pub min_width_inches: f32,
    pub max_width_inches: f32,
    pub seconds_per_inch: f32,
}

impl Default for SpectrogramLayout {
    fn default() -> Self {
        Self {
            dpi: 100,
            height_inches: 10.0,
            min_width_inches: 10.0,
            max_width_inches: 40.0,
            seconds_per_inch: 4.0,
        }
    }
}

impl SpectrogramLayout {
    pub fn width_inches(&self, duration_secs: f64) -> f32 {
        (duration_secs as f32 / self.seconds_per_inch).clamp(self.min_width_inches, self.max_width_inches)
    }

    /// Pixel size of the render: width grows with duration, height is fixed.
    pub fn canvas_size(&self, duration_secs: f64) -> (u32, u32) {
        let width = (self.width_inches(duration_secs) * self.dpi as f32).round() as u32;
        let height = (self.height_inches * self.dpi as f32).round() as u32;
        (width.max(1), height.max(1))
    }
}

/// The square piece cut out of the full spectrogram and the audio it spans.
#[derive(Clone, Debug)]
pub struct SquareSegment {
    pub image: RgbaImage,
    pub left: u32,
    pub right: u32,
    pub start_secs: f64,
    pub end_secs: f64,
}

/// Draw a dB mel matrix with magma, low bands at the bottom.
pub fn render(db: &MelSpectrogram, width: u32, height: u32) -> RgbaImage {
    let (lo, hi) = db.min_max();
    let range = hi - lo;

    RgbaImage::from_fn(width, height, |x, y| {
        if db.n_frames == 0 || db.n_mels == 0 {
            return Rgba([0, 0, 4, 255]);
        }
        let frame = ((x as u64 * db.n_frames as u64) / width as u64) as usize;
        let row_from_bottom = height - 1 - y;
        let mel = ((row_from_bottom as u64 * db.n_mels as u64) / height as u64) as usize;
        let v = db.get(mel, frame.min(db.n_frames - 1));
        let t = if range > 0.0 { (v - lo) / range } else { 0.0 };
        let [r, g, b] = magma(t);
        Rgba([r, g, b, 255])
    })
}

/// Pad narrow renders onto a transparent canvas three times as wide as tall.
pub fn ensure_wide(img: RgbaImage) -> RgbaImage {
    let (width, height) = img.dimensions();
    if width as f32 >= height as f32 * 1.5 {
        return img;
    }

    let target_width = height * 3;
    log::warn!(
        "Spectrogram {}x{} is not wide enough, padding to {}x{}",
        width,
        height,
        target_width,
        height
    );
    let mut canvas = RgbaImage::new(target_width, height);
    let body_width = width.min(target_width);
    let body = if body_width == width {
        img
    } else {
        imageops::resize(&img, body_width, height, FilterType::CatmullRom)
    };
    imageops::replace(&mut canvas, &body, 0, 0);
    canvas
}

/// Blend every pixel with its luma. 0.0 is grayscale, 1.0 leaves colour alone.
pub fn adjust_saturation(img: &mut RgbaImage, factor: f32) {
    for px in img.pixels_mut() {
        let [r, g, b, _] = px.0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        for c in 0..3 {
            let v = luma + factor * (px[c] as f32 - luma);
            px[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Audio time covered by pixel columns `[left, right)` of a `width`-wide render.
pub fn time_span(left: u32, right: u32, width: u32, duration_secs: f64) -> (f64, f64) {
    if width == 0 {
        return (0.0, 0.0);
    }
    (
        left as f64 / width as f64 * duration_secs,
        right as f64 / width as f64 * duration_secs,
    )
}

/// Cut the horizontally centred square (side = image height).
pub fn middle_square(img: &RgbaImage, duration_secs: f64) -> SquareSegment {
    let (width, height) = img.dimensions();
    let side = height;
    let segments = (width as i64 - side as i64 + 1).max(1);

    let (left, right) = if segments <= 1 {
        (0, side.min(width))
    } else {
        let left = (width - side) / 2;
        (left, left + side)
    };

    let image = imageops::crop_imm(img, left, 0, right - left, height).to_image();
    let (start_secs, end_secs) = time_span(left, right, width, duration_secs);
    log::info!(
        "Middle segment covers audio from {:.2}s to {:.2}s",
        start_secs,
        end_secs
    );

    SquareSegment {
        image,
        left,
        right,
        start_secs,
        end_secs,
    }
}
