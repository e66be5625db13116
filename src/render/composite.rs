use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbImage, RgbaImage};

#[derive(Clone, Copy, Debug)]
pub struct CompositeSettings {
    /// Factor applied to the identicon before it is placed on top.
    pub identicon_scale: f32,
    /// Uniform alpha given to the spectrogram layer.
    pub spectrogram_alpha: u8,
}

impl Default for CompositeSettings {
    fn default() -> Self {
        Self {
            identicon_scale: 0.4,
            spectrogram_alpha: 127,
        }
    }
}

pub struct Cover {
    /// Final flattened artwork.
    pub image: RgbImage,
    /// The scaled, fully opaque identicon layer as placed on the cover.
    pub identicon: RgbaImage,
}

pub fn set_alpha(img: &mut RgbaImage, alpha: u8) {
    for px in img.pixels_mut() {
        px[3] = alpha;
    }
}

pub fn scale_by(img: &RgbaImage, scale: f32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let new_w = ((w as f32 * scale) as u32).max(1);
    let new_h = ((h as f32 * scale) as u32).max(1);
    imageops::resize(img, new_w, new_h, FilterType::CatmullRom)
}

/// Layer a translucent spectrogram and a centred identicon over black.
///
/// The spectrogram is stretched to the identicon's generated size, which
/// becomes the cover size; the identicon is then scaled down and centred.
pub fn compose_cover(identicon: &RgbaImage, spectrogram: &RgbaImage, settings: &CompositeSettings) -> Cover {
    let (width, height) = identicon.dimensions();

    let mut background_layer = imageops::resize(spectrogram, width, height, FilterType::CatmullRom);
    set_alpha(&mut background_layer, settings.spectrogram_alpha);

    let mut foreground = scale_by(identicon, settings.identicon_scale);
    set_alpha(&mut foreground, 255);

    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    imageops::overlay(&mut canvas, &background_layer, 0, 0);

    let x = (width as i64 - foreground.width() as i64) / 2;
    let y = (height as i64 - foreground.height() as i64) / 2;
    imageops::overlay(&mut canvas, &foreground, x, y);

    Cover {
        image: DynamicImage::ImageRgba8(canvas).to_rgb8(),
        identicon: foreground,
    }
}
