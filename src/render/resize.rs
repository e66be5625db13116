use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

/// Region to keep after scaling, in resized-image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Smallest size with the source aspect ratio that covers the target box.
/// The binding dimension lands exactly on the target, the other one overflows.
pub fn cover_size(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> (u32, u32) {
    let (sw, sh) = (src_w.max(1) as u64, src_h.max(1) as u64);
    let (tw, th) = (target_w as u64, target_h as u64);

    // Compare sw/sh against tw/th without floating point.
    if sw * th > tw * sh {
        let width = (sw * th / sh).max(tw);
        (width as u32, target_h)
    } else {
        let height = (sh * tw / sw).max(th);
        (target_w, height as u32)
    }
}

pub fn center_crop_box(resized: (u32, u32), target_w: u32, target_h: u32) -> CropBox {
    let (rw, rh) = resized;
    CropBox {
        left: rw.saturating_sub(target_w) / 2,
        top: rh.saturating_sub(target_h) / 2,
        width: target_w.min(rw),
        height: target_h.min(rh),
    }
}

/// Scale to cover `target_w × target_h`, center-crop, and drop alpha.
pub fn fit_cover(image: &DynamicImage, target_w: u32, target_h: u32) -> RgbImage {
    let rgba = image.to_rgba8();
    let (src_w, src_h) = rgba.dimensions();
    if src_w < target_w || src_h < target_h {
        log::warn!(
            "Input resolution {}x{} is lower than target {}x{}, upscaling",
            src_w,
            src_h,
            target_w,
            target_h
        );
    }

    let (new_w, new_h) = cover_size(src_w, src_h, target_w, target_h);
    log::info!("Resizing {}x{} -> {}x{}", src_w, src_h, new_w, new_h);
    let resized = imageops::resize(&rgba, new_w, new_h, FilterType::Lanczos3);

    let crop = center_crop_box((new_w, new_h), target_w, target_h);
    let cropped = imageops::crop_imm(&resized, crop.left, crop.top, crop.width, crop.height).to_image();

    DynamicImage::ImageRgba8(cropped).to_rgb8()
}
