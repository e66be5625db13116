use image::RgbImage;
use rand::Rng;

#[derive(Clone, Copy, Debug)]
pub struct GlitchSettings {
    /// 0.1..=10.0; drives both the number of shifted slices and their offset.
    pub intensity: f32,
    pub color_offset: bool,
    pub scan_lines: bool,
}

impl Default for GlitchSettings {
    fn default() -> Self {
        Self {
            intensity: 3.0,
            color_offset: true,
            scan_lines: true,
        }
    }
}

/// Slice-shift glitch generator.
#[derive(Clone, Debug, Default)]
pub struct Glitcher {
    settings: GlitchSettings,
}

impl Glitcher {
    pub fn new(settings: GlitchSettings) -> Self {
        let intensity = settings.intensity.clamp(0.1, 10.0);
        Self {
            settings: GlitchSettings { intensity, ..settings },
        }
    }

    pub fn max_offset(&self, width: u32) -> i64 {
        let i = self.settings.intensity;
        ((i * i / 100.0) * width as f32) as i64
    }

    /// `count` independent glitched copies of `base`.
    pub fn frames<R: Rng + ?Sized>(&self, base: &RgbImage, count: usize, rng: &mut R) -> Vec<RgbImage> {
        log::info!(
            "Generating {} glitch frames (intensity {:.1})",
            count,
            self.settings.intensity
        );
        (0..count).map(|_| self.glitch(base, rng)).collect()
    }

    pub fn glitch<R: Rng + ?Sized>(&self, base: &RgbImage, rng: &mut R) -> RgbImage {
        let mut out = base.clone();
        let (width, height) = out.dimensions();
        if width == 0 || height == 0 {
            return out;
        }

        let max_offset = self.max_offset(width);
        let passes = (self.settings.intensity * 2.0) as usize;
        for _ in 0..passes {
            shift_slice(&mut out, max_offset, rng);
        }
        if self.settings.color_offset {
            offset_channel(&mut out, max_offset, rng);
        }
        if self.settings.scan_lines {
            scan_lines(&mut out);
        }
        out
    }
}

/// Rotate a random horizontal band left or right, wrapping at the edges.
fn shift_slice<R: Rng + ?Sized>(img: &mut RgbImage, max_offset: i64, rng: &mut R) {
    let (width, height) = img.dimensions();
    let start_y = rng.random_range(0..height);
    let chunk = rng.random_range(1..=(height / 4).max(1)).min(height - start_y);
    let offset = rng.random_range(-max_offset..=max_offset);
    let shift = offset.rem_euclid(width as i64) as usize * 3;
    if shift == 0 {
        return;
    }

    let stride = width as usize * 3;
    let buf: &mut [u8] = img;
    for y in start_y..start_y + chunk {
        let row = &mut buf[y as usize * stride..(y as usize + 1) * stride];
        row.rotate_right(shift);
    }
}

/// Displace one colour channel by a random (dx, dy), wrapping.
fn offset_channel<R: Rng + ?Sized>(img: &mut RgbImage, max_offset: i64, rng: &mut R) {
    let (width, height) = img.dimensions();
    let channel = rng.random_range(0..3usize);
    let dx = rng.random_range(-max_offset..=max_offset);
    let dy = rng.random_range(-max_offset..=max_offset);
    if dx == 0 && dy == 0 {
        return;
    }

    let source = img.clone();
    for (x, y, px) in img.enumerate_pixels_mut() {
        let sx = (x as i64 - dx).rem_euclid(width as i64) as u32;
        let sy = (y as i64 - dy).rem_euclid(height as i64) as u32;
        px[channel] = source.get_pixel(sx, sy)[channel];
    }
}

/// Black out every other row.
fn scan_lines(img: &mut RgbImage) {
    let stride = img.width() as usize * 3;
    let buf: &mut [u8] = img;
    for row in buf.chunks_mut(stride).step_by(2) {
        row.fill(0);
    }
}
