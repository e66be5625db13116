use std::path::Path;

use image::RgbaImage;

use crate::audio::fingerprint::Fingerprint;
use crate::error::Result;
use crate::process::{run_checked, ProcessRunner};

pub const NPX: &str = "npx";

pub fn identicon_args(fingerprint: &Fingerprint, size: u32, output: &Path) -> Vec<String> {
    vec![
        "jdenticon".into(),
        fingerprint.to_hex(),
        "--size".into(),
        size.to_string(),
        "--output".into(),
        output.display().to_string(),
    ]
}

/// Render the identicon for `fingerprint` to `output` and load it as RGBA.
pub fn generate<R: ProcessRunner + ?Sized>(
    runner: &R,
    fingerprint: &Fingerprint,
    size: u32,
    output: &Path,
) -> Result<RgbaImage> {
    log::info!("Generating {}px identicon for {}", size, fingerprint.short());
    run_checked(runner, NPX, &identicon_args(fingerprint, size, output))?;
    let img = image::open(output)?.to_rgba8();
    log::info!("Identicon created: {}x{}", img.width(), img.height());
    Ok(img)
}
