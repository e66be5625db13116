use image::RgbImage;

use crate::error::{Error, Result};

/// Frames of one animation. All frames share the first frame's dimensions.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    frames: Vec<RgbImage>,
    pub delay_ms: u32,
    pub looping: bool,
}

impl FrameSequence {
    pub fn new(frames: Vec<RgbImage>, delay_ms: u32) -> Result<Self> {
        ensure_uniform(&frames)?;
        Ok(Self {
            frames,
            delay_ms,
            looping: true,
        })
    }

    pub fn frames(&self) -> &[RgbImage] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.frames[0].dimensions()
    }
}

/// Per-frame delay that spreads `total_duration_ms` over `total_frames`.
pub fn frame_delay_ms(total_duration_ms: u32, total_frames: usize) -> u32 {
    if total_frames == 0 {
        return total_duration_ms;
    }
    (total_duration_ms as u64 / total_frames as u64) as u32
}

pub fn ensure_uniform(frames: &[RgbImage]) -> Result<()> {
    let first = frames.first().ok_or(Error::EmptySequence)?;
    let expected = first.dimensions();
    for (index, frame) in frames.iter().enumerate().skip(1) {
        if frame.dimensions() != expected {
            return Err(Error::FrameMismatch {
                index,
                got: frame.dimensions(),
                expected,
            });
        }
    }
    Ok(())
}
