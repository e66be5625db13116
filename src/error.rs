use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("invalid config value `{key}`: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("`{0}` is required but was not found on PATH")]
    MissingTool(String),

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}:\n{stderr}")]
    ToolFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("frame sequence is empty")]
    EmptySequence,

    #[error("frame {index} is {got:?}, expected {expected:?}")]
    FrameMismatch {
        index: usize,
        got: (u32, u32),
        expected: (u32, u32),
    },

    #[error("no decodable audio track in {}", .0.display())]
    NoAudioTrack(PathBuf),

    #[error("audio decode failed: {0}")]
    Audio(#[from] symphonia::core::errors::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_config(key: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig { key, reason: reason.into() }
    }
}

/// Reasons a per-frame effect declined to touch a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("frame is empty")]
    EmptyFrame,

    #[error("frame has {height} rows, fewer than the minimum smear run of {min_run}")]
    FrameTooShort { height: u32, min_run: u32 },

    #[error("smear strength {strength} is below the minimum run of {min_run}")]
    StrengthTooLow { strength: u32, min_run: u32 },
}

/// Result of a best-effort image effect. A skipped effect hands back the
/// untouched input so the pipeline can keep going.
#[derive(Debug)]
pub enum EffectOutcome<T> {
    Applied(T),
    Skipped { original: T, reason: EffectError },
}

impl<T> EffectOutcome<T> {
    pub fn from_result(original: T, result: std::result::Result<T, EffectError>) -> Self {
        match result {
            Ok(value) => EffectOutcome::Applied(value),
            Err(reason) => EffectOutcome::Skipped { original, reason },
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, EffectOutcome::Applied(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            EffectOutcome::Applied(value) => value,
            EffectOutcome::Skipped { original, reason } => {
                log::warn!("Effect skipped: {}", reason);
                original
            }
        }
    }
}
