pub mod audio;
pub mod config;
pub mod encode;
pub mod error;
pub mod identicon;
pub mod pipeline;
pub mod process;
pub mod prompt;
pub mod render;

pub use error::{EffectError, EffectOutcome, Error, Result};
