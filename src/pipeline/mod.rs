pub mod canvas;
pub mod cover;

use std::path::Path;

/// File name without its final extension, used to name every output.
pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".into())
}
