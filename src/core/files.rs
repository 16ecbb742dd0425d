use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::internal_io(
                format!("File not found: {}", path.display()),
                Some("read file".to_string()),
            )
        } else {
            Error::internal_io(e.to_string(), Some("read file".to_string()))
        }
    })
}

/// Atomic write: write to a temp file in the same directory, then rename
/// over the original. A crash mid-write never leaves a half-written file.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some("write file".to_string()),
        )
    })?;

    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some("write file".to_string()),
        )
    })?;

    let tmp_path = parent.join(format!("{}.tmp", filename.to_string_lossy()));

    fs::write(&tmp_path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some("write temp file".to_string())))?;

    fs::rename(&tmp_path, path)
        .map_err(|e| Error::internal_io(e.to_string(), Some("rename temp file".to_string())))?;

    Ok(())
}
