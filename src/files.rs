use std::fs;
use std::path::Path;

use thiserror::Error;

/// Largest file the open flow will read.
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;
/// Default name for exported code when the buffer has no filename yet.
pub const EXPORT_FILENAME: &str = "codigo.py";

#[derive(Debug, Error)]
pub enum FileError {
    #[error("Solo se permiten archivos .py o .txt")]
    UnsupportedExtension,
    #[error("Archivo muy grande (máximo 1MB)")]
    TooLarge,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reads a source file, enforcing the extension whitelist and size limit
/// before touching the contents.
pub fn load_source_file(path: &Path) -> Result<String, FileError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    if !matches!(extension.as_deref(), Some("py") | Some("txt")) {
        return Err(FileError::UnsupportedExtension);
    }
    if fs::metadata(path)?.len() > MAX_FILE_SIZE {
        return Err(FileError::TooLarge);
    }
    Ok(fs::read_to_string(path)?)
}

/// Writes the buffer out and returns the byte count for the status line.
pub fn save_source_file(path: &Path, text: &str) -> Result<usize, FileError> {
    fs::write(path, text)?;
    Ok(text.len())
}
