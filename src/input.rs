use std::path::{Path, PathBuf};

use crate::error::SolveError;

const EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff"];

/// True if the file name has one of the supported photo extensions.
pub fn is_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// A single photo, or every photo directly inside a folder, sorted by name.
pub fn collect_photos(path: &Path) -> Result<Vec<PathBuf>, SolveError> {
    let mut photos = Vec::new();
    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            let p = entry?.path();
            if p.is_file() && is_photo(&p) {
                photos.push(p);
            }
        }
        photos.sort();
    } else if path.is_file() && is_photo(path) {
        photos.push(path.to_path_buf());
    }
    if photos.is_empty() {
        return Err(SolveError::NoImages(path.to_path_buf()));
    }
    Ok(photos)
}
