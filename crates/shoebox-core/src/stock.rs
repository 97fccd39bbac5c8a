//! Discovery of the stock photos shipped alongside the library.
//!
//! The stock directory is read, never written. Only its immediate entries are
//! considered.

use std::{
  fs, io,
  path::{Path, PathBuf},
};

use crate::layout::LibraryLayout;

/// File extensions (compared case-insensitively) recognised as images.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];

pub fn is_image_file(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| {
      IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// Absolute paths of the stock images, in file-name order.
///
/// The stock subdirectory is tried first; the data directory itself is only
/// scanned when the subdirectory yields no images.
pub fn scan_stock_photos(layout: &LibraryLayout) -> Vec<PathBuf> {
  for dir in [layout.stock_dir(), layout.data_dir.clone()] {
    match images_in(&dir) {
      Ok(found) if !found.is_empty() => {
        tracing::debug!(dir = %dir.display(), count = found.len(), "found stock photos");
        return found;
      }
      Ok(_) => {}
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => {
        tracing::warn!(dir = %dir.display(), error = %e, "cannot scan stock directory");
      }
    }
  }
  Vec::new()
}

fn images_in(dir: &Path) -> io::Result<Vec<PathBuf>> {
  let mut found = Vec::new();
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    let path = entry.path();
    if entry.file_type()?.is_file() && is_image_file(&path) {
      found.push(std::path::absolute(&path).unwrap_or(path));
    }
  }
  found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
  Ok(found)
}
