//! Photo — a reference to an image file plus its caption and tags.
//!
//! A photo is identified by its file path alone. Containers compare photos
//! through [`Photo::key`], never through the mutable caption or tag fields.

use std::{
  collections::BTreeSet,
  fs,
  path::{Path, PathBuf},
};

use chrono::{DateTime, Local, NaiveDateTime};
use crate::tag::Tag;

#[derive(Debug, Clone)]
pub struct Photo {
  file_path:  PathBuf,
  caption:    String,
  /// Local wall-clock time taken from the file's modification time.
  date_taken: NaiveDateTime,
  tags:       BTreeSet<Tag>,
}

impl Photo {
  /// Reference the image at `file_path`. The date taken is read from the
  /// file's modification time, or set to now when the file is missing.
  pub fn new(file_path: impl Into<PathBuf>) -> Self {
    let file_path = file_path.into();
    let date_taken = modified_at(&file_path);
    Self {
      file_path,
      caption: String::new(),
      date_taken,
      tags: BTreeSet::new(),
    }
  }

  /// Rebuild a photo from stored fields without touching the filesystem.
  pub fn from_parts(
    file_path: impl Into<PathBuf>,
    caption: impl Into<String>,
    date_taken: NaiveDateTime,
    tags: impl IntoIterator<Item = Tag>,
  ) -> Self {
    Self {
      file_path: file_path.into(),
      caption: caption.into(),
      date_taken,
      tags: tags.into_iter().collect(),
    }
  }

  /// The identity key used for deduplication inside albums and query
  /// results.
  pub fn key(&self) -> &Path { &self.file_path }

  pub fn file_path(&self) -> &Path { &self.file_path }

  /// Point the photo at a different file and re-derive its date. The owning
  /// user re-keys its albums through
  /// [`User::set_photo_path`](crate::user::User::set_photo_path).
  pub(crate) fn set_file_path(&mut self, file_path: impl Into<PathBuf>) {
    self.file_path = file_path.into();
    self.refresh_date_taken();
  }

  pub fn caption(&self) -> &str { &self.caption }

  pub fn set_caption(&mut self, caption: impl Into<String>) {
    self.caption = caption.into();
  }

  pub fn date_taken(&self) -> NaiveDateTime { self.date_taken }

  /// Re-read the modification time of the referenced file.
  pub fn refresh_date_taken(&mut self) {
    self.date_taken = modified_at(&self.file_path);
  }

  /// The caption, or the bare file name when no caption is set.
  pub fn display_name(&self) -> String {
    if !self.caption.is_empty() {
      return self.caption.clone();
    }
    self
      .file_path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| self.file_path.display().to_string())
  }

  // ── Tags ──────────────────────────────────────────────────────────────────

  /// Tags in `(name, value)` order.
  pub fn tags(&self) -> impl Iterator<Item = &Tag> { self.tags.iter() }

  pub fn tag_count(&self) -> usize { self.tags.len() }

  /// Returns `false` if an equal tag is already present.
  pub fn add_tag(&mut self, tag: Tag) -> bool { self.tags.insert(tag) }

  /// Returns `false` if the tag was not present.
  pub fn remove_tag(&mut self, tag: &Tag) -> bool { self.tags.remove(tag) }

  pub fn has_tag(&self, tag: &Tag) -> bool { self.tags.contains(tag) }

  /// Swap `old` for `new`. Nothing changes unless `old` is present and `new`
  /// is not.
  pub fn replace_tag(&mut self, old: &Tag, new: Tag) -> bool {
    if !self.tags.contains(old) || self.tags.contains(&new) {
      return false;
    }
    self.tags.remove(old);
    self.tags.insert(new)
  }
}

fn modified_at(path: &Path) -> NaiveDateTime {
  match fs::metadata(path).and_then(|m| m.modified()) {
    Ok(mtime) => DateTime::<Local>::from(mtime).naive_local(),
    Err(_) => Local::now().naive_local(),
  }
}
