//! Album — a named, insertion-ordered list of photos.
//!
//! An album stores photo paths only. The photos themselves live in the owning
//! [`User`](crate::user::User), keyed by path, so a photo listed by several
//! albums is one photo: a caption or tag edit shows up in all of them.
//! [`AlbumView`] pairs an album with its owner's photos for reading.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use chrono::NaiveDateTime;

use crate::photo::Photo;

/// Paths keep the order they were added in. A path appears at most once per
/// album.
#[derive(Debug, Clone)]
pub struct Album {
  name:  String,
  paths: Vec<PathBuf>,
}

impl Album {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), paths: Vec::new() }
  }

  /// An album listing `photos` in the given order, e.g. the output of
  /// [`crate::query::search`]. Repeated paths keep their first occurrence.
  pub fn from_photos<'a>(
    name: impl Into<String>,
    photos: impl IntoIterator<Item = &'a Photo>,
  ) -> Self {
    Self::from_paths(name, photos.into_iter().map(|p| p.key().to_path_buf()))
  }

  pub(crate) fn from_paths(
    name: impl Into<String>,
    paths: impl IntoIterator<Item = PathBuf>,
  ) -> Self {
    let mut album = Self::new(name);
    for path in paths {
      album.insert_path(path);
    }
    album
  }

  pub fn name(&self) -> &str { &self.name }

  /// Replace the name without any uniqueness check; see
  /// [`crate::user::User::rename_album`] for the checked variant.
  pub fn set_name(&mut self, name: impl Into<String>) { self.name = name.into(); }

  /// Photo paths in album order.
  pub fn paths(&self) -> &[PathBuf] { &self.paths }

  pub fn photo_count(&self) -> usize { self.paths.len() }

  pub fn is_empty(&self) -> bool { self.paths.is_empty() }

  fn position(&self, path: &Path) -> Option<usize> {
    self.paths.iter().position(|p| p == path)
  }

  pub fn contains(&self, path: impl AsRef<Path>) -> bool {
    self.position(path.as_ref()).is_some()
  }

  /// Append `path`. Returns `false`, leaving the album untouched, if the path
  /// is already listed.
  pub(crate) fn insert_path(&mut self, path: PathBuf) -> bool {
    if self.contains(&path) {
      return false;
    }
    self.paths.push(path);
    true
  }

  pub(crate) fn remove_path(&mut self, path: &Path) -> bool {
    match self.position(path) {
      Some(i) => {
        self.paths.remove(i);
        true
      }
      None => false,
    }
  }

  /// Re-key the entry for `old` to `new` in place. Refused when `old` is not
  /// listed or `new` already is.
  pub(crate) fn set_photo_path(&mut self, old: &Path, new: &Path) -> bool {
    if self.contains(new) {
      return false;
    }
    match self.position(old) {
      Some(i) => {
        self.paths[i] = new.to_path_buf();
        true
      }
      None => false,
    }
  }

  pub(crate) fn retain_paths(&mut self, mut keep: impl FnMut(&Path) -> bool) {
    self.paths.retain(|p| keep(p));
  }
}

// ─── View ────────────────────────────────────────────────────────────────────

/// An album together with the photos its paths refer to.
#[derive(Debug, Clone, Copy)]
pub struct AlbumView<'a> {
  album:  &'a Album,
  photos: &'a BTreeMap<PathBuf, Photo>,
}

impl<'a> AlbumView<'a> {
  pub(crate) fn new(album: &'a Album, photos: &'a BTreeMap<PathBuf, Photo>) -> Self {
    Self { album, photos }
  }

  pub fn album(self) -> &'a Album { self.album }

  pub fn name(self) -> &'a str { self.album.name() }

  pub fn photo_count(self) -> usize { self.album.photo_count() }

  pub fn is_empty(self) -> bool { self.album.is_empty() }

  pub fn contains(self, path: impl AsRef<Path>) -> bool {
    self.album.contains(path)
  }

  /// Photos in album order.
  pub fn photos(self) -> impl Iterator<Item = &'a Photo> + use<'a> {
    let photos = self.photos;
    self.album.paths().iter().filter_map(move |p| photos.get(p))
  }

  pub fn photo(self, path: impl AsRef<Path>) -> Option<&'a Photo> {
    let path = path.as_ref();
    if !self.album.contains(path) {
      return None;
    }
    self.photos.get(path)
  }

  /// Earliest date taken; on ties the first photo in album order wins.
  pub fn earliest_date(self) -> Option<NaiveDateTime> {
    let mut photos = self.photos();
    let first = photos.next()?.date_taken();
    Some(photos.fold(first, |earliest, p| {
      if p.date_taken() < earliest { p.date_taken() } else { earliest }
    }))
  }

  /// Latest date taken; on ties the first photo in album order wins.
  pub fn latest_date(self) -> Option<NaiveDateTime> {
    let mut photos = self.photos();
    let first = photos.next()?.date_taken();
    Some(photos.fold(first, |latest, p| {
      if p.date_taken() > latest { p.date_taken() } else { latest }
    }))
  }

  /// `(earliest, latest)`, or `None` for an empty album.
  pub fn date_range(self) -> Option<(NaiveDateTime, NaiveDateTime)> {
    Some((self.earliest_date()?, self.latest_date()?))
  }
}
