//! User — an account owning a collection of uniquely-named albums.
//!
//! A user holds each photo once, keyed by path; albums list paths into that
//! collection. A photo stays with the user while at least one album lists it.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
};

use crate::{
  album::{Album, AlbumView},
  photo::Photo,
};

#[derive(Debug, Clone)]
pub struct User {
  username: String,
  /// Stored but never checked; login is by username alone.
  password: Option<String>,
  photos:   BTreeMap<PathBuf, Photo>,
  albums:   Vec<Album>,
}

impl User {
  pub fn new(username: impl Into<String>) -> Self {
    Self {
      username: username.into(),
      password: None,
      photos:   BTreeMap::new(),
      albums:   Vec::new(),
    }
  }

  pub fn with_password(
    username: impl Into<String>,
    password: impl Into<String>,
  ) -> Self {
    Self { password: Some(password.into()), ..Self::new(username) }
  }

  pub fn username(&self) -> &str { &self.username }

  pub fn password(&self) -> Option<&str> { self.password.as_deref() }

  pub fn set_password(&mut self, password: Option<String>) {
    self.password = password;
  }

  // ── Albums ────────────────────────────────────────────────────────────────

  pub fn albums(&self) -> &[Album] { &self.albums }

  /// Every album paired with its photos, in album order.
  pub fn album_views(&self) -> impl Iterator<Item = AlbumView<'_>> {
    self.albums.iter().map(|a| AlbumView::new(a, &self.photos))
  }

  /// Append `album`. Returns `false` if an album with the exact same name
  /// already exists. Paths this user holds no photo for are dropped.
  pub fn add_album(&mut self, mut album: Album) -> bool {
    if self.has_album(album.name()) {
      return false;
    }
    album.retain_paths(|p| self.photos.contains_key(p));
    self.albums.push(album);
    true
  }

  /// Album names are unique within a user, so the name identifies the album.
  pub fn remove_album(&mut self, name: &str) -> bool {
    match self.albums.iter().position(|a| a.name() == name) {
      Some(i) => {
        self.albums.remove(i);
        self.forget_unlisted();
        true
      }
      None => false,
    }
  }

  pub fn get_album_by_name(&self, name: &str) -> Option<&Album> {
    self.albums.iter().find(|a| a.name() == name)
  }

  pub fn album(&self, name: &str) -> Option<AlbumView<'_>> {
    self
      .get_album_by_name(name)
      .map(|a| AlbumView::new(a, &self.photos))
  }

  pub fn album_mut(&mut self, name: &str) -> Option<&mut Album> {
    self.albums.iter_mut().find(|a| a.name() == name)
  }

  pub fn has_album(&self, name: &str) -> bool {
    self.get_album_by_name(name).is_some()
  }

  /// Rename `old` to `new`. Refused when `new` is the name of any album,
  /// `old` itself included.
  pub fn rename_album(&mut self, old: &str, new: &str) -> bool {
    if self.has_album(new) {
      return false;
    }
    match self.album_mut(old) {
      Some(album) => {
        album.set_name(new);
        true
      }
      None => false,
    }
  }

  /// Create an album named `name` listing `paths` in the given order, e.g.
  /// the keys of a search result. Paths without a photo are skipped.
  pub fn create_album_from(
    &mut self,
    name: &str,
    paths: impl IntoIterator<Item = PathBuf>,
  ) -> bool {
    if self.has_album(name) {
      return false;
    }
    self.add_album(Album::from_paths(name, paths))
  }

  // ── Photos ────────────────────────────────────────────────────────────────

  /// Every photo this user holds, once each, in path order.
  pub fn photos(&self) -> impl Iterator<Item = &Photo> { self.photos.values() }

  pub fn photo(&self, path: impl AsRef<Path>) -> Option<&Photo> {
    self.photos.get(path.as_ref())
  }

  /// Edits made here are seen by every album listing the photo.
  pub fn photo_mut(&mut self, path: impl AsRef<Path>) -> Option<&mut Photo> {
    self.photos.get_mut(path.as_ref())
  }

  /// Append `photo` to album `album`. Returns `false` if the album is missing
  /// or already lists the path. When another album already lists the path,
  /// the photo held for it is kept and `photo` is discarded.
  pub fn add_photo(&mut self, album: &str, photo: Photo) -> bool {
    let Some(target) = self.albums.iter_mut().find(|a| a.name() == album) else {
      return false;
    };
    if !target.insert_path(photo.key().to_path_buf()) {
      return false;
    }
    self.photos.entry(photo.key().to_path_buf()).or_insert(photo);
    true
  }

  /// Take the photo at `path` out of album `album`.
  pub fn remove_photo(&mut self, album: &str, path: impl AsRef<Path>) -> bool {
    let removed = self
      .album_mut(album)
      .is_some_and(|a| a.remove_path(path.as_ref()));
    if removed {
      self.forget_unlisted();
    }
    removed
  }

  /// List the photo at `path` from album `from` in album `to` as well. Both
  /// albums then show the same photo.
  pub fn copy_photo(&mut self, path: &Path, from: &str, to: &str) -> bool {
    let Some(target) = self.transfer_target(path, from, to) else {
      return false;
    };
    self.albums[target].insert_path(path.to_path_buf())
  }

  /// Move the photo at `path` from album `from` into album `to`. The source
  /// keeps the photo unless it landed in `to`.
  pub fn move_photo(&mut self, path: &Path, from: &str, to: &str) -> bool {
    if !self.copy_photo(path, from, to) {
      return false;
    }
    self
      .album_mut(from)
      .is_some_and(|album| album.remove_path(path))
  }

  /// Point the photo at `old` to the file at `new`, in every album listing
  /// it. Refused when there is no photo at `old` or the user already holds a
  /// photo at `new`.
  pub fn set_photo_path(&mut self, old: &Path, new: &Path) -> bool {
    if self.photos.contains_key(new) {
      return false;
    }
    let Some(mut photo) = self.photos.remove(old) else {
      return false;
    };
    photo.set_file_path(new);
    self.photos.insert(new.to_path_buf(), photo);
    for album in &mut self.albums {
      album.set_photo_path(old, new);
    }
    true
  }

  /// The index of album `to`, if moving or copying `path` out of `from` can
  /// succeed.
  fn transfer_target(&self, path: &Path, from: &str, to: &str) -> Option<usize> {
    if from == to || !self.get_album_by_name(from)?.contains(path) {
      return None;
    }
    let target = self.albums.iter().position(|a| a.name() == to)?;
    (!self.albums[target].contains(path)).then_some(target)
  }

  /// Drop photos no album lists any more.
  fn forget_unlisted(&mut self) {
    let albums = &self.albums;
    self
      .photos
      .retain(|path, _| albums.iter().any(|a| a.contains(path)));
  }
}
