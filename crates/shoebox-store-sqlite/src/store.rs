//! [`SqliteStore`] — the SQLite implementation of [`CatalogStore`].

use std::{
  ffi::OsString,
  fs, io,
  path::{Path, PathBuf},
};

use rusqlite::{Connection, OpenFlags, Transaction, params};
use shoebox_core::{catalog::Catalog, layout::LibraryLayout, store::CatalogStore};

use crate::{
  Error, Result,
  encode::{
    RawAlbum, RawEntry, RawPhoto, RawSnapshot, RawTag, RawUser, encode_dt,
    encode_path,
  },
  schema::{SCHEMA, SCHEMA_VERSION},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A catalog snapshot kept in a single SQLite file.
///
/// No connection is held between calls: every save creates a fresh database
/// and every load opens the current file read-only.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  path: PathBuf,
}

impl SqliteStore {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  /// The store at `<data_dir>/users.dat`.
  pub fn for_layout(layout: &LibraryLayout) -> Self {
    Self::new(layout.artifact_path())
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Sibling file the next snapshot is built in before it replaces `path`.
  fn staging_path(&self) -> PathBuf {
    let mut name = self
      .path
      .file_name()
      .map(OsString::from)
      .unwrap_or_default();
    name.push(".tmp");
    self.path.with_file_name(name)
  }

  fn write_staged(&self, staging: &Path, catalog: &Catalog) -> Result<()> {
    let mut conn = Connection::open(staging)?;
    conn.execute_batch(SCHEMA)?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

    let tx = conn.transaction()?;
    insert_catalog(&tx, catalog)?;
    tx.commit()?;

    conn.close().map_err(|(_, e)| Error::Database(e))?;
    Ok(())
  }

  fn read_rows(&self) -> Result<RawSnapshot> {
    let conn = Connection::open_with_flags(
      &self.path,
      OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    let found: i64 =
      conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if found != SCHEMA_VERSION {
      return Err(Error::SchemaVersion { found, expected: SCHEMA_VERSION });
    }

    let users = conn
      .prepare("SELECT username, password FROM users ORDER BY position")?
      .query_map([], |row| {
        Ok(RawUser { username: row.get(0)?, password: row.get(1)? })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    let tag_types = conn
      .prepare("SELECT name FROM tag_types ORDER BY position")?
      .query_map([], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;

    let albums = conn
      .prepare(
        "SELECT username, position, name FROM albums
         ORDER BY username, position",
      )?
      .query_map([], |row| {
        Ok(RawAlbum {
          username: row.get(0)?,
          position: row.get(1)?,
          name:     row.get(2)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    let photos = conn
      .prepare(
        "SELECT username, file_path, caption, date_taken FROM photos
         ORDER BY username, file_path",
      )?
      .query_map([], |row| {
        Ok(RawPhoto {
          username:   row.get(0)?,
          file_path:  row.get(1)?,
          caption:    row.get(2)?,
          date_taken: row.get(3)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    let entries = conn
      .prepare(
        "SELECT username, album_pos, file_path FROM album_photos
         ORDER BY username, album_pos, position",
      )?
      .query_map([], |row| {
        Ok(RawEntry {
          username:  row.get(0)?,
          album_pos: row.get(1)?,
          file_path: row.get(2)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    let tags = conn
      .prepare(
        "SELECT username, file_path, name, value FROM photo_tags
         ORDER BY username, file_path, name, value",
      )?
      .query_map([], |row| {
        Ok(RawTag {
          username:  row.get(0)?,
          file_path: row.get(1)?,
          name:      row.get(2)?,
          value:     row.get(3)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(RawSnapshot { users, tag_types, albums, photos, entries, tags })
  }
}

/// Insert every row of `catalog`. Positions are the indexes in each ordered
/// collection.
fn insert_catalog(tx: &Transaction<'_>, catalog: &Catalog) -> Result<()> {
  let mut insert_user = tx.prepare(
    "INSERT INTO users (username, password, position) VALUES (?1, ?2, ?3)",
  )?;
  let mut insert_photo = tx.prepare(
    "INSERT INTO photos (username, file_path, caption, date_taken)
     VALUES (?1, ?2, ?3, ?4)",
  )?;
  let mut insert_tag = tx.prepare(
    "INSERT INTO photo_tags (username, file_path, name, value)
     VALUES (?1, ?2, ?3, ?4)",
  )?;
  let mut insert_album = tx.prepare(
    "INSERT INTO albums (username, position, name) VALUES (?1, ?2, ?3)",
  )?;
  let mut insert_entry = tx.prepare(
    "INSERT INTO album_photos (username, album_pos, position, file_path)
     VALUES (?1, ?2, ?3, ?4)",
  )?;
  let mut insert_tag_type =
    tx.prepare("INSERT INTO tag_types (position, name) VALUES (?1, ?2)")?;

  for (user_pos, user) in catalog.users().enumerate() {
    let username = user.username();
    insert_user.execute(params![username, user.password(), user_pos as i64])?;

    for photo in user.photos() {
      let path = encode_path(photo.file_path());
      insert_photo.execute(params![
        username,
        path,
        photo.caption(),
        encode_dt(photo.date_taken()),
      ])?;
      for tag in photo.tags() {
        insert_tag.execute(params![username, path, tag.name(), tag.value()])?;
      }
    }

    for (album_pos, album) in user.albums().iter().enumerate() {
      let album_pos = album_pos as i64;
      insert_album.execute(params![username, album_pos, album.name()])?;
      for (position, path) in album.paths().iter().enumerate() {
        insert_entry.execute(params![
          username,
          album_pos,
          position as i64,
          encode_path(path),
        ])?;
      }
    }
  }

  for (position, name) in catalog.tag_types().iter().enumerate() {
    insert_tag_type.execute(params![position as i64, name])?;
  }

  Ok(())
}

fn remove_if_present(path: &Path) -> io::Result<()> {
  match fs::remove_file(path) {
    Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
    _ => Ok(()),
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  fn write_snapshot(&self, catalog: &Catalog) -> Result<()> {
    if let Some(dir) = self.path.parent()
      && !dir.as_os_str().is_empty()
    {
      fs::create_dir_all(dir)?;
    }

    let staging = self.staging_path();
    remove_if_present(&staging)?;

    if let Err(e) = self.write_staged(&staging, catalog) {
      remove_if_present(&staging).ok();
      return Err(e);
    }
    fs::rename(&staging, &self.path)?;

    tracing::debug!(path = %self.path.display(), "snapshot written");
    Ok(())
  }

  fn read_snapshot(&self) -> Result<Option<Catalog>> {
    match fs::metadata(&self.path) {
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(e.into()),
      Ok(_) => {}
    }

    let catalog = self.read_rows()?.into_catalog()?;
    tracing::debug!(path = %self.path.display(), "snapshot read");
    Ok(Some(catalog))
  }
}
