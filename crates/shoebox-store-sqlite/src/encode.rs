//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as ISO 8601 local date-times without an offset,
//! matching the wall-clock semantics of `Photo::date_taken`. Paths are stored
//! as text.

use std::{
  collections::{BTreeMap, BTreeSet},
  path::Path,
};

use chrono::NaiveDateTime;
use shoebox_core::{
  album::Album,
  catalog::Catalog,
  photo::Photo,
  tag::Tag,
  user::User,
};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

// ─── NaiveDateTime ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: NaiveDateTime) -> String {
  dt.format(DATE_FORMAT).to_string()
}

pub fn decode_dt(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Path ────────────────────────────────────────────────────────────────────

pub fn encode_path(path: &Path) -> String { path.to_string_lossy().into_owned() }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from a `users` row.
pub struct RawUser {
  pub username: String,
  pub password: Option<String>,
}

/// Raw values read from an `albums` row.
pub struct RawAlbum {
  pub username: String,
  pub position: i64,
  pub name:     String,
}

/// Raw values read from a `photos` row.
pub struct RawPhoto {
  pub username:   String,
  pub file_path:  String,
  pub caption:    String,
  pub date_taken: String,
}

/// Raw values read from an `album_photos` row.
pub struct RawEntry {
  pub username:  String,
  pub album_pos: i64,
  pub file_path: String,
}

/// Raw values read from a `photo_tags` row.
pub struct RawTag {
  pub username:  String,
  pub file_path: String,
  pub name:      String,
  pub value:     String,
}

/// Every row of a snapshot, each table already in position order.
pub struct RawSnapshot {
  pub users:     Vec<RawUser>,
  pub tag_types: Vec<String>,
  pub albums:    Vec<RawAlbum>,
  pub photos:    Vec<RawPhoto>,
  pub entries:   Vec<RawEntry>,
  pub tags:      Vec<RawTag>,
}

impl RawSnapshot {
  /// Rebuild the catalog graph, failing on any row that would violate a
  /// uniqueness rule or reference a missing parent.
  pub fn into_catalog(self) -> Result<Catalog> {
    let mut tags: BTreeMap<(String, String), Vec<Tag>> = BTreeMap::new();
    for raw in self.tags {
      tags
        .entry((raw.username, raw.file_path))
        .or_default()
        .push(Tag::new(raw.name, raw.value));
    }

    let mut photos: BTreeMap<(String, String), Photo> = BTreeMap::new();
    for raw in self.photos {
      let key = (raw.username, raw.file_path);
      let photo = Photo::from_parts(
        key.1.clone(),
        raw.caption,
        decode_dt(&raw.date_taken)?,
        tags.remove(&key).unwrap_or_default(),
      );
      if photos.insert(key.clone(), photo).is_some() {
        return Err(Error::Corrupt(format!(
          "duplicate photo {:?} of {:?}",
          key.1, key.0
        )));
      }
    }
    if let Some(((user, path), _)) = tags.into_iter().next() {
      return Err(Error::Corrupt(format!(
        "tags for missing photo {path:?} of {user:?}"
      )));
    }

    let mut entries: BTreeMap<(String, i64), Vec<String>> = BTreeMap::new();
    for raw in self.entries {
      entries
        .entry((raw.username, raw.album_pos))
        .or_default()
        .push(raw.file_path);
    }

    let mut albums: BTreeMap<String, Vec<RawAlbum>> = BTreeMap::new();
    for raw in self.albums {
      albums.entry(raw.username.clone()).or_default().push(raw);
    }

    let mut listed: BTreeSet<(String, String)> = BTreeSet::new();
    let mut users = Vec::with_capacity(self.users.len());
    for raw in self.users {
      let mut user = User::new(raw.username);
      user.set_password(raw.password);
      let username = user.username().to_owned();

      for album in albums.remove(&username).unwrap_or_default() {
        if !user.add_album(Album::new(album.name.clone())) {
          return Err(Error::Corrupt(format!(
            "duplicate album {:?} for {username:?}",
            album.name
          )));
        }
        let paths = entries
          .remove(&(username.clone(), album.position))
          .unwrap_or_default();
        for path in paths {
          let key = (username.clone(), path);
          let photo = photos.get(&key).cloned().ok_or_else(|| {
            Error::Corrupt(format!("album {:?} lists missing photo {:?}", album.name, key.1))
          })?;
          if !user.add_photo(&album.name, photo) {
            return Err(Error::Corrupt(format!(
              "duplicate photo {:?} in album {:?}",
              key.1, album.name
            )));
          }
          listed.insert(key);
        }
      }
      users.push(user);
    }
    if let Some(user) = albums.into_keys().next() {
      return Err(Error::Corrupt(format!("albums for missing user {user:?}")));
    }
    if let Some(((user, album), _)) = entries.into_iter().next() {
      return Err(Error::Corrupt(format!(
        "photos for missing album {album} of {user:?}"
      )));
    }
    if let Some((user, path)) = photos.into_keys().find(|k| !listed.contains(k)) {
      return Err(Error::Corrupt(format!(
        "photo {path:?} of {user:?} is in no album"
      )));
    }

    Ok(Catalog::restore(users, self.tag_types))
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn date_text_round_trips_with_fraction() {
    let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
      .unwrap()
      .and_hms_milli_opt(10, 0, 5, 250)
      .unwrap();
    let text = encode_dt(dt);
    assert_eq!(text, "2024-01-15T10:00:05.250");
    assert_eq!(decode_dt(&text).unwrap(), dt);
  }

  #[test]
  fn bad_date_text_is_rejected() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }

  #[test]
  fn orphan_rows_are_corrupt() {
    let snapshot = RawSnapshot {
      users:     vec![],
      tag_types: vec![],
      albums:    vec![RawAlbum {
        username: "ghost".into(),
        position: 0,
        name:     "trip".into(),
      }],
      photos:    vec![],
      entries:   vec![],
      tags:      vec![],
    };
    assert!(matches!(snapshot.into_catalog(), Err(Error::Corrupt(_))));
  }

  fn one_album(photos: Vec<RawPhoto>, entries: Vec<RawEntry>) -> RawSnapshot {
    RawSnapshot {
      users: vec![RawUser { username: "alice".into(), password: None }],
      tag_types: vec![],
      albums: vec![RawAlbum {
        username: "alice".into(),
        position: 0,
        name:     "trip".into(),
      }],
      photos,
      entries,
      tags: vec![],
    }
  }

  fn raw_photo(path: &str) -> RawPhoto {
    RawPhoto {
      username:   "alice".into(),
      file_path:  path.into(),
      caption:    String::new(),
      date_taken: "2024-01-15T10:00:00.000".into(),
    }
  }

  fn entry(path: &str) -> RawEntry {
    RawEntry { username: "alice".into(), album_pos: 0, file_path: path.into() }
  }

  #[test]
  fn photo_listed_by_no_album_is_corrupt() {
    let snapshot = one_album(vec![raw_photo("/a.jpg"), raw_photo("/b.jpg")], vec![
      entry("/a.jpg"),
    ]);
    assert!(matches!(snapshot.into_catalog(), Err(Error::Corrupt(_))));
  }

  #[test]
  fn album_entry_without_photo_is_corrupt() {
    let snapshot = one_album(vec![], vec![entry("/a.jpg")]);
    assert!(matches!(snapshot.into_catalog(), Err(Error::Corrupt(_))));
  }

  #[test]
  fn entries_keep_album_order() {
    let snapshot = one_album(vec![raw_photo("/a.jpg"), raw_photo("/b.jpg")], vec![
      entry("/b.jpg"),
      entry("/a.jpg"),
    ]);
    let catalog = snapshot.into_catalog().unwrap();
    let album = catalog.get_user("alice").unwrap().get_album_by_name("trip").unwrap();
    assert_eq!(album.paths(), [Path::new("/b.jpg"), Path::new("/a.jpg")]);
  }
}
