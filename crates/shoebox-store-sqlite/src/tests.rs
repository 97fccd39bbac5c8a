//! Integration tests for `SqliteStore` against scratch data directories.

use std::{fs, path::Path};

use chrono::{NaiveDate, NaiveDateTime};
use shoebox_core::{
  album::{Album, AlbumView},
  catalog::{Catalog, STOCK_ALBUM, STOCK_USERNAME},
  layout::LibraryLayout,
  photo::Photo,
  store::CatalogStore,
  tag::Tag,
  user::User,
};

use crate::{Error, SqliteStore};

fn scratch() -> (tempfile::TempDir, LibraryLayout, SqliteStore) {
  let tmp = tempfile::tempdir().expect("temp dir");
  let layout = LibraryLayout::new(tmp.path().join("data"));
  let store = SqliteStore::for_layout(&layout);
  (tmp, layout, store)
}

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
  NaiveDate::from_ymd_opt(y, m, d)
    .unwrap()
    .and_hms_opt(h, 30, 15)
    .unwrap()
}

fn photo(path: &str, caption: &str, taken: NaiveDateTime, tags: &[(&str, &str)]) -> Photo {
  Photo::from_parts(
    path,
    caption,
    taken,
    tags.iter().map(|(n, v)| Tag::new(*n, *v)),
  )
}

/// Two users, three albums, five distinct photos. Alice's Eiffel photo is
/// listed by both of her albums.
fn sample_catalog() -> Catalog {
  let mut catalog = Catalog::new();
  catalog.add_tag_type("event");

  let mut alice = User::with_password("alice", "hunter2");
  alice.add_album(Album::new("Paris"));
  alice.add_album(Album::new("Family"));
  alice.add_photo("Paris", photo(
    "/photos/eiffel.jpg",
    "Eiffel tower",
    at(2024, 1, 15, 10),
    &[("location", "paris"), ("person", "alice")],
  ));
  alice.add_photo("Paris", photo("/photos/louvre.png", "", at(2024, 1, 16, 14), &[]));
  alice.add_photo("Family", photo(
    "/photos/dinner.jpg",
    "Sunday dinner",
    at(2023, 12, 24, 19),
    &[("person", "bob"), ("person", "carol"), ("event", "xmas")],
  ));
  alice.copy_photo(Path::new("/photos/eiffel.jpg"), "Paris", "Family");

  let mut bob = User::new("bob");
  bob.add_album(Album::new("misc"));
  bob.add_photo("misc", photo("/b/cat.gif", "Cat", at(2022, 5, 1, 8), &[("person", "tom")]));
  bob.add_photo("misc", photo("/b/dog.bmp", "", at(2022, 5, 2, 9), &[]));

  catalog.add_user(alice);
  catalog.add_user(bob);
  catalog
}

fn summary(album: AlbumView<'_>) -> Vec<(String, String, NaiveDateTime, Vec<String>)> {
  album
    .photos()
    .map(|p| {
      (
        p.file_path().display().to_string(),
        p.caption().to_owned(),
        p.date_taken(),
        p.tags().map(Tag::to_string).collect(),
      )
    })
    .collect()
}

// ─── Snapshots ───────────────────────────────────────────────────────────────

#[test]
fn missing_artifact_reads_as_none() {
  let (_tmp, _layout, store) = scratch();
  assert!(store.read_snapshot().unwrap().is_none());
}

#[test]
fn save_creates_data_directory() {
  let (_tmp, layout, store) = scratch();
  assert!(!layout.data_dir.exists());

  Catalog::new().save(&store).unwrap();

  assert!(layout.artifact_path().is_file());
  assert!(!layout.data_dir.join("users.dat.tmp").exists());
}

#[test]
fn snapshot_round_trips_graph() {
  let (_tmp, _layout, store) = scratch();
  let original = sample_catalog();
  original.save(&store).unwrap();

  let restored = store.read_snapshot().unwrap().expect("snapshot present");

  assert_eq!(restored.tag_types(), ["location", "person", "event"]);
  let names: Vec<_> = restored.users().map(User::username).collect();
  assert_eq!(names, ["alice", "bob"]);

  for user in original.users() {
    let other = restored.get_user(user.username()).unwrap();
    assert_eq!(other.password(), user.password());
    let album_names: Vec<_> = other.albums().iter().map(Album::name).collect();
    let expected: Vec<_> = user.albums().iter().map(Album::name).collect();
    assert_eq!(album_names, expected);
    for album in user.album_views() {
      let other_album = other.album(album.name()).unwrap();
      assert_eq!(summary(other_album), summary(album));
    }
  }
}

#[test]
fn shared_photo_stays_shared_after_reload() {
  let (_tmp, _layout, store) = scratch();
  sample_catalog().save(&store).unwrap();

  let mut restored = store.read_snapshot().unwrap().unwrap();
  let alice = restored.user_mut("alice").unwrap();
  assert_eq!(alice.photos().count(), 3);

  alice
    .photo_mut("/photos/eiffel.jpg")
    .unwrap()
    .set_caption("Tour Eiffel");
  for name in ["Paris", "Family"] {
    let seen = alice.album(name).unwrap().photo("/photos/eiffel.jpg").unwrap();
    assert_eq!(seen.caption(), "Tour Eiffel");
  }
}

#[test]
fn refused_path_change_keeps_catalog_saveable() {
  let (_tmp, _layout, store) = scratch();
  let mut catalog = sample_catalog();
  let alice = catalog.user_mut("alice").unwrap();
  assert!(!alice.set_photo_path(
    Path::new("/photos/louvre.png"),
    Path::new("/photos/eiffel.jpg"),
  ));
  assert!(alice.set_photo_path(
    Path::new("/photos/louvre.png"),
    Path::new("/photos/louvre.jpg"),
  ));

  catalog.save(&store).unwrap();
  let restored = store.read_snapshot().unwrap().unwrap();
  let paris = restored.get_user("alice").unwrap().get_album_by_name("Paris").unwrap();
  assert_eq!(paris.paths(), [
    Path::new("/photos/eiffel.jpg"),
    Path::new("/photos/louvre.jpg"),
  ]);
}

#[test]
fn later_save_replaces_earlier_one() {
  let (_tmp, _layout, store) = scratch();
  sample_catalog().save(&store).unwrap();

  let mut smaller = Catalog::new();
  smaller.add_user(User::new("zoe"));
  smaller.save(&store).unwrap();

  let restored = store.read_snapshot().unwrap().unwrap();
  let names: Vec<_> = restored.users().map(User::username).collect();
  assert_eq!(names, ["zoe"]);
}

#[test]
fn corrupt_artifact_is_an_error() {
  let (_tmp, layout, store) = scratch();
  fs::create_dir_all(&layout.data_dir).unwrap();
  fs::write(layout.artifact_path(), b"definitely not a database, just bytes").unwrap();

  assert!(store.read_snapshot().is_err());
}

#[test]
fn empty_artifact_has_wrong_schema_version() {
  let (_tmp, layout, store) = scratch();
  fs::create_dir_all(&layout.data_dir).unwrap();
  fs::write(layout.artifact_path(), b"").unwrap();

  let err = store.read_snapshot().unwrap_err();
  assert!(matches!(err, Error::SchemaVersion { found: 0, expected: 1 }));
}

#[test]
fn save_overwrites_corrupt_artifact() {
  let (_tmp, layout, store) = scratch();
  fs::create_dir_all(&layout.data_dir).unwrap();
  fs::write(layout.artifact_path(), b"garbage").unwrap();

  sample_catalog().save(&store).unwrap();
  assert!(store.read_snapshot().unwrap().is_some());
}

#[test]
fn save_into_unwritable_location_fails() {
  let (tmp, _layout, _store) = scratch();
  let blocker = tmp.path().join("blocker");
  fs::write(&blocker, b"a file, not a directory").unwrap();

  let store = SqliteStore::new(blocker.join("users.dat"));
  let err = Catalog::new().save(&store).unwrap_err();
  assert!(matches!(err, Error::Io(_)));
}

// ─── Catalog::load through the store ─────────────────────────────────────────

#[test]
fn load_round_trip_rebuilds_stock_from_disk() {
  let (_tmp, layout, store) = scratch();
  fs::create_dir_all(layout.stock_dir()).unwrap();
  fs::write(layout.stock_dir().join("one.jpg"), b"").unwrap();

  let mut catalog = Catalog::load(&store, &layout);
  for user in sample_catalog().users() {
    assert!(catalog.add_user(user.clone()));
  }
  let stock_photo = catalog
    .user_mut(STOCK_USERNAME)
    .unwrap()
    .photo_mut(layout.stock_dir().join("one.jpg"))
    .expect("stock photo scanned");
  stock_photo.set_caption("should not survive");
  catalog.save(&store).unwrap();

  fs::write(layout.stock_dir().join("two.PNG"), b"").unwrap();
  let reloaded = Catalog::load(&store, &layout);

  let stock = reloaded.get_user(STOCK_USERNAME).unwrap();
  let album = stock.album(STOCK_ALBUM).unwrap();
  assert_eq!(album.photo_count(), 2);
  assert!(album.photos().all(|p| p.caption().is_empty()));

  let alice = reloaded.get_user("alice").unwrap();
  assert_eq!(alice.albums().len(), 2);
  let family = alice.get_album_by_name("Family").unwrap();
  assert!(family.contains(Path::new("/photos/dinner.jpg")));
  assert_eq!(reloaded.tag_types(), ["location", "person", "event"]);
}

#[test]
fn load_on_corrupt_artifact_starts_fresh() {
  let (_tmp, layout, store) = scratch();
  fs::create_dir_all(&layout.data_dir).unwrap();
  fs::write(layout.artifact_path(), vec![0xAB; 4096]).unwrap();

  let catalog = Catalog::load(&store, &layout);
  assert!(catalog.user_exists(STOCK_USERNAME));
  assert_eq!(catalog.user_count(), 1);
  assert_eq!(catalog.tag_types(), ["location", "person"]);
}
