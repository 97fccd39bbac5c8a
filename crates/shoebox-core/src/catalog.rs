//! Catalog — the top-level aggregate and unit of persistence.
//!
//! A catalog owns every user and the vocabulary of tag types. It is created
//! once per process through [`Catalog::load`] and written back as a whole with
//! [`Catalog::save`]; the caller owns it and decides when to checkpoint.

use std::collections::BTreeMap;

use crate::{
  album::Album,
  layout::LibraryLayout,
  photo::Photo,
  stock::scan_stock_photos,
  store::CatalogStore,
  user::User,
};

/// Logs in by name alone and is never stored as a user.
pub const ADMIN_USERNAME: &str = "admin";

/// Synthetic user rebuilt from the stock directory on every load.
pub const STOCK_USERNAME: &str = "stock";

/// Name of the stock user's only album.
pub const STOCK_ALBUM: &str = "stock";

/// Tag types every fresh catalog starts with.
pub const DEFAULT_TAG_TYPES: [&str; 2] = ["location", "person"];

/// Usernames that cannot be removed.
pub fn is_reserved(username: &str) -> bool {
  username == ADMIN_USERNAME || username == STOCK_USERNAME
}

/// The outcome of a successful login.
#[derive(Debug, Clone, Copy)]
pub enum Login<'a> {
  Admin,
  User(&'a User),
}

#[derive(Debug, Clone)]
pub struct Catalog {
  users:     BTreeMap<String, User>,
  tag_types: Vec<String>,
}

impl Default for Catalog {
  fn default() -> Self { Self::new() }
}

impl Catalog {
  /// A fresh catalog with no users and the default tag types.
  pub fn new() -> Self {
    Self {
      users:     BTreeMap::new(),
      tag_types: DEFAULT_TAG_TYPES.iter().map(|t| t.to_string()).collect(),
    }
  }

  /// Reassemble a catalog from stored parts. Entries that would break
  /// uniqueness are dropped, keeping the first occurrence.
  pub fn restore(
    users: impl IntoIterator<Item = User>,
    tag_types: impl IntoIterator<Item = String>,
  ) -> Self {
    let mut catalog = Self { users: BTreeMap::new(), tag_types: Vec::new() };
    for user in users {
      catalog.add_user(user);
    }
    for tag_type in tag_types {
      catalog.add_tag_type(tag_type);
    }
    catalog
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  /// All users in username order.
  pub fn users(&self) -> impl Iterator<Item = &User> { self.users.values() }

  pub fn user_count(&self) -> usize { self.users.len() }

  pub fn get_user(&self, username: &str) -> Option<&User> {
    self.users.get(username)
  }

  pub fn user_mut(&mut self, username: &str) -> Option<&mut User> {
    self.users.get_mut(username)
  }

  pub fn user_exists(&self, username: &str) -> bool {
    self.users.contains_key(username)
  }

  /// Returns `false` if the username is taken or is `admin`.
  pub fn add_user(&mut self, user: User) -> bool {
    if user.username() == ADMIN_USERNAME || self.user_exists(user.username()) {
      return false;
    }
    self.users.insert(user.username().to_owned(), user);
    true
  }

  /// Returns `false` for reserved usernames and for unknown users.
  pub fn remove_user(&mut self, username: &str) -> bool {
    if is_reserved(username) {
      return false;
    }
    self.users.remove(username).is_some()
  }

  /// Resolve a login by username; no password is checked.
  pub fn login(&self, username: &str) -> Option<Login<'_>> {
    if username == ADMIN_USERNAME {
      return Some(Login::Admin);
    }
    self.get_user(username).map(Login::User)
  }

  // ── Tag types ─────────────────────────────────────────────────────────────

  /// A copy of the recognised tag types, in insertion order.
  pub fn tag_types(&self) -> Vec<String> { self.tag_types.clone() }

  /// Returns `false` if the tag type is already known.
  pub fn add_tag_type(&mut self, name: impl Into<String>) -> bool {
    let name = name.into();
    if self.tag_types.contains(&name) {
      return false;
    }
    self.tag_types.push(name);
    true
  }

  // ── Persistence ───────────────────────────────────────────────────────────

  /// Write the whole catalog to `store`.
  pub fn save<S: CatalogStore>(&self, store: &S) -> Result<(), S::Error> {
    store.write_snapshot(self)?;
    tracing::debug!(users = self.users.len(), "catalog saved");
    Ok(())
  }

  /// Read the catalog from `store`, starting fresh when nothing is stored or
  /// the stored snapshot cannot be read. The stock user is always rebuilt
  /// from the directories described by `layout`.
  pub fn load<S: CatalogStore>(store: &S, layout: &LibraryLayout) -> Self {
    let mut catalog = match store.read_snapshot() {
      Ok(Some(catalog)) => {
        tracing::debug!(users = catalog.users.len(), "catalog loaded");
        catalog
      }
      Ok(None) => {
        tracing::info!("no saved catalog, starting fresh");
        Self::new()
      }
      Err(error) => {
        tracing::warn!(%error, "saved catalog is unreadable, starting fresh");
        Self::new()
      }
    };
    catalog.refresh_stock_user(layout);
    catalog
  }

  /// Replace the stock user with one whose single album holds the images
  /// currently found in the stock directory.
  pub fn refresh_stock_user(&mut self, layout: &LibraryLayout) {
    let mut stock = User::with_password(STOCK_USERNAME, STOCK_USERNAME);
    stock.add_album(Album::new(STOCK_ALBUM));
    for path in scan_stock_photos(layout) {
      stock.add_photo(STOCK_ALBUM, Photo::new(path));
    }
    self.users.insert(STOCK_USERNAME.to_owned(), stock);
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, fmt, fs::File, io};

  use super::*;

  /// Keeps the last snapshot in memory.
  #[derive(Default)]
  struct MemoryStore {
    snapshot: RefCell<Option<Catalog>>,
  }

  impl CatalogStore for MemoryStore {
    type Error = io::Error;

    fn write_snapshot(&self, catalog: &Catalog) -> io::Result<()> {
      *self.snapshot.borrow_mut() = Some(catalog.clone());
      Ok(())
    }

    fn read_snapshot(&self) -> io::Result<Option<Catalog>> {
      Ok(self.snapshot.borrow().clone())
    }
  }

  /// Fails every operation.
  struct BrokenStore;

  #[derive(Debug)]
  struct Broken;

  impl fmt::Display for Broken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("broken")
    }
  }

  impl std::error::Error for Broken {}

  impl CatalogStore for BrokenStore {
    type Error = Broken;

    fn write_snapshot(&self, _: &Catalog) -> Result<(), Broken> { Err(Broken) }

    fn read_snapshot(&self) -> Result<Option<Catalog>, Broken> { Err(Broken) }
  }

  fn empty_layout() -> (tempfile::TempDir, LibraryLayout) {
    let tmp = tempfile::tempdir().unwrap();
    let layout = LibraryLayout::new(tmp.path());
    (tmp, layout)
  }

  #[test]
  fn fresh_catalog_has_default_tag_types() {
    let catalog = Catalog::new();
    assert_eq!(catalog.tag_types(), ["location", "person"]);
    assert_eq!(catalog.user_count(), 0);
  }

  #[test]
  fn usernames_are_unique() {
    let mut catalog = Catalog::new();
    assert!(catalog.add_user(User::new("alice")));
    assert!(!catalog.add_user(User::new("alice")));
    assert_eq!(catalog.user_count(), 1);
  }

  #[test]
  fn admin_is_never_stored() {
    let mut catalog = Catalog::new();
    assert!(!catalog.add_user(User::new(ADMIN_USERNAME)));
    assert!(!catalog.user_exists(ADMIN_USERNAME));
    assert!(matches!(catalog.login(ADMIN_USERNAME), Some(Login::Admin)));
  }

  #[test]
  fn reserved_users_cannot_be_removed() {
    let (_tmp, layout) = empty_layout();
    let mut catalog = Catalog::load(&MemoryStore::default(), &layout);
    catalog.add_user(User::new("alice"));
    let before = catalog.user_count();

    assert!(!catalog.remove_user(ADMIN_USERNAME));
    assert!(!catalog.remove_user(STOCK_USERNAME));
    assert_eq!(catalog.user_count(), before);

    assert!(catalog.remove_user("alice"));
    assert!(!catalog.user_exists("alice"));
    assert!(!catalog.remove_user("alice"));
  }

  #[test]
  fn login_by_username_only() {
    let mut catalog = Catalog::new();
    catalog.add_user(User::with_password("alice", "secret"));
    match catalog.login("alice") {
      Some(Login::User(user)) => assert_eq!(user.username(), "alice"),
      other => panic!("unexpected login: {other:?}"),
    }
    assert!(catalog.login("nobody").is_none());
  }

  #[test]
  fn tag_types_are_unique_and_copied() {
    let mut catalog = Catalog::new();
    assert!(catalog.add_tag_type("event"));
    assert!(!catalog.add_tag_type("person"));

    let mut snapshot = catalog.tag_types();
    snapshot.push("mutated".into());
    assert_eq!(catalog.tag_types(), ["location", "person", "event"]);
  }

  #[test]
  fn restore_drops_duplicates() {
    let catalog = Catalog::restore(
      [User::new("bob"), User::new("bob"), User::new(ADMIN_USERNAME)],
      ["person".to_string(), "person".to_string()],
    );
    assert_eq!(catalog.user_count(), 1);
    assert_eq!(catalog.tag_types(), ["person"]);
  }

  #[test]
  fn load_without_snapshot_has_stock_user() {
    let (_tmp, layout) = empty_layout();
    let catalog = Catalog::load(&MemoryStore::default(), &layout);
    let stock = catalog.get_user(STOCK_USERNAME).unwrap();
    assert_eq!(stock.albums().len(), 1);
    assert!(stock.get_album_by_name(STOCK_ALBUM).unwrap().is_empty());
  }

  #[test]
  fn load_from_broken_store_starts_fresh() {
    let (_tmp, layout) = empty_layout();
    let catalog = Catalog::load(&BrokenStore, &layout);
    assert!(catalog.user_exists(STOCK_USERNAME));
    assert_eq!(catalog.tag_types(), ["location", "person"]);
  }

  #[test]
  fn save_propagates_store_errors() {
    assert!(Catalog::new().save(&BrokenStore).is_err());
  }

  #[test]
  fn stock_user_is_rebuilt_on_load() {
    let (tmp, layout) = empty_layout();
    File::create(tmp.path().join("first.jpg")).unwrap();

    let store = MemoryStore::default();
    let mut catalog = Catalog::load(&store, &layout);
    catalog
      .user_mut(STOCK_USERNAME)
      .unwrap()
      .add_album(Album::new("extra"));
    catalog.add_user(User::new("alice"));
    catalog.save(&store).unwrap();

    File::create(tmp.path().join("second.PNG")).unwrap();
    let reloaded = Catalog::load(&store, &layout);

    assert!(reloaded.user_exists("alice"));
    let stock = reloaded.get_user(STOCK_USERNAME).unwrap();
    assert_eq!(stock.albums().len(), 1);
    let album = stock.get_album_by_name(STOCK_ALBUM).unwrap();
    assert_eq!(album.photo_count(), 2);
  }
}
