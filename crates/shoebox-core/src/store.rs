//! The `CatalogStore` trait.
//!
//! A store persists the whole catalog graph as one unit. It is implemented by
//! storage backends (e.g. `shoebox-store-sqlite`); the catalog's `save` and
//! `load` depend on this abstraction, not on any concrete backend.

use crate::catalog::Catalog;

pub trait CatalogStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Replace the stored snapshot with `catalog`, creating the containing
  /// directory if needed.
  fn write_snapshot(&self, catalog: &Catalog) -> Result<(), Self::Error>;

  /// Read the stored snapshot. Returns `Ok(None)` when nothing has been
  /// saved yet.
  fn read_snapshot(&self) -> Result<Option<Catalog>, Self::Error>;
}
