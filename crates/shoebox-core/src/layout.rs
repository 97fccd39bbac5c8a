//! On-disk layout of a photo library.

use std::path::PathBuf;

use serde::Deserialize;

/// Name of the persisted catalog inside the data directory.
pub const ARTIFACT_FILE: &str = "users.dat";

/// Subdirectory scanned first when rebuilding the stock album.
pub const STOCK_SUBDIR: &str = "stock";

/// Where the catalog artifact and the stock photos live.
///
/// The default is the relative directory `data`, giving `data/users.dat` and
/// `data/stock`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LibraryLayout {
  #[serde(default = "default_data_dir")]
  pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf { PathBuf::from("data") }

impl Default for LibraryLayout {
  fn default() -> Self { Self { data_dir: default_data_dir() } }
}

impl LibraryLayout {
  pub fn new(data_dir: impl Into<PathBuf>) -> Self {
    Self { data_dir: data_dir.into() }
  }

  pub fn artifact_path(&self) -> PathBuf { self.data_dir.join(ARTIFACT_FILE) }

  pub fn stock_dir(&self) -> PathBuf { self.data_dir.join(STOCK_SUBDIR) }
}
