//! Layered configuration: config file, then `SHOEBOX_*` environment
//! variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use shoebox_core::layout::LibraryLayout;

/// Resolve the library layout. A missing config file is not an error.
pub fn load_layout(
  config_path: &Path,
  data_dir: Option<PathBuf>,
) -> anyhow::Result<LibraryLayout> {
  let settings = config::Config::builder()
    .add_source(config::File::from(config_path.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix("SHOEBOX"))
    .build()
    .with_context(|| format!("failed to read config file {}", config_path.display()))?;

  let mut layout: LibraryLayout = settings
    .try_deserialize()
    .context("failed to deserialise library settings")?;

  if let Some(dir) = data_dir {
    layout.data_dir = dir;
  }
  layout.data_dir = expand_tilde(&layout.data_dir);

  tracing::debug!(data_dir = %layout.data_dir.display(), "library layout resolved");
  Ok(layout)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
