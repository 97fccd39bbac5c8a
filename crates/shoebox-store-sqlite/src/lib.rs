//! SQLite backend for the Shoebox catalog.
//!
//! The whole catalog is written as one SQLite database file. Each save builds
//! a complete new database next to the old one and renames it into place.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
