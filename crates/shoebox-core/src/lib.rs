//! Core types for the Shoebox photo library.
//!
//! A [`Catalog`](catalog::Catalog) owns every [`User`](user::User). Users own
//! their photos, keyed by path, and uniquely-named albums listing them; photos
//! carry tags. Persistence is reached through the
//! [`CatalogStore`](store::CatalogStore) trait so this crate stays free of
//! database dependencies.

pub mod album;
pub mod catalog;
pub mod error;
pub mod layout;
pub mod photo;
pub mod query;
pub mod stock;
pub mod store;
pub mod tag;
pub mod user;

pub use error::{Error, Result};
