//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use shoebox_core::{query::Combinator, tag::Tag};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "shoebox", author, version, about = "Personal photo library")]
pub struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "shoebox.toml")]
  pub config: PathBuf,

  /// Data directory holding `users.dat` and the stock photos. Overrides the
  /// config file and `SHOEBOX_DATA_DIR`.
  #[arg(long, value_name = "DIR")]
  pub data_dir: Option<PathBuf>,

  /// Print results as JSON.
  #[arg(long, global = true)]
  pub json: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Manage user accounts.
  Users {
    #[command(subcommand)]
    action: UserAction,
  },
  /// Check how a username would log in.
  Login { username: String },
  /// Manage the recognised tag types.
  TagTypes {
    #[command(subcommand)]
    action: TagTypeAction,
  },
  /// Manage a user's albums.
  Albums {
    user: String,
    #[command(subcommand)]
    action: AlbumAction,
  },
  /// Manage the photos of one album.
  Photos {
    user:  String,
    album: String,
    #[command(subcommand)]
    action: PhotoAction,
  },
  /// Manage the tags of one photo.
  Tags {
    user:  String,
    album: String,
    photo: PathBuf,
    #[command(subcommand)]
    action: TagAction,
  },
  /// Search across all of a user's albums.
  Search {
    user: String,
    #[command(subcommand)]
    query: SearchQuery,
  },
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
  List,
  Add {
    username: String,
    #[arg(long)]
    password: Option<String>,
  },
  Remove { username: String },
}

#[derive(Subcommand, Debug)]
pub enum TagTypeAction {
  List,
  Add { name: String },
}

#[derive(Subcommand, Debug)]
pub enum AlbumAction {
  List,
  Create { name: String },
  Delete { name: String },
  Rename { old: String, new: String },
}

#[derive(Subcommand, Debug)]
pub enum PhotoAction {
  List,
  Add { path: PathBuf },
  Remove { path: PathBuf },
  Caption { path: PathBuf, caption: String },
  /// Copy a photo into another album of the same user.
  Copy { path: PathBuf, to: String },
  /// Move a photo into another album of the same user.
  Move { path: PathBuf, to: String },
}

#[derive(Subcommand, Debug)]
pub enum TagAction {
  List,
  /// Add a `name=value` tag; unknown tag names become new tag types.
  Add { tag: Tag },
  Remove { tag: Tag },
  Replace { old: Tag, new: Tag },
}

#[derive(Subcommand, Debug)]
pub enum SearchQuery {
  /// Photos taken between two days, both inclusive.
  Date {
    #[arg(long, value_name = "YYYY-MM-DD")]
    from: Option<NaiveDate>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    to: Option<NaiveDate>,
    /// Store the results as a new album.
    #[arg(long, value_name = "ALBUM")]
    save_as: Option<String>,
  },
  /// Photos carrying one tag, or two tags combined with and/or.
  Tags {
    /// `name=value`; give once or twice.
    #[arg(long = "tag", value_name = "NAME=VALUE", required = true)]
    tags: Vec<String>,
    #[arg(long, default_value_t = Combinator::And)]
    combine: Combinator,
    /// Store the results as a new album.
    #[arg(long, value_name = "ALBUM")]
    save_as: Option<String>,
  },
}
