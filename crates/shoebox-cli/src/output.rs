//! Rendering command results as text or JSON.

use chrono::NaiveDateTime;
use serde::Serialize;
use shoebox_core::{album::AlbumView, photo::Photo, user::User};

const DATE_DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

// ─── Rows ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UserRow {
  pub username: String,
  pub albums:   usize,
}

impl From<&User> for UserRow {
  fn from(user: &User) -> Self {
    Self { username: user.username().to_owned(), albums: user.albums().len() }
  }
}

#[derive(Debug, Serialize)]
pub struct AlbumRow {
  pub name:     String,
  pub photos:   usize,
  pub earliest: Option<NaiveDateTime>,
  pub latest:   Option<NaiveDateTime>,
}

impl From<AlbumView<'_>> for AlbumRow {
  fn from(album: AlbumView<'_>) -> Self {
    Self {
      name:     album.name().to_owned(),
      photos:   album.photo_count(),
      earliest: album.earliest_date(),
      latest:   album.latest_date(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct PhotoRow {
  pub path:       String,
  pub name:       String,
  pub caption:    String,
  pub date_taken: NaiveDateTime,
  pub tags:       Vec<String>,
}

impl From<&Photo> for PhotoRow {
  fn from(photo: &Photo) -> Self {
    Self {
      path:       photo.file_path().display().to_string(),
      name:       photo.display_name(),
      caption:    photo.caption().to_owned(),
      date_taken: photo.date_taken(),
      tags:       photo.tags().map(ToString::to_string).collect(),
    }
  }
}

// ─── Output ───────────────────────────────────────────────────────────────────

/// What a command produced.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Output {
  Message(String),
  Users(Vec<UserRow>),
  TagTypes(Vec<String>),
  Albums(Vec<AlbumRow>),
  Photos(Vec<PhotoRow>),
  Tags(Vec<String>),
}

pub fn print(output: &Output, json: bool) -> anyhow::Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(output)?);
    return Ok(());
  }

  match output {
    Output::Message(msg) => println!("{msg}"),
    Output::Users(rows) => {
      for row in rows {
        println!("{} ({} albums)", row.username, row.albums);
      }
    }
    Output::TagTypes(names) | Output::Tags(names) => {
      for name in names {
        println!("{name}");
      }
    }
    Output::Albums(rows) => {
      for row in rows {
        match (row.earliest, row.latest) {
          (Some(first), Some(last)) => println!(
            "{} ({} photos, {} to {})",
            row.name,
            row.photos,
            first.format(DATE_DISPLAY),
            last.format(DATE_DISPLAY),
          ),
          _ => println!("{} ({} photos)", row.name, row.photos),
        }
      }
    }
    Output::Photos(rows) => {
      for row in rows {
        print!("{}  {}  {}", row.date_taken.format(DATE_DISPLAY), row.name, row.path);
        if !row.tags.is_empty() {
          print!("  [{}]", row.tags.join(", "));
        }
        println!();
      }
    }
  }
  Ok(())
}
