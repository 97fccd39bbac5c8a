//! Command dispatch against an in-memory catalog.
//!
//! Handlers never touch the store; `main` saves afterwards when
//! [`Outcome::changed`] is set.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow, bail};
use shoebox_core::{
  album::{Album, AlbumView},
  catalog::{Catalog, Login, is_reserved},
  photo::Photo,
  query::{self, Combinator, DateRange, PhotoQuery, TagQuery},
  stock::is_image_file,
  user::User,
};

use crate::{
  args::{
    AlbumAction, Command, PhotoAction, SearchQuery, TagAction, TagTypeAction,
    UserAction,
  },
  output::{AlbumRow, Output, PhotoRow, UserRow},
};

pub struct Outcome {
  pub output:  Output,
  /// Whether the catalog was modified and needs saving.
  pub changed: bool,
}

impl Outcome {
  fn read(output: Output) -> Self { Self { output, changed: false } }

  fn changed(msg: impl Into<String>) -> Self {
    Self { output: Output::Message(msg.into()), changed: true }
  }
}

pub fn run(catalog: &mut Catalog, command: Command) -> Result<Outcome> {
  match command {
    Command::Users { action } => users(catalog, action),
    Command::Login { username } => login(catalog, &username),
    Command::TagTypes { action } => tag_types(catalog, action),
    Command::Albums { user, action } => albums(user_mut(catalog, &user)?, action),
    Command::Photos { user, album, action } => {
      photos(user_mut(catalog, &user)?, &album, action)
    }
    Command::Tags { user, album, photo, action } => {
      tags(catalog, &user, &album, &photo, action)
    }
    Command::Search { user, query } => search(user_mut(catalog, &user)?, query),
  }
}

fn user_mut<'a>(catalog: &'a mut Catalog, username: &str) -> Result<&'a mut User> {
  catalog
    .user_mut(username)
    .ok_or_else(|| anyhow!("user {username:?} does not exist"))
}

fn find_album<'a>(user: &'a User, name: &str) -> Result<AlbumView<'a>> {
  user
    .album(name)
    .ok_or_else(|| anyhow!("{:?} has no album named {name:?}", user.username()))
}

/// The photo at `path`, provided album `album_name` lists it.
fn listed_photo_mut<'a>(
  user: &'a mut User,
  album_name: &str,
  path: &Path,
) -> Result<&'a mut Photo> {
  if !find_album(user, album_name)?.contains(path) {
    bail!("{} is not in {album_name:?}", path.display());
  }
  user
    .photo_mut(path)
    .with_context(|| format!("{} is not in {album_name:?}", path.display()))
}

// ─── Users ────────────────────────────────────────────────────────────────────

fn users(catalog: &mut Catalog, action: UserAction) -> Result<Outcome> {
  match action {
    UserAction::List => Ok(Outcome::read(Output::Users(
      catalog.users().map(UserRow::from).collect(),
    ))),
    UserAction::Add { username, password } => {
      let username = username.trim();
      if username.is_empty() {
        bail!("username must not be empty");
      }
      let user = match password {
        Some(password) => User::with_password(username, password),
        None => User::new(username),
      };
      if !catalog.add_user(user) {
        bail!("user {username:?} already exists");
      }
      Ok(Outcome::changed(format!("created user {username:?}")))
    }
    UserAction::Remove { username } => {
      if is_reserved(&username) {
        bail!("{username:?} is reserved and cannot be removed");
      }
      if !catalog.remove_user(&username) {
        bail!("user {username:?} does not exist");
      }
      Ok(Outcome::changed(format!("removed user {username:?}")))
    }
  }
}

fn login(catalog: &Catalog, username: &str) -> Result<Outcome> {
  let msg = match catalog.login(username) {
    Some(Login::Admin) => "admin: may manage users".to_owned(),
    Some(Login::User(user)) => {
      format!("{}: {} albums", user.username(), user.albums().len())
    }
    None => bail!("user {username:?} does not exist"),
  };
  Ok(Outcome::read(Output::Message(msg)))
}

fn tag_types(catalog: &mut Catalog, action: TagTypeAction) -> Result<Outcome> {
  match action {
    TagTypeAction::List => Ok(Outcome::read(Output::TagTypes(catalog.tag_types()))),
    TagTypeAction::Add { name } => {
      let name = name.trim();
      if name.is_empty() {
        bail!("tag type must not be empty");
      }
      if !catalog.add_tag_type(name) {
        bail!("tag type {name:?} already exists");
      }
      Ok(Outcome::changed(format!("added tag type {name:?}")))
    }
  }
}

// ─── Albums ───────────────────────────────────────────────────────────────────

fn albums(user: &mut User, action: AlbumAction) -> Result<Outcome> {
  match action {
    AlbumAction::List => Ok(Outcome::read(Output::Albums(
      user.album_views().map(AlbumRow::from).collect(),
    ))),
    AlbumAction::Create { name } => {
      let name = name.trim();
      if name.is_empty() {
        bail!("album name must not be empty");
      }
      if !user.add_album(Album::new(name)) {
        bail!("album {name:?} already exists");
      }
      Ok(Outcome::changed(format!("created album {name:?}")))
    }
    AlbumAction::Delete { name } => {
      if !user.remove_album(&name) {
        bail!("album {name:?} does not exist");
      }
      Ok(Outcome::changed(format!("deleted album {name:?}")))
    }
    AlbumAction::Rename { old, new } => {
      let new = new.trim();
      if new.is_empty() {
        bail!("album name must not be empty");
      }
      if !user.has_album(&old) {
        bail!("album {old:?} does not exist");
      }
      if !user.rename_album(&old, new) {
        bail!("album {new:?} already exists");
      }
      Ok(Outcome::changed(format!("renamed {old:?} to {new:?}")))
    }
  }
}

// ─── Photos ───────────────────────────────────────────────────────────────────

/// Photos are stored under their absolute path.
fn absolute(path: &Path) -> PathBuf {
  std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn photos(user: &mut User, album_name: &str, action: PhotoAction) -> Result<Outcome> {
  match action {
    PhotoAction::List => {
      let album = find_album(user, album_name)?;
      Ok(Outcome::read(Output::Photos(
        album.photos().map(PhotoRow::from).collect(),
      )))
    }
    PhotoAction::Add { path } => {
      let path = absolute(&path);
      if !path.is_file() {
        bail!("{} is not a file", path.display());
      }
      if !is_image_file(&path) {
        bail!("{} is not a recognised image file", path.display());
      }
      find_album(user, album_name)?;
      if !user.add_photo(album_name, Photo::new(&path)) {
        bail!("{} is already in {album_name:?}", path.display());
      }
      Ok(Outcome::changed(format!("added {}", path.display())))
    }
    PhotoAction::Remove { path } => {
      let path = absolute(&path);
      find_album(user, album_name)?;
      if !user.remove_photo(album_name, &path) {
        bail!("{} is not in {album_name:?}", path.display());
      }
      Ok(Outcome::changed(format!("removed {}", path.display())))
    }
    PhotoAction::Caption { path, caption } => {
      let path = absolute(&path);
      listed_photo_mut(user, album_name, &path)?.set_caption(caption.trim());
      Ok(Outcome::changed(format!("captioned {}", path.display())))
    }
    PhotoAction::Copy { path, to } => {
      let path = absolute(&path);
      transfer_check(user, &path, album_name, &to)?;
      if !user.copy_photo(&path, album_name, &to) {
        bail!("could not copy {} to {to:?}", path.display());
      }
      Ok(Outcome::changed(format!("copied {} to {to:?}", path.display())))
    }
    PhotoAction::Move { path, to } => {
      let path = absolute(&path);
      transfer_check(user, &path, album_name, &to)?;
      if !user.move_photo(&path, album_name, &to) {
        bail!("could not move {} to {to:?}", path.display());
      }
      Ok(Outcome::changed(format!("moved {} to {to:?}", path.display())))
    }
  }
}

/// Explain why a copy or move would be refused.
fn transfer_check(user: &User, path: &Path, from: &str, to: &str) -> Result<()> {
  if from == to {
    bail!("source and destination album are the same");
  }
  let source = user
    .get_album_by_name(from)
    .ok_or_else(|| anyhow!("album {from:?} does not exist"))?;
  if !source.contains(path) {
    bail!("{} is not in {from:?}", path.display());
  }
  let target = user
    .get_album_by_name(to)
    .ok_or_else(|| anyhow!("album {to:?} does not exist"))?;
  if target.contains(path) {
    bail!("{} is already in {to:?}", path.display());
  }
  Ok(())
}

// ─── Tags ─────────────────────────────────────────────────────────────────────

fn tags(
  catalog: &mut Catalog,
  username: &str,
  album_name: &str,
  path: &Path,
  action: TagAction,
) -> Result<Outcome> {
  let path = absolute(path);
  let mut new_type = None;
  if let TagAction::Add { tag } | TagAction::Replace { new: tag, .. } = &action
    && catalog.add_tag_type(tag.name())
  {
    new_type = Some(tag.name().to_owned());
  }

  let user = user_mut(catalog, username)?;
  let photo = listed_photo_mut(user, album_name, &path)?;

  let mut outcome = match action {
    TagAction::List => {
      return Ok(Outcome::read(Output::Tags(
        photo.tags().map(ToString::to_string).collect(),
      )));
    }
    TagAction::Add { tag } => {
      let msg = format!("tagged {tag}");
      if !photo.add_tag(tag) {
        bail!("the photo already has that tag");
      }
      Outcome::changed(msg)
    }
    TagAction::Remove { tag } => {
      if !photo.remove_tag(&tag) {
        bail!("the photo has no tag {tag}");
      }
      Outcome::changed(format!("removed {tag}"))
    }
    TagAction::Replace { old, new } => {
      let msg = format!("replaced {old} with {new}");
      if !photo.replace_tag(&old, new) {
        bail!("the photo lacks {old} or already has the replacement");
      }
      Outcome::changed(msg)
    }
  };

  if let (Some(name), Output::Message(msg)) = (new_type, &mut outcome.output) {
    msg.push_str(&format!(" (new tag type {name:?})"));
  }
  Ok(outcome)
}

// ─── Search ───────────────────────────────────────────────────────────────────

fn search(user: &mut User, query: SearchQuery) -> Result<Outcome> {
  let (query, save_as): (PhotoQuery, _) = match query {
    SearchQuery::Date { from, to, save_as } => {
      (DateRange::new(from, to)?.into(), save_as)
    }
    SearchQuery::Tags { tags, combine, save_as } => {
      (tag_query(&tags, combine)?.into(), save_as)
    }
  };

  let found = query::search(user, &query);
  let rows: Vec<PhotoRow> = found.iter().copied().map(PhotoRow::from).collect();

  let Some(name) = save_as else {
    return Ok(Outcome::read(Output::Photos(rows)));
  };
  let name = name.trim().to_owned();
  if name.is_empty() {
    bail!("album name must not be empty");
  }
  if found.is_empty() {
    bail!("no photos matched; album {name:?} not created");
  }
  let paths: Vec<PathBuf> = found.iter().map(|p| p.key().to_path_buf()).collect();
  if !user.create_album_from(&name, paths) {
    bail!("album {name:?} already exists");
  }
  Ok(Outcome::changed(format!(
    "created album {name:?} with {} photos",
    rows.len()
  )))
}

fn tag_query(raw: &[String], combine: Combinator) -> Result<TagQuery> {
  fn split(s: &str) -> (&str, &str) {
    s.split_once('=').unwrap_or((s, ""))
  }
  match raw {
    [first] => Ok(TagQuery::new(split(first), None, combine)?),
    [first, second] => {
      Ok(TagQuery::new(split(first), Some(split(second)), combine)?)
    }
    _ => bail!("give one or two --tag arguments"),
  }
}
