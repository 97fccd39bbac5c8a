//! Photo search over one user's albums.
//!
//! Queries are plain values; [`search`] walks the albums in stored order, then
//! each album's photos in stored order, and returns every matching photo the
//! first time its path is seen.

use std::{collections::HashSet, path::Path};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use strum::{Display, EnumString};

use crate::{Error, Result, photo::Photo, tag::Tag, user::User};

// ─── Date range ──────────────────────────────────────────────────────────────

/// An inclusive day range: `start` from 00:00:00, `end` through 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
  start: NaiveDateTime,
  end:   NaiveDateTime,
}

impl DateRange {
  /// Both bounds are required.
  pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
    match (start, end) {
      (Some(start), Some(end)) => Ok(Self::between(start, end)),
      _ => Err(Error::MissingDateBound),
    }
  }

  pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
    Self {
      start: start.and_time(NaiveTime::MIN),
      end:   end.and_time(end_of_day()),
    }
  }

  pub fn start(&self) -> NaiveDateTime { self.start }

  pub fn end(&self) -> NaiveDateTime { self.end }

  pub fn contains(&self, at: NaiveDateTime) -> bool {
    self.start <= at && at <= self.end
  }
}

fn end_of_day() -> NaiveTime {
  NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

// ─── Tag query ───────────────────────────────────────────────────────────────

/// How two tag clauses combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Combinator {
  #[default]
  And,
  Or,
}

/// One required tag, optionally combined with a second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagQuery {
  first:  Tag,
  second: Option<(Combinator, Tag)>,
}

impl TagQuery {
  /// Build a query from raw `(type, value)` inputs. Fields are trimmed. The
  /// first pair must have both fields; the second pair only counts when both
  /// of its fields are non-empty, otherwise it and `combinator` are ignored.
  pub fn new(
    first: (&str, &str),
    second: Option<(&str, &str)>,
    combinator: Combinator,
  ) -> Result<Self> {
    let first = clause(first).ok_or(Error::IncompleteTagClause)?;
    let second = second.and_then(clause).map(|tag| (combinator, tag));
    Ok(Self { first, second })
  }

  pub fn single(tag: Tag) -> Self { Self { first: tag, second: None } }

  pub fn pair(first: Tag, combinator: Combinator, second: Tag) -> Self {
    Self { first, second: Some((combinator, second)) }
  }

  pub fn matches(&self, photo: &Photo) -> bool {
    let has_first = photo.has_tag(&self.first);
    match &self.second {
      None => has_first,
      Some((Combinator::And, tag)) => has_first && photo.has_tag(tag),
      Some((Combinator::Or, tag)) => has_first || photo.has_tag(tag),
    }
  }
}

fn clause((name, value): (&str, &str)) -> Option<Tag> {
  let (name, value) = (name.trim(), value.trim());
  (!name.is_empty() && !value.is_empty()).then(|| Tag::new(name, value))
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoQuery {
  DateRange(DateRange),
  Tags(TagQuery),
}

impl PhotoQuery {
  pub fn matches(&self, photo: &Photo) -> bool {
    match self {
      Self::DateRange(range) => range.contains(photo.date_taken()),
      Self::Tags(tags) => tags.matches(photo),
    }
  }
}

impl From<DateRange> for PhotoQuery {
  fn from(range: DateRange) -> Self { Self::DateRange(range) }
}

impl From<TagQuery> for PhotoQuery {
  fn from(tags: TagQuery) -> Self { Self::Tags(tags) }
}

/// Photos of `user` matching `query`, deduplicated by path, in
/// first-encountered order.
pub fn search<'a>(user: &'a User, query: &PhotoQuery) -> Vec<&'a Photo> {
  let mut seen: HashSet<&Path> = HashSet::new();
  let mut found = Vec::new();
  for album in user.album_views() {
    for photo in album.photos() {
      if query.matches(photo) && seen.insert(photo.key()) {
        found.push(photo);
      }
    }
  }
  found
}

pub fn search_by_date<'a>(user: &'a User, range: DateRange) -> Vec<&'a Photo> {
  search(user, &PhotoQuery::DateRange(range))
}

pub fn search_by_tags<'a>(user: &'a User, query: &TagQuery) -> Vec<&'a Photo> {
  search(user, &PhotoQuery::Tags(query.clone()))
}
