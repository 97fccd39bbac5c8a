//! SQL schema for the Shoebox snapshot file.
//!
//! Every snapshot is written into a brand-new database, so there are no
//! migrations. `PRAGMA user_version` records the layout; a reader refuses any
//! other version.

pub const SCHEMA_VERSION: i64 = 1;

/// Full schema DDL, executed on an empty database.
pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE users (
    username    TEXT PRIMARY KEY,
    password    TEXT,
    position    INTEGER NOT NULL UNIQUE
);

CREATE TABLE tag_types (
    position    INTEGER PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE
);

-- Album names are unique per user.
CREATE TABLE albums (
    username    TEXT NOT NULL REFERENCES users(username),
    position    INTEGER NOT NULL,
    name        TEXT NOT NULL,
    PRIMARY KEY (username, position),
    UNIQUE (username, name)
);

-- One row per photo a user holds, however many albums list it.
CREATE TABLE photos (
    username    TEXT NOT NULL REFERENCES users(username),
    file_path   TEXT NOT NULL,
    caption     TEXT NOT NULL,
    date_taken  TEXT NOT NULL,   -- local wall-clock time, ISO 8601
    PRIMARY KEY (username, file_path)
);

-- Album contents in album order. A file path appears once per album.
CREATE TABLE album_photos (
    username    TEXT NOT NULL,
    album_pos   INTEGER NOT NULL,
    position    INTEGER NOT NULL,
    file_path   TEXT NOT NULL,
    PRIMARY KEY (username, album_pos, position),
    UNIQUE (username, album_pos, file_path),
    FOREIGN KEY (username, album_pos) REFERENCES albums(username, position),
    FOREIGN KEY (username, file_path) REFERENCES photos(username, file_path)
);

-- A (name, value) pair appears once per photo.
CREATE TABLE photo_tags (
    username    TEXT NOT NULL,
    file_path   TEXT NOT NULL,
    name        TEXT NOT NULL,
    value       TEXT NOT NULL,
    PRIMARY KEY (username, file_path, name, value),
    FOREIGN KEY (username, file_path) REFERENCES photos(username, file_path)
);
";
