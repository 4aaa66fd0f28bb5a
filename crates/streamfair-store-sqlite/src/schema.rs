//! SQL schema for the Streamfair SQLite store.
//!
//! Executed once at connection startup. Junction tables reference both
//! parents with foreign keys and carry a composite primary key, so a link to
//! a missing parent or a repeated pair is rejected by the database itself.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    owner       TEXT NOT NULL,
    avatar_uri  TEXT,
    plays       INTEGER NOT NULL DEFAULT 0,
    likes       INTEGER NOT NULL DEFAULT 0,
    follows     INTEGER NOT NULL DEFAULT 0,
    shares      INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- Seeded at boot; read-only afterwards.
CREATE TABLE IF NOT EXISTS account_types (
    id           INTEGER PRIMARY KEY,
    description  TEXT NOT NULL,
    permissions  TEXT NOT NULL,      -- JSON blob
    is_artist    INTEGER NOT NULL,
    is_producer  INTEGER NOT NULL,
    is_writer    INTEGER NOT NULL,
    is_label     INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS accounts_account_types (
    account_id       INTEGER NOT NULL REFERENCES accounts(id),
    account_type_id  INTEGER NOT NULL REFERENCES account_types(id),
    PRIMARY KEY (account_id, account_type_id)
);

CREATE TABLE IF NOT EXISTS songs (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    title          TEXT NOT NULL,
    duration_secs  INTEGER NOT NULL,
    release_date   TEXT NOT NULL,    -- ISO 8601 date
    cover_uri      TEXT,
    audio_uri      TEXT NOT NULL,
    plays          INTEGER NOT NULL DEFAULT 0,
    likes          INTEGER NOT NULL DEFAULT 0,
    shares         INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

-- Credit rows are shared between songs and reused by normalized name.
CREATE TABLE IF NOT EXISTS genres (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name_key     TEXT NOT NULL UNIQUE,
    name         TEXT NOT NULL,
    description  TEXT
);

CREATE TABLE IF NOT EXISTS artists (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name_key      TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    bio           TEXT,
    country_code  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS albums (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name_key   TEXT NOT NULL UNIQUE,
    title      TEXT NOT NULL,
    cover_uri  TEXT
);

CREATE TABLE IF NOT EXISTS producers (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name_key      TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    country_code  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS writers (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name_key      TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    country_code  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS labels (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name_key      TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    country_code  TEXT NOT NULL,
    cover_uri     TEXT
);

CREATE TABLE IF NOT EXISTS songs_genres (
    song_id   INTEGER NOT NULL REFERENCES songs(id),
    genre_id  INTEGER NOT NULL REFERENCES genres(id),
    PRIMARY KEY (song_id, genre_id)
);

CREATE TABLE IF NOT EXISTS songs_artists (
    song_id    INTEGER NOT NULL REFERENCES songs(id),
    artist_id  INTEGER NOT NULL REFERENCES artists(id),
    PRIMARY KEY (song_id, artist_id)
);

CREATE TABLE IF NOT EXISTS songs_albums (
    song_id   INTEGER NOT NULL REFERENCES songs(id),
    album_id  INTEGER NOT NULL REFERENCES albums(id),
    PRIMARY KEY (song_id, album_id)
);

CREATE TABLE IF NOT EXISTS songs_producers (
    song_id      INTEGER NOT NULL REFERENCES songs(id),
    producer_id  INTEGER NOT NULL REFERENCES producers(id),
    PRIMARY KEY (song_id, producer_id)
);

CREATE TABLE IF NOT EXISTS songs_writers (
    song_id    INTEGER NOT NULL REFERENCES songs(id),
    writer_id  INTEGER NOT NULL REFERENCES writers(id),
    PRIMARY KEY (song_id, writer_id)
);

CREATE TABLE IF NOT EXISTS songs_labels (
    song_id   INTEGER NOT NULL REFERENCES songs(id),
    label_id  INTEGER NOT NULL REFERENCES labels(id),
    PRIMARY KEY (song_id, label_id)
);

-- Accepted song-creation fingerprints. Rows are never deleted.
CREATE TABLE IF NOT EXISTS content_fingerprints (
    hash         TEXT PRIMARY KEY,   -- hex SHA-256 of the canonical draft
    accepted_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS accounts_owner_idx            ON accounts(owner);
CREATE INDEX IF NOT EXISTS accounts_account_types_rt_idx ON accounts_account_types(account_type_id);
CREATE INDEX IF NOT EXISTS songs_genres_rt_idx           ON songs_genres(genre_id);
CREATE INDEX IF NOT EXISTS songs_artists_rt_idx          ON songs_artists(artist_id);
CREATE INDEX IF NOT EXISTS songs_albums_rt_idx           ON songs_albums(album_id);
CREATE INDEX IF NOT EXISTS songs_producers_rt_idx        ON songs_producers(producer_id);
CREATE INDEX IF NOT EXISTS songs_writers_rt_idx          ON songs_writers(writer_id);
CREATE INDEX IF NOT EXISTS songs_labels_rt_idx           ON songs_labels(label_id);

PRAGMA user_version = 1;
";
