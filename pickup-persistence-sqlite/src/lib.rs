use std::{str::FromStr, time::Duration};

use chrono::{DateTime, Utc};
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub mod games;
pub mod notifications;
pub mod users;

pub use games::SqliteGameRepository;
pub use notifications::SqliteNotificationRepository;
pub use users::SqliteUserRepository;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    area TEXT,
    bio TEXT,
    phone TEXT,
    games_played INTEGER NOT NULL DEFAULT 0,
    games_confirmed INTEGER NOT NULL DEFAULT 0,
    no_shows INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS games (
    id TEXT PRIMARY KEY NOT NULL,
    organiser_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    organiser_name TEXT NOT NULL,
    venue TEXT NOT NULL,
    scheduled_at INTEGER NOT NULL,
    format TEXT NOT NULL,
    subs REAL,
    notes TEXT,
    players_requested INTEGER NOT NULL,
    players_needed INTEGER NOT NULL CHECK (players_needed >= 0),
    status TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS games_organiser ON games(organiser_id);

CREATE TABLE IF NOT EXISTS participants (
    id TEXT PRIMARY KEY NOT NULL,
    game_id TEXT NOT NULL REFERENCES games(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    user_name TEXT NOT NULL,
    user_area TEXT,
    user_phone TEXT,
    user_games_played INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL,
    joined_at INTEGER NOT NULL,
    UNIQUE (game_id, user_id)
);
CREATE INDEX IF NOT EXISTS participants_user ON participants(user_id);

CREATE TABLE IF NOT EXISTS notifications (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    kind TEXT NOT NULL,
    message TEXT NOT NULL,
    game_id TEXT REFERENCES games(id) ON DELETE SET NULL,
    player_name TEXT,
    read INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS notifications_user ON notifications(user_id, read);
"#;

pub async fn create_db_pool(db_path: &str) -> Result<Pool<Sqlite>, sqlx::Error> {
    let conn_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(conn_options)
        .await
}

/// Creates all tables and indexes that do not exist yet.
pub async fn init_schema(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

fn to_millis(time: DateTime<Utc>) -> i64 {
    time.timestamp_millis()
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| sqlx::Error::Decode(format!("timestamp out of range: {}", millis).into()))
}

fn parse_column<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| sqlx::Error::Decode(format!("invalid value {}: {}", value, e).into()))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
