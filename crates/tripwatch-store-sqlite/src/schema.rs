//! SQL schema for the tripwatch SQLite store.
//!
//! Executed once at connection startup. `foreign_keys` must be on for the
//! cascades below to fire; it is a per-connection setting, and the store owns
//! exactly one connection.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- The title is the natural key carried across update cycles.
CREATE TABLE IF NOT EXISTS trips (
    trip_id              TEXT PRIMARY KEY,
    title                TEXT NOT NULL UNIQUE,
    month                INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    current_participants INTEGER NOT NULL,
    min_participants     INTEGER NOT NULL,
    max_participants     INTEGER NOT NULL,
    vk_url               TEXT NOT NULL,
    last_updated         TEXT NOT NULL    -- RFC 3339 UTC
);

CREATE TABLE IF NOT EXISTS subscriptions (
    subscription_id TEXT PRIMARY KEY,
    trip_id         TEXT NOT NULL REFERENCES trips(trip_id) ON DELETE CASCADE,
    chat_id         INTEGER NOT NULL,
    created_at      TEXT NOT NULL,
    UNIQUE (trip_id, chat_id)
);

-- Append-only; rows only disappear with their trip.
CREATE TABLE IF NOT EXISTS participant_history (
    history_id   TEXT PRIMARY KEY,
    trip_id      TEXT NOT NULL REFERENCES trips(trip_id) ON DELETE CASCADE,
    participants INTEGER NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS trips_month_idx          ON trips(month);
CREATE INDEX IF NOT EXISTS subscriptions_chat_idx   ON subscriptions(chat_id);
CREATE INDEX IF NOT EXISTS history_trip_idx         ON participant_history(trip_id);

PRAGMA user_version = 1;
";
