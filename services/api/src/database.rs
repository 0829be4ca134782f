//! Schema migrations for the marketplace service
//!
//! The schema is applied idempotently at startup. The unique indexes on
//! `(user_id, listing_id)` for favourites and bids back the upsert
//! statements in the repositories: two concurrent requests for the same
//! pair can never produce two rows.

use common::error::{DatabaseError, DatabaseResult};
use sqlx::SqlitePool;
use tracing::info;

const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        location TEXT,
        phone TEXT,
        full_name TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id),
        expires_at TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS listings (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        price INTEGER,
        price_type TEXT NOT NULL,
        condition TEXT NOT NULL,
        location TEXT NOT NULL,
        picture TEXT,
        description TEXT,
        make TEXT NOT NULL,
        model TEXT NOT NULL,
        vehicle_type TEXT NOT NULL,
        year_of_manufacture INTEGER NOT NULL,
        fuel_or_power TEXT NOT NULL,
        weight REAL,
        views INTEGER NOT NULL DEFAULT 0,
        user_id TEXT NOT NULL REFERENCES users (id),
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS favourites (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users (id),
        listing_id TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_favourites_user_listing
        ON favourites (user_id, listing_id)",
    "CREATE TABLE IF NOT EXISTS bids (
        id TEXT PRIMARY KEY,
        listing_id TEXT NOT NULL,
        user_id TEXT NOT NULL REFERENCES users (id),
        amount INTEGER NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_bids_user_listing
        ON bids (user_id, listing_id)",
];

/// Bring the schema up to date.
pub async fn run_migrations(pool: &SqlitePool) -> DatabaseResult<()> {
    for statement in MIGRATIONS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    }

    info!("Database schema is up to date");
    Ok(())
}
