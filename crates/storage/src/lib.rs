//! Storage layer: local SQLite settings for the client.
//!
//! Holds DB pool setup, the migration runner and key/value accessors used for
//! the session token and the running quiz score.

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

pub const USER_TOKEN_KEY: &str = "userToken";
pub const SCORE_KEY: &str = "score";

/// Opens a pool for a `sqlite:` URL or a plain file path, creating the
/// file and its parent directory when missing.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        let path = Path::new(database_url);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }
        format!("sqlite://{}", path.to_string_lossy().replace('\\', "/"))
    };
    let opts = SqliteConnectOptions::from_str(&url)
        .with_context(|| format!("parsing database url {url}"))?
        .create_if_missing(true);
    let max = if url.contains(":memory:") { 1 } else { 5 };
    let pool = SqlitePoolOptions::new()
        .max_connections(max)
        .connect_with(opts)
        .await
        .with_context(|| format!("opening database {url}"))?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    // Applies SQLx migrations located in crates/storage/migrations.
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Connects and migrates in one step.
pub async fn open(database_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = connect(database_url).await?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn get_setting(pool: &SqlitePool, key: &str) -> anyhow::Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM settings WHERE key = ?1")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get::<String, _>(0)))
}

pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> anyhow::Result<()> {
    debug!("set setting {}", key);
    sqlx::query(
        "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, strftime('%s','now'))
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_setting(pool: &SqlitePool, key: &str) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM settings WHERE key = ?1")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(())
}

/// Stored score, or 0 when missing or unparsable.
pub async fn load_score(pool: &SqlitePool) -> anyhow::Result<u32> {
    Ok(get_setting(pool, SCORE_KEY)
        .await?
        .and_then(|v| v.parse().ok())
        .unwrap_or(0))
}
