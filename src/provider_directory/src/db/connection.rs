//! SQLite connection helpers.
//!
//! Provides [`connect_sqlite`] that opens a connection and applies the PRAGMAs the
//! rating ledger relies on: WAL journaling, foreign_keys=ON (profile/photo/rating
//! cascades), and a 5000ms busy_timeout so concurrent rating submissions wait for
//! the write lock instead of failing.
//!
//! Example:
//! ```no_run
//! use provider_directory::db::connection::connect_sqlite;
//!
//! let path = std::env::temp_dir().join("provider_directory_example.db");
//! let _conn = connect_sqlite(path.to_str().unwrap()).expect("open sqlite");
//! ```

use anyhow::Context;
use diesel::{Connection, RunQueryDsl, SqliteConnection, sql_query};

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> anyhow::Result<SqliteConnection> {
    let url = strip_sqlite_scheme(database_url);
    let mut conn = SqliteConnection::establish(url)
        .with_context(|| format!("open sqlite database {url}"))?;

    sql_query("PRAGMA journal_mode=WAL;").execute(&mut conn)?;
    sql_query("PRAGMA foreign_keys=ON;").execute(&mut conn)?;
    sql_query("PRAGMA busy_timeout=5000;").execute(&mut conn)?;
    tracing::debug!(database = url, "sqlite connection ready");
    Ok(conn)
}

/// Accepts `sqlite:` / `sqlite://` prefixed URLs as well as bare file paths.
pub(crate) fn strip_sqlite_scheme(database_url: &str) -> &str {
    database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url)
}
