//! Database utilities for connections and schema migrations.
//!
//! This module provides:
//! - SQLite connection helpers: [`connection::connect_sqlite`] applies WAL, foreign_keys=ON, and a 5000ms busy_timeout.
//! - Embedded Diesel migrations and runners: [`migrate::run_sqlite`] and [`migrate::run_all`]
//!   which accepts `sqlite:` URLs or bare SQLite paths.
//!
//! Example:
//! ```no_run
//! use provider_directory::db::{migrate, connection};
//!
//! let db_path = std::env::temp_dir().join("provider_directory_example.db");
//! migrate::run_all(db_path.to_str().unwrap()).expect("migrations");
//!
//! let _conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! ```

pub mod connection;
pub mod migrate;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// True when the error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}
