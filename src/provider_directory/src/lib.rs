//! Provider directory core: profile discovery, filtering and rating.
//!
//! Service providers publish one company profile in a fixed
//! [`category::ServiceCategory`]; consumers browse per-category feeds
//! ([`feed::query_feed`]), open a profile page ([`detail::assemble_detail`]) and
//! leave one 1–5 star rating per profile ([`rating::RatingLedger`]).
//!
//! Storage is SQLite through Diesel. Apply the embedded migrations with
//! [`db::migrate::run_all`] and open connections with
//! [`db::connection::connect_sqlite`]; every operation takes the connection
//! explicitly.

#![warn(missing_docs)]

pub mod category;
pub mod config;
pub mod db;
pub mod detail;
pub mod error;
pub mod feed;
pub mod identity;
pub mod models;
pub mod profile;
pub mod rating;
pub mod schema;
pub mod seed;
pub mod tz;

pub use error::{DirectoryError, DirectoryResult};
