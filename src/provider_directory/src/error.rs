//! Typed failures returned by the directory core.
//!
//! Every variant is recoverable at the request boundary: the presentation layer
//! maps each one to a user-facing message (see [`DirectoryError::user_message`]).

use thiserror::Error;

/// Errors returned by the identity store, profile repository, rating ledger,
/// feed engine and detail assembler.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A profile, account, rating or category could not be resolved.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of entity that was looked up ("profile", "account", ...).
        entity: &'static str,
        /// Lookup key as given by the caller.
        key: String,
    },

    /// The operation requires a logged-in identity and none was supplied.
    #[error("login required")]
    Unauthenticated,

    /// The acting account has the wrong role for the operation.
    #[error("{action} requires role {required}")]
    Role {
        /// What was attempted (e.g., "rating a profile").
        action: &'static str,
        /// Role code the operation requires.
        required: &'static str,
    },

    /// A provider tried to rate their own profile.
    #[error("you cannot rate your own profile")]
    SelfRating,

    /// A rating value was outside 1..=5 or not an integer.
    #[error("rating must be an integer between 1 and 5 (got {0})")]
    Range(String),

    /// A service category label is not part of the fixed set.
    #[error("invalid service category: {0}")]
    InvalidCategory(String),

    /// A uniqueness constraint was violated (company name, owner, display name,
    /// or a rating pair written outside the upsert path).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value could not be decoded into its domain type.
    #[error("corrupt stored value: {0}")]
    Decode(String),

    /// Any other storage failure.
    #[error("storage error")]
    Storage(#[from] diesel::result::Error),
}

/// Result type used throughout the directory core.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl DirectoryError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Short message suitable for a flash banner on the page the user came from.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { entity, .. } => match *entity {
                "profile" => "Profile not found.".to_string(),
                "account" => "User does not exist.".to_string(),
                other => format!("No such {other}."),
            },
            Self::Unauthenticated => "Please login to continue.".to_string(),
            Self::Role { action, required } => {
                format!("Only {required} accounts are allowed {action}.")
            }
            Self::SelfRating => "You cannot rate your own profile.".to_string(),
            Self::Range(_) => "Rating must be between 1 and 5.".to_string(),
            Self::InvalidCategory(_) => "Invalid service type selection.".to_string(),
            Self::Conflict(what) => format!("{what} already exists."),
            Self::Decode(_) | Self::Storage(_) => "Something went wrong, please try again.".to_string(),
        }
    }
}

/// Maps a UNIQUE violation to [`DirectoryError::Conflict`] naming `what`;
/// everything else stays a storage error.
pub(crate) fn conflict_or_storage(err: diesel::result::Error, what: &str) -> DirectoryError {
    if crate::db::is_unique_violation(&err) {
        DirectoryError::Conflict(what.to_string())
    } else {
        DirectoryError::Storage(err)
    }
}

/// Maps an RFC-3339 decode failure of a stored column.
pub(crate) fn decode_ts(column: &str, raw: &str) -> DirectoryResult<chrono::DateTime<chrono::Utc>> {
    crate::tz::parse_ts_to_utc(raw).map_err(|e| DirectoryError::Decode(format!("{column}: {e}")))
}
