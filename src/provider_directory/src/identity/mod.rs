//! Identity & role contract consumed by the directory core.
//!
//! Accounts are created and authenticated elsewhere; the core only resolves
//! them by id or display name and reads their role and city. The session is an
//! explicit [`Session`] value handed in by the caller, never ambient state.

pub mod repo;

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, DirectoryResult, decode_ts};
use crate::models::AccountRow;

pub use repo::SqliteIdentity;

/// Account role (serde snake_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Lists a company profile; cannot rate.
    Provider,
    /// Regular user; may rate profiles they do not own.
    Consumer,
}

impl Role {
    /// Role code as stored in `accounts.role`.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Provider => "provider",
            Role::Consumer => "consumer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "provider" | "service_provider" => Ok(Role::Provider),
            "consumer" | "user" => Ok(Role::Consumer),
            other => Err(DirectoryError::Decode(format!("unknown role {other:?}"))),
        }
    }
}

/// A resolved account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Account id.
    pub id: i32,
    /// Unique display name.
    pub display_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub contact: String,
    /// City; searched and filtered by category feeds.
    pub city: String,
    /// Role tag.
    pub role: Role,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DirectoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            role: row.role.parse()?,
            created_at: decode_ts("accounts.created_at", &row.created_at)?,
            id: row.id,
            display_name: row.display_name,
            email: row.email,
            contact: row.contact,
            city: row.city,
        })
    }
}

/// Input for [`IdentityStore::create_account`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    /// Unique display name.
    pub display_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub contact: String,
    /// City.
    pub city: String,
    /// Role tag.
    pub role: Role,
}

/// The per-request identity carried by the caller's session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    account_id: Option<i32>,
    role: Option<Role>,
}

impl Session {
    /// A visitor without a logged-in account.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A logged-in account with its role.
    pub fn logged_in(account_id: i32, role: Role) -> Self {
        Self {
            account_id: Some(account_id),
            role: Some(role),
        }
    }

    /// Session for a resolved account.
    pub fn for_account(account: &Account) -> Self {
        Self::logged_in(account.id, account.role)
    }

    /// Id of the logged-in account, if any.
    pub fn current_account_id(&self) -> Option<i32> {
        self.account_id
    }

    /// Role of the logged-in account, if any.
    pub fn current_role(&self) -> Option<Role> {
        self.role
    }
}

/// Portable surface, SQLite implementation lives in `repo.rs`.
pub trait IdentityStore {
    /// Creates an account; display names are unique.
    fn create_account(
        &self,
        conn: &mut SqliteConnection,
        account: &NewAccount,
    ) -> DirectoryResult<Account>;

    /// Resolves an account by id, failing with `NotFound` when absent.
    fn resolve_account(&self, conn: &mut SqliteConnection, id: i32) -> DirectoryResult<Account>;

    /// Looks up an account by display name.
    fn account_by_display_name(
        &self,
        conn: &mut SqliteConnection,
        name: &str,
    ) -> DirectoryResult<Option<Account>>;

    /// Changes the city of an account.
    fn update_city(
        &self,
        conn: &mut SqliteConnection,
        id: i32,
        city: &str,
    ) -> DirectoryResult<Account>;

    /// Deletes an account, cascading to its profile, photos and ratings.
    fn delete_account(&self, conn: &mut SqliteConnection, id: i32) -> DirectoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_codes_accept_legacy_names() {
        assert_eq!("service_provider".parse::<Role>().unwrap(), Role::Provider);
        assert_eq!("user".parse::<Role>().unwrap(), Role::Consumer);
        assert_eq!("Consumer".parse::<Role>().unwrap(), Role::Consumer);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn anonymous_session_has_no_identity() {
        let s = Session::anonymous();
        assert_eq!(s.current_account_id(), None);
        assert_eq!(s.current_role(), None);

        let s = Session::logged_in(3, Role::Consumer);
        assert_eq!(s.current_account_id(), Some(3));
        assert_eq!(s.current_role(), Some(Role::Consumer));
    }
}
