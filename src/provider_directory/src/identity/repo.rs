use diesel::prelude::*;

use crate::{
    error::{DirectoryError, DirectoryResult, conflict_or_storage},
    identity::{Account, IdentityStore, NewAccount},
    models::{AccountRow, NewAccountRow},
    schema::accounts::dsl as acc,
    tz,
};

/// Account store backed by the `accounts` table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteIdentity;

impl SqliteIdentity {
    /// Creates the store.
    pub fn new() -> Self {
        Self
    }
}

impl IdentityStore for SqliteIdentity {
    fn create_account(
        &self,
        conn: &mut SqliteConnection,
        account: &NewAccount,
    ) -> DirectoryResult<Account> {
        let now = tz::now_rfc3339_millis();
        let row = NewAccountRow {
            display_name: account.display_name.trim(),
            email: account.email.trim(),
            contact: account.contact.trim(),
            city: account.city.trim(),
            role: account.role.as_str(),
            created_at: &now,
        };

        let inserted: AccountRow = diesel::insert_into(acc::accounts)
            .values(&row)
            .returning(AccountRow::as_returning())
            .get_result(conn)
            .map_err(|e| conflict_or_storage(e, "Username"))?;

        tracing::debug!(account_id = inserted.id, role = %account.role, "account created");
        inserted.try_into()
    }

    fn resolve_account(&self, conn: &mut SqliteConnection, id: i32) -> DirectoryResult<Account> {
        acc::accounts
            .find(id)
            .select(AccountRow::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| DirectoryError::not_found("account", id))?
            .try_into()
    }

    fn account_by_display_name(
        &self,
        conn: &mut SqliteConnection,
        name: &str,
    ) -> DirectoryResult<Option<Account>> {
        acc::accounts
            .filter(acc::display_name.eq(name.trim()))
            .select(AccountRow::as_select())
            .first(conn)
            .optional()?
            .map(Account::try_from)
            .transpose()
    }

    fn update_city(
        &self,
        conn: &mut SqliteConnection,
        id: i32,
        city: &str,
    ) -> DirectoryResult<Account> {
        diesel::update(acc::accounts.find(id))
            .set(acc::city.eq(city.trim()))
            .returning(AccountRow::as_returning())
            .get_result(conn)
            .optional()?
            .ok_or_else(|| DirectoryError::not_found("account", id))?
            .try_into()
    }

    fn delete_account(&self, conn: &mut SqliteConnection, id: i32) -> DirectoryResult<()> {
        let n = diesel::delete(acc::accounts.find(id)).execute(conn)?;
        if n == 0 {
            return Err(DirectoryError::not_found("account", id));
        }
        tracing::debug!(account_id = id, "account deleted");
        Ok(())
    }
}
