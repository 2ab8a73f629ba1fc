use std::collections::HashMap;

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;

use crate::{
    category::ServiceCategory,
    error::{DirectoryError, DirectoryResult},
    identity::{IdentityStore, Role, Session, SqliteIdentity},
    models::{NewRatingRow, RatingRow},
    profile::{ProfileRepo, SqliteProfileRepo},
    rating::{Rating, RatingAggregate, RatingLedger, RatingTally, RatingValue},
    schema::{profiles::dsl as pr, ratings::dsl as rt},
    tz,
};

/// Rating ledger backed by the `ratings` table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteLedger;

impl SqliteLedger {
    /// Creates the ledger.
    pub fn new() -> Self {
        Self
    }

    /// Request-boundary form of a submission: the session must carry an identity
    /// and the raw form value must be an integer in 1..=5.
    ///
    /// A malformed value is reported as a range error, after the role, profile
    /// and ownership checks. Blank comments are stored as no comment.
    pub fn submit_rating_form(
        &self,
        conn: &mut SqliteConnection,
        session: &Session,
        profile_id: i32,
        raw_value: &str,
        comment: Option<&str>,
    ) -> DirectoryResult<Rating> {
        let rater_account_id = session
            .current_account_id()
            .ok_or(DirectoryError::Unauthenticated)?;
        let comment = comment.map(str::trim).filter(|c| !c.is_empty());

        self.submit_with(conn, profile_id, rater_account_id, comment, || {
            raw_value.parse()
        })
    }

    /// Live aggregates of every rated profile in a category, from one scan of
    /// `ratings` joined to `profiles`. Unrated profiles are absent from the map.
    pub fn aggregates_in_category(
        &self,
        conn: &mut SqliteConnection,
        category: ServiceCategory,
    ) -> DirectoryResult<HashMap<i32, RatingAggregate>> {
        let rows: Vec<(i32, i32)> = rt::ratings
            .inner_join(pr::profiles)
            .filter(pr::service_category.eq(category.as_str()))
            .select((rt::profile_id, rt::value))
            .load(conn)?;

        let mut tallies: HashMap<i32, RatingTally> = HashMap::new();
        for (profile_id, value) in rows {
            tallies.entry(profile_id).or_default().add(value);
        }
        Ok(tallies
            .into_iter()
            .map(|(profile_id, tally)| (profile_id, tally.aggregate()))
            .collect())
    }

    /// Validation and upsert shared by both submission forms; `value` is only
    /// evaluated once every earlier check has passed.
    fn submit_with(
        &self,
        conn: &mut SqliteConnection,
        profile_id: i32,
        rater_account_id: i32,
        comment: Option<&str>,
        value: impl FnOnce() -> DirectoryResult<RatingValue>,
    ) -> DirectoryResult<Rating> {
        // BEGIN IMMEDIATE: take the write lock before reading so the checks and
        // the upsert see the same profile/account state.
        conn.immediate_transaction::<_, DirectoryError, _>(|conn| {
            let rater = SqliteIdentity.resolve_account(conn, rater_account_id)?;
            if rater.role != Role::Consumer {
                return Err(DirectoryError::Role {
                    action: "rating a profile",
                    required: Role::Consumer.as_str(),
                });
            }

            let profile = SqliteProfileRepo
                .profile(conn, profile_id)?
                .ok_or_else(|| DirectoryError::not_found("profile", profile_id))?;
            if profile.owner_account_id == rater.id {
                return Err(DirectoryError::SelfRating);
            }

            let value = value()?;
            let now = tz::now_rfc3339_millis();
            let row = NewRatingRow {
                profile_id,
                rater_account_id,
                value: i32::from(value.get()),
                comment,
                created_at: &now,
                updated_at: &now,
            };

            // Insert .. ON CONFLICT (profile_id, rater_account_id) DO UPDATE .. RETURNING *
            // created_at is left out of the SET list so it keeps the first submission time.
            let stored: RatingRow = diesel::insert_into(rt::ratings)
                .values(&row)
                .on_conflict((rt::profile_id, rt::rater_account_id))
                .do_update()
                .set((
                    rt::value.eq(excluded(rt::value)),
                    rt::comment.eq(excluded(rt::comment)),
                    rt::updated_at.eq(excluded(rt::updated_at)),
                ))
                .returning(RatingRow::as_returning())
                .get_result(conn)
                .map_err(|e| rating_write_error(e, value))?;

            tracing::debug!(
                rating_id = stored.id,
                profile_id,
                rater_account_id,
                value = %value,
                "rating upserted"
            );
            stored.try_into()
        })
    }
}

/// Maps store-level invariant failures back onto the error taxonomy.
fn rating_write_error(err: DieselError, value: RatingValue) -> DirectoryError {
    match &err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DirectoryError::Conflict("Rating".to_string())
        }
        DieselError::DatabaseError(_, info) if info.message().contains("CHECK constraint") => {
            DirectoryError::Range(value.to_string())
        }
        DieselError::DatabaseError(_, info) if info.message().contains("self rating") => {
            DirectoryError::SelfRating
        }
        _ => DirectoryError::Storage(err),
    }
}

impl RatingLedger for SqliteLedger {
    fn submit_rating(
        &self,
        conn: &mut SqliteConnection,
        profile_id: i32,
        rater_account_id: i32,
        value: i64,
        comment: Option<&str>,
    ) -> DirectoryResult<Rating> {
        self.submit_with(conn, profile_id, rater_account_id, comment, || {
            RatingValue::try_from(value)
        })
    }

    fn aggregate_for(
        &self,
        conn: &mut SqliteConnection,
        profile_id: i32,
    ) -> DirectoryResult<RatingAggregate> {
        let values: Vec<i32> = rt::ratings
            .filter(rt::profile_id.eq(profile_id))
            .select(rt::value)
            .load(conn)?;
        Ok(values.into_iter().collect())
    }

    fn rating_by_rater(
        &self,
        conn: &mut SqliteConnection,
        profile_id: i32,
        rater_account_id: i32,
    ) -> DirectoryResult<Option<Rating>> {
        rt::ratings
            .filter(
                rt::profile_id
                    .eq(profile_id)
                    .and(rt::rater_account_id.eq(rater_account_id)),
            )
            .select(RatingRow::as_select())
            .first(conn)
            .optional()?
            .map(Rating::try_from)
            .transpose()
    }
}
