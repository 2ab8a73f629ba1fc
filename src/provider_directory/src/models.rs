//! Diesel models mapping to the database schema.
//!
//! These types mirror the tables defined in the embedded migrations and in
//! [`crate::schema`] for use with Diesel’s Queryable/Insertable APIs:
//! - [`crate::schema::accounts`] — identity rows (display name, city, role)
//! - [`crate::schema::profiles`] — one provider profile per owner account
//! - [`crate::schema::profile_photos`] — ordered gallery per profile
//! - [`crate::schema::ratings`] — one star rating per (profile, rater)
//!
//! Timestamps are RFC-3339 UTC strings (see [`crate::tz`]); the domain types in
//! [`crate::identity`], [`crate::profile`] and [`crate::rating`] decode them.
//! See migrations for constraints and triggers (unique indexes, the
//! self-rating trigger and `ON DELETE CASCADE` FKs).

use diesel::prelude::*;

use crate::schema::*;

/// A row in [`crate::schema::accounts`].
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = accounts, check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountRow {
    /// Database primary key.
    pub id: i32,
    /// Unique display name used to log in.
    pub display_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub contact: String,
    /// City the account is based in; searched and filtered by the feed.
    pub city: String,
    /// Role code: "provider" | "consumer".
    pub role: String,
    /// Row creation timestamp in RFC3339 UTC.
    pub created_at: String,
}

/// Insertable form of [`AccountRow`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub struct NewAccountRow<'a> {
    /// Unique display name.
    pub display_name: &'a str,
    /// Contact email.
    pub email: &'a str,
    /// Contact phone number.
    pub contact: &'a str,
    /// City.
    pub city: &'a str,
    /// Role code: "provider" | "consumer".
    pub role: &'a str,
    /// Creation timestamp in RFC3339 UTC.
    pub created_at: &'a str,
}

/// A row in [`crate::schema::profiles`].
///
/// Unique on `owner_account_id` and on `company_name`.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = profiles, check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(belongs_to(AccountRow, foreign_key = owner_account_id))]
pub struct ProfileRow {
    /// Database primary key.
    pub id: i32,
    /// FK to [`AccountRow::id`]; the provider owning this profile.
    pub owner_account_id: i32,
    /// Unique company name.
    pub company_name: String,
    /// Canonical service category label (e.g., "Builders").
    pub service_category: String,
    /// Office address.
    pub office_address: String,
    /// Office phone number.
    pub office_number: String,
    /// GST registration number.
    pub gst_number: String,
    /// PAN registration number.
    pub pan_number: String,
    /// Free-text company description.
    pub description: String,
    /// Optional opaque reference to the stored logo image.
    pub logo_ref: Option<String>,
}

/// Insertable/changeset form of [`ProfileRow`].
///
/// `logo_ref` is skipped by the changeset when `None`, so edits without a new
/// logo keep the stored one.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = profiles)]
pub struct ProfileChanges<'a> {
    /// Unique company name.
    pub company_name: &'a str,
    /// Canonical service category label.
    pub service_category: &'a str,
    /// Office address.
    pub office_address: &'a str,
    /// Office phone number.
    pub office_number: &'a str,
    /// GST registration number.
    pub gst_number: &'a str,
    /// PAN registration number.
    pub pan_number: &'a str,
    /// Free-text company description.
    pub description: &'a str,
    /// Optional logo reference.
    pub logo_ref: Option<&'a str>,
}

/// A row in [`crate::schema::profile_photos`]; ordered by `id` (insertion order).
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = profile_photos, check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(belongs_to(ProfileRow, foreign_key = profile_id))]
pub struct PhotoRow {
    /// Database primary key.
    pub id: i32,
    /// FK to [`ProfileRow::id`].
    pub profile_id: i32,
    /// Opaque reference to the stored image.
    pub image_ref: String,
    /// Upload timestamp in RFC3339 UTC.
    pub uploaded_at: String,
}

/// Insertable form of [`PhotoRow`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profile_photos)]
pub struct NewPhotoRow<'a> {
    /// FK to [`ProfileRow::id`].
    pub profile_id: i32,
    /// Opaque reference to the stored image.
    pub image_ref: &'a str,
    /// Upload timestamp in RFC3339 UTC.
    pub uploaded_at: &'a str,
}

/// A row in [`crate::schema::ratings`].
///
/// Unique per (profile_id, rater_account_id); `value` constrained to 1..=5.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = ratings, check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(belongs_to(ProfileRow, foreign_key = profile_id))]
pub struct RatingRow {
    /// Database primary key.
    pub id: i32,
    /// FK to [`ProfileRow::id`].
    pub profile_id: i32,
    /// FK to [`AccountRow::id`]; the consumer who rated.
    pub rater_account_id: i32,
    /// Star value, 1..=5.
    pub value: i32,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// First submission timestamp in RFC3339 UTC.
    pub created_at: String,
    /// Latest submission timestamp in RFC3339 UTC.
    pub updated_at: String,
}

/// Insertable form of [`RatingRow`], also the source of `excluded.*` values on upsert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ratings)]
pub struct NewRatingRow<'a> {
    /// FK to [`ProfileRow::id`].
    pub profile_id: i32,
    /// FK to [`AccountRow::id`].
    pub rater_account_id: i32,
    /// Star value, 1..=5.
    pub value: i32,
    /// Optional free-text comment.
    pub comment: Option<&'a str>,
    /// Creation timestamp in RFC3339 UTC.
    pub created_at: &'a str,
    /// Update timestamp in RFC3339 UTC.
    pub updated_at: &'a str,
}
