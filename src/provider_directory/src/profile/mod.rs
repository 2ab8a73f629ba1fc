//! Profile repository: provider profiles and their photo galleries.
//!
//! One profile per provider account, unique company names, photos kept in
//! insertion order. Both uniqueness rules are enforced by unique indexes and
//! surface as [`DirectoryError::Conflict`](crate::error::DirectoryError::Conflict).

pub mod repo;

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

use crate::{
    category::ServiceCategory,
    error::{DirectoryError, DirectoryResult, decode_ts},
    models::{PhotoRow, ProfileRow},
};

pub use repo::SqliteProfileRepo;

/// A provider's directory listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    /// Profile id.
    pub id: i32,
    /// Owning provider account.
    pub owner_account_id: i32,
    /// Unique company name.
    pub company_name: String,
    /// Listing category.
    pub service_category: ServiceCategory,
    /// Office address.
    pub office_address: String,
    /// Office phone number.
    pub office_number: String,
    /// GST registration number.
    pub gst_number: String,
    /// PAN registration number.
    pub pan_number: String,
    /// Free-text description.
    pub description: String,
    /// Opaque logo reference.
    pub logo_ref: Option<String>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = DirectoryError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let service_category = ServiceCategory::parse_label(&row.service_category)
            .ok_or_else(|| {
                DirectoryError::Decode(format!(
                    "profiles.service_category: {:?}",
                    row.service_category
                ))
            })?;
        Ok(Profile {
            id: row.id,
            owner_account_id: row.owner_account_id,
            company_name: row.company_name,
            service_category,
            office_address: row.office_address,
            office_number: row.office_number,
            gst_number: row.gst_number,
            pan_number: row.pan_number,
            description: row.description,
            logo_ref: row.logo_ref,
        })
    }
}

/// One gallery photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfilePhoto {
    /// Photo id.
    pub id: i32,
    /// Owning profile.
    pub profile_id: i32,
    /// Opaque image reference.
    pub image_ref: String,
    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
}

impl TryFrom<PhotoRow> for ProfilePhoto {
    type Error = DirectoryError;

    fn try_from(row: PhotoRow) -> Result<Self, Self::Error> {
        Ok(ProfilePhoto {
            uploaded_at: decode_ts("profile_photos.uploaded_at", &row.uploaded_at)?,
            id: row.id,
            profile_id: row.profile_id,
            image_ref: row.image_ref,
        })
    }
}

/// Form contents for creating or editing a profile.
///
/// `service_category` is the raw label as submitted; it is validated against
/// [`ServiceCategory`] before anything is written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileDraft {
    /// Unique company name.
    pub company_name: String,
    /// Category label as submitted.
    pub service_category: String,
    /// Office address.
    #[serde(default)]
    pub office_address: String,
    /// Office phone number.
    #[serde(default)]
    pub office_number: String,
    /// GST registration number.
    #[serde(default)]
    pub gst_number: String,
    /// PAN registration number.
    #[serde(default)]
    pub pan_number: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// New logo reference; `None` keeps the current one on edit.
    #[serde(default)]
    pub logo_ref: Option<String>,
}

/// Portable surface, SQLite implementation lives in `repo.rs`.
pub trait ProfileRepo {
    /// Creates the owner's profile with optional initial photos.
    ///
    /// Owner must be a provider; one profile per owner; company names unique.
    fn create_profile(
        &self,
        conn: &mut SqliteConnection,
        owner_account_id: i32,
        draft: &ProfileDraft,
        photo_refs: &[String],
    ) -> DirectoryResult<Profile>;

    /// Edits the profile owned by `owner_account_id`.
    fn update_profile(
        &self,
        conn: &mut SqliteConnection,
        owner_account_id: i32,
        draft: &ProfileDraft,
    ) -> DirectoryResult<Profile>;

    /// Loads a profile by id.
    fn profile(&self, conn: &mut SqliteConnection, id: i32) -> DirectoryResult<Option<Profile>>;

    /// Loads the profile owned by an account.
    fn profile_by_owner(
        &self,
        conn: &mut SqliteConnection,
        owner_account_id: i32,
    ) -> DirectoryResult<Option<Profile>>;

    /// Profiles of one category with their owner's city, ordered by company name.
    fn profiles_in_category(
        &self,
        conn: &mut SqliteConnection,
        category: ServiceCategory,
    ) -> DirectoryResult<Vec<(Profile, String)>>;

    /// Appends photos to the gallery, returning them in insertion order.
    fn add_photos(
        &self,
        conn: &mut SqliteConnection,
        profile_id: i32,
        image_refs: &[String],
    ) -> DirectoryResult<Vec<ProfilePhoto>>;

    /// Deletes the given photos of this profile; ids of other profiles are ignored.
    fn delete_photos(
        &self,
        conn: &mut SqliteConnection,
        profile_id: i32,
        photo_ids: &[i32],
    ) -> DirectoryResult<usize>;

    /// Gallery of a profile in insertion order.
    fn photos(&self, conn: &mut SqliteConnection, profile_id: i32)
    -> DirectoryResult<Vec<ProfilePhoto>>;
}
