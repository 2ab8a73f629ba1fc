//! Read model for a single profile page.

use diesel::SqliteConnection;
use serde::Serialize;

use crate::{
    error::{DirectoryError, DirectoryResult},
    identity::{Account, IdentityStore, Role, Session, SqliteIdentity},
    profile::{Profile, ProfilePhoto, ProfileRepo, SqliteProfileRepo},
    rating::{Rating, RatingAggregate, RatingLedger, SqliteLedger},
};

/// Everything the profile page renders, computed for one viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileDetailView {
    /// The profile.
    pub profile: Profile,
    /// Gallery in insertion order.
    pub photos: Vec<ProfilePhoto>,
    /// Live rating aggregate.
    pub aggregate: RatingAggregate,
    /// Viewer owns the profile.
    pub is_owner: bool,
    /// Viewer is a logged-in consumer who does not own the profile.
    pub can_rate: bool,
    /// Viewer's current rating, only looked up when `can_rate`.
    pub viewer_existing_rating: Option<Rating>,
}

/// Assembles the detail view of `profile_id` for `viewer`.
///
/// A session whose account no longer resolves is treated as anonymous.
pub fn assemble_detail(
    conn: &mut SqliteConnection,
    profile_id: i32,
    viewer: &Session,
) -> DirectoryResult<ProfileDetailView> {
    let profile = SqliteProfileRepo
        .profile(conn, profile_id)?
        .ok_or_else(|| DirectoryError::not_found("profile", profile_id))?;
    let viewer = resolve_viewer(conn, viewer)?;
    build(conn, profile, viewer.as_ref())
}

/// Detail view of the viewer's own profile ("my company profile").
///
/// `Unauthenticated` without a session, `NotFound` when the viewer has no profile.
pub fn assemble_own_detail(
    conn: &mut SqliteConnection,
    viewer: &Session,
) -> DirectoryResult<ProfileDetailView> {
    let account_id = viewer
        .current_account_id()
        .ok_or(DirectoryError::Unauthenticated)?;
    let account = SqliteIdentity.resolve_account(conn, account_id)?;
    let profile = SqliteProfileRepo
        .profile_by_owner(conn, account.id)?
        .ok_or_else(|| DirectoryError::not_found("profile", format!("owner {}", account.id)))?;
    build(conn, profile, Some(&account))
}

fn resolve_viewer(conn: &mut SqliteConnection, viewer: &Session) -> DirectoryResult<Option<Account>> {
    let Some(id) = viewer.current_account_id() else {
        return Ok(None);
    };
    match SqliteIdentity.resolve_account(conn, id) {
        Ok(account) => Ok(Some(account)),
        Err(DirectoryError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn build(
    conn: &mut SqliteConnection,
    profile: Profile,
    viewer: Option<&Account>,
) -> DirectoryResult<ProfileDetailView> {
    let photos = SqliteProfileRepo.photos(conn, profile.id)?;
    let aggregate = SqliteLedger.aggregate_for(conn, profile.id)?;

    let is_owner = viewer.is_some_and(|v| v.id == profile.owner_account_id);
    let can_rate = viewer.is_some_and(|v| v.role == Role::Consumer) && !is_owner;
    let viewer_existing_rating = match viewer {
        Some(v) if can_rate => SqliteLedger.rating_by_rater(conn, profile.id, v.id)?,
        _ => None,
    };

    tracing::debug!(
        profile_id = profile.id,
        photos = photos.len(),
        ratings = aggregate.count,
        is_owner,
        can_rate,
        "profile detail assembled"
    );

    Ok(ProfileDetailView {
        profile,
        photos,
        aggregate,
        is_owner,
        can_rate,
        viewer_existing_rating,
    })
}
