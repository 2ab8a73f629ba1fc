//! Idempotent sample data for local development.
//!
//! Creates one provider account with a Builders profile, a logo and one gallery
//! photo. Each piece is only created when missing, so running it twice leaves
//! the database unchanged.

use diesel::prelude::*;
use serde::Serialize;

use crate::{
    error::DirectoryResult,
    identity::{IdentityStore, NewAccount, Role, SqliteIdentity},
    profile::{ProfileDraft, ProfileRepo, SqliteProfileRepo},
    schema::profiles::dsl as pr,
};

/// Display name of the sample provider.
pub const SAMPLE_PROVIDER: &str = "sample_provider";
/// Company name of the sample profile.
pub const SAMPLE_COMPANY: &str = "Sample Builders";
const SAMPLE_LOGO: &str = "logos/b1.jpg";
const SAMPLE_PHOTO: &str = "profile_images/b2.jpeg";

/// What [`seed_samples`] created on this run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Id of the sample profile (new or existing).
    pub profile_id: i32,
    /// The provider account was created.
    pub account_created: bool,
    /// The profile was created.
    pub profile_created: bool,
    /// A logo was attached.
    pub logo_attached: bool,
    /// A gallery photo was added.
    pub photo_added: bool,
}

/// Creates the sample provider, profile, logo and photo where missing.
///
/// Each step runs in its own write; profile creation and photo insertion are
/// transactional in the repository.
pub fn seed_samples(conn: &mut SqliteConnection) -> DirectoryResult<SeedReport> {
    let mut report = SeedReport::default();

    let account = match SqliteIdentity.account_by_display_name(conn, SAMPLE_PROVIDER)? {
        Some(account) => account,
        None => {
            report.account_created = true;
            SqliteIdentity.create_account(
                conn,
                &NewAccount {
                    display_name: SAMPLE_PROVIDER.to_string(),
                    email: "provider@example.com".to_string(),
                    contact: "9999999999".to_string(),
                    city: "City".to_string(),
                    role: Role::Provider,
                },
            )?
        }
    };

    let profile = match SqliteProfileRepo.profile_by_owner(conn, account.id)? {
        Some(profile) => profile,
        None => {
            report.profile_created = true;
            let draft = ProfileDraft {
                company_name: SAMPLE_COMPANY.to_string(),
                service_category: "Builders".to_string(),
                office_address: "123 Main St".to_string(),
                office_number: "9999999999".to_string(),
                gst_number: "GST123".to_string(),
                pan_number: "PAN123".to_string(),
                description: "Sample Builder profile".to_string(),
                logo_ref: None,
            };
            SqliteProfileRepo.create_profile(conn, account.id, &draft, &[])?
        }
    };
    report.profile_id = profile.id;

    if profile.logo_ref.is_none() {
        diesel::update(pr::profiles.find(profile.id))
            .set(pr::logo_ref.eq(SAMPLE_LOGO))
            .execute(conn)?;
        report.logo_attached = true;
    }

    if SqliteProfileRepo.photos(conn, profile.id)?.is_empty() {
        SqliteProfileRepo.add_photos(conn, profile.id, &[SAMPLE_PHOTO.to_string()])?;
        report.photo_added = true;
    }

    tracing::info!(?report, "sample data seeded");
    Ok(report)
}
