use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::{
    category::ServiceCategory,
    error::{DirectoryError, DirectoryResult},
    identity::{IdentityStore, Role, SqliteIdentity},
    models::{NewPhotoRow, PhotoRow, ProfileChanges, ProfileRow},
    profile::{Profile, ProfileDraft, ProfilePhoto, ProfileRepo},
    schema::{accounts::dsl as acc, profile_photos::dsl as ph, profiles::dsl as pr},
    tz,
};

/// Profile repository backed by the `profiles` and `profile_photos` tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteProfileRepo;

impl SqliteProfileRepo {
    /// Creates the repository.
    pub fn new() -> Self {
        Self
    }
}

// ---- helpers: draft -> row, unique index -> conflict message ----
fn changes<'a>(draft: &'a ProfileDraft, category: ServiceCategory) -> ProfileChanges<'a> {
    ProfileChanges {
        company_name: draft.company_name.trim(),
        service_category: category.as_str(),
        office_address: draft.office_address.trim(),
        office_number: draft.office_number.trim(),
        gst_number: draft.gst_number.trim(),
        pan_number: draft.pan_number.trim(),
        description: &draft.description,
        logo_ref: draft.logo_ref.as_deref(),
    }
}

fn profile_conflict(err: DieselError) -> DirectoryError {
    match &err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            if info.message().contains("owner_account_id") {
                DirectoryError::Conflict("A profile for this user".to_string())
            } else {
                DirectoryError::Conflict("Company name".to_string())
            }
        }
        _ => DirectoryError::Storage(err),
    }
}

fn insert_photos(
    conn: &mut SqliteConnection,
    profile_id: i32,
    image_refs: &[String],
) -> DirectoryResult<Vec<ProfilePhoto>> {
    let now = tz::now_rfc3339_millis();
    let mut out = Vec::with_capacity(image_refs.len());
    for image_ref in image_refs {
        let row: PhotoRow = diesel::insert_into(ph::profile_photos)
            .values(&NewPhotoRow {
                profile_id,
                image_ref,
                uploaded_at: &now,
            })
            .returning(PhotoRow::as_returning())
            .get_result(conn)?;
        out.push(row.try_into()?);
    }
    Ok(out)
}

impl ProfileRepo for SqliteProfileRepo {
    fn create_profile(
        &self,
        conn: &mut SqliteConnection,
        owner_account_id: i32,
        draft: &ProfileDraft,
        photo_refs: &[String],
    ) -> DirectoryResult<Profile> {
        let category: ServiceCategory = draft.service_category.parse()?;

        conn.immediate_transaction::<_, DirectoryError, _>(|conn| {
            let owner = SqliteIdentity.resolve_account(conn, owner_account_id)?;
            if owner.role != Role::Provider {
                return Err(DirectoryError::Role {
                    action: "creating a profile",
                    required: Role::Provider.as_str(),
                });
            }

            let row: ProfileRow = diesel::insert_into(pr::profiles)
                .values((
                    pr::owner_account_id.eq(owner_account_id),
                    changes(draft, category),
                ))
                .returning(ProfileRow::as_returning())
                .get_result(conn)
                .map_err(profile_conflict)?;

            insert_photos(conn, row.id, photo_refs)?;
            tracing::debug!(
                profile_id = row.id,
                owner_account_id,
                category = %category,
                photos = photo_refs.len(),
                "profile created"
            );
            row.try_into()
        })
    }

    fn update_profile(
        &self,
        conn: &mut SqliteConnection,
        owner_account_id: i32,
        draft: &ProfileDraft,
    ) -> DirectoryResult<Profile> {
        let category: ServiceCategory = draft.service_category.parse()?;

        let row: ProfileRow = diesel::update(pr::profiles.filter(pr::owner_account_id.eq(owner_account_id)))
            .set(&changes(draft, category))
            .returning(ProfileRow::as_returning())
            .get_result(conn)
            .optional()
            .map_err(profile_conflict)?
            .ok_or_else(|| DirectoryError::not_found("profile", format!("owner {owner_account_id}")))?;

        tracing::debug!(profile_id = row.id, "profile updated");
        row.try_into()
    }

    fn profile(&self, conn: &mut SqliteConnection, id: i32) -> DirectoryResult<Option<Profile>> {
        pr::profiles
            .find(id)
            .select(ProfileRow::as_select())
            .first(conn)
            .optional()?
            .map(Profile::try_from)
            .transpose()
    }

    fn profile_by_owner(
        &self,
        conn: &mut SqliteConnection,
        owner_account_id: i32,
    ) -> DirectoryResult<Option<Profile>> {
        pr::profiles
            .filter(pr::owner_account_id.eq(owner_account_id))
            .select(ProfileRow::as_select())
            .first(conn)
            .optional()?
            .map(Profile::try_from)
            .transpose()
    }

    fn profiles_in_category(
        &self,
        conn: &mut SqliteConnection,
        category: ServiceCategory,
    ) -> DirectoryResult<Vec<(Profile, String)>> {
        let rows: Vec<(ProfileRow, String)> = pr::profiles
            .inner_join(acc::accounts)
            .filter(pr::service_category.eq(category.as_str()))
            .order(pr::company_name.asc())
            .select((ProfileRow::as_select(), acc::city))
            .load(conn)?;

        rows.into_iter()
            .map(|(row, city)| Ok((Profile::try_from(row)?, city)))
            .collect()
    }

    fn add_photos(
        &self,
        conn: &mut SqliteConnection,
        profile_id: i32,
        image_refs: &[String],
    ) -> DirectoryResult<Vec<ProfilePhoto>> {
        conn.immediate_transaction::<_, DirectoryError, _>(|conn| {
            if self.profile(conn, profile_id)?.is_none() {
                return Err(DirectoryError::not_found("profile", profile_id));
            }
            insert_photos(conn, profile_id, image_refs)
        })
    }

    fn delete_photos(
        &self,
        conn: &mut SqliteConnection,
        profile_id: i32,
        photo_ids: &[i32],
    ) -> DirectoryResult<usize> {
        if photo_ids.is_empty() {
            return Ok(0);
        }
        let n = diesel::delete(
            ph::profile_photos.filter(ph::profile_id.eq(profile_id).and(ph::id.eq_any(photo_ids))),
        )
        .execute(conn)?;
        tracing::debug!(profile_id, deleted = n, "profile photos deleted");
        Ok(n)
    }

    fn photos(
        &self,
        conn: &mut SqliteConnection,
        profile_id: i32,
    ) -> DirectoryResult<Vec<ProfilePhoto>> {
        let rows: Vec<PhotoRow> = ph::profile_photos
            .filter(ph::profile_id.eq(profile_id))
            .order(ph::id.asc())
            .select(PhotoRow::as_select())
            .load(conn)?;
        rows.into_iter().map(ProfilePhoto::try_from).collect()
    }
}
