#![allow(dead_code)]

use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use provider_directory::db::{connection, migrate};
use provider_directory::identity::{Account, IdentityStore, NewAccount, Role, SqliteIdentity};
use provider_directory::profile::{Profile, ProfileDraft, ProfileRepo, SqliteProfileRepo};
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}
#[derive(QueryableByName)]
struct FkViolation {
    #[diesel(sql_type = Text)]
    table: String,
}

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_all(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal"); // WAL is persistent per DB file

    let fk: ForeignKeys = sql_query("PRAGMA foreign_keys;").get_result(conn).unwrap();
    assert_eq!(fk.foreign_keys, 1);

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

pub fn fk_check_empty(conn: &mut SqliteConnection) {
    let violations: Vec<FkViolation> = diesel::sql_query("PRAGMA foreign_key_check;")
        .load(conn)
        .unwrap();
    let tables: Vec<String> = violations.into_iter().map(|v| v.table).collect();
    assert!(tables.is_empty(), "foreign key violations in {tables:?}");
}

pub fn account(conn: &mut SqliteConnection, name: &str, role: Role, city: &str) -> Account {
    SqliteIdentity
        .create_account(
            conn,
            &NewAccount {
                display_name: name.to_string(),
                email: format!("{name}@example.com"),
                contact: "9999999999".to_string(),
                city: city.to_string(),
                role,
            },
        )
        .expect("create account")
}

pub fn consumer(conn: &mut SqliteConnection, name: &str) -> Account {
    account(conn, name, Role::Consumer, "Pune")
}

pub fn draft(company: &str, category: &str) -> ProfileDraft {
    ProfileDraft {
        company_name: company.to_string(),
        service_category: category.to_string(),
        office_address: "1 Market Road".to_string(),
        office_number: "0201234567".to_string(),
        gst_number: "GST000".to_string(),
        pan_number: "PAN000".to_string(),
        description: format!("{company} description"),
        logo_ref: None,
    }
}

/// Provider account plus a profile in `category`; the account is named after
/// the company.
pub fn provider_with_profile(
    conn: &mut SqliteConnection,
    company: &str,
    category: &str,
    city: &str,
) -> (Account, Profile) {
    let owner = account(
        conn,
        &format!("{}_owner", company.to_lowercase().replace(' ', "_")),
        Role::Provider,
        city,
    );
    let profile = SqliteProfileRepo
        .create_profile(conn, owner.id, &draft(company, category), &[])
        .expect("create profile");
    (owner, profile)
}
