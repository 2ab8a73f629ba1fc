use std::num::NonZeroUsize;

use provider_directory::DirectoryError;
use provider_directory::config::FeedCfg;
use provider_directory::feed::{FeedFilters, FeedPage, FeedQuery, query_feed, query_feed_params};
use provider_directory::identity::IdentityStore;
use provider_directory::identity::SqliteIdentity;
use provider_directory::profile::Profile;
use provider_directory::rating::{RatingLedger, SqliteLedger};
use serde::Serialize;

mod common;

use diesel::SqliteConnection;

struct Builders {
    acme: Profile,
    bolt: Profile,
    zenith: Profile,
}

/// Acme (4, 5) and Zenith (5, 4) average 4.5; Bolt is unrated. One Architects
/// profile exists to prove category scoping.
fn seed_builders(conn: &mut SqliteConnection) -> Builders {
    let (_, acme) = common::provider_with_profile(conn, "Acme", "Builders", "Pune");
    let (_, bolt) = common::provider_with_profile(conn, "Bolt", "Builders", "Mumbai");
    let (_, zenith) = common::provider_with_profile(conn, "Zenith", "Builders", "Pune");
    let (_, plans) = common::provider_with_profile(conn, "Plans Inc", "Architects", "Nashik");

    let r1 = common::consumer(conn, "r1");
    let r2 = common::consumer(conn, "r2");
    for (profile, a, b) in [(&acme, 4, 5), (&zenith, 5, 4), (&plans, 5, 5)] {
        SqliteLedger.submit_rating(conn, profile.id, r1.id, a, None).unwrap();
        SqliteLedger.submit_rating(conn, profile.id, r2.id, b, None).unwrap();
    }
    Builders { acme, bolt, zenith }
}

fn per(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn names(page: &FeedPage) -> Vec<&str> {
    page.page
        .items
        .iter()
        .map(|c| c.profile.company_name.as_str())
        .collect()
}

#[test]
fn rated_first_by_average_then_company_name() {
    let (_db, mut conn) = common::setup_db();
    let b = seed_builders(&mut conn);

    let feed = query_feed(&mut conn, "Builders", &FeedFilters::default(), 1, per(9)).unwrap();
    assert_eq!(names(&feed), ["Acme", "Zenith", "Bolt"]);
    assert_eq!(feed.page.items[0].profile.id, b.acme.id);
    assert_eq!(feed.page.items[1].profile.id, b.zenith.id);
    assert_eq!(feed.page.items[2].profile.id, b.bolt.id);
    assert_eq!(feed.page.items[0].aggregate.average, Some(4.5));
    assert_eq!(feed.page.items[2].aggregate.average, None);
    assert_eq!(feed.page.items[2].aggregate.count, 0);
    assert_eq!(feed.page.count, 3);
}

#[test]
fn min_rating_drops_unrated_profiles() {
    let (_db, mut conn) = common::setup_db();
    seed_builders(&mut conn);

    let filters = FeedFilters {
        min_average_rating: Some(4.0),
        ..FeedFilters::default()
    };
    let feed = query_feed(&mut conn, "Builders", &filters, 1, per(9)).unwrap();
    assert_eq!(names(&feed), ["Acme", "Zenith"]);

    let filters = FeedFilters {
        min_average_rating: Some(4.6),
        ..FeedFilters::default()
    };
    let feed = query_feed(&mut conn, "Builders", &filters, 1, per(9)).unwrap();
    assert!(feed.page.items.is_empty());
    assert_eq!(feed.page.num_pages, 1);
}

#[test]
fn text_query_matches_name_description_or_city() {
    let (_db, mut conn) = common::setup_db();
    seed_builders(&mut conn);

    let by = |q: &str| FeedFilters {
        text_query: Some(q.to_string()),
        ..FeedFilters::default()
    };

    let feed = query_feed(&mut conn, "Builders", &by("  ZEN "), 1, per(9)).unwrap();
    assert_eq!(names(&feed), ["Zenith"]);
    assert_eq!(feed.filters.text_query.as_deref(), Some("ZEN"));

    let feed = query_feed(&mut conn, "Builders", &by("bolt desc"), 1, per(9)).unwrap();
    assert_eq!(names(&feed), ["Bolt"]);

    let feed = query_feed(&mut conn, "Builders", &by("mumb"), 1, per(9)).unwrap();
    assert_eq!(names(&feed), ["Bolt"]);

    let feed = query_feed(&mut conn, "Builders", &by("   "), 1, per(9)).unwrap();
    assert_eq!(feed.page.count, 3);
    assert_eq!(feed.filters.text_query, None);
}

#[test]
fn city_filter_is_exact_ignoring_case() {
    let (_db, mut conn) = common::setup_db();
    seed_builders(&mut conn);

    let city = |c: &str| FeedFilters {
        city: Some(c.to_string()),
        ..FeedFilters::default()
    };
    let feed = query_feed(&mut conn, "Builders", &city("pune"), 1, per(9)).unwrap();
    assert_eq!(names(&feed), ["Acme", "Zenith"]);

    let feed = query_feed(&mut conn, "Builders", &city("Pun"), 1, per(9)).unwrap();
    assert!(feed.page.items.is_empty());
    // the city picker still lists the whole category
    assert_eq!(feed.cities, ["Pune", "Mumbai"]);
}

#[test]
fn cities_are_distinct_and_skip_blanks() {
    let (_db, mut conn) = common::setup_db();
    seed_builders(&mut conn);
    let (owner, _) = common::provider_with_profile(&mut conn, "Aardvark", "Builders", "Pune");
    SqliteIdentity.update_city(&mut conn, owner.id, "  ").unwrap();

    let feed = query_feed(&mut conn, "Builders", &FeedFilters::default(), 1, per(9)).unwrap();
    assert_eq!(feed.page.count, 4);
    assert_eq!(feed.cities, ["Pune", "Mumbai"]);
}

#[test]
fn out_of_range_pages_clamp() {
    let (_db, mut conn) = common::setup_db();
    seed_builders(&mut conn);

    let feed = query_feed(&mut conn, "Builders", &FeedFilters::default(), 5, per(9)).unwrap();
    assert_eq!(feed.page.number, 1);
    assert_eq!(feed.page.num_pages, 1);

    let feed = query_feed(&mut conn, "Builders", &FeedFilters::default(), 9, per(2)).unwrap();
    assert_eq!(feed.page.number, 2);
    assert_eq!(names(&feed), ["Bolt"]);
    assert!(feed.page.has_previous());
    assert!(!feed.page.has_next());
}

#[test]
fn category_is_resolved_by_label_or_slug() {
    let (_db, mut conn) = common::setup_db();
    seed_builders(&mut conn);

    let feed = query_feed(&mut conn, "builderfeed", &FeedFilters::default(), 1, per(9)).unwrap();
    assert_eq!(feed.page.count, 3);

    let feed = query_feed(&mut conn, "architects", &FeedFilters::default(), 1, per(9)).unwrap();
    assert_eq!(names(&feed), ["Plans Inc"]);

    let feed = query_feed(&mut conn, "Garden Solutions", &FeedFilters::default(), 1, per(9)).unwrap();
    assert!(feed.page.items.is_empty());
    assert!(feed.cities.is_empty());

    let err = query_feed(&mut conn, "Plumbers", &FeedFilters::default(), 1, per(9)).unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound { entity: "category", .. }));
}

#[test]
fn raw_query_parameters_are_lenient() {
    let (_db, mut conn) = common::setup_db();
    seed_builders(&mut conn);

    let query = FeedQuery::from_pairs([
        ("min_rating", "not-a-number"),
        ("page", "abc"),
        ("per_page", "2"),
    ]);
    let feed = query_feed_params(&mut conn, "Builders", query, &FeedCfg::default()).unwrap();
    assert_eq!(feed.page.number, 1);
    assert_eq!(feed.page.page_size, 2);
    assert_eq!(feed.filters.min_average_rating, None);
    assert_eq!(names(&feed), ["Acme", "Zenith"]);
}

#[test]
fn oversized_paging_numbers_clamp_instead_of_resetting() {
    let (_db, mut conn) = common::setup_db();
    seed_builders(&mut conn);

    let query = FeedQuery::from_pairs([("page", "100000000000000000000"), ("per_page", "2")]);
    let feed = query_feed_params(&mut conn, "Builders", query, &FeedCfg::default()).unwrap();
    assert_eq!(feed.page.number, 2);
    assert_eq!(feed.page.num_pages, 2);
    assert_eq!(names(&feed), ["Bolt"]);

    let query = FeedQuery::from_pairs([("per_page", "100000000000000000000000")]);
    let feed = query_feed_params(&mut conn, "Builders", query, &FeedCfg::default()).unwrap();
    assert_eq!(feed.page.page_size, 100);
    assert_eq!(names(&feed), ["Acme", "Zenith", "Bolt"]);

    let query = FeedQuery::from_pairs([("page", "-100000000000000000000")]);
    let feed = query_feed_params(&mut conn, "Builders", query, &FeedCfg::default()).unwrap();
    assert_eq!(feed.page.number, 1);
}

#[test]
fn new_rating_is_visible_on_next_feed_read() {
    let (_db, mut conn) = common::setup_db();
    let b = seed_builders(&mut conn);
    let late = common::consumer(&mut conn, "late");

    SqliteLedger.submit_rating(&mut conn, b.bolt.id, late.id, 5, None).unwrap();
    let feed = query_feed(&mut conn, "Builders", &FeedFilters::default(), 1, per(9)).unwrap();
    assert_eq!(names(&feed), ["Bolt", "Acme", "Zenith"]);
}

#[derive(Serialize)]
struct FeedSummary<'a> {
    number: usize,
    num_pages: usize,
    count: usize,
    companies: Vec<&'a str>,
    averages: Vec<Option<f64>>,
    cities: &'a [String],
}

#[test]
fn snapshot_builders_feed() {
    let (_db, mut conn) = common::setup_db();
    seed_builders(&mut conn);

    let feed = query_feed(&mut conn, "Builders", &FeedFilters::default(), 1, per(9)).unwrap();
    let summary = FeedSummary {
        number: feed.page.number,
        num_pages: feed.page.num_pages,
        count: feed.page.count,
        companies: names(&feed),
        averages: feed.page.items.iter().map(|c| c.aggregate.average).collect(),
        cities: &feed.cities,
    };

    insta::assert_json_snapshot!("builders_feed", summary);
}
