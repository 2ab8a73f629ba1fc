//! Category feed: filter, order and paginate the profiles of one category.
//!
//! Pipeline for [`query_feed`]:
//! 1. profiles of the category, joined with the owner's city;
//! 2. live [`RatingAggregate`] per profile (one grouped scan of `ratings`);
//! 3. text query: case-insensitive substring of company name, description or city;
//! 4. city: case-insensitive exact match;
//! 5. minimum average: unrated profiles never pass a threshold;
//! 6. order: average descending with unrated last, then company name ascending;
//! 7. paginate the filtered set, clamping the page number.
//!
//! The city choice list is computed from the category before any filter.

pub mod page;

use std::{cmp::Ordering, num::NonZeroUsize};

use diesel::SqliteConnection;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{
    category::ServiceCategory,
    config::FeedCfg,
    error::{DirectoryError, DirectoryResult},
    profile::{Profile, ProfileRepo, SqliteProfileRepo},
    rating::{RatingAggregate, SqliteLedger},
};

pub use page::{Page, paginate};

/// Filters applied to a category feed. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedFilters {
    /// Substring searched in company name, description and owner city.
    pub text_query: Option<String>,
    /// Owner city, matched exactly ignoring case.
    pub city: Option<String>,
    /// Minimum average rating.
    pub min_average_rating: Option<f64>,
}

impl FeedFilters {
    fn compile(&self) -> CompiledFilters {
        CompiledFilters {
            text: non_blank(self.text_query.as_deref()).map(str::to_lowercase),
            city: non_blank(self.city.as_deref()).map(str::to_lowercase),
            min: self.min_average_rating.filter(|m| m.is_finite()),
        }
    }
}

struct CompiledFilters {
    text: Option<String>,
    city: Option<String>,
    min: Option<f64>,
}

impl CompiledFilters {
    fn matches(&self, card: &ProfileCard) -> bool {
        if let Some(text) = &self.text {
            let hit = card.profile.company_name.to_lowercase().contains(text)
                || card.profile.description.to_lowercase().contains(text)
                || card.owner_city.to_lowercase().contains(text);
            if !hit {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if card.owner_city.to_lowercase() != *city {
                return false;
            }
        }
        match self.min {
            Some(min) => card.aggregate.meets(min),
            None => true,
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// A feed entry: the profile, its owner's city, and its live aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileCard {
    /// The listed profile.
    pub profile: Profile,
    /// City of the owning account.
    pub owner_city: String,
    /// Live rating aggregate.
    pub aggregate: RatingAggregate,
}

/// Result of [`query_feed`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPage {
    /// Category the feed was scoped to.
    pub category: ServiceCategory,
    /// Filters as applied (trimmed; unparseable thresholds dropped).
    pub filters: FeedFilters,
    /// The requested page of matching profiles.
    pub page: Page<ProfileCard>,
    /// Distinct non-empty owner cities of the whole category, for the city picker.
    pub cities: Vec<String>,
}

/// Rated profiles first by average descending, unrated last, ties by company name.
fn feed_order(a: &ProfileCard, b: &ProfileCard) -> Ordering {
    let by_average = match (a.aggregate.average, b.aggregate.average) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_average.then_with(|| a.profile.company_name.cmp(&b.profile.company_name))
}

/// Builds one page of a category feed.
///
/// `category` is a category label (matched ignoring case) or a feed slug such
/// as `builderfeed`; anything else is `NotFound`.
pub fn query_feed(
    conn: &mut SqliteConnection,
    category: &str,
    filters: &FeedFilters,
    page: usize,
    page_size: NonZeroUsize,
) -> DirectoryResult<FeedPage> {
    let category = ServiceCategory::parse_label(category)
        .or_else(|| ServiceCategory::from_feed_slug(category))
        .ok_or_else(|| DirectoryError::not_found("category", category))?;

    let candidates = SqliteProfileRepo.profiles_in_category(conn, category)?;
    let aggregates = SqliteLedger.aggregates_in_category(conn, category)?;

    let cities: IndexSet<&str> = candidates
        .iter()
        .map(|(_, city)| city.trim())
        .filter(|city| !city.is_empty())
        .collect();
    let cities: Vec<String> = cities.into_iter().map(str::to_string).collect();

    let compiled = filters.compile();
    let mut matched: Vec<ProfileCard> = candidates
        .into_iter()
        .map(|(profile, owner_city)| ProfileCard {
            aggregate: aggregates
                .get(&profile.id)
                .copied()
                .unwrap_or(RatingAggregate::EMPTY),
            profile,
            owner_city,
        })
        .filter(|card| compiled.matches(card))
        .collect();
    matched.sort_by(feed_order);

    tracing::debug!(
        category = %category,
        matched = matched.len(),
        page,
        page_size = page_size.get(),
        "feed query"
    );

    Ok(FeedPage {
        category,
        filters: FeedFilters {
            text_query: non_blank(filters.text_query.as_deref()).map(str::to_string),
            city: non_blank(filters.city.as_deref()).map(str::to_string),
            min_average_rating: compiled.min,
        },
        page: paginate(matched, page, page_size),
        cities,
    })
}

/// Raw, string-keyed feed parameters as they arrive on the query string
/// (`q`, `city`, `min_rating`, `page`, `per_page`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeedQuery {
    /// Text query.
    #[serde(default)]
    pub q: Option<String>,
    /// City filter.
    #[serde(default)]
    pub city: Option<String>,
    /// Minimum average rating, numeric string.
    #[serde(default)]
    pub min_rating: Option<String>,
    /// Page number, positive integer string.
    #[serde(default)]
    pub page: Option<String>,
    /// Page size, positive integer string.
    #[serde(default)]
    pub per_page: Option<String>,
}

/// Feed inputs after lenient parsing of a [`FeedQuery`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeedParams {
    /// Filters to apply.
    pub filters: FeedFilters,
    /// Requested page (at least 1; clamped again against the result).
    pub page: usize,
    /// Page size.
    pub per_page: NonZeroUsize,
    /// `min_rating` exactly as submitted, for re-rendering the filter form.
    pub raw_min_rating: Option<String>,
}

impl FeedQuery {
    /// Collects query-string pairs; a repeated key keeps its last value and
    /// unknown keys are ignored.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut query = FeedQuery::default();
        for (key, value) in pairs {
            let slot = match key {
                "q" => &mut query.q,
                "city" => &mut query.city,
                "min_rating" => &mut query.min_rating,
                "page" => &mut query.page,
                "per_page" => &mut query.per_page,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }
        query
    }

    /// Parses the raw values. Malformed numbers never fail: an unparseable
    /// `min_rating` is dropped, a bad `page` means page 1, and a bad or
    /// non-positive `per_page` means the configured default. Oversized numbers
    /// clamp to the last page and to `max_per_page`.
    pub fn into_params(self, cfg: &FeedCfg) -> FeedParams {
        let min_average_rating = non_blank(self.min_rating.as_deref())
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|m| m.is_finite());

        let page = non_blank(self.page.as_deref())
            .and_then(parse_saturating)
            .map_or(1, |n| n.max(1));

        let per_page = non_blank(self.per_page.as_deref())
            .and_then(parse_saturating)
            .and_then(NonZeroUsize::new)
            .unwrap_or(cfg.default_per_page)
            .min(cfg.max_per_page);

        FeedParams {
            filters: FeedFilters {
                text_query: non_blank(self.q.as_deref()).map(str::to_string),
                city: non_blank(self.city.as_deref()).map(str::to_string),
                min_average_rating,
            },
            page,
            per_page,
            raw_min_rating: self.min_rating,
        }
    }
}

/// Integer parse for paging numbers. An all-digit string too large for `usize`
/// saturates to `usize::MAX` so it clamps like any other oversized value;
/// negative integers read as 0; anything else is `None`.
fn parse_saturating(s: &str) -> Option<usize> {
    let is_digits = |d: &str| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit());
    if let Some(neg) = s.strip_prefix('-') {
        return is_digits(neg).then_some(0);
    }
    let digits = s.strip_prefix('+').unwrap_or(s);
    if !is_digits(digits) {
        return None;
    }
    Some(digits.parse().unwrap_or(usize::MAX))
}

/// [`query_feed`] driven by raw query-string parameters.
pub fn query_feed_params(
    conn: &mut SqliteConnection,
    category: &str,
    query: FeedQuery,
    cfg: &FeedCfg,
) -> DirectoryResult<FeedPage> {
    let params = query.into_params(cfg);
    query_feed(conn, category, &params.filters, params.page, params.per_page)
}
