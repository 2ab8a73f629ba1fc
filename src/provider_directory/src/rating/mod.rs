//! Rating ledger: one star rating per (profile, rater), plus live aggregates.
//!
//! Invariants, each enforced both here and by the store:
//! - one row per (profile, rater): UNIQUE index + `INSERT .. ON CONFLICT DO UPDATE`;
//! - no self-rating: ledger check + `ratings_forbid_self_rating_*` triggers;
//! - value in 1..=5: [`RatingValue`] + CHECK constraint.
//!
//! Aggregates are never stored; [`RatingAggregate`] is recomputed from the rows
//! on every read, so the next read after an upsert sees the new value.

pub mod ledger;

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use serde::{Serialize, Serializer};

use crate::{
    error::{DirectoryError, DirectoryResult, decode_ts},
    models::RatingRow,
};

pub use ledger::SqliteLedger;

/// A star value in 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RatingValue(u8);

impl RatingValue {
    /// Lowest accepted value.
    pub const MIN: i64 = 1;
    /// Highest accepted value.
    pub const MAX: i64 = 5;

    /// The star count.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = DirectoryError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(RatingValue(value as u8))
        } else {
            Err(DirectoryError::Range(value.to_string()))
        }
    }
}

impl FromStr for RatingValue {
    type Err = DirectoryError;

    /// Form values arrive as strings; anything that is not an integer is a range error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: i64 = s
            .trim()
            .parse()
            .map_err(|_| DirectoryError::Range(s.to_string()))?;
        n.try_into()
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for RatingValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

/// A stored rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rating {
    /// Rating id.
    pub id: i32,
    /// Rated profile.
    pub profile_id: i32,
    /// Consumer who rated.
    pub rater_account_id: i32,
    /// Star value.
    pub value: RatingValue,
    /// Optional comment.
    pub comment: Option<String>,
    /// First submission.
    pub created_at: DateTime<Utc>,
    /// Latest submission.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RatingRow> for Rating {
    type Error = DirectoryError;

    fn try_from(row: RatingRow) -> Result<Self, Self::Error> {
        Ok(Rating {
            value: RatingValue::try_from(i64::from(row.value))
                .map_err(|_| DirectoryError::Decode(format!("ratings.value: {}", row.value)))?,
            created_at: decode_ts("ratings.created_at", &row.created_at)?,
            updated_at: decode_ts("ratings.updated_at", &row.updated_at)?,
            id: row.id,
            profile_id: row.profile_id,
            rater_account_id: row.rater_account_id,
            comment: row.comment,
        })
    }
}

/// Derived average and count over a profile's ratings.
///
/// `average` is `None` when there are no ratings; an unrated profile is not a
/// zero-star profile.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RatingAggregate {
    /// Mean star value, absent without ratings.
    pub average: Option<f64>,
    /// Number of ratings.
    pub count: u32,
}

impl RatingAggregate {
    /// Aggregate of a profile without ratings.
    pub const EMPTY: RatingAggregate = RatingAggregate {
        average: None,
        count: 0,
    };

    /// True when the average exists and is at least `threshold`.
    pub fn meets(&self, threshold: f64) -> bool {
        self.average.is_some_and(|avg| avg >= threshold)
    }
}

impl FromIterator<i32> for RatingAggregate {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        iter.into_iter()
            .fold(RatingTally::default(), |mut t, v| {
                t.add(v);
                t
            })
            .aggregate()
    }
}

/// Running sum/count used to build [`RatingAggregate`]s while scanning rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingTally {
    sum: i64,
    count: u32,
}

impl RatingTally {
    /// Adds one star value.
    pub fn add(&mut self, value: i32) {
        self.sum += i64::from(value);
        self.count += 1;
    }

    /// Final aggregate.
    pub fn aggregate(&self) -> RatingAggregate {
        if self.count == 0 {
            return RatingAggregate::EMPTY;
        }
        RatingAggregate {
            average: Some(self.sum as f64 / f64::from(self.count)),
            count: self.count,
        }
    }
}

/// Portable surface, SQLite implementation lives in `ledger.rs`.
pub trait RatingLedger {
    /// Creates or replaces the rater's rating of a profile.
    ///
    /// Checks, in order: rater resolves and is a consumer, profile exists, rater
    /// is not the owner, value is in 1..=5. The first failing check wins.
    fn submit_rating(
        &self,
        conn: &mut SqliteConnection,
        profile_id: i32,
        rater_account_id: i32,
        value: i64,
        comment: Option<&str>,
    ) -> DirectoryResult<Rating>;

    /// Live aggregate for a profile.
    fn aggregate_for(
        &self,
        conn: &mut SqliteConnection,
        profile_id: i32,
    ) -> DirectoryResult<RatingAggregate>;

    /// The rater's existing rating of a profile, if any.
    fn rating_by_rater(
        &self,
        conn: &mut SqliteConnection,
        profile_id: i32,
        rater_account_id: i32,
    ) -> DirectoryResult<Option<Rating>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_aggregate_has_no_average() {
        let agg: RatingAggregate = std::iter::empty::<i32>().collect();
        assert_eq!(agg.count, 0);
        assert_eq!(agg.average, None);
        assert!(!agg.meets(0.0));
    }

    #[test]
    fn aggregate_is_mean_of_values() {
        let agg: RatingAggregate = [4, 5].into_iter().collect();
        assert_eq!(agg.count, 2);
        assert_eq!(agg.average, Some(4.5));
        assert!(agg.meets(4.5));
        assert!(!agg.meets(4.6));
    }

    #[test]
    fn values_outside_bounds_are_range_errors() {
        assert!(matches!(RatingValue::try_from(0i64), Err(DirectoryError::Range(_))));
        assert!(matches!(RatingValue::try_from(6i64), Err(DirectoryError::Range(_))));
        assert_eq!(RatingValue::try_from(1i64).unwrap().get(), 1);
        assert_eq!(RatingValue::try_from(5i64).unwrap().get(), 5);
        assert!(matches!("four".parse::<RatingValue>(), Err(DirectoryError::Range(_))));
        assert_eq!(" 3 ".parse::<RatingValue>().unwrap().get(), 3);
    }

    #[test]
    fn aggregate_serializes_missing_average_as_null() {
        let json = serde_json::to_value(RatingAggregate::EMPTY).unwrap();
        assert_eq!(json, serde_json::json!({ "average": null, "count": 0 }));
    }

    proptest! {
        #[test]
        fn average_stays_within_star_bounds(values in proptest::collection::vec(1i32..=5, 1..50)) {
            let agg: RatingAggregate = values.iter().copied().collect();
            let avg = agg.average.expect("non-empty");
            prop_assert!((1.0..=5.0).contains(&avg));
            prop_assert_eq!(agg.count as usize, values.len());
        }
    }
}
