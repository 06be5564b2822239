use std::collections::BTreeMap;

use crate::errors::internal::RatingError;
use crate::services::average_maintainer::mean_two_decimals;
use crate::types::db::rating;

/// A score already checked to lie in 0..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RatingValue(i32);

impl RatingValue {
    pub const MIN: i32 = 0;
    pub const MAX: i32 = 10;

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as i32))
        } else {
            Err(RatingError::InvalidValue(value))
        }
    }
}

/// Result of a rating upsert
#[derive(Debug, Clone)]
pub struct RatingWriteOutcome {
    pub rating: rating::Model,
    /// True when no rating existed for the pair before this write
    pub created: bool,
    /// Movie average after the write
    ///
    /// Falls back to the last stored value when the refresh failed, and is
    /// `None` when that value could not be read either.
    pub movie_average: Option<f64>,
    pub average_refreshed: bool,
}

/// Result of a rating deletion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingDeleteOutcome {
    pub movie_id: i32,
    pub movie_average: Option<f64>,
    pub average_refreshed: bool,
}

/// Aggregate over a movie's ratings
#[derive(Debug, Clone, PartialEq)]
pub struct RatingStats {
    pub total: u64,
    pub average: f64,
    /// Count per score, every key 0..=10 present
    pub distribution: BTreeMap<i32, u64>,
}

impl RatingStats {
    pub fn from_values(values: &[i32]) -> Self {
        let mut distribution: BTreeMap<i32, u64> =
            (RatingValue::MIN..=RatingValue::MAX).map(|score| (score, 0)).collect();
        for value in values {
            *distribution.entry(*value).or_insert(0) += 1;
        }

        Self {
            total: values.len() as u64,
            average: mean_two_decimals(values),
            distribution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_value_bounds() {
        assert_eq!(RatingValue::try_from(0).map(RatingValue::get).ok(), Some(0));
        assert_eq!(RatingValue::try_from(10).map(RatingValue::get).ok(), Some(10));
        assert!(matches!(RatingValue::try_from(11), Err(RatingError::InvalidValue(11))));
        assert!(matches!(RatingValue::try_from(-1), Err(RatingError::InvalidValue(-1))));
    }

    #[test]
    fn test_stats_distribution_has_all_keys() {
        let stats = RatingStats::from_values(&[8, 6, 10]);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.average, 8.0);
        assert_eq!(stats.distribution.len(), 11);
        assert_eq!(stats.distribution[&8], 1);
        assert_eq!(stats.distribution[&6], 1);
        assert_eq!(stats.distribution[&10], 1);
        assert_eq!(stats.distribution[&0], 0);
        assert_eq!(stats.distribution.values().sum::<u64>(), 3);
    }

    #[test]
    fn test_stats_empty() {
        let stats = RatingStats::from_values(&[]);

        assert_eq!(stats.total, 0);
        assert_eq!(stats.average, 0.0);
        assert!(stats.distribution.values().all(|count| *count == 0));
    }
}
