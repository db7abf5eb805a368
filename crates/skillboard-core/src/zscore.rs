// Roster-wide z-scores and best-skill selection.

use crate::category::{Category, CategoryValues};
use crate::sources::RawPlayerRecord;

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a single category across the roster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the population standard deviation (N denominator): the roster is the
/// whole universe being ranked, not a sample of it.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is approximately zero.
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

/// Round to `places` decimal places, ties to even on the scaled value.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

// ---------------------------------------------------------------------------
// Roster statistics
// ---------------------------------------------------------------------------

/// Per-category pool stats over the present values of every roster row.
#[derive(Debug, Clone)]
pub struct RosterStats {
    pub categories: CategoryValues<PoolStats>,
}

impl RosterStats {
    pub fn from_records(records: &[RawPlayerRecord]) -> Self {
        let categories = CategoryValues::from_fn(|category| {
            let present: Vec<f64> = records
                .iter()
                .filter_map(|r| r.stats[category])
                .collect();
            compute_pool_stats(&present)
        });
        RosterStats { categories }
    }

    /// True when every player's z-score in `category` is pinned to zero.
    pub fn is_degenerate(&self, category: Category) -> bool {
        self.categories[category].stdev < STDEV_EPSILON
    }
}

// ---------------------------------------------------------------------------
// Standardization
// ---------------------------------------------------------------------------

/// One player's z-score per category. `None` where the raw value was absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardizedRecord {
    pub zscores: CategoryValues<Option<f64>>,
    /// Categories with no spread across the roster; their score is pinned to 0.0.
    pub degenerate: CategoryValues<bool>,
}

/// Standardize one row against the roster.
///
/// A degenerate category (zero spread, or no values at all) scores exactly
/// 0.0 for every player, including players with no value in it.
pub fn standardize(record: &RawPlayerRecord, roster: &RosterStats) -> StandardizedRecord {
    let degenerate = CategoryValues::from_fn(|category| roster.is_degenerate(category));
    let zscores = CategoryValues::from_fn(|category| {
        if degenerate[category] {
            return Some(0.0);
        }
        record.stats[category].map(|v| compute_zscore(v, &roster.categories[category]))
    });
    StandardizedRecord {
        zscores,
        degenerate,
    }
}

impl StandardizedRecord {
    pub fn all_absent(&self) -> bool {
        self.zscores.iter().all(|(_, z)| z.is_none())
    }

    /// The category with the highest present z-score, and that score.
    ///
    /// Degenerate categories are not candidates unless every present score
    /// is 0.0, in which case the first present category wins. Otherwise ties
    /// go to the category that comes first in canonical order. Returns `None`
    /// when every z-score is absent.
    pub fn best_skill(&self) -> Option<(Category, f64)> {
        let all_zero = self
            .zscores
            .iter()
            .all(|(_, z)| z.map_or(true, |z| z == 0.0));

        let mut best: Option<(Category, f64)> = None;
        for (category, z) in self.zscores.iter() {
            let Some(z) = *z else { continue };
            if self.degenerate[category] && !all_zero {
                continue;
            }
            match best {
                Some((_, top)) if z <= top => {}
                _ => best = Some((category, z)),
            }
        }
        best
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
