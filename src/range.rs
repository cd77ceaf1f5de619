//! Contiguous intervals of curve positions.
//!
//! A query covering is a sparse set of cell ranges; before dispatch each
//! range must be cut so that every piece lies under a single hash-key prefix,
//! because the store can only scan within one partition. The merge operation
//! goes the other way, coalescing nearly-adjacent ranges to cut down the
//! number of scans.

use crate::config::MERGE_THRESHOLD;
use crate::curve::{decimal_length, hash_key};

/// A closed interval `[min, max]` of curve positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeohashRange {
    pub min: i64,
    pub max: i64,
}

impl GeohashRange {
    /// Create a range. `min` must not exceed `max`; violating this is a
    /// programming error, not a recoverable condition.
    pub fn new(min: i64, max: i64) -> Self {
        assert!(min <= max, "range min {min} exceeds max {max}");
        Self { min, max }
    }

    /// Absorb `other` into this range when the two are disjoint and the gap
    /// between their close ends is at most [`MERGE_THRESHOLD`].
    ///
    /// Both orderings are tried: `other` may extend this range on the high
    /// side or on the low side. Overlapping ranges and ranges that share an
    /// endpoint (gap of zero) are not merged. Returns whether the merge
    /// happened; on failure this range is untouched.
    pub fn try_merge(&mut self, other: &GeohashRange) -> bool {
        let gap_above = other.min - self.max;
        if gap_above > 0 && gap_above <= MERGE_THRESHOLD {
            self.max = other.max;
            return true;
        }

        let gap_below = self.min - other.max;
        if gap_below > 0 && gap_below <= MERGE_THRESHOLD {
            self.min = other.min;
            return true;
        }

        false
    }

    /// Cut this range into the minimal ordered list of sub-ranges such that
    /// every sub-range maps to a single hash key of the given length.
    ///
    /// If both endpoints already share a hash key the range itself is the
    /// only element. Otherwise one sub-range is emitted per hash-key value
    /// between the endpoints' keys: the first keeps `min` as its lower bound,
    /// the last keeps `max` as its upper bound, and interior sub-ranges span
    /// the full decimal expansion of their key. For non-positive keys the
    /// expansion direction flips, since a larger magnitude means a
    /// numerically smaller position:
    ///
    /// ```text
    /// [123456789, 125678912], length 3:
    ///   [123456789, 123999999] [124000000, 124999999] [125000000, 125678912]
    ///
    /// [-125678912, -123456789], length 3:
    ///   [-125678912, -125000000] [-124999999, -124000000] [-123999999, -123456789]
    /// ```
    pub fn try_split(&self, hash_key_length: u8) -> Vec<GeohashRange> {
        let min_key = hash_key(self.min, hash_key_length);
        let max_key = hash_key(self.max, hash_key_length);

        if min_key == max_key {
            return vec![*self];
        }

        // Scale factor between a hash key and the positions it prefixes,
        // derived from how many digits truncation removed from `min`.
        let denominator = 10i64.pow(decimal_length(self.min) - decimal_length(min_key));

        let mut ranges = Vec::with_capacity((max_key - min_key + 1) as usize);
        for key in min_key..=max_key {
            let range = if key > 0 {
                GeohashRange::new(
                    if key == min_key {
                        self.min
                    } else {
                        key * denominator
                    },
                    if key == max_key {
                        self.max
                    } else {
                        (key + 1) * denominator - 1
                    },
                )
            } else {
                GeohashRange::new(
                    if key == min_key {
                        self.min
                    } else {
                        (key - 1) * denominator + 1
                    },
                    if key == max_key {
                        self.max
                    } else {
                        key * denominator
                    },
                )
            };
            ranges.push(range);
        }

        ranges
    }
}
