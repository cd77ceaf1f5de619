//! Expansion of a cell covering into partition-aligned scan ranges.

use crate::range::GeohashRange;
use s2::cellid::CellID;

/// The set of curve cells covering one query region.
///
/// Each covering cell owns one contiguous interval of leaf positions, which
/// may straddle several hash-key prefixes; expanding the covering therefore
/// usually yields more ranges than cells. Cell ranges are split independently
/// and never merged here: adjacent cells can produce overlapping scans, and
/// the precise filter downstream already has to discard coarse false
/// positives, so deduplicating at this stage buys nothing.
#[derive(Debug, Clone)]
pub struct Covering {
    cells: Vec<CellID>,
}

impl Covering {
    /// Wrap the raw cell list returned by the region coverer.
    pub fn new(cells: Vec<CellID>) -> Self {
        Self { cells }
    }

    /// Number of covering cells. Useful when tuning the hash-key length:
    /// a well-chosen length keeps the range count close to the cell count.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Flatten the covering into scan ranges, each confined to a single
    /// hash key of the given length.
    pub fn ranges(&self, hash_key_length: u8) -> Vec<GeohashRange> {
        let mut ranges = Vec::with_capacity(self.cells.len());
        for cell in &self.cells {
            let leaf_span =
                GeohashRange::new(cell.range_min().0 as i64, cell.range_max().0 as i64);
            ranges.extend(leaf_span.try_split(hash_key_length));
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{bounding_rect, covering_cells};
    use crate::types::{GeoPoint, GeoQuery};

    fn covering_at_59n(radius_meters: f64) -> Covering {
        let rect = bounding_rect(&GeoQuery::Radius {
            center: GeoPoint::new(59.0, 0.0),
            radius_meters,
        });
        Covering::new(covering_cells(&rect))
    }

    #[test]
    fn ranges_never_straddle_a_hash_key() {
        let covering = covering_at_59n(1_000.0);
        for length in [2u8, 6, 7, 11] {
            for range in covering.ranges(length) {
                assert_eq!(
                    crate::curve::hash_key(range.min, length),
                    crate::curve::hash_key(range.max, length),
                );
            }
        }
    }

    #[test]
    fn range_count_is_at_least_the_cell_count() {
        let covering = covering_at_59n(10.0);
        let cells = covering.cell_count();
        assert!(cells >= 1);
        for length in 1..=13 {
            assert!(covering.ranges(length).len() >= cells);
        }
    }

    #[test]
    fn range_count_grows_monotonically_with_hash_key_length() {
        // 10m radius at 59°N, the worked tuning example: longer prefixes can
        // only cut cell ranges into more pieces, never fewer.
        let covering = covering_at_59n(10.0);
        let counts: Vec<usize> = (9..=13).map(|l| covering.ranges(l).len()).collect();
        for pair in counts.windows(2) {
            assert!(pair[0] <= pair[1], "counts not monotone: {counts:?}");
        }
        assert!(
            covering.ranges(13).len() > covering.ranges(11).len(),
            "length 13 should fragment the covering further than 11"
        );
    }
}
