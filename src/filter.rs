//! Precise post-filtering of candidate items.
//!
//! The covering is conservative: cell ranges overrun the query region, so the
//! dispatched scans return a superset of the true matches. This pass decodes
//! each candidate's stored geometry and keeps only the points actually inside
//! the region.

use crate::config::GeoTableConfig;
use crate::curve::{bounding_rect, earth_distance_meters};
use crate::error::Result;
use crate::types::{GeoQuery, Item, decode_geometry};

/// Drop candidates whose decoded point falls outside the query region.
///
/// Order is preserved. A candidate with a missing or unparseable geometry
/// attribute fails the whole filter rather than being skipped silently.
pub(crate) fn filter(
    items: Vec<Item>,
    query: &GeoQuery,
    config: &GeoTableConfig,
) -> Result<Vec<Item>> {
    let candidates = items.len();
    let mut kept = Vec::with_capacity(candidates);
    match *query {
        GeoQuery::Radius {
            center,
            radius_meters,
        } => {
            for item in items {
                let point = decode_geometry(&item, config)?;
                if earth_distance_meters(&center, &point) <= radius_meters {
                    kept.push(item);
                }
            }
        }
        GeoQuery::Rectangle { .. } => {
            let rect = bounding_rect(query);
            for item in items {
                let point = decode_geometry(&item, config)?;
                if rect.contains(&point) {
                    kept.push(item);
                }
            }
        }
    }
    log::debug!("filter kept {} of {candidates} candidates", kept.len());
    Ok(kept)
}
