//! Space-filling-curve hashing and region covering.
//!
//! This module is the only place that touches the `s2` crate. Points map to
//! leaf cells of the S2 hierarchy; the cell id, reinterpreted as a signed
//! 64-bit integer, is the curve position stored with every item. The hash key
//! is a fixed-length decimal prefix of that position and serves as the
//! partition key.

use crate::types::{GeoPoint, GeoQuery, GeoRect};
use s2::cellid::CellID;
use s2::latlng::LatLng;
use s2::rect::Rect;
use s2::region::RegionCoverer;
use s2::s1::Deg;
use s2::{r1, s1};

/// Earth radius used for great-circle distances, matching the reference S2
/// libraries so stored data remains query-compatible across ports.
pub const EARTH_RADIUS_METERS: f64 = 6_367_000.0;

fn to_latlng(point: &GeoPoint) -> LatLng {
    LatLng::new(Deg(point.latitude).into(), Deg(point.longitude).into())
}

/// Map a point to its containing leaf cell on the curve.
///
/// Deterministic for well-formed coordinates; two points inside the same leaf
/// cell (roughly centimeter scale) collide, which is acceptable at the
/// finest granularity.
pub fn cell_position(point: &GeoPoint) -> i64 {
    CellID::from(to_latlng(point)).0 as i64
}

/// Great-circle distance between two points in meters, on the same spherical
/// model the curve library uses.
pub fn earth_distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    to_latlng(a).distance(&to_latlng(b)).rad() * EARTH_RADIUS_METERS
}

/// Number of characters in the decimal rendering of `value`, counting the
/// minus sign of negative values as one character.
pub(crate) fn decimal_length(value: i64) -> u32 {
    // Positions are bounded by i64, so the rendering is at most 20 chars.
    value.to_string().len() as u32
}

/// Truncate a curve position to its first `length` significant decimal
/// digits, reapplying the sign.
///
/// For negative positions the minus sign occupies one character of the
/// decimal rendering, so one extra digit of magnitude is retained; this keeps
/// prefix truncation consistent with ordering on the signed position. If the
/// position has no more than `length` digits it is returned unchanged.
///
/// ```rust
/// use geotable::curve::hash_key;
///
/// assert_eq!(hash_key(5177531549489041509, 6), 517753);
/// assert_eq!(hash_key(-5177531549489041509, 6), -517753);
/// assert_eq!(hash_key(12345, 10), 12345);
/// ```
pub fn hash_key(position: i64, length: u8) -> i64 {
    let mut length = u32::from(length);
    if position < 0 {
        length += 1;
    }

    match decimal_length(position).checked_sub(length) {
        Some(shift) if shift > 0 => position / 10i64.pow(shift),
        _ => position,
    }
}

/// Compute the lat/lng rectangle to cover for a query region.
///
/// Rectangle queries pass through unchanged. Radius queries are converted to
/// a conservative bounding rectangle: the degrees-per-meter scale is measured
/// at ±1° from the center (toward the equator, so the latitude unit is the
/// larger one) and scaled by the radius.
pub fn bounding_rect(query: &GeoQuery) -> GeoRect {
    match *query {
        GeoQuery::Rectangle { min, max } => GeoRect::new(min, max),
        GeoQuery::Radius {
            center,
            radius_meters,
        } => {
            let lat_unit = if center.latitude > 0.0 { -1.0 } else { 1.0 };
            let lat_reference = GeoPoint::new(center.latitude + lat_unit, center.longitude);
            let lng_unit = if center.longitude > 0.0 { -1.0 } else { 1.0 };
            let lng_reference = GeoPoint::new(center.latitude, center.longitude + lng_unit);

            let lat_span = radius_meters / earth_distance_meters(&center, &lat_reference);
            let lng_span = radius_meters / earth_distance_meters(&center, &lng_reference);

            GeoRect::new(
                GeoPoint::new(center.latitude - lat_span, center.longitude - lng_span),
                GeoPoint::new(center.latitude + lat_span, center.longitude + lng_span),
            )
        }
    }
}

/// Ask the S2 region coverer for a small set of cells whose union encloses
/// the rectangle. A rectangle whose longitude interval is inverted
/// (`min > max`) covers the antimeridian side, not the empty set.
pub fn covering_cells(rect: &GeoRect) -> Vec<CellID> {
    let region = Rect {
        lat: r1::interval::Interval {
            lo: rect.min.latitude.to_radians(),
            hi: rect.max.latitude.to_radians(),
        },
        lng: s1::Interval {
            lo: rect.min.longitude.to_radians(),
            hi: rect.max.longitude.to_radians(),
        },
    };

    // Reference coverer defaults: cells of any level, at most eight per
    // region.
    let coverer = RegionCoverer {
        min_level: 0,
        max_level: 30,
        level_mod: 1,
        max_cells: 8,
    };
    coverer.covering(&region).0
}
