//! Core value types: geographic points, query regions, and stored items.

use crate::config::GeoTableConfig;
use crate::error::{GeoTableError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored item: the caller's attributes plus the four attributes the
/// library injects on write (hash key, range key, curve position, encoded
/// geometry).
pub type Item = serde_json::Map<String, Value>;

/// A geographic point on the WGS84 ellipsoid.
///
/// Latitude is in decimal degrees in `[-90, 90]`, longitude in `[-180, 180]`.
/// Points are plain values; they are never persisted directly, only through
/// the encoded-geometry attribute written by [`GeoTableManager`].
///
/// [`GeoTableManager`]: crate::GeoTableManager
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in decimal degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A closed latitude/longitude rectangle.
///
/// When `min.longitude > max.longitude` the rectangle spans the antimeridian
/// and wraps through ±180°; it is never interpreted as empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRect {
    /// South-west corner.
    pub min: GeoPoint,
    /// North-east corner.
    pub max: GeoPoint,
}

impl GeoRect {
    /// Create a rectangle from its south-west and north-east corners.
    pub fn new(min: GeoPoint, max: GeoPoint) -> Self {
        Self { min, max }
    }

    /// Whether the longitude interval wraps through the antimeridian.
    pub fn wraps(&self) -> bool {
        self.min.longitude > self.max.longitude
    }

    /// Closed containment check, wrap-aware in longitude.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        let lat_ok =
            point.latitude >= self.min.latitude && point.latitude <= self.max.latitude;
        let lng_ok = if self.wraps() {
            point.longitude >= self.min.longitude || point.longitude <= self.max.longitude
        } else {
            point.longitude >= self.min.longitude && point.longitude <= self.max.longitude
        };
        lat_ok && lng_ok
    }
}

/// A query region, dispatched once at the query entry point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoQuery {
    /// All points within `radius_meters` of `center` (great-circle distance).
    Radius {
        center: GeoPoint,
        radius_meters: f64,
    },
    /// All points inside the closed rectangle spanned by `min` and `max`.
    Rectangle { min: GeoPoint, max: GeoPoint },
}

/// One point write: the location, the caller's unique sort-key value, and any
/// additional attributes to store alongside the injected ones.
#[derive(Debug, Clone)]
pub struct PutPoint {
    pub point: GeoPoint,
    pub sort_key: Value,
    pub attributes: Item,
}

impl PutPoint {
    /// Convenience constructor for a write with no extra attributes.
    pub fn new(point: GeoPoint, sort_key: Value) -> Self {
        Self {
            point,
            sort_key,
            attributes: Item::new(),
        }
    }
}

/// Wire form of the encoded-geometry attribute: a GeoJSON-style point
/// serialized to a string, with the coordinate order governed by
/// [`GeoTableConfig::longitude_first`].
#[derive(Debug, Serialize, Deserialize)]
struct EncodedGeometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: [f64; 2],
}

/// Serialize a point to the stored geometry string.
pub(crate) fn encode_geometry(point: &GeoPoint, config: &GeoTableConfig) -> String {
    let coordinates = if config.longitude_first {
        [point.longitude, point.latitude]
    } else {
        [point.latitude, point.longitude]
    };
    let encoded = EncodedGeometry {
        kind: config.point_type.clone(),
        coordinates,
    };
    // Two floats and a short tag; serialization cannot fail.
    serde_json::to_string(&encoded).expect("point geometry serializes")
}

/// Recover a point from an item's stored geometry attribute.
pub(crate) fn decode_geometry(item: &Item, config: &GeoTableConfig) -> Result<GeoPoint> {
    let raw = item
        .get(&config.geojson_attribute)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            GeoTableError::Geometry(format!(
                "item has no string attribute '{}'",
                config.geojson_attribute
            ))
        })?;

    let encoded: EncodedGeometry = serde_json::from_str(raw)
        .map_err(|e| GeoTableError::Geometry(format!("unparseable geometry '{raw}': {e}")))?;

    let [a, b] = encoded.coordinates;
    Ok(if config.longitude_first {
        GeoPoint::new(b, a)
    } else {
        GeoPoint::new(a, b)
    })
}
