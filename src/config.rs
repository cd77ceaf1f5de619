//! Table configuration.
//!
//! A [`GeoTableConfig`] is constructed once per managed table and treated as
//! immutable afterwards; it is shared read-only across all concurrent query
//! chains.

use serde::{Deserialize, Serialize};

/// Maximum gap (in curve positions) between two disjoint ranges for
/// [`GeohashRange::try_merge`] to coalesce them.
///
/// [`GeohashRange::try_merge`]: crate::GeohashRange::try_merge
pub const MERGE_THRESHOLD: i64 = 2;

/// Configuration for a geo-indexed table.
///
/// # Example
///
/// ```rust
/// use geotable::GeoTableConfig;
///
/// let config = GeoTableConfig::new("capitals")
///     .with_hash_key_length(5)
///     .with_consistent_read(true);
/// assert_eq!(config.hash_key_attribute, "hashKey");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoTableConfig {
    /// Name of the managed table.
    pub table_name: String,

    /// Partition key attribute, holds the decimal hash-key prefix.
    #[serde(default = "GeoTableConfig::default_hash_key_attribute")]
    pub hash_key_attribute: String,

    /// Sort key attribute, holds the caller-supplied unique value.
    #[serde(default = "GeoTableConfig::default_range_key_attribute")]
    pub range_key_attribute: String,

    /// Attribute holding the full 64-bit curve position.
    #[serde(default = "GeoTableConfig::default_geohash_attribute")]
    pub geohash_attribute: String,

    /// Attribute holding the encoded point geometry.
    #[serde(default = "GeoTableConfig::default_geojson_attribute")]
    pub geojson_attribute: String,

    /// Secondary index keyed on (hash key, curve position) used by queries.
    #[serde(default = "GeoTableConfig::default_geohash_index")]
    pub geohash_index: String,

    /// Number of decimal digits of the curve position used as partition key
    /// (1-19). Shorter prefixes mean fewer, larger partitions.
    #[serde(default = "GeoTableConfig::default_hash_key_length")]
    pub hash_key_length: u8,

    /// Whether queries request strongly consistent reads.
    #[serde(default)]
    pub consistent_read: bool,

    /// Coordinate order of the encoded geometry: `[lng, lat]` when true
    /// (GeoJSON standard), `[lat, lng]` when false. Must match the data
    /// already in the table.
    #[serde(default = "GeoTableConfig::default_longitude_first")]
    pub longitude_first: bool,

    /// Value of the `type` tag written into encoded geometry. Only relevant
    /// for writes; never inspected when reading.
    #[serde(default = "GeoTableConfig::default_point_type")]
    pub point_type: String,
}

impl GeoTableConfig {
    fn default_hash_key_attribute() -> String {
        "hashKey".to_string()
    }

    fn default_range_key_attribute() -> String {
        "rangeKey".to_string()
    }

    fn default_geohash_attribute() -> String {
        "geohash".to_string()
    }

    fn default_geojson_attribute() -> String {
        "geoJson".to_string()
    }

    fn default_geohash_index() -> String {
        "geohash-index".to_string()
    }

    const fn default_hash_key_length() -> u8 {
        2
    }

    const fn default_longitude_first() -> bool {
        true
    }

    fn default_point_type() -> String {
        "Point".to_string()
    }

    /// Create a configuration with the default attribute names and a
    /// hash-key length of 2.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            hash_key_attribute: Self::default_hash_key_attribute(),
            range_key_attribute: Self::default_range_key_attribute(),
            geohash_attribute: Self::default_geohash_attribute(),
            geojson_attribute: Self::default_geojson_attribute(),
            geohash_index: Self::default_geohash_index(),
            hash_key_length: Self::default_hash_key_length(),
            consistent_read: false,
            longitude_first: Self::default_longitude_first(),
            point_type: Self::default_point_type(),
        }
    }

    /// Set the hash-key length. Longer prefixes spread data across more
    /// partitions but multiply the ranges dispatched per query; tune with
    /// [`Covering::cell_count`].
    ///
    /// [`Covering::cell_count`]: crate::Covering::cell_count
    pub fn with_hash_key_length(mut self, length: u8) -> Self {
        assert!(
            (1..=19).contains(&length),
            "hash key length must be between 1 and 19"
        );
        self.hash_key_length = length;
        self
    }

    /// Request strongly consistent reads on every query.
    pub fn with_consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = consistent;
        self
    }

    /// Set the coordinate order written into encoded geometry.
    pub fn with_longitude_first(mut self, longitude_first: bool) -> Self {
        self.longitude_first = longitude_first;
        self
    }

    /// Set the geometry type tag written on puts (e.g. `"POINT"` for
    /// compatibility with tables written by the Java library).
    pub fn with_point_type(mut self, point_type: impl Into<String>) -> Self {
        self.point_type = point_type.into();
        self
    }

    /// Override the secondary index name.
    pub fn with_geohash_index(mut self, index: impl Into<String>) -> Self {
        self.geohash_index = index.into();
        self
    }
}
