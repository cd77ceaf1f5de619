//! Geospatial indexing and querying over a composite-key item store.
//!
//! `geotable` stores geographic points in any table with a (partition key,
//! sort key) schema and answers radius and rectangle queries over them. Each
//! point is mapped to a position on a space-filling curve; a decimal prefix
//! of that position becomes the partition key, and queries fan out one
//! bounded scan per curve range covering the region, then post-filter
//! precisely.
//!
//! The storage backend is pluggable through the [`GeoStore`] trait;
//! [`MemoryStore`] ships for tests and embedded use.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use geotable::{GeoPoint, GeoTableConfig, GeoTableManager, MemoryStore, PutPoint};
//! use serde_json::json;
//!
//! # async fn demo() -> geotable::Result<()> {
//! let config = GeoTableConfig::new("capitals").with_hash_key_length(6);
//! let manager = GeoTableManager::new(MemoryStore::new(config.clone()), config);
//!
//! manager
//!     .put_point(PutPoint::new(GeoPoint::new(48.8566, 2.3522), json!("paris")))
//!     .await?;
//!
//! let nearby = manager
//!     .query_radius(GeoPoint::new(48.85, 2.35), 10_000.0)
//!     .await?;
//! assert_eq!(nearby.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Choosing a hash-key length
//!
//! The hash-key length trades partition spread against query fan-out: longer
//! prefixes distribute writes across more partitions but cut each covering
//! cell into more scan ranges. The default of 2 suits small tables; pick the
//! longest length that keeps [`Covering::ranges`] close to
//! [`Covering::cell_count`] for your typical query radius. The length is
//! baked into stored items, so changing it requires rewriting the table.

pub mod config;
pub mod covering;
pub mod curve;
mod dispatch;
pub mod error;
mod filter;
pub mod manager;
pub mod range;
pub mod store;
pub mod types;

pub use config::{GeoTableConfig, MERGE_THRESHOLD};
pub use covering::Covering;
pub use curve::{EARTH_RADIUS_METERS, cell_position, earth_distance_meters, hash_key};
pub use error::{GeoTableError, Result};
pub use manager::GeoTableManager;
pub use range::GeohashRange;
pub use store::{GeoStore, MemoryStore, QueryPage, QueryRequest};
pub use types::{GeoPoint, GeoQuery, GeoRect, Item, PutPoint};
