//! High-level item operations and geospatial queries over one table.

use crate::config::GeoTableConfig;
use crate::covering::Covering;
use crate::curve::{bounding_rect, cell_position, covering_cells, hash_key};
use crate::dispatch::dispatch_queries;
use crate::error::Result;
use crate::filter::filter;
use crate::store::GeoStore;
use crate::types::{GeoPoint, GeoQuery, Item, PutPoint, encode_geometry};
use serde_json::Value;

/// Geospatial layer over a single composite-key table.
///
/// Writes inject the indexing attributes derived from the point; queries fan
/// out over the position index and post-filter precisely. The manager is
/// stateless apart from its configuration and can be shared freely.
///
/// # Example
///
/// ```rust,no_run
/// use geotable::{GeoPoint, GeoTableConfig, GeoTableManager, MemoryStore, PutPoint};
/// use serde_json::json;
///
/// # async fn demo() -> geotable::Result<()> {
/// let config = GeoTableConfig::new("capitals").with_hash_key_length(6);
/// let manager = GeoTableManager::new(MemoryStore::new(config.clone()), config);
///
/// manager
///     .put_point(PutPoint::new(GeoPoint::new(51.5, -0.12), json!("london")))
///     .await?;
/// let nearby = manager
///     .query_radius(GeoPoint::new(51.5, -0.13), 5_000.0)
///     .await?;
/// assert_eq!(nearby.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct GeoTableManager<S> {
    store: S,
    config: GeoTableConfig,
}

impl<S: GeoStore> GeoTableManager<S> {
    /// Create a manager over an existing store and its table configuration.
    pub fn new(store: S, config: GeoTableConfig) -> Self {
        Self { store, config }
    }

    /// The table configuration this manager was built with.
    pub fn config(&self) -> &GeoTableConfig {
        &self.config
    }

    /// The underlying store, for operations outside the geospatial surface.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Partition key for a point, derived from its curve position.
    fn point_hash_key(&self, point: &GeoPoint) -> i64 {
        hash_key(cell_position(point), self.config.hash_key_length)
    }

    /// Build the full stored item for a write: the caller's attributes plus
    /// the injected hash key, sort key, curve position, and geometry. Caller
    /// attributes colliding with the injected names are overwritten.
    fn encode_item(&self, put: PutPoint) -> Item {
        let position = cell_position(&put.point);
        let mut item = put.attributes;
        item.insert(
            self.config.hash_key_attribute.clone(),
            Value::from(hash_key(position, self.config.hash_key_length)),
        );
        item.insert(self.config.range_key_attribute.clone(), put.sort_key);
        item.insert(self.config.geohash_attribute.clone(), Value::from(position));
        item.insert(
            self.config.geojson_attribute.clone(),
            Value::String(encode_geometry(&put.point, &self.config)),
        );
        item
    }

    /// Write one point, replacing any existing item with the same key.
    pub async fn put_point(&self, put: PutPoint) -> Result<()> {
        self.store.put_item(self.encode_item(put)).await
    }

    /// Write several points in one batch. Store-specific batch size limits
    /// apply unchanged; chunk before calling if the backend needs it.
    pub async fn batch_write_points(&self, puts: Vec<PutPoint>) -> Result<()> {
        let items = puts.into_iter().map(|p| self.encode_item(p)).collect();
        self.store.batch_write_item(items).await
    }

    /// Fetch one point's item by its location and sort key.
    pub async fn get_point(&self, point: &GeoPoint, sort_key: &Value) -> Result<Option<Item>> {
        self.store
            .get_item(
                self.point_hash_key(point),
                sort_key,
                self.config.consistent_read,
            )
            .await
    }

    /// Update a point's non-indexing attributes.
    ///
    /// The injected attributes (hash key, sort key, curve position, geometry)
    /// are silently dropped from `updates`: moving a point means deleting and
    /// re-putting it, never editing the index in place.
    pub async fn update_point(
        &self,
        point: &GeoPoint,
        sort_key: &Value,
        mut updates: Item,
    ) -> Result<()> {
        for attr in [
            &self.config.hash_key_attribute,
            &self.config.range_key_attribute,
            &self.config.geohash_attribute,
            &self.config.geojson_attribute,
        ] {
            updates.remove(attr);
        }
        self.store
            .update_item(self.point_hash_key(point), sort_key, updates)
            .await
    }

    /// Delete one point's item by its location and sort key.
    pub async fn delete_point(&self, point: &GeoPoint, sort_key: &Value) -> Result<()> {
        self.store
            .delete_item(self.point_hash_key(point), sort_key)
            .await
    }

    /// Run a geospatial query: cover the region, fan out one scan per range,
    /// then keep only the items whose point is truly inside the region.
    pub async fn query(&self, query: &GeoQuery) -> Result<Vec<Item>> {
        let rect = bounding_rect(query);
        let covering = Covering::new(covering_cells(&rect));
        log::debug!(
            "query region covered by {} cells (hash key length {})",
            covering.cell_count(),
            self.config.hash_key_length
        );

        let ranges = covering.ranges(self.config.hash_key_length);
        let candidates = dispatch_queries(&self.store, &self.config, &ranges).await?;
        filter(candidates, query, &self.config)
    }

    /// All points within `radius_meters` of `center`.
    pub async fn query_radius(&self, center: GeoPoint, radius_meters: f64) -> Result<Vec<Item>> {
        self.query(&GeoQuery::Radius {
            center,
            radius_meters,
        })
        .await
    }

    /// All points inside the closed rectangle spanned by `min` and `max`.
    /// Pass `min.longitude > max.longitude` to span the antimeridian.
    pub async fn query_rectangle(&self, min: GeoPoint, max: GeoPoint) -> Result<Vec<Item>> {
        self.query(&GeoQuery::Rectangle { min, max }).await
    }
}
