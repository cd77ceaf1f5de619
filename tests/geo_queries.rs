//! End-to-end tests over the in-memory store.

use async_trait::async_trait;
use geotable::{
    GeoPoint, GeoStore, GeoTableConfig, GeoTableError, GeoTableManager, Item, MemoryStore,
    PutPoint, QueryPage, QueryRequest, Result,
};
use serde_json::{Value, json};

fn manager_with(config: GeoTableConfig) -> GeoTableManager<MemoryStore> {
    let _ = env_logger::builder().is_test(true).try_init();
    GeoTableManager::new(MemoryStore::new(config.clone()), config)
}

fn manager() -> GeoTableManager<MemoryStore> {
    manager_with(GeoTableConfig::new("geo-test").with_hash_key_length(6))
}

fn named_put(point: GeoPoint, id: &str) -> PutPoint {
    let mut put = PutPoint::new(point, json!(id));
    put.attributes.insert("name".into(), json!(id));
    put
}

fn names(items: &[Item]) -> Vec<&str> {
    let mut names: Vec<&str> = items
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    names.sort_unstable();
    names
}

#[tokio::test]
async fn radius_query_returns_only_points_within_distance() {
    let manager = manager();
    let center = GeoPoint::new(51.5074, -0.1278); // central London

    manager
        .put_point(named_put(GeoPoint::new(51.5080, -0.1281), "trafalgar"))
        .await
        .unwrap();
    manager
        .put_point(named_put(GeoPoint::new(51.4826, 0.0077), "greenwich"))
        .await
        .unwrap();
    manager
        .put_point(named_put(GeoPoint::new(52.2053, 0.1218), "cambridge"))
        .await
        .unwrap();

    // 15 km takes in Greenwich but not Cambridge (~80 km away).
    let hits = manager.query_radius(center, 15_000.0).await.unwrap();
    assert_eq!(names(&hits), vec!["greenwich", "trafalgar"]);

    let hits = manager.query_radius(center, 500.0).await.unwrap();
    assert_eq!(names(&hits), vec!["trafalgar"]);

    let hits = manager
        .query_radius(GeoPoint::new(48.8566, 2.3522), 50_000.0)
        .await
        .unwrap();
    assert!(hits.is_empty(), "Paris radius should match nothing");
}

#[tokio::test]
async fn rectangle_query_spans_the_antimeridian() {
    let manager = manager();

    manager
        .put_point(named_put(GeoPoint::new(-16.0, 179.5), "east-of-line"))
        .await
        .unwrap();
    manager
        .put_point(named_put(GeoPoint::new(-13.0, -179.9), "west-of-line"))
        .await
        .unwrap();
    manager
        .put_point(named_put(GeoPoint::new(21.3, -157.8), "honolulu"))
        .await
        .unwrap();
    manager
        .put_point(named_put(GeoPoint::new(-16.0, 160.0), "coral-sea"))
        .await
        .unwrap();

    // min longitude above max longitude: the rectangle wraps through 180°.
    let hits = manager
        .query_rectangle(GeoPoint::new(-20.0, 175.0), GeoPoint::new(0.0, -175.0))
        .await
        .unwrap();
    assert_eq!(names(&hits), vec!["east-of-line", "west-of-line"]);
}

#[tokio::test]
async fn batch_write_then_rectangle_query() {
    let manager = manager();
    let puts = vec![
        named_put(GeoPoint::new(47.6062, -122.3321), "seattle"),
        named_put(GeoPoint::new(45.5152, -122.6784), "portland"),
        named_put(GeoPoint::new(37.7749, -122.4194), "san-francisco"),
    ];
    manager.batch_write_points(puts).await.unwrap();

    // Pacific Northwest box: Seattle and Portland, not San Francisco.
    let hits = manager
        .query_rectangle(GeoPoint::new(45.0, -125.0), GeoPoint::new(49.0, -120.0))
        .await
        .unwrap();
    assert_eq!(names(&hits), vec!["portland", "seattle"]);
}

#[tokio::test]
async fn query_pages_through_dense_partitions() {
    let config = GeoTableConfig::new("geo-test").with_hash_key_length(6);
    let store = MemoryStore::new(config.clone()).with_page_size(1);
    let manager = GeoTableManager::new(store, config);

    // A tight cluster: all points land in few ranges, forcing pagination.
    let base = GeoPoint::new(59.9139, 10.7522); // Oslo
    for i in 0..6 {
        let point = GeoPoint::new(base.latitude + f64::from(i) * 0.0001, base.longitude);
        manager
            .put_point(named_put(point, &format!("stop-{i}")))
            .await
            .unwrap();
    }

    let hits = manager.query_radius(base, 1_000.0).await.unwrap();
    assert_eq!(hits.len(), 6);
}

#[tokio::test]
async fn update_then_query_sees_new_attributes() {
    let manager = manager();
    let point = GeoPoint::new(35.6762, 139.6503);
    manager.put_point(named_put(point, "tokyo")).await.unwrap();

    let mut updates = Item::new();
    updates.insert("name".into(), json!("tokyo-metro"));
    updates.insert("population".into(), json!(37_000_000));
    manager
        .update_point(&point, &json!("tokyo"), updates)
        .await
        .unwrap();

    let hits = manager.query_radius(point, 1_000.0).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], json!("tokyo-metro"));
    assert_eq!(hits[0]["population"], json!(37_000_000));
}

#[tokio::test]
async fn get_and_delete_roundtrip() {
    let manager = manager();
    let point = GeoPoint::new(-33.8688, 151.2093);
    manager.put_point(named_put(point, "sydney")).await.unwrap();

    let item = manager.get_point(&point, &json!("sydney")).await.unwrap();
    assert!(item.is_some());

    manager.delete_point(&point, &json!("sydney")).await.unwrap();
    assert!(
        manager
            .get_point(&point, &json!("sydney"))
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        manager
            .query_radius(point, 1_000.0)
            .await
            .unwrap()
            .is_empty()
    );
}

struct UnavailableStore;

#[async_trait]
impl GeoStore for UnavailableStore {
    async fn get_item(
        &self,
        _hash_key: i64,
        _sort_key: &Value,
        _consistent_read: bool,
    ) -> Result<Option<Item>> {
        Err(GeoTableError::store_msg("unavailable"))
    }

    async fn put_item(&self, _item: Item) -> Result<()> {
        Err(GeoTableError::store_msg("unavailable"))
    }

    async fn batch_write_item(&self, _items: Vec<Item>) -> Result<()> {
        Err(GeoTableError::store_msg("unavailable"))
    }

    async fn update_item(&self, _hash_key: i64, _sort_key: &Value, _updates: Item) -> Result<()> {
        Err(GeoTableError::store_msg("unavailable"))
    }

    async fn delete_item(&self, _hash_key: i64, _sort_key: &Value) -> Result<()> {
        Err(GeoTableError::store_msg("unavailable"))
    }

    async fn query(&self, _request: QueryRequest) -> Result<QueryPage> {
        Err(GeoTableError::store_msg("throughput exceeded"))
    }
}

#[tokio::test]
async fn store_errors_surface_without_partial_results() {
    let config = GeoTableConfig::new("geo-test").with_hash_key_length(6);
    let manager = GeoTableManager::new(UnavailableStore, config);

    let result = manager
        .query_radius(GeoPoint::new(51.5, -0.12), 1_000.0)
        .await;
    assert!(matches!(result, Err(GeoTableError::Store(_))));
}
