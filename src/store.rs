//! Store collaborator contract and the in-memory implementation.
//!
//! The library never talks to a concrete table service; it is written against
//! [`GeoStore`], a thin contract over a composite-key store that supports
//! exact-key item operations plus paginated range queries on a secondary
//! index. [`MemoryStore`] implements the contract in-process and is what the
//! integration tests (and embedded callers) run against.

use crate::config::GeoTableConfig;
use crate::error::{GeoTableError, Result};
use crate::types::Item;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// One range query against the position index: partition equality plus a
/// closed BETWEEN on the curve-position attribute.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// Partition (hash) key the query is scoped to.
    pub hash_key: i64,
    /// Lower bound of the curve-position range, inclusive.
    pub position_min: i64,
    /// Upper bound of the curve-position range, inclusive.
    pub position_max: i64,
    /// Whether the read must be strongly consistent.
    pub consistent_read: bool,
    /// Continuation token from the previous page, if any. Opaque to the
    /// caller; produced by the store as [`QueryPage::last_evaluated_key`].
    pub exclusive_start_key: Option<Item>,
}

/// One page of query results.
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    pub items: Vec<Item>,
    /// Present when more pages remain; feed back as the next request's
    /// `exclusive_start_key`.
    pub last_evaluated_key: Option<Item>,
}

/// Contract over the underlying composite-key store.
///
/// Implementations map these operations onto their table service. Errors are
/// propagated unchanged through [`GeoTableError::Store`]; the library never
/// retries on the implementation's behalf, and batch size limits are the
/// caller's concern.
#[async_trait]
pub trait GeoStore: Send + Sync {
    /// Fetch one item by its full primary key.
    async fn get_item(
        &self,
        hash_key: i64,
        sort_key: &Value,
        consistent_read: bool,
    ) -> Result<Option<Item>>;

    /// Write one item, replacing any existing item with the same key.
    /// Atomic: either the whole item lands or nothing does.
    async fn put_item(&self, item: Item) -> Result<()>;

    /// Write several items. Store-specific batch limits apply; callers chunk.
    async fn batch_write_item(&self, items: Vec<Item>) -> Result<()>;

    /// Set the given attributes on an existing item. A `null` value removes
    /// the attribute.
    async fn update_item(&self, hash_key: i64, sort_key: &Value, updates: Item) -> Result<()>;

    /// Delete one item by its full primary key.
    async fn delete_item(&self, hash_key: i64, sort_key: &Value) -> Result<()>;

    /// Run one page of a position-range query on the secondary index.
    async fn query(&self, request: QueryRequest) -> Result<QueryPage>;
}

/// Canonical map key for a sort-key value.
fn sort_key_repr(value: &Value) -> String {
    value.to_string()
}

/// In-process [`GeoStore`] backed by partitioned ordered maps.
///
/// Reads are always consistent; the `consistent_read` flag is accepted and
/// ignored. A page size can be configured so tests exercise the pagination
/// loop the way a real table service would force it.
pub struct MemoryStore {
    config: GeoTableConfig,
    page_size: Option<usize>,
    partitions: RwLock<HashMap<i64, BTreeMap<String, Item>>>,
}

impl MemoryStore {
    /// Create an empty store for the given table configuration. The
    /// configuration supplies the key attribute names.
    pub fn new(config: GeoTableConfig) -> Self {
        Self {
            config,
            page_size: None,
            partitions: RwLock::new(HashMap::new()),
        }
    }

    /// Cap the number of items returned per query page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        self.page_size = Some(page_size);
        self
    }

    /// Total number of stored items, across all partitions.
    pub fn len(&self) -> usize {
        self.partitions.read().values().map(BTreeMap::len).sum()
    }

    /// Whether the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn item_key(&self, item: &Item) -> Result<(i64, String)> {
        let hash = item
            .get(&self.config.hash_key_attribute)
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                GeoTableError::store_msg(format!(
                    "item missing numeric '{}' attribute",
                    self.config.hash_key_attribute
                ))
            })?;
        let sort = item.get(&self.config.range_key_attribute).ok_or_else(|| {
            GeoTableError::store_msg(format!(
                "item missing '{}' attribute",
                self.config.range_key_attribute
            ))
        })?;
        Ok((hash, sort_key_repr(sort)))
    }

    fn position_of(&self, item: &Item) -> Option<i64> {
        item.get(&self.config.geohash_attribute).and_then(Value::as_i64)
    }
}

#[async_trait]
impl GeoStore for MemoryStore {
    async fn get_item(
        &self,
        hash_key: i64,
        sort_key: &Value,
        _consistent_read: bool,
    ) -> Result<Option<Item>> {
        let partitions = self.partitions.read();
        Ok(partitions
            .get(&hash_key)
            .and_then(|p| p.get(&sort_key_repr(sort_key)))
            .cloned())
    }

    async fn put_item(&self, item: Item) -> Result<()> {
        let (hash, sort) = self.item_key(&item)?;
        self.partitions
            .write()
            .entry(hash)
            .or_default()
            .insert(sort, item);
        Ok(())
    }

    async fn batch_write_item(&self, items: Vec<Item>) -> Result<()> {
        let mut keyed = Vec::with_capacity(items.len());
        for item in items {
            let key = self.item_key(&item)?;
            keyed.push((key, item));
        }
        let mut partitions = self.partitions.write();
        for ((hash, sort), item) in keyed {
            partitions.entry(hash).or_default().insert(sort, item);
        }
        Ok(())
    }

    async fn update_item(&self, hash_key: i64, sort_key: &Value, updates: Item) -> Result<()> {
        let mut partitions = self.partitions.write();
        let item = partitions
            .get_mut(&hash_key)
            .and_then(|p| p.get_mut(&sort_key_repr(sort_key)))
            .ok_or_else(|| GeoTableError::store_msg("update target not found"))?;
        for (name, value) in updates {
            if value.is_null() {
                item.remove(&name);
            } else {
                item.insert(name, value);
            }
        }
        Ok(())
    }

    async fn delete_item(&self, hash_key: i64, sort_key: &Value) -> Result<()> {
        let mut partitions = self.partitions.write();
        if let Some(partition) = partitions.get_mut(&hash_key) {
            partition.remove(&sort_key_repr(sort_key));
            if partition.is_empty() {
                partitions.remove(&hash_key);
            }
        }
        Ok(())
    }

    async fn query(&self, request: QueryRequest) -> Result<QueryPage> {
        let partitions = self.partitions.read();
        let Some(partition) = partitions.get(&request.hash_key) else {
            return Ok(QueryPage::default());
        };

        // Index view: items ordered by (position, sort key).
        let mut matches: Vec<(i64, &String, &Item)> = partition
            .iter()
            .filter_map(|(sort, item)| {
                let position = self.position_of(item)?;
                (position >= request.position_min && position <= request.position_max)
                    .then_some((position, sort, item))
            })
            .collect();
        matches.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let resume_after = match &request.exclusive_start_key {
            Some(token) => {
                let position = self.position_of(token).ok_or_else(|| {
                    GeoTableError::store_msg("continuation token missing position")
                })?;
                let sort = token.get(&self.config.range_key_attribute).ok_or_else(|| {
                    GeoTableError::store_msg("continuation token missing sort key")
                })?;
                Some((position, sort_key_repr(sort)))
            }
            None => None,
        };
        if let Some((position, sort)) = resume_after {
            matches.retain(|(p, s, _)| (*p, s.as_str()) > (position, sort.as_str()));
        }

        let take = self.page_size.unwrap_or(usize::MAX);
        let has_more = matches.len() > take;
        let page: Vec<Item> = matches
            .iter()
            .take(take)
            .map(|(_, _, item)| (*item).clone())
            .collect();

        let last_evaluated_key = if has_more {
            page.last().map(|item| {
                let mut key = Item::new();
                for attr in [
                    &self.config.hash_key_attribute,
                    &self.config.range_key_attribute,
                    &self.config.geohash_attribute,
                ] {
                    if let Some(v) = item.get(attr) {
                        key.insert(attr.clone(), v.clone());
                    }
                }
                key
            })
        } else {
            None
        };

        Ok(QueryPage {
            items: page,
            last_evaluated_key,
        })
    }
}
