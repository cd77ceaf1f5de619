//! Concurrent fan-out of scan ranges to the store.

use crate::config::GeoTableConfig;
use crate::curve::hash_key;
use crate::error::Result;
use crate::range::GeohashRange;
use crate::store::{GeoStore, QueryRequest};
use crate::types::Item;
use futures::future::try_join_all;

/// Run one query chain per range, all concurrently, and flatten the results.
///
/// Each range is confined to a single hash key, so its chain pages through
/// one partition of the position index until the store stops returning a
/// continuation token. The first chain to fail fails the whole dispatch; no
/// partial result set is ever returned.
pub(crate) async fn dispatch_queries<S: GeoStore>(
    store: &S,
    config: &GeoTableConfig,
    ranges: &[GeohashRange],
) -> Result<Vec<Item>> {
    log::debug!(
        "dispatching {} range queries against {}",
        ranges.len(),
        config.table_name
    );

    let chains = ranges
        .iter()
        .map(|range| query_range(store, config, range));
    let pages = try_join_all(chains).await?;

    let items: Vec<Item> = pages.into_iter().flatten().collect();
    log::debug!("dispatch returned {} candidate items", items.len());
    Ok(items)
}

/// Page through a single range until exhausted.
async fn query_range<S: GeoStore>(
    store: &S,
    config: &GeoTableConfig,
    range: &GeohashRange,
) -> Result<Vec<Item>> {
    // Every position in the range shares one hash key; min is as good a
    // representative as any.
    let hash_key = hash_key(range.min, config.hash_key_length);

    let mut items = Vec::new();
    let mut exclusive_start_key = None;
    loop {
        let page = store
            .query(QueryRequest {
                hash_key,
                position_min: range.min,
                position_max: range.max,
                consistent_read: config.consistent_read,
                exclusive_start_key,
            })
            .await?;

        log::trace!(
            "hash key {hash_key}: page of {} items in [{}, {}]",
            page.items.len(),
            range.min,
            range.max
        );
        items.extend(page.items);

        match page.last_evaluated_key {
            Some(key) => exclusive_start_key = Some(key),
            None => break,
        }
    }
    Ok(items)
}
