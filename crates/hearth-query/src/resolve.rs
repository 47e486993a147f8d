//! Catalog join: asset -> category -> stream -> values.
//!
//! For each stream of an asset the resolver builds the scan prefix
//! `{asset_id}{local_id}` from the stream id (`NT01.T02` -> `NT01T02`),
//! picks the namespace from the stream's category, and scans it. A stream
//! that cannot be scanned (no local id, malformed channel code, namespace
//! not opened) comes back with no values instead of failing the asset.
//! Only storage failures abort a resolve.

use std::sync::Arc;

use hearth_core::{Asset, Category, Stream};
use hearth_state::key::{self, Timestamp};
use hearth_state::scan::Record;
use hearth_state::{StateError, StateResult, Store};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{QueryError, QueryResult};
use crate::reading::Reading;

// ── Result tree ────────────────────────────────────────────────────

/// One stored value, labelled with its key timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalValue {
    /// Compact timestamp label (`20250725T103258Z`).
    pub timestamp: String,
    /// Raw payload as stored.
    pub value: String,
    pub reading: Reading,
}

impl OperationalValue {
    fn from_record(category: Category, record: Record) -> Self {
        OperationalValue {
            timestamp: record.timestamp.label(),
            reading: Reading::interpret(category, &record.value),
            value: record.value,
        }
    }
}

/// A stream's metadata with its values in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamResult {
    pub stream: Stream,
    /// Namespace the values were read from.
    pub category: Category,
    pub values: Vec<OperationalValue>,
}

/// Streams grouped under the asset's category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResult {
    pub name: Category,
    pub streams: Vec<StreamResult>,
}

impl CategoryResult {
    /// Only the streams whose values come from `category`.
    pub fn filtered(&self, category: Category) -> CategoryResult {
        CategoryResult {
            name: category,
            streams: self
                .streams
                .iter()
                .filter(|s| s.category == category)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResult {
    pub asset: Asset,
    pub category: CategoryResult,
}

// ── Resolver ───────────────────────────────────────────────────────

/// Answers operational data queries against a store and a catalog.
#[derive(Clone)]
pub struct Resolver {
    store: Store,
    catalog: Arc<dyn Catalog>,
}

impl Resolver {
    pub fn new(store: Store, catalog: Arc<dyn Catalog>) -> Self {
        Self { store, catalog }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// All values of one channel, oldest first.
    pub fn get_operational_data(
        &self,
        asset_id: &str,
        channel: &str,
        category: Category,
    ) -> QueryResult<Vec<OperationalValue>> {
        self.get_operational_data_between(asset_id, channel, category, None, None)
    }

    /// Values of one channel with timestamps in `[from, to)`, oldest first.
    pub fn get_operational_data_between(
        &self,
        asset_id: &str,
        channel: &str,
        category: Category,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> QueryResult<Vec<OperationalValue>> {
        let prefix = key::prefix(asset_id, channel)?;
        let records = self
            .store
            .scan_range(category, &prefix, from, to)?
            .into_records()?;
        debug!(%prefix, %category, count = records.len(), "operational data read");
        Ok(records
            .into_iter()
            .map(|r| OperationalValue::from_record(category, r))
            .collect())
    }

    /// Resolve one asset with all of its stream values.
    ///
    /// The asset is picked by id when given, else the first asset at
    /// `location`, else the first asset in the catalog. Returns `None` when
    /// nothing matches, or when the asset found by id is not at `location`.
    pub async fn resolve(
        &self,
        asset_id: Option<&str>,
        location: Option<&str>,
    ) -> QueryResult<Option<AssetResult>> {
        let asset_id = asset_id.filter(|s| !s.trim().is_empty());
        let location = location.filter(|s| !s.trim().is_empty());

        let Some(asset) = self.target_asset(asset_id, location)? else {
            debug!(?asset_id, ?location, "no asset resolved");
            return Ok(None);
        };
        self.resolve_asset(asset).await.map(Some)
    }

    /// Resolve every asset, or every asset at `location`.
    pub async fn resolve_all(&self, location: Option<&str>) -> QueryResult<Vec<AssetResult>> {
        let assets = match location.filter(|s| !s.trim().is_empty()) {
            Some(location) => self.catalog.assets_by_location(location)?,
            None => self.catalog.all_assets()?,
        };
        let mut results = Vec::with_capacity(assets.len());
        for asset in assets {
            results.push(self.resolve_asset(asset).await?);
        }
        Ok(results)
    }

    fn target_asset(
        &self,
        asset_id: Option<&str>,
        location: Option<&str>,
    ) -> QueryResult<Option<Asset>> {
        let asset = match (asset_id, location) {
            (Some(id), location) => {
                let Some(asset) = self.catalog.asset_by_id(id)? else {
                    return Ok(None);
                };
                if let Some(location) = location {
                    if !asset.is_at(location) {
                        debug!(%id, %location, actual = %asset.location, "asset is elsewhere");
                        return Ok(None);
                    }
                }
                Some(asset)
            }
            (None, Some(location)) => self.catalog.assets_by_location(location)?.into_iter().next(),
            (None, None) => self.catalog.all_assets()?.into_iter().next(),
        };
        Ok(asset)
    }

    async fn resolve_asset(&self, asset: Asset) -> QueryResult<AssetResult> {
        let streams = self.catalog.streams_by_asset_id(&asset.id)?;

        // One blocking scan per stream; streams share nothing but the store.
        let mut tasks = Vec::with_capacity(streams.len());
        for stream in &streams {
            let store = self.store.clone();
            let category = stream.category_or(&asset);
            let prefix = stream
                .local_id()
                .map(|local| key::prefix(&asset.id, local));
            let stream_id = stream.id.clone();
            tasks.push(tokio::task::spawn_blocking(move || {
                scan_stream(&store, &stream_id, category, prefix)
            }));
        }

        let mut results = Vec::with_capacity(streams.len());
        for (stream, task) in streams.into_iter().zip(tasks) {
            let category = stream.category_or(&asset);
            let values = task.await.map_err(|e| QueryError::Task(e.to_string()))??;
            results.push(StreamResult {
                stream,
                category,
                values,
            });
        }

        info!(
            asset = %asset.id,
            streams = results.len(),
            values = results.iter().map(|s| s.values.len()).sum::<usize>(),
            "asset resolved"
        );
        Ok(AssetResult {
            category: CategoryResult {
                name: asset.category,
                streams: results,
            },
            asset,
        })
    }
}

/// Scan one stream. Stream-local failures yield no values; storage
/// failures propagate.
fn scan_stream(
    store: &Store,
    stream_id: &str,
    category: Category,
    prefix: Option<StateResult<String>>,
) -> Result<Vec<OperationalValue>, StateError> {
    let Some(prefix) = prefix else {
        debug!(%stream_id, "stream id has no local part; no data");
        return Ok(Vec::new());
    };
    let scanned = prefix.and_then(|prefix| store.scan_by_prefix_ordered(category, &prefix));
    match scanned {
        Ok(records) => Ok(records
            .into_iter()
            .map(|r| OperationalValue::from_record(category, r))
            .collect()),
        Err(e) if e.is_unavailable() => Err(e),
        Err(e) => {
            warn!(%stream_id, %category, error = %e, "stream skipped");
            Ok(Vec::new())
        }
    }
}
