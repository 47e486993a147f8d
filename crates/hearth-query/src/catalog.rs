//! Catalog provider interface and an in-memory implementation.
//!
//! The query layer only reads the catalog. Where the metadata comes from
//! is up to the implementation; [`InMemoryCatalog`] can be built from
//! vectors or loaded from a TOML file:
//!
//! ```toml
//! [[assets]]
//! id = "NT01"
//! name = "Nest Thermostat"
//! location = "Living Room"
//! type = "thermostat"
//! class = "automation"
//! category = "utilization"
//!
//! [[streams]]
//! id = "NT01.T02"
//! name = "Actual temperature"
//! assetId = "NT01"
//! uom = "F"
//! category = "utilization"
//! ```

use std::path::{Path, PathBuf};

use hearth_core::{Asset, Stream};
use hearth_state::key;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised by catalog providers. Passed through the query layer
/// unchanged.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog lookup failed: {0}")]
    LookupFailure(String),

    #[error("failed to load catalog from {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },
}

/// Read-only access to asset and stream metadata.
pub trait Catalog: Send + Sync {
    /// Asset with this id (case-insensitive), if any.
    fn asset_by_id(&self, id: &str) -> CatalogResult<Option<Asset>>;

    /// Assets at `location` (case-insensitive), in catalog order.
    fn assets_by_location(&self, location: &str) -> CatalogResult<Vec<Asset>>;

    /// Every asset, in catalog order.
    fn all_assets(&self) -> CatalogResult<Vec<Asset>>;

    /// Streams of the asset, in catalog order.
    fn streams_by_asset_id(&self, asset_id: &str) -> CatalogResult<Vec<Stream>>;
}

/// Catalog held entirely in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    #[serde(default)]
    assets: Vec<Asset>,
    #[serde(default)]
    streams: Vec<Stream>,
}

impl InMemoryCatalog {
    pub fn new(assets: Vec<Asset>, streams: Vec<Stream>) -> Self {
        let catalog = InMemoryCatalog { assets, streams };
        catalog.warn_on_ambiguous_ids();
        catalog
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let catalog: InMemoryCatalog = toml::from_str(content)?;
        catalog.warn_on_ambiguous_ids();
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> CatalogResult<Self> {
        let load_err = |reason: String| CatalogError::Load {
            path: path.to_path_buf(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let catalog = Self::from_toml_str(&content).map_err(|e| load_err(e.to_string()))?;
        debug!(
            ?path,
            assets = catalog.assets.len(),
            streams = catalog.streams.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// Record keys carry no separator after the asset id, so an id that
    /// prefixes another id can pick up the other asset's records.
    fn warn_on_ambiguous_ids(&self) {
        if let Some((shorter, longer)) =
            key::check_prefix_free(self.assets.iter().map(|a| a.id.as_str()))
        {
            warn!(%shorter, %longer, "asset id is a prefix of another; their record keys can collide");
        }
    }
}

impl Catalog for InMemoryCatalog {
    fn asset_by_id(&self, id: &str) -> CatalogResult<Option<Asset>> {
        let asset = self
            .assets
            .iter()
            .find(|a| a.id.eq_ignore_ascii_case(id))
            .cloned();
        if asset.is_none() {
            debug!(%id, "asset not found");
        }
        Ok(asset)
    }

    fn assets_by_location(&self, location: &str) -> CatalogResult<Vec<Asset>> {
        Ok(self
            .assets
            .iter()
            .filter(|a| a.is_at(location))
            .cloned()
            .collect())
    }

    fn all_assets(&self) -> CatalogResult<Vec<Asset>> {
        Ok(self.assets.clone())
    }

    fn streams_by_asset_id(&self, asset_id: &str) -> CatalogResult<Vec<Stream>> {
        Ok(self
            .streams
            .iter()
            .filter(|s| s.asset_id.eq_ignore_ascii_case(asset_id))
            .cloned()
            .collect())
    }
}
