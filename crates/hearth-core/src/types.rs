//! Catalog types shared across Hearth crates.
//!
//! Assets and streams are owned by an external catalog and are only read
//! by the operational store.

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Identifier of an asset in the catalog (e.g. `NT01`).
pub type AssetId = String;

/// Identifier of a stream: `{asset_id}.{local_id}` (e.g. `NT01.T02`).
pub type StreamId = String;

/// A physical device in the home (thermostat, light bulb, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    #[serde(default)]
    pub location: String,
    /// Kind of device (e.g. "thermostat").
    #[serde(rename = "type", default)]
    pub asset_type: String,
    /// Classification (e.g. "automation", "light").
    #[serde(default)]
    pub class: String,
    #[serde(default, alias = "parent")]
    pub parent_id: Option<AssetId>,
    /// Category the asset's result tree is grouped under.
    pub category: Category,
}

/// A measurement stream belonging to an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub id: StreamId,
    pub name: String,
    pub asset_id: AssetId,
    #[serde(default, alias = "uom")]
    pub unit_of_measure: String,
    /// Namespace the stream's records live in. Falls back to the owning
    /// asset's category when absent.
    #[serde(default)]
    pub category: Option<Category>,
}

impl Asset {
    pub fn is_at(&self, location: &str) -> bool {
        self.location.eq_ignore_ascii_case(location.trim())
    }
}

impl Stream {
    /// The part of the stream id after the first `.` (`NT01.T02` -> `T02`).
    pub fn local_id(&self) -> Option<&str> {
        self.id.split_once('.').map(|(_, local)| local)
    }

    /// Category of the stream, inheriting from its asset when unset.
    pub fn category_or(&self, asset: &Asset) -> Category {
        self.category.unwrap_or(asset.category)
    }
}
