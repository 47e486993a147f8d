//! hearth.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::category::Category;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HearthConfig {
    #[serde(default)]
    pub store: StoreConfig,
    pub catalog: Option<CatalogConfig>,
    pub seed: Option<SeedConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the operational database.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Namespaces to create on open. Defaults to every category.
    pub namespaces: Option<Vec<Category>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TOML file with `[[assets]]` and `[[streams]]` tables.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Directory containing `<category>-data-load.txt` files.
    pub dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/operational")
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            data_dir: default_data_dir(),
            namespaces: None,
        }
    }
}

impl StoreConfig {
    pub fn namespaces(&self) -> Vec<Category> {
        match &self.namespaces {
            Some(list) if !list.is_empty() => list.clone(),
            _ => Category::ALL.to_vec(),
        }
    }
}

impl HearthConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HearthConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
