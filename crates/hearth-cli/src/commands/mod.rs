pub mod query;
pub mod store;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use hearth_core::HearthConfig;
use hearth_query::{InMemoryCatalog, Resolver};
use hearth_state::Store;
use tracing::info;

/// Resolved configuration shared by every subcommand.
pub struct Env {
    pub config: HearthConfig,
}

impl Env {
    pub fn load(config_path: &Path, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = HearthConfig::load_or_default(config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        if let Some(dir) = data_dir {
            config.store.data_dir = dir;
        }
        Ok(Env { config })
    }

    pub fn open_store(&self) -> Result<Store> {
        let dir = &self.config.store.data_dir;
        let store = Store::open(dir, &self.config.store.namespaces())
            .with_context(|| format!("opening operational store in {}", dir.display()))?;
        info!(path = %dir.display(), "operational store ready");
        Ok(store)
    }

    pub fn resolver(&self) -> Result<Resolver> {
        let catalog_path = self
            .config
            .catalog
            .as_ref()
            .map(|c| c.path.clone())
            .context("no [catalog] path configured in hearth.toml")?;
        let catalog = InMemoryCatalog::from_file(&catalog_path)?;
        Ok(Resolver::new(self.open_store()?, Arc::new(catalog)))
    }
}
