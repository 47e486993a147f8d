//! hearth-query: joins operational data with the asset catalog.
//!
//! The catalog (assets and their streams) lives outside the store and is
//! reached through the [`Catalog`] trait. [`Resolver`] walks an asset's
//! streams, derives each stream's scan prefix and namespace, runs the
//! prefix scans concurrently, and assembles an
//! `asset -> category -> stream -> values` tree.

pub mod catalog;
pub mod error;
pub mod reading;
pub mod resolve;

pub use catalog::{Catalog, CatalogError, CatalogResult, InMemoryCatalog};
pub use error::{QueryError, QueryResult};
pub use reading::Reading;
pub use resolve::{AssetResult, CategoryResult, OperationalValue, Resolver, StreamResult};
