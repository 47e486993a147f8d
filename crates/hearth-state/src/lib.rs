//! hearth-state: operational time-series store for Hearth.
//!
//! Backed by [redb](https://docs.rs/redb). Telemetry is partitioned into one
//! table per [`Category`](hearth_core::Category) (`utilization`, `alarm`,
//! `notification`), each an independent ordered key space.
//!
//! # Key layout
//!
//! Keys are `{asset_id}{channel_code}{timestamp}` with no separators, for
//! example `NT01T0220250725T103258Z`. The channel code and timestamp are
//! fixed width and the timestamp sorts chronologically, so a prefix scan
//! over `{asset_id}{channel_code}` yields one channel's readings in time
//! order straight from the table's key order.
//!
//! The [`Store`] is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and can be shared across threads and async tasks.

pub mod error;
pub mod key;
pub mod scan;
pub mod seed;
pub mod store;
pub mod tables;

pub use error::{StateError, StateResult};
pub use key::{ChannelCode, ChannelKind, RecordKey, Timestamp};
pub use scan::{Entry, PrefixScan, Record, ScanIter};
pub use seed::SeedReport;
pub use store::Store;
