//! redb table definitions for the operational store.
//!
//! One table per category. Keys are `{asset_id}{channel_code}{timestamp}`
//! strings, values are the raw payload text.

use hearth_core::Category;
use redb::TableDefinition;

/// Numeric readings keyed by `{asset_id}T{nn}{timestamp}`.
pub const UTILIZATION: TableDefinition<&str, &str> = TableDefinition::new("utilization");

/// Alarm states (`"0"` / `"1"`) keyed by `{asset_id}O{nn}{timestamp}`.
pub const ALARM: TableDefinition<&str, &str> = TableDefinition::new("alarm");

/// Notification text keyed by `{asset_id}N{nn}{timestamp}`.
pub const NOTIFICATION: TableDefinition<&str, &str> = TableDefinition::new("notification");

/// Table backing the namespace of `category`.
pub fn table_for(category: Category) -> TableDefinition<'static, &'static str, &'static str> {
    match category {
        Category::Utilization => UTILIZATION,
        Category::Alarm => ALARM,
        Category::Notification => NOTIFICATION,
    }
}
