//! Operational data categories.
//!
//! Every category owns one namespace in the operational store. The set is
//! closed: adding a category means adding a variant here and a table in
//! `hearth-state`, and the exhaustive matches below point at every place
//! that needs to change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of operational data (and the namespace it is stored in).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Numeric sensor readings (temperature, power, usage).
    Utilization,
    /// Boolean alarm states stored as `"0"` / `"1"`.
    Alarm,
    /// Free-text notifications.
    Notification,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operational category: {0:?}")]
pub struct ParseCategoryError(pub String);

impl Category {
    pub const ALL: [Category; 3] = [Category::Utilization, Category::Alarm, Category::Notification];

    /// Namespace name as persisted on disk.
    pub fn name(self) -> &'static str {
        match self {
            Category::Utilization => "utilization",
            Category::Alarm => "alarm",
            Category::Notification => "notification",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::Utilization => {
                "Sensor readings, measurements, temperature data, and usage information"
            }
            Category::Alarm => "Critical alerts, warnings, and emergency notifications",
            Category::Notification => "Messages, informational alerts, and general notifications",
        }
    }

    /// Alternative words users reach for when they mean this category.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Category::Utilization => &[
                "sensor",
                "reading",
                "temperature",
                "measurement",
                "usage",
                "data",
                "sensors readings",
                "actual temperature",
            ],
            Category::Alarm => &["alert", "warning", "critical", "emergency"],
            Category::Notification => &["message", "info", "notice", "alert"],
        }
    }

    /// Channel letter used by streams of this category (`T`, `O`, `N`).
    pub fn channel_letter(self) -> char {
        match self {
            Category::Utilization => 'T',
            Category::Alarm => 'O',
            Category::Notification => 'N',
        }
    }

    /// Look a category up by name first, then by synonym.
    ///
    /// Names win over synonyms. An ambiguous synonym ("alert") resolves to
    /// notification, matching the order the categories are listed to users.
    pub fn find(input: &str) -> Option<Category> {
        let needle = input.trim();
        if needle.is_empty() {
            return None;
        }
        if let Ok(category) = needle.parse() {
            return Some(category);
        }
        [Category::Notification, Category::Alarm, Category::Utilization]
            .into_iter()
            .find(|c| c.synonyms().iter().any(|s| s.eq_ignore_ascii_case(needle)))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}
