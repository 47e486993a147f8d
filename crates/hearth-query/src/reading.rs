//! Typed interpretation of raw payloads.

use hearth_core::Category;
use serde::Serialize;

/// A payload read according to its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Reading {
    Number(f64),
    State(bool),
    Text(String),
}

impl Reading {
    /// Interpret `raw` as the category suggests, falling back to text when
    /// it does not parse.
    pub fn interpret(category: Category, raw: &str) -> Reading {
        let trimmed = raw.trim();
        match category {
            Category::Utilization => match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Reading::Number(n),
                _ => Reading::Text(raw.to_string()),
            },
            Category::Alarm => match trimmed {
                "1" => Reading::State(true),
                "0" => Reading::State(false),
                s if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("on") => {
                    Reading::State(true)
                }
                s if s.eq_ignore_ascii_case("false") || s.eq_ignore_ascii_case("off") => {
                    Reading::State(false)
                }
                _ => Reading::Text(raw.to_string()),
            },
            Category::Notification => Reading::Text(raw.to_string()),
        }
    }
}
