pub mod category;
pub mod config;
pub mod types;

pub use category::{Category, ParseCategoryError};
pub use config::HearthConfig;
pub use types::*;
