pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::LocalStorage;
pub use config::ToolsConfig;
pub use crate::core::{checker::XmlChecker, entities::EntityTable, figure::Figure};
pub use utils::error::{Result, ToolError};
