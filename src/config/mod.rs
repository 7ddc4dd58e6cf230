#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CheckXmlArgs, FigureArgs, LogFormat, ReportFormat};
pub use toml_config::{CheckerConfig, FigureConfig, MarkerConfig, ToolsConfig};
