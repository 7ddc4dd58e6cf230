use crate::utils::error::{Result, ToolError};
use crate::utils::validation::{
    validate_entity, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

pub const DEFAULT_FIGURE_OUTPUT: &str = "artists_figure.pdf";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub checker: CheckerConfig,
    pub figure: FigureConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// 有格式錯誤的檔案時以非零結束碼離開
    pub strict: bool,
    /// 額外的具名實體，名稱對應到單一字元
    pub entities: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub output: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub samples: usize,
    pub marker_size: f64,
    pub markers: Option<Vec<MarkerConfig>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            output: DEFAULT_FIGURE_OUTPUT.to_string(),
            title: "A simple plot".to_string(),
            x_label: "time (s)".to_string(),
            y_label: "voltage (mV)".to_string(),
            samples: 1000,
            marker_size: 48.0,
            markers: None,
        }
    }
}

impl ToolsConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ToolError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content)
            .map_err(|e| ToolError::config(format!("TOML parsing error: {}", e)))
    }

    /// 載入指定檔案，未指定時使用預設值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// 替換環境變數 (例如 ${HOME})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for CheckerConfig {
    fn validate(&self) -> Result<()> {
        for (name, value) in &self.entities {
            validate_entity("checker.entities", name, value)?;
        }
        Ok(())
    }
}

impl Validate for FigureConfig {
    fn validate(&self) -> Result<()> {
        validate_path("figure.output", &self.output)?;
        validate_positive_number("figure.samples", self.samples, 2)?;
        validate_range("figure.marker_size", self.marker_size, 1.0, 200.0)?;

        if let Some(markers) = &self.markers {
            for marker in markers {
                validate_non_empty_string("figure.markers.label", &marker.label)?;
                validate_range("figure.markers.x", marker.x, 0.0, 1.0)?;
                validate_range("figure.markers.y", marker.y, 0.0, 1.0)?;
            }
        }
        Ok(())
    }
}

impl Validate for ToolsConfig {
    fn validate(&self) -> Result<()> {
        self.checker.validate()?;
        self.figure.validate()
    }
}
