use serde::Serialize;
use std::path::PathBuf;

/// 成功解析後的文件摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    pub root: String,
    pub elements: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    Parsed(ParsedDocument),
    Malformed { message: String },
}

impl CheckOutcome {
    pub fn is_malformed(&self) -> bool {
        matches!(self, CheckOutcome::Malformed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub files: Vec<FileReport>,
    pub checked: usize,
    pub failed: usize,
}

impl CheckReport {
    pub fn push(&mut self, path: PathBuf, outcome: CheckOutcome) {
        self.checked += 1;
        if outcome.is_malformed() {
            self.failed += 1;
        }
        self.files.push(FileReport { path, outcome });
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// 圖上的編號圓圈，座標是整張圖的正規化座標 (0..1)，代表字形左下角
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

impl Marker {
    pub fn new(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }
}

/// 正規化座標的矩形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Rect {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}
