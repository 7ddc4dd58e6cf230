use crate::core::encoding::decode_document;
use crate::core::entities::{resolve_entities, EntityTable};
use crate::core::{CheckOutcome, CheckReport, DocumentSource, ParsedDocument};
use crate::utils::error::Result;
use roxmltree::{Document, ParsingOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct XmlChecker<S: DocumentSource> {
    source: S,
    table: EntityTable,
}

impl<S: DocumentSource> XmlChecker<S> {
    pub fn new(source: S, table: EntityTable) -> Self {
        Self { source, table }
    }

    /// 替換實體後解析；解析失敗記為 `Malformed`，不是錯誤
    pub fn check_source(&self, name: &str, text: &str) -> Result<CheckOutcome> {
        let resolved = resolve_entities(text, &self.table, name)?;
        Ok(parse_document(&resolved))
    }

    /// 依宣告的編碼解碼；無法解碼的檔案記為 `Malformed`
    pub fn check_bytes(&self, name: &str, data: &[u8]) -> Result<CheckOutcome> {
        match decode_document(data) {
            Ok(text) => self.check_source(name, &text),
            Err(message) => Ok(CheckOutcome::Malformed { message }),
        }
    }

    /// 讀檔失敗 (不存在、權限) 回傳 `Err`
    pub fn check_file(&self, path: &Path) -> Result<CheckOutcome> {
        let data = self.source.read_file(path)?;
        self.check_bytes(&path.display().to_string(), &data)
    }

    /// 依序檢查每個檔案，格式錯誤的檔案會寫一行 `<path> <error>` 到 `out` 後繼續。
    ///
    /// 未知實體或讀檔失敗會中止整個流程。
    pub fn run<W: Write + ?Sized>(&self, paths: &[PathBuf], out: &mut W) -> Result<CheckReport> {
        let mut report = CheckReport::default();

        for path in paths {
            let outcome = self.check_file(path)?;
            match &outcome {
                CheckOutcome::Parsed(doc) => {
                    tracing::debug!(
                        "✅ {}: <{}> with {} elements",
                        path.display(),
                        doc.root,
                        doc.elements
                    );
                }
                CheckOutcome::Malformed { message } => {
                    tracing::warn!("❌ {} is not well-formed", path.display());
                    writeln!(out, "{} {}", path.display(), message)?;
                }
            }
            report.push(path.clone(), outcome);
        }

        tracing::info!(
            "📋 Checked {} files, {} malformed",
            report.checked,
            report.failed
        );
        Ok(report)
    }
}

fn parse_document(text: &str) -> CheckOutcome {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;

    match Document::parse_with_options(text, options) {
        Ok(doc) => {
            let root = doc.root_element();
            CheckOutcome::Parsed(ParsedDocument {
                root: root.tag_name().name().to_string(),
                elements: doc.descendants().filter(|n| n.is_element()).count(),
            })
        }
        Err(e) => CheckOutcome::Malformed {
            message: e.to_string(),
        },
    }
}
