use anyhow::Context;
use clap::Parser;
use doc_tools::config::{CheckXmlArgs, ReportFormat};
use doc_tools::core::CheckReport;
use doc_tools::utils::validation::Validate;
use doc_tools::{EntityTable, LocalStorage, ToolError, ToolsConfig, XmlChecker};
use std::io::Write;

fn main() -> anyhow::Result<()> {
    let args = CheckXmlArgs::parse();

    // 初始化日誌
    args.log_format.init(args.verbose);

    tracing::info!("🚀 Starting checkxml");
    tracing::debug!("CLI args: {:?}", args);

    let config = ToolsConfig::load(args.config.as_deref()).unwrap_or_else(|e| fail(&e));
    if let Err(e) = config.checker.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let table = EntityTable::html()
        .with_extra(&config.checker.entities)
        .unwrap_or_else(|e| fail(&e));
    tracing::debug!("Entity table holds {} names", table.len());

    let strict = args.strict || config.checker.strict;
    let checker = XmlChecker::new(LocalStorage::current_dir(), table);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    // JSON 報告本身就帶有每個檔案的訊息，stdout 只留 JSON
    let mut sink = std::io::sink();
    let diagnostics: &mut dyn Write = if args.report == Some(ReportFormat::Json) {
        &mut sink
    } else {
        &mut out
    };
    let report = checker
        .run(&args.files, diagnostics)
        .unwrap_or_else(|e| fail(&e));

    if let Some(format) = args.report {
        write_report(&mut out, &report, format).context("Failed to write report")?;
    }
    out.flush()?;

    if strict && report.has_failures() {
        tracing::warn!("Strict mode: {} malformed files", report.failed);
        std::process::exit(1);
    }

    Ok(())
}

fn write_report<W: Write>(out: &mut W, report: &CheckReport, format: ReportFormat) -> anyhow::Result<()> {
    match format {
        ReportFormat::Text => {
            writeln!(out, "{} checked, {} malformed", report.checked, report.failed)?;
        }
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// 記錄錯誤並依嚴重程度結束程式
fn fail(e: &ToolError) -> ! {
    tracing::error!(
        "❌ checkxml failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code().max(1));
}
