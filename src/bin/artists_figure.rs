use clap::Parser;
use doc_tools::config::FigureArgs;
use doc_tools::{Figure, LocalStorage, ToolError, ToolsConfig};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let args = FigureArgs::parse();

    // 初始化日誌
    args.log_format.init(args.verbose);

    tracing::info!("🚀 Starting artists-figure");

    let config = ToolsConfig::load(args.config.as_deref()).unwrap_or_else(|e| fail(&e));

    // 命令列覆蓋設定
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.figure.output));
    tracing::debug!("Figure settings: {:?}", config.figure);

    let figure = Figure::from_config(&config.figure).unwrap_or_else(|e| fail(&e));
    tracing::info!(
        "📈 {} samples, {} markers",
        figure.xs.len(),
        figure.markers.len()
    );

    figure
        .save(&LocalStorage::current_dir(), &output)
        .unwrap_or_else(|e| fail(&e));

    println!("📁 Output saved to: {}", output.display());
    Ok(())
}

fn fail(e: &ToolError) -> ! {
    tracing::error!(
        "❌ artists-figure failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code().max(1));
}
