use clap::Parser;
use omni_bulk_delete::app::reporter::render_summary;
use omni_bulk_delete::config::dotenv_warning;
use omni_bulk_delete::core::ConfigProvider;
use omni_bulk_delete::utils::{logger, validation::Validate};
use omni_bulk_delete::{
    BulkDeleteEngine, BulkDeletePipeline, CliConfig, DeleteError, LocalStorage, LogProgress,
    Preview, TomlConfig,
};
use std::io::Write;

fn exit_with(e: &DeleteError) -> ! {
    tracing::error!(
        "❌ Bulk delete failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn print_preview(preview: &Preview) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "🔍 Dry run: {} user IDs would be deleted", preview.total)?;
    for (record, target) in &preview.sample {
        match target {
            Some(url) => writeln!(out, "  DELETE {}", url)?,
            None => writeln!(out, "  {}", record.user_id)?,
        }
    }
    if preview.total > preview.sample.len() {
        writeln!(out, "  ... and {} more", preview.total - preview.sample.len())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env values act as defaults for OMNI_API_TOKEN / OMNI_ORG_DOMAIN
    let dotenv = dotenvy::dotenv();
    let mut config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    if let Some(warning) = dotenv_warning(&dotenv) {
        tracing::warn!("⚠️ {}", warning);
    }

    tracing::info!("Starting omni-bulk-delete");
    tracing::debug!("CLI config: {:?}", config);

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        let file = TomlConfig::from_file(&path).and_then(|file| {
            file.validate()?;
            Ok(file)
        });
        match file {
            Ok(file) => config.merge_file(file),
            Err(e) => exit_with(&e),
        }
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let dry_run = config.dry_run;
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = BulkDeletePipeline::new(storage, config, LogProgress);
    let engine = BulkDeleteEngine::new(pipeline);

    if dry_run {
        match engine.preview().await {
            Ok(preview) => print_preview(&preview)?,
            Err(e) => exit_with(&e),
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(report) => {
            let mut out = std::io::stdout().lock();
            render_summary(&report.summary, &mut out)?;
            if let Some(path) = &report.report_path {
                writeln!(out, "📁 Failed users report saved to: {}", path)?;
            }
            if let Some(error) = &report.report_error {
                eprintln!("⚠️ Failed users report could not be written: {}", error);
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
