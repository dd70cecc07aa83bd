use anyhow::Context;
use clap::Parser;
use quarter_program::config::{CliArgs, ProgramConfig, DEFAULT_CONFIG_FILE};
use quarter_program::core::Pipeline;
use quarter_program::domain::services::quarter_of;
use quarter_program::utils::error::ErrorSeverity;
use quarter_program::utils::{logger, validation::Validate};
use quarter_program::{LocalStorage, ProcessRunner, ProgramEngine, ProgramPipeline};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting quarter program generator");

    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    args.apply_to(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let dry_run = args.dry_run;
    let storage = LocalStorage::new(config.output.root.clone());
    let pipeline = ProgramPipeline::new(storage, config, ProcessRunner::new());
    let engine = ProgramEngine::new(pipeline);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        return perform_dry_run(&engine).await;
    }

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Program generated for {}", report.quarter);
            println!("✅ Program generated for {}", report.quarter);
            println!("📄 HTML: {}", report.html);
            if let Some(pdf) = &report.pdf {
                println!("📄 PDF: {}", pdf);
            }
            if let Some(archive) = &report.archive {
                println!("🗜️ Copies: {}", archive);
            }
            println!("📊 Workbook copy: {}", report.workbook_copy);
        }
        Err(e) => {
            tracing::error!(
                "❌ Program generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

/// An explicit `--config` must exist; the default file is optional.
fn load_config(args: &CliArgs) -> anyhow::Result<ProgramConfig> {
    match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            ProgramConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path))
        }
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            tracing::info!("📁 Loading configuration from: {}", DEFAULT_CONFIG_FILE);
            ProgramConfig::from_file(DEFAULT_CONFIG_FILE)
                .with_context(|| format!("Failed to load config file '{}'", DEFAULT_CONFIG_FILE))
        }
        None => {
            tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
            Ok(ProgramConfig::default())
        }
    }
}

fn display_config_summary(config: &ProgramConfig, args: &CliArgs) {
    println!("📋 Configuration Summary:");
    println!("  Workbook: {}", config.workbook.path);
    println!(
        "  Sheets: {} / {}",
        config.workbook.layout.types_sheet, config.workbook.layout.program_sheet
    );
    println!("  Output: {}", config.output.root);
    println!("  Document: {}", config.output.document_name);
    println!("  PDF: {}", config.pdf.enabled);
    if config.pdf.enabled {
        println!(
            "  Copies: {} ({})",
            config.copies.count,
            config.copies.archive.extension()
        );
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run<P: Pipeline>(engine: &ProgramEngine<P>) -> anyhow::Result<()> {
    let schedule = engine.preview().await.context("Failed to read the workbook")?;

    println!("🔍 Dry Run Analysis:");
    println!("  Types: {}", schedule.types.len());
    println!("  Units: {}", schedule.units.join(", "));
    println!(
        "  Entries: {} ({} dated)",
        schedule.entries.len(),
        schedule.dated_entries()
    );

    match quarter_of(&schedule) {
        Ok(quarter) => println!("  Quarter: {}", quarter),
        Err(e) => println!("  ⚠️ {}", e.user_friendly_message()),
    }

    println!();
    println!("✅ Dry run analysis complete. Run without --dry-run to write the outputs.");
    Ok(())
}
