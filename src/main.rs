use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use mart_enrich::app::enrich_use_case::EnrichUseCase;
use mart_enrich::app::train_use_case::TrainUseCase;
use mart_enrich::config::Config;
use mart_enrich::infra::enriched_output_adapter::FileEnrichedOutputAdapter;
use mart_enrich::infra::quarantine_output_adapter::CsvQuarantineOutputAdapter;
use mart_enrich::lexicon::LexiconStore;
use mart_enrich::logging;
use mart_enrich::pipeline::ingestion;
use mart_enrich::sources;
use mart_enrich::types::RawListing;

#[derive(Parser)]
#[command(name = "mart_enrich")]
#[command(about = "Marketplace product listing enrichment pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform raw capture JSON into clean listing rows
    Transform {
        /// Source storefront. Available: shopee, tokopedia, lazada, tiktokshop
        #[arg(long)]
        source: String,
        /// Capture file or directory of capture files
        #[arg(long)]
        input: String,
        /// Output CSV of clean listing rows
        #[arg(long)]
        output: String,
    },
    /// Run the enrichment pipeline over a raw listings CSV
    Enrich {
        /// Raw listings CSV produced by `transform` (or by the scrapers)
        #[arg(long)]
        input: String,
        /// Pipeline configuration file
        #[arg(long, default_value = "config.toml")]
        config: String,
    },
    /// Merge reviewed worksheet corrections back into the lexicons
    Train {
        /// Filled-in quarantine worksheet CSV
        #[arg(long)]
        corrections: String,
        /// Pipeline configuration file
        #[arg(long, default_value = "config.toml")]
        config: String,
    },
}

fn capture_files(input: &str) -> std::io::Result<Vec<PathBuf>> {
    let path = Path::new(input);
    if path.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        files.sort();
        Ok(files)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}

fn run_transform(source: &str, input: &str, output: &str) -> anyhow::Result<()> {
    let adapter = sources::create_adapter(source)
        .ok_or_else(|| anyhow::anyhow!("Unknown source: {}", source))?;

    let files = capture_files(input)?;
    if files.is_empty() {
        warn!(input, "No capture files found");
    }

    let mut listings: Vec<RawListing> = Vec::new();
    let mut skipped = 0;
    for file in &files {
        info!(file = %file.display(), "Transforming capture");
        let content = std::fs::read_to_string(file)?;
        let capture: serde_json::Value = serde_json::from_str(&content)?;
        let (mut rows, bad) = sources::transform_capture(adapter.as_ref(), &capture);
        listings.append(&mut rows);
        skipped += bad;
    }

    if let Some(dir) = Path::new(output).parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut writer = csv::Writer::from_path(output)?;
    for listing in &listings {
        writer.serialize(listing)?;
    }
    writer.flush()?;

    println!("\n📦 Transform results for {}:", source);
    println!("   Capture files: {}", files.len());
    println!("   Clean rows: {}", listings.len());
    println!("   Skipped items: {}", skipped);
    println!("   Output file: {}", output);

    Ok(())
}

async fn run_enrich(input: &str, config_path: &str) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;

    // Lexicon load failure is fatal before any record is touched
    let store = LexiconStore::load(&config.lexicons)?;

    let batch = ingestion::read_batch(input, &config.identity)?;
    let stats = batch.stats;

    let enriched_output = FileEnrichedOutputAdapter::new(&config.sinks.enriched)?;
    let quarantine_output = CsvQuarantineOutputAdapter::new(&config.sinks.quarantine)?;

    let use_case = EnrichUseCase::new(
        &config,
        store,
        Box::new(enriched_output),
        Box::new(quarantine_output),
    )?;

    let summary = use_case.run_batch(&batch.listings).await?;

    println!("\n📊 Enrichment results:");
    println!("   Rows read: {}", stats.rows_read);
    println!("   Malformed: {}", stats.malformed);
    println!("   Duplicates dropped: {}", stats.duplicates);
    println!("   Persisted: {}", summary.persisted);
    println!("   Quarantined: {}", summary.quarantined);
    println!("   Enriched sink: {}", config.sinks.enriched);
    println!("   Quarantine worksheet: {}", config.sinks.quarantine);

    Ok(())
}

fn run_train(corrections: &str, config_path: &str) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;

    let use_case = TrainUseCase::new(config.lexicons.clone());
    let stats = use_case.run(corrections)?;

    println!("\n🧠 Training results:");
    println!("   Brand corrections: {}", stats.brand_corrections);
    println!("   Category corrections: {}", stats.category_corrections);
    println!("   New brands: {}", stats.new_brands);
    println!("   New categories: {}", stats.new_categories);
    println!("   Lexicons: {} / {}", config.lexicons.brands, config.lexicons.categories);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Transform {
            source,
            input,
            output,
        } => {
            println!("🔄 Transforming {} captures...", source);
            run_transform(&source, &input, &output)
        }
        Commands::Enrich { input, config } => {
            println!("🔄 Running enrichment pipeline...");
            run_enrich(&input, &config).await
        }
        Commands::Train {
            corrections,
            config,
        } => {
            println!("🔄 Merging corrections...");
            run_train(&corrections, &config)
        }
    };

    if let Err(e) = &result {
        error!("Command failed: {}", e);
    }
    result.map_err(Into::into)
}
