// src/main.rs
mod companies;
mod extractors;
mod pages;
mod storage;
mod utils;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use extractors::FinancialsExtractor;
use pages::BatchContext;
use storage::StorageManager;
use utils::AppError;

/// Extracts earnings, revenue and market capitalization from saved company pages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the company_<N>.html pages
    #[arg(long, default_value = "company_html")]
    input_dir: PathBuf,

    /// Pre-filtered company list (JSON array with Ranking and CompanyName)
    #[arg(long, default_value = "filtered_companies.json")]
    companies: PathBuf,

    /// Where to write the extracted details
    #[arg(short, long, default_value = "company_details.json")]
    output: PathBuf,

    /// Maximum number of pages read at the same time
    #[arg(long, default_value_t = 32)]
    max_concurrency: usize,

    /// Also write the company list merged with the extracted details (optional)
    #[arg(long)]
    merge_output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var, diagnostics only by default)
    utils::logging::setup_logging("warn");

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::debug!("Starting processing for args: {:?}", args);

    if args.max_concurrency == 0 {
        return Err(AppError::Config("--max-concurrency must be at least 1".to_string()));
    }

    // 3. Load the reference companies
    let references = companies::load_reference_index(&args.companies).await?;

    // 4. Find the saved pages
    let pages = pages::list_pages(&args.input_dir).await?;
    tracing::info!("Processing {} pages from {}", pages.len(), args.input_dir.display());

    // 5. Read and extract every page, then join
    let context = Arc::new(BatchContext {
        references,
        extractor: FinancialsExtractor::new(),
    });
    let outcomes = pages::run_batch(pages, Arc::clone(&context), args.max_concurrency)
        .await
        .inspect_err(|e| tracing::error!("Error processing files: {}", e))?;

    // 6. Sort and save
    let records = storage::aggregate(outcomes);
    let storage = StorageManager::new(&args.output, args.merge_output.clone());

    let report_path = storage
        .save_report(&records)
        .inspect_err(|e| tracing::error!("Error writing JSON file {}: {}", args.output.display(), e))?;
    println!("Company details saved to {}", report_path.display());

    // 7. Optional merged list
    if let Some(merged_path) = storage
        .save_merged(&context.references, &records)
        .inspect_err(|e| tracing::error!("Error writing merged companies: {}", e))?
    {
        println!("Merged companies saved to {}", merged_path.display());
    }

    tracing::info!("Processing finished. Records written: {}", records.len());
    Ok(())
}
