//! Batch processing command for multiple receipt files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use recibo_core::receipt::adapt;
use recibo_core::{Field, ReceiptAnalyzer, ReceiptExtractor, TransactionRecord};

use super::{load_config, read_markup};
use super::process::{format_record, format_transaction, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching receipt files (.html, .htm)
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Write the per-field record instead of the transaction
    #[arg(long)]
    record: bool,

    /// Include confidence and method columns in CSV and text output
    #[arg(long)]
    details: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    doc_id: usize,
    path: PathBuf,
    outcome: Result<TransactionRecord, String>,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern
    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_receipt_file(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!("{} Found {} files to process", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    // The extractor owns a blocking HTTP client when the semantic fallback
    // is configured, so it is built and dropped outside the worker runtime.
    // Each document gets its own claimed-values set inside `analyze`.
    let extractor = Arc::new(ReceiptExtractor::from_config(&config));

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let results = runtime.block_on(run_workers(files, &extractor, &args))?;
    drop(runtime);

    // Write outputs
    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Ok(record) = &result.outcome {
                write_output(output_dir, result, record, &args, &extractor)?;
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!("{} Summary written to {}", style("✓").green(), summary_path.display());
    }

    let failed: Vec<_> = results.iter().filter(|r| r.outcome.is_err()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(error_msg) = &result.outcome {
                println!("  - {}: {}", result.path.display(), error_msg);
            }
        }
    }

    Ok(())
}

/// Analyze `files` on at most `args.jobs` blocking workers.
///
/// Only clones of `extractor` move into the workers, so the last handle is
/// never released on a runtime thread.
async fn run_workers(
    files: Vec<PathBuf>,
    extractor: &Arc<ReceiptExtractor>,
    args: &BatchArgs,
) -> anyhow::Result<Vec<FileResult>> {
    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));

    let mut handles = Vec::with_capacity(files.len());
    for (i, path) in files.into_iter().enumerate() {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let extractor = Arc::clone(extractor);
        let pb = overall_pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let outcome = process_single_file(&path, &extractor).map_err(|e| e.to_string());
            pb.inc(1);

            FileResult {
                doc_id: i + 1,
                path,
                outcome,
                processing_time_ms: file_start.elapsed().as_millis() as u64,
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await?;

        if let Err(error_msg) = &result.outcome {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                overall_pb.abandon();
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), error_msg);
            }
        }

        results.push(result);
    }

    overall_pb.finish_with_message("Complete");

    Ok(results)
}

fn is_receipt_file(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "html" | "htm")
}

fn process_single_file(path: &Path, extractor: &ReceiptExtractor) -> anyhow::Result<TransactionRecord> {
    let markup = read_markup(path)?;
    Ok(extractor.analyze(&markup)?)
}

fn write_output(
    output_dir: &Path,
    result: &FileResult,
    record: &TransactionRecord,
    args: &BatchArgs,
    extractor: &ReceiptExtractor,
) -> anyhow::Result<()> {
    let output_name = result.path.file_stem().and_then(|s| s.to_str()).unwrap_or("receipt");
    let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));

    let content = if args.record {
        format_record(record, args.format, args.details)?
    } else {
        let transaction = adapt(record, extractor.config());
        format_transaction(&transaction, Some(record), args.format, args.details)?
    };

    fs::write(&output_path, content)?;
    debug!("Wrote output to {}", output_path.display());

    Ok(())
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "doc_id",
        "filename",
        "status",
        "amount",
        "date",
        "operation_id",
        "origin_name",
        "destination_name",
        "resolved_fields",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let doc_id = result.doc_id.to_string();
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let time = result.processing_time_ms.to_string();

        match &result.outcome {
            Ok(record) => {
                let value = |field: Field| record.value(field).unwrap_or("");
                let resolved = record.resolved_count().to_string();
                wtr.write_record([
                    doc_id.as_str(),
                    filename,
                    "success",
                    value(Field::Amount),
                    value(Field::Date),
                    value(Field::OperationId),
                    value(Field::OriginName),
                    value(Field::DestinationName),
                    resolved.as_str(),
                    time.as_str(),
                    "",
                ])?;
            }
            Err(error_msg) => {
                wtr.write_record([
                    doc_id.as_str(),
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    time.as_str(),
                    error_msg.as_str(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
