//! Batch processing command for multiple text files.

use std::path::{Path, PathBuf};
use std::pin::pin;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use claimx_core::{ErrorResponse, ExpenseClaimProcessor, ProcessedReservation};

use super::config::load_config;
use super::process::{apply_tax_rate, format_reservation, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of files processed concurrently
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Sales tax percentage, overriding the configuration
    #[arg(long)]
    tax_rate: Option<String>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    reservation: Option<ProcessedReservation>,
    error: Option<ErrorResponse>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(raw) = &args.tax_rate {
        apply_tax_rate(&mut config, raw)?;
    }
    let processor = ExpenseClaimProcessor::from_config(&config);

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "txt" | "text" | "eml" | "msg")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        tokio::fs::create_dir_all(output_dir).await?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Bounded concurrency, results come back in input order
    let mut pending = pin!(
        stream::iter(files)
            .map(|path| process_single_file(path, &processor))
            .buffered(args.jobs.max(1))
    );

    let mut results = Vec::new();
    while let Some(result) = pending.next().await {
        pb.inc(1);

        if let Some(response) = &result.error {
            let details = response.details.as_deref().unwrap_or(&response.message);
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), details);
            } else {
                error!("Failed to process {}: {}", result.path.display(), details);
                pb.abandon();
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), details);
            }
        }

        results.push(result);
    }

    pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.reservation.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(reservation) = &result.reservation {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("claim");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                let content = format_reservation(reservation, args.format, true)?;
                tokio::fs::write(&output_path, content).await?;
                debug!("Wrote output to {}", output_path.display());
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
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            let details = result
                .error
                .as_ref()
                .and_then(|e| e.details.as_deref())
                .unwrap_or("unknown error");
            println!("  - {}: {}", result.path.display(), details);
        }
    }

    Ok(())
}

async fn process_single_file(path: PathBuf, processor: &ExpenseClaimProcessor) -> ProcessResult {
    let file_start = Instant::now();

    let outcome = match tokio::fs::read_to_string(&path).await {
        Ok(text) => processor.process(&text),
        Err(e) => Err(e.into()),
    };

    let (reservation, error) = match outcome {
        Ok(reservation) => (Some(reservation), None),
        Err(e) => (None, Some(ErrorResponse::from(&e))),
    };

    ProcessResult {
        path,
        reservation,
        error,
        processing_time_ms: file_start.elapsed().as_millis() as u64,
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "vendor",
        "date",
        "expense_lines",
        "total_including_tax",
        "total_tax",
        "processing_time_ms",
        "status_code",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if let Some(reservation) = &result.reservation {
            wtr.write_record([
                filename,
                "success",
                reservation.vendor.as_deref().unwrap_or(""),
                &reservation.date.map(|d| d.to_string()).unwrap_or_default(),
                &reservation.expense_lines.len().to_string(),
                &reservation.total_including_tax().to_string(),
                &reservation.total_tax().to_string(),
                &result.processing_time_ms.to_string(),
                "200",
                "",
            ])?;
        } else if let Some(response) = &result.error {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                &response.status_code.to_string(),
                response.details.as_deref().unwrap_or(&response.message),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
