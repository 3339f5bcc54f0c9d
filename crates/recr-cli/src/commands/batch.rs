//! Batch processing command for multiple OCR transcripts.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use recr_core::models::config::RecrConfig;
use recr_core::{ReceiptExtractor, ReceiptParser, ScanResult};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single transcript.
struct ProcessResult {
    path: PathBuf,
    scan: Option<ScanResult>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        RecrConfig::from_file(std::path::Path::new(path))?
    } else {
        RecrConfig::default()
    };

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "txt" | "ocr")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching transcripts found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} transcripts to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let extractor = ReceiptExtractor::from_config(&config);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match process_single_file(&path, &extractor) {
            Ok(scan) => {
                results.push(ProcessResult {
                    path: path.clone(),
                    scan: Some(scan),
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path: path.clone(),
                        scan: None,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.scan.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    // Write per-file outputs
    for result in &successful {
        if let (Some(scan), Some(output_dir)) = (&result.scan, &args.output_dir) {
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("receipt");

            let output_path = output_dir.join(format!("{}.json", output_name));
            fs::write(&output_path, serde_json::to_string_pretty(&scan.fields)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    // Generate summary if requested
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

    // Print summary
    println!();
    println!(
        "{} Processed {} transcripts in {:?}",
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
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: &PathBuf,
    extractor: &ReceiptExtractor,
) -> anyhow::Result<ScanResult> {
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        anyhow::bail!("transcript is empty");
    }

    Ok(extractor.parse(&text))
}

fn write_summary(path: &PathBuf, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "date",
        "total",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(scan) = &result.scan {
            wtr.write_record([
                filename,
                "success",
                &scan.fields.date,
                &scan.fields.total,
                &scan.warnings.join("; "),
                &scan.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
