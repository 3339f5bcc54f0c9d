//! Scan command - extract fields from a single OCR transcript.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{debug, info};

use recr_core::models::config::RecrConfig;
use recr_core::{CaptureUpload, ReceiptExtractor, ReceiptParser, ScanResult};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input transcript file ("-" for stdin)
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Store name; when set, output is the full upload payload
    #[arg(long)]
    store: Option<String>,

    /// Capture latitude for the upload payload
    #[arg(long, requires = "store", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Capture longitude for the upload payload
    #[arg(long, requires = "store", allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Print degraded-outcome warnings to stderr
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    // Load configuration
    let config = if let Some(path) = config_path {
        RecrConfig::from_file(std::path::Path::new(path))?
    } else {
        RecrConfig::default()
    };

    let text = read_transcript(&args.input)?;
    if text.trim().is_empty() {
        anyhow::bail!("transcript is empty: {}", args.input);
    }

    info!("scanning transcript: {}", args.input);

    let extractor = ReceiptExtractor::from_config(&config);
    let result = extractor.parse(&text);

    if args.show_warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Needs verification:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let output = format_result(&result, &args)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("processed in {}ms", result.processing_time_ms);

    Ok(())
}

fn read_transcript(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        let path = std::path::Path::new(input);
        if !path.exists() {
            anyhow::bail!("input file not found: {}", input);
        }
        Ok(fs::read_to_string(path)?)
    }
}

fn format_result(result: &ScanResult, args: &ScanArgs) -> anyhow::Result<String> {
    let payload = args.store.as_ref().map(|store| {
        let mut payload = CaptureUpload::new(store, &result.fields);
        if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
            payload = payload.with_location(lat, lng);
        }
        payload
    });

    match args.format {
        OutputFormat::Json => match &payload {
            Some(payload) => Ok(serde_json::to_string_pretty(payload)?),
            None => Ok(serde_json::to_string_pretty(&result.fields)?),
        },
        OutputFormat::Csv => format_csv(result, payload.as_ref()),
        OutputFormat::Text => Ok(format_text(result, payload.as_ref())),
    }
}

fn format_csv(result: &ScanResult, payload: Option<&CaptureUpload>) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    match payload {
        Some(payload) => {
            wtr.write_record(["store", "date", "total"])?;
            wtr.write_record([&payload.store, &payload.date, &payload.total])?;
        }
        None => {
            wtr.write_record(["date", "total"])?;
            wtr.write_record([&result.fields.date, &result.fields.total])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ScanResult, payload: Option<&CaptureUpload>) -> String {
    let mut output = String::new();

    if let Some(payload) = payload {
        output.push_str(&format!("Store: {}\n", payload.store));
    }
    output.push_str(&format!("Date:  {}\n", result.fields.date));
    output.push_str(&format!("Total: {}\n", result.fields.total));

    if !result.warnings.is_empty() {
        output.push_str("\nNeeds verification:\n");
        for warning in &result.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}
