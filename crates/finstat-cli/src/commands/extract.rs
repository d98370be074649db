//! Extract command - process a single statement text file.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use finstat_core::{
    ConfidenceLevel, Currency, FinstatConfig, LineItem, StatementExtraction, StatementPipeline,
    Unit,
};

use super::report;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (plain text extracted from the source document)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write the three-table CSV report into this directory
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Override the per-document timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Check structural invariants and print any violations
    #[arg(long)]
    validate: bool,

    /// Show overall extraction confidence
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV line-item grid
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if extension != "txt" {
        anyhow::bail!(
            "Unsupported file format: {extension}. Provide plain text extracted from the source document."
        );
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message("Reading document...");
    pb.set_position(10);

    let text = read_text(&args.input)?;
    let document_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.display().to_string());

    pb.set_message("Extracting financial data...");
    pb.set_position(40);

    let timeout_secs = args.timeout.unwrap_or(config.extraction.timeout_secs);
    let pipeline = Arc::new(StatementPipeline::with_config(&config));
    let result = extract_with_timeout(pipeline, document_name, text, timeout_secs).await?;

    pb.set_position(90);
    pb.finish_with_message("Done");

    if args.validate {
        let issues = result.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_result(&result, args.format)?;

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

    if let Some(report_dir) = &args.report_dir {
        let written = report::write_report(&result, report_dir)?;
        println!(
            "{} Report written: {} files in {}",
            style("✓").green(),
            written.len(),
            report_dir.display()
        );
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Overall confidence: {}",
            style("ℹ").blue(),
            result.confidence_overall
        );
        println!(
            "{} Warnings: {}",
            style("ℹ").blue(),
            result.warnings.len()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Load the pipeline configuration, defaulting when no file was given.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<FinstatConfig> {
    match config_path {
        Some(path) => Ok(FinstatConfig::from_file(std::path::Path::new(path))?),
        None => Ok(FinstatConfig::default()),
    }
}

/// Read a document as text. Invalid UTF-8 bytes are replaced rather than
/// failing the run.
pub(crate) fn read_text(path: &std::path::Path) -> anyhow::Result<String> {
    let raw = fs::read(path)?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

/// Run one extraction on a blocking task under the configured wall-clock
/// budget. A timeout produces a structurally valid all-missing result
/// with Low confidence, never an error.
pub(crate) async fn extract_with_timeout(
    pipeline: Arc<StatementPipeline>,
    document_name: String,
    text: String,
    timeout_secs: u64,
) -> anyhow::Result<StatementExtraction> {
    let name = document_name.clone();
    let task = tokio::task::spawn_blocking(move || pipeline.process(&name, &text));

    match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await {
        Ok(joined) => Ok(joined??),
        Err(_) => {
            warn!("extraction of {document_name} timed out after {timeout_secs}s");
            Ok(timed_out_result(&document_name, timeout_secs))
        }
    }
}

fn timed_out_result(document_name: &str, timeout_secs: u64) -> StatementExtraction {
    let data = BTreeMap::new();
    StatementExtraction {
        document_name: document_name.to_string(),
        extracted_at: Some(Utc::now()),
        currency: Currency::Unknown,
        unit: Unit::Unknown,
        confidence_overall: ConfidenceLevel::Low,
        missing_items: StatementExtraction::missing_from(&data),
        data,
        warnings: vec![format!("extraction timed out after {timeout_secs}s")],
        raw_extracts: BTreeMap::new(),
    }
}

pub(crate) fn format_result(
    result: &StatementExtraction,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => report::data_sheet_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_text(result: &StatementExtraction) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", result.document_name));
    output.push_str(&format!("Confidence: {}\n", result.confidence_overall));
    output.push_str(&format!(
        "Currency: {}  Unit: {}\n",
        result.currency, result.unit
    ));
    output.push('\n');

    for (period, items) in &result.data {
        output.push_str(&format!("{period}:\n"));
        for item in LineItem::ALL {
            if let Some(extracted) = items.get(&item) {
                let value = extracted
                    .value
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                output.push_str(&format!("  {item}: {value}\n"));
            }
        }
        output.push('\n');
    }

    if !result.missing_items.is_empty() {
        let names: Vec<&str> = result.missing_items.iter().map(|i| i.label()).collect();
        output.push_str(&format!("Missing: {}\n", names.join(", ")));
    }

    for warning in &result.warnings {
        output.push_str(&format!("Warning: {warning}\n"));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_out_result_is_valid() {
        let result = timed_out_result("slow.txt", 30);
        assert_eq!(result.confidence_overall, ConfidenceLevel::Low);
        assert_eq!(result.missing_items.len(), LineItem::ALL.len());
        assert!(result.validate().is_empty());
        assert!(result.warnings[0].contains("timed out"));
    }

    #[test]
    fn test_text_format_lists_periods() {
        let pipeline = StatementPipeline::new();
        let result = pipeline
            .process("t.txt", "2022 2023\nRevenue $1,100.2 $1,234.5\n")
            .unwrap();

        let text = format_text(&result);
        assert!(text.contains("2023:"));
        assert!(text.contains("  Revenue: 1100.2"));
        assert!(text.contains("Missing:"));
    }
}
