//! Batch command - process multiple statement text files.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use finstat_core::{StatementExtraction, StatementPipeline};

use super::extract::{extract_with_timeout, format_result, load_config, read_text, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern (e.g. "statements/*.txt")
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue with the remaining files when one fails
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessOutcome {
    path: PathBuf,
    result: Option<StatementExtraction>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|entry| entry.ok())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching text files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

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

    let pipeline = Arc::new(StatementPipeline::with_config(&config));
    let timeout_secs = config.extraction.timeout_secs;
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let outcome = process_file(&path, Arc::clone(&pipeline), timeout_secs, &args).await;

        if let Some(ref message) = outcome.error {
            error!("failed to process {}: {message}", path.display());
            if !args.continue_on_error {
                pb.abandon();
                anyhow::bail!("{}: {message}", path.display());
            }
        }

        outcomes.push(outcome);
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    if args.summary {
        let summary_path = args
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("summary.csv");
        write_summary(&outcomes, &summary_path)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let succeeded = outcomes.iter().filter(|o| o.result.is_some()).count();
    let failed = outcomes.len() - succeeded;
    println!(
        "{} Processed {} files in {:.1}s ({} succeeded, {} failed)",
        style("✓").green(),
        outcomes.len(),
        start.elapsed().as_secs_f32(),
        succeeded,
        failed
    );

    Ok(())
}

async fn process_file(
    path: &PathBuf,
    pipeline: Arc<StatementPipeline>,
    timeout_secs: u64,
    args: &BatchArgs,
) -> ProcessOutcome {
    let document_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let text = match read_text(path) {
        Ok(text) => text,
        Err(e) => {
            return ProcessOutcome {
                path: path.clone(),
                result: None,
                error: Some(e.to_string()),
            };
        }
    };

    match extract_with_timeout(pipeline, document_name, text, timeout_secs).await {
        Ok(result) => {
            let error = write_output(path, &result, args).err().map(|e| e.to_string());
            ProcessOutcome {
                path: path.clone(),
                result: Some(result),
                error,
            }
        }
        Err(e) => ProcessOutcome {
            path: path.clone(),
            result: None,
            error: Some(e.to_string()),
        },
    }
}

/// Write one file's result to the output directory, or log it when no
/// directory was given.
fn write_output(
    path: &PathBuf,
    result: &StatementExtraction,
    args: &BatchArgs,
) -> anyhow::Result<()> {
    let output = format_result(result, args.format)?;

    if let Some(ref output_dir) = args.output_dir {
        let extension = match args.format {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        };
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "result".to_string());
        let out_path = output_dir.join(format!("{stem}.extraction.{extension}"));
        fs::write(&out_path, output)?;
        info!("wrote {}", out_path.display());
    } else {
        println!("=== {} ===", path.display());
        println!("{output}");
    }

    Ok(())
}

/// Write the cross-file summary CSV.
fn write_summary(outcomes: &[ProcessOutcome], path: &PathBuf) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "document",
        "status",
        "periods",
        "items_found",
        "confidence",
        "currency",
        "unit",
        "warnings",
    ])?;

    for outcome in outcomes {
        let document = outcome.path.display().to_string();
        match &outcome.result {
            Some(result) => {
                let items_found: usize = result.data.values().map(|items| items.len()).sum();
                wtr.write_record([
                    document.as_str(),
                    "ok",
                    &result.data.len().to_string(),
                    &items_found.to_string(),
                    &result.confidence_overall.to_string(),
                    &result.currency.to_string(),
                    &result.unit.to_string(),
                    &result.warnings.len().to_string(),
                ])?;
            }
            None => {
                wtr.write_record([
                    document.as_str(),
                    "error",
                    "0",
                    "0",
                    "",
                    "",
                    "",
                    "0",
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
