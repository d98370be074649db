//! CSV report writer - renders an extraction result as the three report
//! tables: line-item grid, metadata, and missing items.

use std::path::{Path, PathBuf};

use anyhow::Context;
use finstat_core::{LineItem, StatementExtraction};

/// Render the line-item grid: one row per canonical item, one column per
/// period, `N/A` where no value was extracted. Every item is always
/// present, so consumers never need their own defaulting.
pub fn data_sheet_csv(result: &StatementExtraction) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let periods: Vec<&String> = result.data.keys().collect();
    let mut header = vec!["Line Item".to_string()];
    header.extend(periods.iter().map(|p| p.to_string()));
    wtr.write_record(&header)?;

    for item in LineItem::ALL {
        let mut row = vec![item.label().to_string()];
        for period in &periods {
            let cell = result.data[*period]
                .get(&item)
                .and_then(|extracted| extracted.value)
                .map(|value| value.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            row.push(cell);
        }
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Render the metadata table.
fn metadata_csv(result: &StatementExtraction) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["Property", "Value"])?;
    wtr.write_record([
        "Document Name",
        result.document_name.as_str(),
    ])?;
    let extracted_at = result
        .extracted_at
        .map(|ts| ts.to_rfc3339())
        .unwrap_or_default();
    wtr.write_record(["Extraction Date", &extracted_at])?;
    wtr.write_record(["Currency", &result.currency.to_string()])?;
    wtr.write_record(["Unit", &result.unit.to_string()])?;
    wtr.write_record(["Overall Confidence", &result.confidence_overall.to_string()])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Render the missing-items table.
fn missing_items_csv(result: &StatementExtraction) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["Missing Line Items"])?;
    for item in &result.missing_items {
        wtr.write_record([item.label()])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Write the full report into `dir` as `data.csv`, `metadata.csv`, and -
/// when anything is missing - `missing_items.csv`. Returns the files
/// written.
pub fn write_report(result: &StatementExtraction, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating report directory {}", dir.display()))?;

    let mut written = Vec::new();

    let data_path = dir.join("data.csv");
    std::fs::write(&data_path, data_sheet_csv(result)?)?;
    written.push(data_path);

    let metadata_path = dir.join("metadata.csv");
    std::fs::write(&metadata_path, metadata_csv(result)?)?;
    written.push(metadata_path);

    if !result.missing_items.is_empty() {
        let missing_path = dir.join("missing_items.csv");
        std::fs::write(&missing_path, missing_items_csv(result)?)?;
        written.push(missing_path);
    }

    Ok(written)
}
