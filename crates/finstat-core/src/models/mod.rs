//! Data models for extraction results and pipeline configuration.

pub mod config;
pub mod statement;

pub use config::{ExtractionConfig, FinstatConfig};
pub use statement::{
    ConfidenceLevel, Currency, CURRENT_PERIOD, ExtractedValue, LineItem, Period,
    StatementExtraction, Unit,
};
