//! Core library for financial statement extraction.
//!
//! This crate provides:
//! - Locale-aware numeric parsing and currency/unit detection
//! - Label normalization onto the canonical income statement items
//! - A cascade of extraction strategies (table, key-value, context window)
//! - Extraction engines and the document pipeline that coordinates them

pub mod error;
pub mod extract;
pub mod models;

pub use error::{ExtractionError, FinstatError, Result};
pub use extract::{
    DocumentContext, ExtractionStrategy, Extractor, FreeformExtractor, PartialExtraction,
    PatternExtractor, StatementPipeline,
};
pub use models::statement::{
    ConfidenceLevel, Currency, CURRENT_PERIOD, ExtractedValue, LineItem, Period,
    StatementExtraction, Unit,
};
pub use models::{ExtractionConfig, FinstatConfig};
