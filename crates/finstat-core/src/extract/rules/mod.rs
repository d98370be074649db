//! Shared extraction rules: numeric parsing, label normalization, and
//! document-level metadata detection.

pub mod metadata;
pub mod normalize;
pub mod numbers;
pub mod patterns;

pub use metadata::{detect_currency, detect_unit};
pub use normalize::{LineItemNormalizer, VARIATIONS};
pub use numbers::{first_amount_token, parse_amount};
