//! Concrete extraction strategies, one per supported document shape.

pub mod context;
pub mod key_value;
pub mod line_scan;
pub mod table;

pub use context::ContextWindowStrategy;
pub use key_value::{KeyValueStrategy, SimpleKeyValueStrategy};
pub use line_scan::LineScanStrategy;
pub use table::TableStrategy;
