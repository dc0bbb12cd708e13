pub mod bar;
pub mod history;
pub mod quotes;

// Re-export the core types for convenient access (e.g. `use crate::market_data::Bar`).
pub use bar::{validate_series, Bar, MalformedBar};
pub use history::HistoryStore;
pub use quotes::{Quote, QuotePrice};
