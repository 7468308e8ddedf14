pub mod date_filter;
pub mod runner;
pub mod window;

pub use date_filter::{DateFilter, FilterCounters, FilterStats};
pub use runner::FilterRunner;
pub use window::{classify, TimeWindow, Verdict};
