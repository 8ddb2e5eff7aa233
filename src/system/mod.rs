pub mod collector;
pub mod counters;
pub mod csv_export;
pub mod error;
pub mod history;
pub mod rate;
pub mod ticker;
