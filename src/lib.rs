pub mod batch;
pub mod config;
pub mod datasets;
pub mod error;
pub mod parser;
pub mod report;
pub mod stats;

pub use config::Config;
pub use error::DegreeError;
pub use parser::{DegreeMap, ParserOptions};
pub use stats::DegreeStats;
