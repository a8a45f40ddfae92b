use std::path::PathBuf;

use clap::Parser;
use regex::Regex;
use tracing_subscriber::EnvFilter;

use crate::{
    error::{DegreeError, Result},
    parser::ParserOptions,
};

/// Compute per-graph degree statistics for every dataset directory under a root.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// Root directory; each subdirectory is one dataset group
    #[arg(env = "DEGREE_STATS_ROOT")]
    pub root: PathBuf,

    /// Directory receiving the CSV and chart files
    #[arg(skip = PathBuf::from("."))]
    pub output_dir: PathBuf,

    /// Extension of the edge-list files, without the dot
    #[arg(skip = String::from("mtx"))]
    pub extension: String,

    #[arg(skip = '%')]
    pub comment_marker: char,

    /// Number of files parsed concurrently; 1 keeps everything on the main thread
    #[arg(skip = 1usize)]
    pub workers: usize,

    /// Used when RUST_LOG is not set
    #[arg(skip = String::from("info"))]
    pub log_level: String,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_dir: PathBuf::from("."),
            extension: "mtx".to_string(),
            comment_marker: '%',
            workers: 1,
            log_level: "info".to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(DegreeError::Config("workers must be at least 1".into()));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(DegreeError::Config("extension must not be empty".into()));
        }
        Ok(())
    }

    /// Filename filter matching `*.<extension>`.
    pub fn file_filter(&self) -> Result<Regex> {
        let ext = regex::escape(self.extension.trim_start_matches('.'));
        Regex::new(&format!(r"\.{ext}$")).map_err(|e| DegreeError::Config(e.to_string()))
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            comment_marker: self.comment_marker,
        }
    }

    pub fn log_env(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }
}
