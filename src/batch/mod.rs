mod parallel;
mod sequential;

pub use parallel::ParallelRunner;
pub use sequential::SequentialRunner;

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use regex::Regex;
use tracing::warn;

use crate::{
    error::{DegreeError, Result},
    parser::{parse_file, ParserOptions},
    stats::DegreeStats,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphFile {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct FileFailure {
    pub filename: String,
    pub error: DegreeError,
}

/// {filename: stats} for the files of one directory, plus the files that failed.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub records: BTreeMap<String, DegreeStats>,
    pub failures: Vec<FileFailure>,
}

impl BatchResult {
    pub fn record(&mut self, filename: String, outcome: Result<DegreeStats>) {
        match outcome {
            Ok(stats) => {
                self.records.insert(filename, stats);
            }
            Err(error) => {
                warn!(file = %filename, %error, "failed to process file");
                self.failures.push(FileFailure { filename, error });
            }
        }
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.records.is_empty() && self.failures.is_empty()
    }
}

pub trait BatchRunner {
    fn run(&self, files: Vec<GraphFile>) -> BatchResult;
}

/// Parses one file and reduces its degree map.
pub fn analyze_file(file: &GraphFile, options: &ParserOptions) -> Result<DegreeStats> {
    let graph = parse_file(&file.path, *options)?;
    if graph.skipped_lines > 0 {
        warn!(file = %file.name, skipped = graph.skipped_lines, "skipped invalid lines");
    }
    DegreeStats::from_degrees(&graph.degrees)
}

/// Regular files directly inside `dir` whose name matches `filter`, sorted by name.
/// Entries that cannot be inspected are logged and left out.
pub fn list_graph_files(dir: &Path, filter: &Regex) -> Result<Vec<GraphFile>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| DegreeError::io(dir, e))? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(dir = %dir.display(), %error, "unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };
        if filter.is_match(name) {
            files.push(GraphFile {
                name: name.to_string(),
                path: path.clone(),
            });
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Picks the sequential runner for one worker and the pool otherwise.
pub fn runner_for(workers: usize, options: ParserOptions) -> Box<dyn BatchRunner> {
    if workers <= 1 {
        Box::new(SequentialRunner::new(options))
    } else {
        Box::new(ParallelRunner::new(workers, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_matching_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.mtx"), "1 2\n").unwrap();
        fs::write(dir.path().join("a.mtx"), "1 2\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("nested.mtx")).unwrap();

        let filter = Regex::new(r"\.mtx$").unwrap();
        let files = list_graph_files(dir.path(), &filter).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.mtx", "b.mtx"]);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let filter = Regex::new(r"\.mtx$").unwrap();
        let err = list_graph_files(Path::new("/no/such/dir"), &filter).unwrap_err();
        assert!(matches!(err, DegreeError::Io { .. }));
    }

    #[test]
    fn record_splits_successes_and_failures() {
        let mut result = BatchResult::default();
        assert!(result.is_empty());
        result.record(
            "ok.mtx".into(),
            Ok(DegreeStats {
                max_degree: 1,
                min_degree: 1,
                avg_degree: 1.0,
            }),
        );
        result.record("bad.mtx".into(), Err(DegreeError::EmptyGraph));
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].filename, "bad.mtx");
    }
}
