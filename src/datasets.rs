//! Walks the root directory: every subdirectory is a dataset whose graph
//! files are summarised into one CSV table and one bar chart.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{error, info, warn};

use crate::{
    batch::{list_graph_files, runner_for, BatchResult, BatchRunner},
    config::Config,
    error::{DegreeError, Result},
    report::{render_chart, write_csv, OutputPaths},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct DatasetSummary {
    pub name: String,
    pub outputs: OutputPaths,
    pub result: BatchResult,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub datasets: Vec<DatasetSummary>,
    pub failed_datasets: Vec<(String, DegreeError)>,
}

impl RunSummary {
    pub fn failed_files(&self) -> usize {
        self.datasets.iter().map(|d| d.result.failures.len()).sum()
    }

    pub fn processed_files(&self) -> usize {
        self.datasets.iter().map(|d| d.result.records.len()).sum()
    }
}

/// Immediate subdirectories of `root`, sorted by name.
pub fn list_datasets(root: &Path) -> Result<Vec<Dataset>> {
    let mut datasets = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| DegreeError::io(root, e))? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(root = %root.display(), %error, "unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        datasets.push(Dataset { name, path });
    }
    datasets.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(datasets)
}

/// Runs the batch over one dataset and writes both reports. Files that fail
/// are left out of the reports but do not stop them from being written.
pub fn process_dataset(
    dataset: &Dataset,
    config: &Config,
    runner: &dyn BatchRunner,
) -> Result<DatasetSummary> {
    info!(dataset = %dataset.name, "processing directory");
    let filter = config.file_filter()?;
    let files = list_graph_files(&dataset.path, &filter)?;
    if files.is_empty() {
        warn!(dataset = %dataset.name, extension = %config.extension, "no graph files found");
    }

    let result = runner.run(files);

    let outputs = OutputPaths::for_dataset(&config.output_dir, &dataset.name);
    write_csv(&result, &outputs.csv)?;
    let title = format!(
        "Min, Max, and Avg Degree for Each File in {}",
        dataset.name
    );
    render_chart(&result, &title, &outputs.chart)?;
    info!(
        dataset = %dataset.name,
        csv = %outputs.csv.display(),
        chart = %outputs.chart.display(),
        ok = result.records.len(),
        failed = result.failures.len(),
        "results written"
    );

    Ok(DatasetSummary {
        name: dataset.name.clone(),
        outputs,
        result,
    })
}

/// Processes every dataset under the configured root. Only a root that
/// cannot be listed, or an invalid configuration, fails the whole run.
pub fn process_root(config: &Config) -> Result<RunSummary> {
    config.validate()?;
    fs::create_dir_all(&config.output_dir).map_err(|e| DegreeError::io(&config.output_dir, e))?;

    let runner = runner_for(config.workers, config.parser_options());
    let mut summary = RunSummary::default();
    for dataset in list_datasets(&config.root)? {
        match process_dataset(&dataset, config, runner.as_ref()) {
            Ok(done) => summary.datasets.push(done),
            Err(err) => {
                error!(dataset = %dataset.name, error = %err, "dataset skipped");
                summary.failed_datasets.push((dataset.name, err));
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_directories_are_datasets() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("zeta")).unwrap();
        fs::create_dir(root.path().join("alpha")).unwrap();
        fs::write(root.path().join("stray.mtx"), "1 2\n").unwrap();

        let names: Vec<_> = list_datasets(root.path())
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["alpha", "zeta"]);
    }

    #[test]
    fn missing_root_is_fatal() {
        let out = tempfile::tempdir().unwrap();
        let mut config = Config::new("/no/such/root");
        config.output_dir = out.path().to_path_buf();
        assert!(matches!(process_root(&config), Err(DegreeError::Io { .. })));
    }

    #[test]
    fn invalid_config_is_rejected_before_any_work() {
        let root = tempfile::tempdir().unwrap();
        let mut config = Config::new(root.path());
        config.workers = 0;
        config.output_dir = root.path().join("out");
        assert!(matches!(process_root(&config), Err(DegreeError::Config(_))));
        assert!(!config.output_dir.exists());
    }
}
