mod worker_pool;

use std::{collections::BTreeMap, path::PathBuf};

use tracing::{debug, error, info};

use super::{analyze_file, BatchResult, BatchRunner, GraphFile};
use crate::{
    error::{DegreeError, Result},
    parser::ParserOptions,
    stats::DegreeStats,
};
use worker_pool::WorkerPool;

type Analyzer = fn(&GraphFile, &ParserOptions) -> Result<DegreeStats>;

/// Spreads the files of one directory over a worker pool.
///
/// Every job owns its file's degree map. Outcomes travel back over a
/// channel and only the calling thread touches the [`BatchResult`]. A file
/// whose job never reports back is recorded as [`DegreeError::WorkerLost`].
pub struct ParallelRunner {
    workers: usize,
    options: ParserOptions,
    analyze: Analyzer,
}

impl ParallelRunner {
    pub fn new(workers: usize, options: ParserOptions) -> Self {
        Self {
            workers: workers.max(1),
            options,
            analyze: analyze_file,
        }
    }
}

impl BatchRunner for ParallelRunner {
    fn run(&self, files: Vec<GraphFile>) -> BatchResult {
        let mut result = BatchResult::default();
        let mut pending: BTreeMap<String, PathBuf> = BTreeMap::new();
        let pool = WorkerPool::new(self.workers);
        let (tx, rx) = async_channel::unbounded();

        for file in files {
            let tx = tx.clone();
            let options = self.options;
            let analyze = self.analyze;
            let (name, path) = (file.name.clone(), file.path.clone());
            let submitted = pool.execute(move |worker_id| {
                info!(worker_id, file = %file.name, "processing");
                let outcome = analyze(&file, &options);
                if let Err(err) = tx.send_blocking((file.name, outcome)) {
                    let (filename, _) = err.into_inner();
                    error!(file = %filename, "result channel closed");
                }
            });
            match submitted {
                Ok(()) => {
                    pending.insert(name, path);
                }
                Err(_) => result.record(name, Err(DegreeError::WorkerLost { path })),
            }
        }
        drop(tx);
        pool.join();

        while let Ok((filename, outcome)) = rx.try_recv() {
            pending.remove(&filename);
            result.record(filename, outcome);
        }
        for (filename, path) in pending {
            result.record(filename, Err(DegreeError::WorkerLost { path }));
        }
        debug!(
            ok = result.records.len(),
            failed = result.failures.len(),
            "batch finished"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::SequentialRunner;
    use std::fs;

    #[test]
    fn matches_sequential_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = Vec::new();
        for i in 0..8 {
            let name = format!("g{i}.mtx");
            let path = dir.path().join(&name);
            let body = if i == 5 {
                "1 2\n1 z\n".to_string()
            } else {
                (1..=i + 1).map(|v| format!("0 {v}\n")).collect()
            };
            fs::write(&path, body).unwrap();
            files.push(GraphFile { name, path });
        }

        let seq = SequentialRunner::new(ParserOptions::default()).run(files.clone());
        let par = ParallelRunner::new(3, ParserOptions::default()).run(files);

        assert_eq!(par.records, seq.records);
        assert_eq!(par.records.len(), 7);
        assert_eq!(par.failures.len(), 1);
        assert_eq!(par.failures[0].filename, "g5.mtx");
        assert_eq!(par.records["g3.mtx"].max_degree, 4);
    }

    fn panics_on_b(file: &GraphFile, options: &ParserOptions) -> Result<DegreeStats> {
        if file.name == "b.mtx" {
            panic!("analysis blew up");
        }
        analyze_file(file, options)
    }

    #[test]
    fn panicking_job_is_reported_by_filename() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<_> = ["a.mtx", "b.mtx", "c.mtx"]
            .into_iter()
            .map(|name| {
                let path = dir.path().join(name);
                fs::write(&path, "1 2\n").unwrap();
                GraphFile {
                    name: name.to_string(),
                    path,
                }
            })
            .collect();

        let runner = ParallelRunner {
            workers: 2,
            options: ParserOptions::default(),
            analyze: panics_on_b,
        };
        let result = runner.run(files);

        let ok: Vec<_> = result.records.keys().map(String::as_str).collect();
        assert_eq!(ok, ["a.mtx", "c.mtx"]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].filename, "b.mtx");
        assert!(matches!(
            result.failures[0].error,
            DegreeError::WorkerLost { .. }
        ));
    }
}
