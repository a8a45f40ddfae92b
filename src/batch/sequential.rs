use tracing::info;

use super::{analyze_file, BatchResult, BatchRunner, GraphFile};
use crate::parser::ParserOptions;

/// Processes files one after another on the calling thread.
pub struct SequentialRunner {
    options: ParserOptions,
}

impl SequentialRunner {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }
}

impl BatchRunner for SequentialRunner {
    fn run(&self, files: Vec<GraphFile>) -> BatchResult {
        files
            .into_iter()
            .fold(BatchResult::default(), |mut acc, file| {
                info!(file = %file.name, "processing");
                let outcome = analyze_file(&file, &self.options);
                acc.record(file.name, outcome);
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn keeps_going_after_a_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = Vec::new();
        for (name, body) in [
            ("a.mtx", "2 2 1\n1 2\n"),
            ("b.mtx", "1 2\nfoo bar\n"),
            ("c.mtx", "% empty\n"),
            ("d.mtx", "1 2\n2 3\n"),
        ] {
            let path = dir.path().join(name);
            fs::write(&path, body).unwrap();
            files.push(GraphFile {
                name: name.to_string(),
                path,
            });
        }
        files.push(GraphFile {
            name: "gone.mtx".into(),
            path: dir.path().join("gone.mtx"),
        });

        let result = SequentialRunner::new(ParserOptions::default()).run(files);
        let ok: Vec<_> = result.records.keys().cloned().collect();
        let failed: Vec<_> = result.failures.iter().map(|f| f.filename.clone()).collect();
        assert_eq!(ok, ["a.mtx", "d.mtx"]);
        assert_eq!(failed, ["b.mtx", "c.mtx", "gone.mtx"]);
        assert_eq!(result.records["d.mtx"].max_degree, 2);
    }
}
