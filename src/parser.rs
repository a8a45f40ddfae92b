//! Streaming reader for sparse-graph edge lists.
//!
//! The accepted format is the coordinate layout of Matrix Market files:
//!
//! ```text
//! % comment lines
//! <rows> <cols> <entries>
//! <u> <v> [weight]
//! ```
//!
//! Every edge record adds one to the degree of both endpoints, so the
//! graph is treated as undirected and a self-loop counts twice.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use tracing::{debug, warn};

use crate::error::{DegreeError, Result};

/// vertex id -> degree
pub type DegreeMap = HashMap<u64, u64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    pub comment_marker: char,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            comment_marker: '%',
        }
    }
}

/// The `<rows> <cols> <entries>` header, when its tokens are integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: u64,
    pub cols: u64,
    pub entries: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Comment,
    /// Dimension header, carrying the parsed values if they are numeric.
    Header(Option<Dimensions>),
    /// Fewer than two tokens. Reported and skipped.
    Malformed,
    Edge(u64, u64),
}

#[derive(Debug, Default)]
pub struct ParsedGraph {
    pub degrees: DegreeMap,
    pub edges: u64,
    pub skipped_lines: u64,
    pub header: Option<Dimensions>,
}

/// Line classifier for a single file.
///
/// A line of exactly three tokens is taken as the dimension header as long
/// as no header has been consumed and no edge has been accepted yet. This
/// means a weighted edge sitting where the header would be is skipped; files
/// without a header lose their first weighted edge.
#[derive(Debug)]
pub struct EdgeListParser {
    options: ParserOptions,
    header_consumed: bool,
    edges_seen: u64,
}

impl EdgeListParser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            header_consumed: false,
            edges_seen: 0,
        }
    }

    #[cfg(test)]
    fn header_consumed(&self) -> bool {
        self.header_consumed
    }

    pub fn edges_seen(&self) -> u64 {
        self.edges_seen
    }

    /// Classifies one line and advances the header/edge state.
    /// `line_no` is 1-based and only used for error reporting.
    pub fn classify(&mut self, line_no: usize, line: &str) -> Result<LineKind> {
        let trimmed = line.trim_start();
        if trimmed.starts_with(self.options.comment_marker) {
            return Ok(LineKind::Comment);
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        if tokens.len() == 3 && !self.header_consumed && self.edges_seen == 0 {
            self.header_consumed = true;
            return Ok(LineKind::Header(parse_dimensions(&tokens)));
        }

        if tokens.len() < 2 {
            return Ok(LineKind::Malformed);
        }

        let u = parse_vertex(line_no, line, tokens[0])?;
        let v = parse_vertex(line_no, line, tokens[1])?;
        self.edges_seen += 1;
        Ok(LineKind::Edge(u, v))
    }
}

fn parse_vertex(line_no: usize, line: &str, token: &str) -> Result<u64> {
    token.parse::<u64>().map_err(|_| DegreeError::Parse {
        line_no,
        line: line.trim_end().to_string(),
        token: token.to_string(),
    })
}

fn parse_dimensions(tokens: &[&str]) -> Option<Dimensions> {
    match tokens {
        [rows, cols, entries] => Some(Dimensions {
            rows: rows.parse().ok()?,
            cols: cols.parse().ok()?,
            entries: entries.parse().ok()?,
        }),
        _ => None,
    }
}

/// Reads the whole stream once and accumulates per-vertex degrees.
///
/// Malformed lines are logged and counted. The first non-integer vertex id
/// aborts the parse. An edge-free input yields an empty map; the reducer
/// is the one that rejects it.
pub fn parse_reader<R: BufRead>(reader: R, options: ParserOptions) -> Result<ParsedGraph> {
    let mut parser = EdgeListParser::new(options);
    let mut graph = ParsedGraph::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| DegreeError::io("<stream>", e))?;
        match parser.classify(line_no, &line)? {
            LineKind::Comment => {}
            LineKind::Header(dims) => {
                debug!(line_no, ?dims, "skipping dimension header");
                graph.header = dims;
            }
            LineKind::Malformed => {
                warn!(line_no, line = line.trim(), "skipping invalid line");
                graph.skipped_lines += 1;
            }
            LineKind::Edge(u, v) => {
                *graph.degrees.entry(u).or_insert(0) += 1;
                *graph.degrees.entry(v).or_insert(0) += 1;
            }
        }
    }

    graph.edges = parser.edges_seen();
    Ok(graph)
}

pub fn parse_file(path: &Path, options: ParserOptions) -> Result<ParsedGraph> {
    let file = File::open(path).map_err(|e| DegreeError::io(path, e))?;
    parse_reader(BufReader::new(file), options).map_err(|err| match err {
        DegreeError::Io { source, .. } => DegreeError::io(path, source),
        other => other,
    })
}
