//! # waypath Loader
//!
//! Builds a [`Graph`] from a line-oriented edge list such as
//!
//! ```text
//! digraph campus {
//!     // travel times in seconds
//!     "Bascom Hall" -> "Education Building" [seconds=97.4];
//! }
//! ```
//!
//! Blank lines and `//` comments are ignored. Each edge line inserts both
//! endpoints (if new) and then the edge.

pub mod error;

pub use error::LoadError;

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};
use waypath_core::{Graph, MapKey};

type Compiled = OnceLock<std::result::Result<Regex, regex::Error>>;

const EDGE_PATTERN: &str = r#"^"(.+?)"\s*->\s*"(.+?)"\s*\[seconds=(.+?)\];$"#;
const HEADER_PATTERN: &str = r#"^(strict\s+)?digraph(\s+(\w+|"[^"]*"))?\s*\{$"#;

fn compiled(
    cell: &'static Compiled,
    pattern: &str,
) -> std::result::Result<&'static Regex, LoadError> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| LoadError::Pattern(e.clone()))
}

fn edge_pattern() -> std::result::Result<&'static Regex, LoadError> {
    static PATTERN: Compiled = OnceLock::new();
    compiled(&PATTERN, EDGE_PATTERN)
}

fn header_pattern() -> std::result::Result<&'static Regex, LoadError> {
    static PATTERN: Compiled = OnceLock::new();
    compiled(&PATTERN, HEADER_PATTERN)
}

/// One parsed `"a" -> "b" [seconds=w];` line
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLine {
    pub source: String,
    pub destination: String,
    pub weight: f64,
}

/// Loader behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Reject lines that are neither edges, comments nor graph delimiters
    pub strict: bool,
}

/// Counters for one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub lines: usize,
    pub edges: usize,
    pub skipped: usize,
}

/// Parse a single line. `Ok(None)` for blank, comment and non-edge lines.
pub fn parse_line(
    number: usize,
    line: &str,
) -> std::result::Result<Option<EdgeLine>, LoadError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("//") {
        return Ok(None);
    }
    let Some(caps) = edge_pattern()?.captures(line) else {
        return Ok(None);
    };
    if caps[1].is_blank() || caps[2].is_blank() {
        return Err(LoadError::BlankLabel { line: number });
    }

    let raw = caps[3].trim();
    let weight: f64 = raw.parse().map_err(|_| LoadError::InvalidWeight {
        line: number,
        value: raw.to_string(),
    })?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(LoadError::InvalidWeight {
            line: number,
            value: raw.to_string(),
        });
    }

    Ok(Some(EdgeLine {
        source: caps[1].to_string(),
        destination: caps[2].to_string(),
        weight,
    }))
}

/// `digraph <name> {` header or the closing `}`
fn is_delimiter(line: &str) -> std::result::Result<bool, LoadError> {
    Ok(line == "}" || header_pattern()?.is_match(line))
}

/// Load every edge in `text` into `graph`.
///
/// Invalid weights always fail. Unrecognised lines and edges with a blank
/// label fail in strict mode and are skipped whole otherwise.
pub fn load_str(
    graph: &mut Graph<String>,
    text: &str,
    config: LoaderConfig,
) -> Result<LoadSummary> {
    let mut summary = LoadSummary::default();

    for (idx, raw) in text.lines().enumerate() {
        let number = idx + 1;
        summary.lines += 1;

        let parsed = match parse_line(number, raw) {
            Err(LoadError::BlankLabel { line }) if !config.strict => {
                debug!(line, "skipping edge with a blank label");
                summary.skipped += 1;
                continue;
            }
            other => other?,
        };
        let Some(edge) = parsed else {
            let line = raw.trim();
            let ignorable = line.is_empty() || line.starts_with("//") || is_delimiter(line)?;
            if !ignorable {
                if config.strict {
                    return Err(LoadError::Malformed {
                        line: number,
                        content: line.to_string(),
                    }
                    .into());
                }
                debug!(line = number, content = line, "skipping unrecognised line");
                summary.skipped += 1;
            }
            continue;
        };

        graph.insert_node(edge.source.clone());
        graph.insert_node(edge.destination.clone());
        if graph.insert_edge(edge.source.as_str(), edge.destination.as_str(), edge.weight) {
            summary.edges += 1;
        } else {
            debug!(line = number, "edge not inserted");
            summary.skipped += 1;
        }
    }

    Ok(summary)
}

/// Load an edge list file into `graph`.
pub fn load_file<P: AsRef<Path>>(
    graph: &mut Graph<String>,
    path: P,
    config: LoaderConfig,
) -> Result<LoadSummary> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()).into());
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read the file: {}", path.display()))?;
    let summary = load_str(graph, &text, config)
        .with_context(|| format!("Failed to load graph from {}", path.display()))?;

    info!(
        "Data successfully loaded from {}: {} edges, {} nodes, {} lines skipped",
        path.display(),
        summary.edges,
        graph.node_count(),
        summary.skipped
    );
    Ok(summary)
}
