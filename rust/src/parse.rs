//! Plain-text edge list input.
//!
//! ```text
//! 4
//! w1 w2 4
//! w1 w3 2
//! w2 w4 4
//! w3 w4 6
//! ```
//!
//! Line 1 is the task count (informational). Every following non-blank line is
//! `from to [duration]`; a missing duration is 0. A line holding a single
//! label declares a task, which may have no edges. `#` starts a comment line.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::graph::EdgeSpec;
use crate::log_checks;

/// Errors raised while reading the plain-text format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Missing task count header")]
    MissingHeader,

    #[error("Line {line}: invalid task count {value:?}")]
    InvalidTaskCount { line: usize, value: String },

    #[error("Line {line}: expected `task` or `from to [duration]`, got {content:?}")]
    MalformedEdge { line: usize, content: String },

    #[error("Line {line}: invalid duration {value:?}")]
    InvalidDuration { line: usize, value: String },

    #[error("Unknown duplicate edge policy: {0}")]
    UnknownPolicy(String),
}

/// Parsed edge list.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeList {
    /// Count declared on line 1.
    pub declared_tasks: usize,
    pub edges: Vec<EdgeSpec>,
    /// Labels declared on lines of their own, in file order.
    pub tasks: Vec<String>,
}

fn is_content(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

/// Parse the line-oriented edge list format.
pub fn parse_edge_list(input: &str, verbosity: u8) -> Result<EdgeList, ParseError> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| is_content(line));

    let (header_line, header) = lines.next().ok_or(ParseError::MissingHeader)?;
    let header = header.trim();
    let declared_tasks = header
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidTaskCount {
            line: header_line,
            value: header.to_string(),
        })?;

    let mut edges = Vec::new();
    let mut tasks = Vec::new();
    for (line, content) in lines {
        let fields: Vec<&str> = content.split_whitespace().collect();
        let duration = match fields.as_slice() {
            [label] => {
                tasks.push(label.to_string());
                continue;
            }
            [_, _] => 0.0,
            [_, _, raw] => raw.parse::<f64>().map_err(|_| ParseError::InvalidDuration {
                line,
                value: raw.to_string(),
            })?,
            _ => {
                return Err(ParseError::MalformedEdge {
                    line,
                    content: content.trim().to_string(),
                })
            }
        };
        edges.push(EdgeSpec::new(fields[0], fields[1], duration));
    }

    let seen: FxHashSet<&str> = edges
        .iter()
        .flat_map(|edge| [edge.from.as_str(), edge.to.as_str()])
        .chain(tasks.iter().map(String::as_str))
        .collect();
    if seen.len() != declared_tasks {
        log_checks!(
            verbosity,
            "  Header declares {} tasks, input mentions {}",
            declared_tasks,
            seen.len()
        );
    }

    Ok(EdgeList {
        declared_tasks,
        edges,
        tasks,
    })
}
