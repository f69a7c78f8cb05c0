//! Package list reading.
//!
//! One directive per line. Blank lines and `#` comments are skipped.
//!
//! ```text
//! repo Solus https://packages.getsol.us/shannon/eopkg-index.xml.xz
//! group system.base
//! group system.devel --ignore-safety
//! package nano
//! vim
//! ```
//!
//! A bare word is a package. A line starting with any other keyword is kept
//! as an unrecognized operation so the dispatcher can refuse it.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::engine::operation::Operation;

const IGNORE_SAFETY_FLAG: &str = "--ignore-safety";

/// Source of operation lists, keyed on the package list path.
pub trait StackParser {
    fn parse(&self, path: &Path) -> Result<Vec<Operation>>;
}

/// Default line-oriented package list parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct PackageListParser;

impl PackageListParser {
    /// Parse package list text into operations, in file order
    pub fn parse_str(&self, content: &str) -> Result<Vec<Operation>> {
        let mut ops = Vec::new();

        for (index, raw) in content.lines().enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            let op = parse_line(line)
                .with_context(|| format!("line {}: {}", index + 1, raw.trim()))?;
            debug!("line {}: {}", index + 1, op);
            ops.push(op);
        }

        Ok(ops)
    }
}

impl StackParser for PackageListParser {
    fn parse(&self, path: &Path) -> Result<Vec<Operation>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read package list {:?}", path))?;

        self.parse_str(&content)
            .with_context(|| format!("Invalid package list {:?}", path))
    }
}

/// Cut a `#` comment. A `#` glued to a word (URI fragments) is not a comment.
fn strip_comment(line: &str) -> &str {
    let mut prev_is_space = true;
    for (pos, c) in line.char_indices() {
        if c == '#' && prev_is_space {
            return &line[..pos];
        }
        prev_is_space = c.is_whitespace();
    }
    line
}

fn parse_line(line: &str) -> Result<Operation> {
    let words: Vec<&str> = line.split_whitespace().collect();

    match words.as_slice() {
        ["repo", name, uri] => Ok(Operation::repo(*name, *uri)),
        ["repo", ..] => anyhow::bail!("expected `repo <name> <uri>`"),
        ["group", rest @ ..] => {
            let (name, ignore_safety) = name_and_flag("group", rest)?;
            Ok(Operation::group(name, ignore_safety))
        }
        ["package", rest @ ..] => {
            let (name, ignore_safety) = name_and_flag("package", rest)?;
            Ok(Operation::package(name, ignore_safety))
        }
        [name] => Ok(Operation::package(*name, false)),
        [keyword, ..] => Ok(Operation::unrecognized(*keyword)),
        [] => anyhow::bail!("empty directive"),
    }
}

fn name_and_flag<'a>(keyword: &str, rest: &[&'a str]) -> Result<(&'a str, bool)> {
    match rest {
        [name] => Ok((*name, false)),
        [name, flag] if *flag == IGNORE_SAFETY_FLAG => Ok((*name, true)),
        [_, flag] => anyhow::bail!("unknown flag `{}`", flag),
        _ => anyhow::bail!("expected `{} <name> [{}]`", keyword, IGNORE_SAFETY_FLAG),
    }
}
