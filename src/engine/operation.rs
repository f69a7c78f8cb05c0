//! Package Operation Model
//!
//! A package list is read into a flat sequence of [`Operation`]s which is then
//! grouped into an [`OpStack`]: ordered blocks where every block holds
//! operations of a single kind sharing one ignore-safety flag. Each block maps
//! onto exactly one dispatcher call.
//!
//! | Kind     | Dispatched As |
//! |----------|---------------|
//! | `repo`   | one `add_repo` per operation, in order |
//! | `group`  | one batched `install_groups` |
//! | `package`| one batched `install_packages` |
//! | `unrecognized` | rejected |

use serde::Serialize;
use std::fmt;
use strum::{Display, EnumIter, EnumString};

// ============================================================================
// Operation Types
// ============================================================================

/// A single operation read from a package list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    /// Register a package repository
    Repo { name: String, uri: String },

    /// Install a package group (component)
    Group {
        name: String,
        /// Pass `--ignore-safety` to the package manager
        ignore_safety: bool,
    },

    /// Install a single package
    Package {
        name: String,
        /// Pass `--ignore-safety` to the package manager
        ignore_safety: bool,
    },

    /// A directive the package list contained but nothing can apply
    Unrecognized { directive: String },
}

/// The variant tag of an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum OperationKind {
    Repo,
    Group,
    Package,
    Unrecognized,
}

impl Operation {
    /// Build a repository operation
    pub fn repo(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::Repo {
            name: name.into(),
            uri: uri.into(),
        }
    }

    /// Build a group operation
    pub fn group(name: impl Into<String>, ignore_safety: bool) -> Self {
        Self::Group {
            name: name.into(),
            ignore_safety,
        }
    }

    /// Build a package operation
    pub fn package(name: impl Into<String>, ignore_safety: bool) -> Self {
        Self::Package {
            name: name.into(),
            ignore_safety,
        }
    }

    /// Build an operation for a directive nothing supports
    pub fn unrecognized(directive: impl Into<String>) -> Self {
        Self::Unrecognized {
            directive: directive.into(),
        }
    }

    /// The variant tag of this operation
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Repo { .. } => OperationKind::Repo,
            Self::Group { .. } => OperationKind::Group,
            Self::Package { .. } => OperationKind::Package,
            Self::Unrecognized { .. } => OperationKind::Unrecognized,
        }
    }

    /// The ignore-safety flag, for the kinds that carry one
    pub fn ignore_safety(&self) -> Option<bool> {
        match self {
            Self::Group { ignore_safety, .. } | Self::Package { ignore_safety, .. } => {
                Some(*ignore_safety)
            }
            Self::Repo { .. } | Self::Unrecognized { .. } => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repo { name, uri } => write!(f, "Repo({} -> {})", name, uri),
            Self::Group { name, ignore_safety } => {
                write!(f, "Group({}, ignore_safety={})", name, ignore_safety)
            }
            Self::Package { name, ignore_safety } => {
                write!(f, "Package({}, ignore_safety={})", name, ignore_safety)
            }
            Self::Unrecognized { directive } => write!(f, "Unrecognized({})", directive),
        }
    }
}

// ============================================================================
// Operation Stack
// ============================================================================

/// Ordered blocks of homogeneous operations.
///
/// Blocks are never empty. Within a block every operation has the same
/// [`OperationKind`] and the same ignore-safety flag, so the dispatcher's
/// first-element batching decisions hold for the whole block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpStack {
    blocks: Vec<Vec<Operation>>,
}

impl OpStack {
    /// Group a flat operation list into blocks, preserving order.
    ///
    /// A new block starts whenever the kind or the ignore-safety flag
    /// differs from the previous operation. Repository operations always
    /// share a block with their neighbours.
    pub fn from_operations(ops: impl IntoIterator<Item = Operation>) -> Self {
        let mut blocks: Vec<Vec<Operation>> = Vec::new();

        for op in ops {
            match blocks.last_mut() {
                Some(block) if same_batch(&block[0], &op) => block.push(op),
                _ => blocks.push(vec![op]),
            }
        }

        Self { blocks }
    }

    /// The blocks in application order
    pub fn blocks(&self) -> &[Vec<Operation>] {
        &self.blocks
    }

    /// Every operation, flattened in order
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.blocks.iter().flatten()
    }

    /// Total number of operations across all blocks
    pub fn len(&self) -> usize {
        self.blocks.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns a summary of the stack for logging/display.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Operation stack: {} operations in {} blocks",
            self.len(),
            self.blocks.len()
        )];
        for (i, block) in self.blocks.iter().enumerate() {
            let Some(head) = block.first() else {
                continue;
            };
            lines.push(format!("  Block {} ({}):", i + 1, head.kind()));
            for op in block {
                lines.push(format!("    {}", op));
            }
        }
        lines.join("\n")
    }
}

fn same_batch(head: &Operation, op: &Operation) -> bool {
    head.kind() == op.kind() && head.ignore_safety() == op.ignore_safety()
}

// ============================================================================
// Tests
// ============================================================================
