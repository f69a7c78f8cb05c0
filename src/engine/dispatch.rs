//! Operation Dispatcher
//!
//! Turns a homogeneous operation list into the fewest package manager calls:
//! repositories go in one at a time, groups and packages go in bulk.
//!
//! # What This Explicitly Refuses To Do
//!
//! - Roll back: repositories added before a failure stay added
//! - Retry: the first failure is returned as-is
//! - Mix kinds in one batch: rejected before any call is made

use tracing::{debug, info};

use crate::engine::operation::{OpStack, Operation, OperationKind};
use crate::error::{Result, SpinError};
use crate::package_manager::PackageManager;

/// Apply a list of operations against the package manager.
///
/// The kind of the first operation decides how the whole list is
/// dispatched. The ignore-safety flag of a group or package batch is taken
/// from the first operation only.
///
/// # Errors
///
/// - `EmptyOperationList` if `ops` is empty
/// - `UnsupportedOperation` if the first operation is of an unrecognized kind
/// - `MixedOperationKinds` if any operation differs in kind from the first
/// - `PackageManager` with the manager's own error if a call fails
pub fn apply_operations(manager: &mut dyn PackageManager, ops: &[Operation]) -> Result<()> {
    let Some(first) = ops.first() else {
        return Err(SpinError::EmptyOperationList);
    };

    // The first element alone decides whether the list is supported at all
    if let Operation::Unrecognized { directive } = first {
        return Err(SpinError::unsupported(directive.clone()));
    }

    let expected = first.kind();
    if let Some((index, op)) = ops
        .iter()
        .enumerate()
        .find(|(_, op)| op.kind() != expected)
    {
        return Err(SpinError::MixedOperationKinds {
            expected,
            found: op.kind(),
            index,
        });
    }

    match first {
        Operation::Repo { .. } => {
            for op in ops {
                if let Operation::Repo { name, uri } = op {
                    debug!("Adding repository {} ({})", name, uri);
                    manager
                        .add_repo(name, uri)
                        .map_err(SpinError::PackageManager)?;
                }
            }
            Ok(())
        }
        Operation::Group { ignore_safety, .. } => {
            let names = batch_names(ops);
            info!("Installing {} groups", names.len());
            manager
                .install_groups(*ignore_safety, &names)
                .map_err(SpinError::PackageManager)
        }
        Operation::Package { ignore_safety, .. } => {
            let names = batch_names(ops);
            info!("Installing {} packages", names.len());
            manager
                .install_packages(*ignore_safety, &names)
                .map_err(SpinError::PackageManager)
        }
        Operation::Unrecognized { directive } => Err(SpinError::unsupported(directive.clone())),
    }
}

/// Apply every block of a stack in order, stopping at the first failure.
pub fn apply_stack(manager: &mut dyn PackageManager, stack: &OpStack) -> Result<()> {
    if stack.is_empty() {
        return Err(SpinError::EmptyOperationList);
    }

    let total = stack.blocks().len();
    for (i, block) in stack.blocks().iter().enumerate() {
        let kind = block
            .first()
            .map(Operation::kind)
            .unwrap_or(OperationKind::Unrecognized);
        info!("Applying block {}/{} ({} x {})", i + 1, total, block.len(), kind);
        apply_operations(manager, block)?;
    }

    Ok(())
}

fn batch_names(ops: &[Operation]) -> Vec<String> {
    ops.iter()
        .filter_map(|op| match op {
            Operation::Group { name, .. } | Operation::Package { name, .. } => Some(name.clone()),
            Operation::Repo { .. } | Operation::Unrecognized { .. } => None,
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
