//! Property-Based Tests for uspin
//!
//! These tests verify:
//! - Suffix checking happens before any collaborator is consulted
//! - Batching preserves order and issues exactly one call per batch
//! - Stack blocks are homogeneous and flatten back to the input

use proptest::prelude::*;
use std::cell::Cell;
use std::path::Path;

use uspin::{
    ConfigParser, DryRunManager, ImageConfiguration, ImageSpec, ManagerCall, OpStack, Operation,
    SpinError, StackParser, apply_operations,
};

// =============================================================================
// Loader Property Tests
// =============================================================================

/// Collaborator that counts how often it is consulted
#[derive(Default)]
struct CountingParser {
    calls: Cell<usize>,
}

impl ConfigParser for CountingParser {
    fn parse(&self, _path: &Path) -> anyhow::Result<ImageConfiguration> {
        self.calls.set(self.calls.get() + 1);
        anyhow::bail!("should not be reached")
    }
}

impl StackParser for CountingParser {
    fn parse(&self, _path: &Path) -> anyhow::Result<Vec<Operation>> {
        self.calls.set(self.calls.get() + 1);
        anyhow::bail!("should not be reached")
    }
}

proptest! {
    /// Any path without the .spin suffix is rejected before reading anything
    #[test]
    fn non_spin_paths_rejected(
        stem in "[a-z/_.]{0,24}",
        ext in prop_oneof![Just(""), Just(".toml"), Just(".spin.bak"), Just(".spn"), Just(".SPIN")],
    ) {
        let path = format!("{}{}", stem, ext);
        prop_assume!(!path.ends_with(".spin"));

        let config = CountingParser::default();
        let stack = CountingParser::default();
        let err = ImageSpec::load_with(&path, &config, &stack).unwrap_err();

        prop_assert!(matches!(err, SpinError::InvalidInput { .. }), "expected SpinError::InvalidInput, got {:?}", err);
        prop_assert_eq!(config.calls.get(), 0);
        prop_assert_eq!(stack.calls.get(), 0);
    }
}

// =============================================================================
// Dispatcher Property Tests
// =============================================================================

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.-]{0,15}"
}

proptest! {
    /// Packages: one call, names in input order, flag from the first element
    #[test]
    fn packages_batch_in_order(
        names in prop::collection::vec(name_strategy(), 1..20),
        ignore_safety in any::<bool>(),
    ) {
        let ops: Vec<Operation> = names
            .iter()
            .map(|n| Operation::package(n.clone(), ignore_safety))
            .collect();

        let mut pm = DryRunManager::new();
        apply_operations(&mut pm, &ops).expect("homogeneous packages apply");

        prop_assert_eq!(
            pm.into_calls(),
            vec![ManagerCall::InstallPackages { ignore_safety, names }]
        );
    }

    /// Groups: one call, names in input order
    #[test]
    fn groups_batch_in_order(
        names in prop::collection::vec(name_strategy(), 1..20),
        ignore_safety in any::<bool>(),
    ) {
        let ops: Vec<Operation> = names
            .iter()
            .map(|n| Operation::group(n.clone(), ignore_safety))
            .collect();

        let mut pm = DryRunManager::new();
        apply_operations(&mut pm, &ops).expect("homogeneous groups apply");

        prop_assert_eq!(
            pm.into_calls(),
            vec![ManagerCall::InstallGroups { ignore_safety, names }]
        );
    }

    /// Repositories: one call each, in input order
    #[test]
    fn repos_added_in_order(
        repos in prop::collection::vec((name_strategy(), name_strategy()), 1..10),
    ) {
        let ops: Vec<Operation> = repos
            .iter()
            .map(|(name, uri)| Operation::repo(name.clone(), uri.clone()))
            .collect();

        let mut pm = DryRunManager::new();
        apply_operations(&mut pm, &ops).expect("homogeneous repos apply");

        let expected: Vec<ManagerCall> = repos
            .into_iter()
            .map(|(name, uri)| ManagerCall::AddRepo { name, uri })
            .collect();
        prop_assert_eq!(pm.into_calls(), expected);
    }
}

// =============================================================================
// Stack Property Tests
// =============================================================================

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (name_strategy(), name_strategy()).prop_map(|(n, u)| Operation::repo(n, u)),
        (name_strategy(), any::<bool>()).prop_map(|(n, f)| Operation::group(n, f)),
        (name_strategy(), any::<bool>()).prop_map(|(n, f)| Operation::package(n, f)),
    ]
}

proptest! {
    /// Every block is non-empty and shares kind and flag with its head
    #[test]
    fn stack_blocks_are_homogeneous(ops in prop::collection::vec(operation_strategy(), 0..40)) {
        let stack = OpStack::from_operations(ops.clone());

        for block in stack.blocks() {
            prop_assert!(!block.is_empty());
            let head = &block[0];
            for op in block {
                prop_assert_eq!(op.kind(), head.kind());
                prop_assert_eq!(op.ignore_safety(), head.ignore_safety());
            }
        }

        let flat: Vec<Operation> = stack.operations().cloned().collect();
        prop_assert_eq!(flat, ops);
    }

    /// Each block of a generated stack applies cleanly on its own
    #[test]
    fn stack_blocks_always_dispatch(ops in prop::collection::vec(operation_strategy(), 1..40)) {
        let stack = OpStack::from_operations(ops);
        let mut pm = DryRunManager::new();
        for block in stack.blocks() {
            prop_assert!(apply_operations(&mut pm, block).is_ok());
        }
    }
}
