//! uspin library
//!
//! Loads `.spin` image specifications and applies their package operations
//! through a package manager.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod image_spec;
pub mod package_list;
pub mod package_manager;

// Re-export main types for convenience
pub use config::{ConfigParser, ImageConfiguration, ImageSection, TomlConfigParser};
pub use engine::dispatch::{apply_operations, apply_stack};
pub use engine::operation::{OpStack, Operation, OperationKind};
pub use error::{Result, SpinError};
pub use image_spec::{ImageSpec, SPIN_EXTENSION};
pub use package_list::{PackageListParser, StackParser};
pub use package_manager::{DryRunManager, EopkgManager, ManagerCall, PackageManager};
