//! Package Manager Collaborators
//!
//! The dispatcher never talks to a package manager directly. It drives a
//! [`PackageManager`] trait object, which keeps batching logic testable
//! without touching a real system.
//!
//! # Implementations
//!
//! - `EopkgManager`: runs `eopkg` against a target install root
//! - `DryRunManager`: records and logs every call, changes nothing

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Capability the dispatcher applies operations against.
///
/// Calls arrive strictly sequentially. Any internal concurrency is the
/// implementation's own business.
pub trait PackageManager {
    /// Register a repository by name and index URI
    fn add_repo(&mut self, name: &str, uri: &str) -> Result<()>;

    /// Install every named group (component) in one transaction
    fn install_groups(&mut self, ignore_safety: bool, names: &[String]) -> Result<()>;

    /// Install every named package in one transaction
    fn install_packages(&mut self, ignore_safety: bool, names: &[String]) -> Result<()>;
}

/// A single call made against a package manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum ManagerCall {
    AddRepo {
        name: String,
        uri: String,
    },
    InstallGroups {
        ignore_safety: bool,
        names: Vec<String>,
    },
    InstallPackages {
        ignore_safety: bool,
        names: Vec<String>,
    },
}

impl fmt::Display for ManagerCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddRepo { name, uri } => write!(f, "add-repo {} {}", name, uri),
            Self::InstallGroups { ignore_safety, names } => {
                write!(f, "install groups [{}]", names.join(", "))?;
                if *ignore_safety {
                    write!(f, " (ignore safety)")?;
                }
                Ok(())
            }
            Self::InstallPackages { ignore_safety, names } => {
                write!(f, "install packages [{}]", names.join(", "))?;
                if *ignore_safety {
                    write!(f, " (ignore safety)")?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// Dry Run
// ============================================================================

/// Package manager that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct DryRunManager {
    calls: Vec<ManagerCall>,
}

impl DryRunManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> &[ManagerCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<ManagerCall> {
        self.calls
    }

    fn record(&mut self, call: ManagerCall) {
        info!("[DRY RUN] {}", call);
        self.calls.push(call);
    }
}

impl PackageManager for DryRunManager {
    fn add_repo(&mut self, name: &str, uri: &str) -> Result<()> {
        self.record(ManagerCall::AddRepo {
            name: name.to_string(),
            uri: uri.to_string(),
        });
        Ok(())
    }

    fn install_groups(&mut self, ignore_safety: bool, names: &[String]) -> Result<()> {
        self.record(ManagerCall::InstallGroups {
            ignore_safety,
            names: names.to_vec(),
        });
        Ok(())
    }

    fn install_packages(&mut self, ignore_safety: bool, names: &[String]) -> Result<()> {
        self.record(ManagerCall::InstallPackages {
            ignore_safety,
            names: names.to_vec(),
        });
        Ok(())
    }
}

// ============================================================================
// eopkg
// ============================================================================

/// Package manager driving the `eopkg` binary against a target root.
///
/// The root is an image build directory, not the live system, so every
/// command carries `-D <root>`.
#[derive(Debug, Clone)]
pub struct EopkgManager {
    root: PathBuf,
    binary: PathBuf,
}

impl EopkgManager {
    /// Default binary name, resolved through `PATH`
    pub const DEFAULT_BINARY: &'static str = "eopkg";

    /// Create a manager installing into `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            binary: PathBuf::from(Self::DEFAULT_BINARY),
        }
    }

    /// Use a specific eopkg binary instead of the one on `PATH`
    pub fn with_binary<P: AsRef<Path>>(mut self, binary: P) -> Self {
        self.binary = binary.as_ref().to_path_buf();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The argument vector (excluding the binary) used for a call.
    pub fn command_for(&self, call: &ManagerCall) -> Vec<String> {
        let root = self.root.display().to_string();
        match call {
            ManagerCall::AddRepo { name, uri } => vec![
                "add-repo".to_string(),
                name.clone(),
                uri.clone(),
                "-D".to_string(),
                root,
            ],
            ManagerCall::InstallGroups { ignore_safety, names } => {
                let mut args = install_prefix(&root, *ignore_safety);
                for name in names {
                    args.push("-c".to_string());
                    args.push(name.clone());
                }
                args
            }
            ManagerCall::InstallPackages { ignore_safety, names } => {
                let mut args = install_prefix(&root, *ignore_safety);
                args.extend(names.iter().cloned());
                args
            }
        }
    }

    fn run(&self, call: ManagerCall) -> Result<()> {
        let args = self.command_for(&call);
        info!("eopkg: {}", call);
        debug!("exec: {} {:?}", self.binary.display(), args);

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("Failed to execute {}", self.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "{} {} failed ({}): {}",
                self.binary.display(),
                args.join(" "),
                output.status,
                stderr.trim()
            );
        }

        debug!("{}", String::from_utf8_lossy(&output.stdout).trim_end());
        Ok(())
    }
}

fn install_prefix(root: &str, ignore_safety: bool) -> Vec<String> {
    let mut args = vec![
        "install".to_string(),
        "-y".to_string(),
        "-D".to_string(),
        root.to_string(),
    ];
    if ignore_safety {
        args.push("--ignore-safety".to_string());
    }
    args
}

impl PackageManager for EopkgManager {
    fn add_repo(&mut self, name: &str, uri: &str) -> Result<()> {
        self.run(ManagerCall::AddRepo {
            name: name.to_string(),
            uri: uri.to_string(),
        })
    }

    fn install_groups(&mut self, ignore_safety: bool, names: &[String]) -> Result<()> {
        self.run(ManagerCall::InstallGroups {
            ignore_safety,
            names: names.to_vec(),
        })
    }

    fn install_packages(&mut self, ignore_safety: bool, names: &[String]) -> Result<()> {
        self.run(ManagerCall::InstallPackages {
            ignore_safety,
            names: names.to_vec(),
        })
    }
}
