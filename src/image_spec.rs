//! Image specification loading.
//!
//! An [`ImageSpec`] is a `.spin` configuration together with the operation
//! stack read from the package list it points at. The package list path is
//! resolved relative to the directory holding the `.spin` file.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{ConfigParser, ImageConfiguration, TomlConfigParser};
use crate::engine::operation::OpStack;
use crate::error::{Result, SpinError};
use crate::package_list::{PackageListParser, StackParser};

/// Suffix every image specification file must carry
pub const SPIN_EXTENSION: &str = ".spin";

/// A validated, loaded image configuration ready for building
#[derive(Debug, Clone)]
pub struct ImageSpec {
    stack: OpStack,
    config: ImageConfiguration,
    base_dir: PathBuf,
}

impl ImageSpec {
    /// Load a `.spin` file and its package list with the default parsers.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(path, &TomlConfigParser, &PackageListParser)
    }

    /// Load a `.spin` file using the given configuration and package list parsers.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `path` does not end in `.spin` (nothing is read)
    /// - `ConfigLoadFailed` with the configuration parser's error
    /// - `PathResolutionFailed` if the parent directory cannot be made absolute
    /// - `PackageListParseFailed` with the package list parser's error
    pub fn load_with<P: AsRef<Path>>(
        path: P,
        config_parser: &dyn ConfigParser,
        stack_parser: &dyn StackParser,
    ) -> Result<Self> {
        let path = path.as_ref();

        if !has_spin_extension(path) {
            return Err(SpinError::invalid_input(path));
        }

        let config = config_parser
            .parse(path)
            .map_err(SpinError::ConfigLoadFailed)?;

        let base_dir = base_dir_of(path).map_err(SpinError::PathResolutionFailed)?;
        debug!("Spec base directory: {}", base_dir.display());

        let packages_path = base_dir.join(&config.image.packages);
        debug!("Package list: {}", packages_path.display());

        let ops = stack_parser
            .parse(&packages_path)
            .map_err(SpinError::PackageListParseFailed)?;
        let stack = OpStack::from_operations(ops);

        info!(
            "Loaded {} ({} operations in {} blocks)",
            path.display(),
            stack.len(),
            stack.blocks().len()
        );

        Ok(Self {
            stack,
            config,
            base_dir,
        })
    }

    /// The operation stack read from the package list
    pub fn stack(&self) -> &OpStack {
        &self.stack
    }

    /// The `.spin` configuration
    pub fn config(&self) -> &ImageConfiguration {
        &self.config
    }

    /// Absolute directory containing the `.spin` file
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a path relative to the `.spin` file's directory
    pub fn resolve<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.base_dir.join(relative)
    }

    /// Where the package list was read from
    pub fn packages_path(&self) -> PathBuf {
        self.resolve(&self.config.image.packages)
    }
}

fn has_spin_extension(path: &Path) -> bool {
    path.as_os_str()
        .to_str()
        .is_some_and(|s| s.ends_with(SPIN_EXTENSION))
}

fn base_dir_of(path: &Path) -> std::io::Result<PathBuf> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::path::absolute(parent)
}
