//! `.spin` configuration loading.
//!
//! A `.spin` file is TOML. The only field the loader needs is the package
//! list location; everything else is carried for the image builder.
//!
//! ```toml
//! [image]
//! packages = "packages"
//! title = "Solus Budgie"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Parsed contents of a `.spin` file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageConfiguration {
    pub image: ImageSection,
}

/// The `[image]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageSection {
    /// Package list filename, relative to the directory of the `.spin` file
    pub packages: String,

    /// Human readable image title
    #[serde(default)]
    pub title: Option<String>,
}

impl ImageConfiguration {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration {:?}", path.as_ref()))?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let packages = self.image.packages.trim();
        if packages.is_empty() {
            anyhow::bail!("image.packages must name the package list file");
        }

        // Joined onto the spec directory; an absolute path would replace it
        if Path::new(packages).is_absolute() {
            anyhow::bail!(
                "image.packages must be relative to the .spin file, got {}",
                packages
            );
        }

        Ok(())
    }
}

/// Source of image configurations, keyed on the `.spin` path.
pub trait ConfigParser {
    fn parse(&self, path: &Path) -> Result<ImageConfiguration>;
}

/// Default parser: TOML on disk, validated.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlConfigParser;

impl ConfigParser for TomlConfigParser {
    fn parse(&self, path: &Path) -> Result<ImageConfiguration> {
        let config = ImageConfiguration::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).expect("Failed to write temp file");
        file
    }

    #[test]
    fn test_load_minimal_config() {
        let file = write_temp("[image]\npackages = \"packages\"\n");
        let config = TomlConfigParser.parse(file.path()).expect("config should load");
        assert_eq!(config.image.packages, "packages");
        assert_eq!(config.image.title, None);
    }

    #[test]
    fn test_load_config_with_title() {
        let file = write_temp("[image]\npackages = \"lists/budgie\"\ntitle = \"Solus Budgie\"\n");
        let config = TomlConfigParser.parse(file.path()).expect("config should load");
        assert_eq!(config.image.packages, "lists/budgie");
        assert_eq!(config.image.title.as_deref(), Some("Solus Budgie"));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ImageConfiguration::load_from_file("/nonexistent/image.spin");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_image_table() {
        let file = write_temp("[branding]\ntitle = \"x\"\n");
        assert!(TomlConfigParser.parse(file.path()).is_err());
    }

    #[test]
    fn test_load_malformed_toml() {
        let file = write_temp("[image\npackages = ");
        let err = TomlConfigParser.parse(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration"));
    }

    #[test]
    fn test_validation_empty_packages() {
        let file = write_temp("[image]\npackages = \"   \"\n");
        assert!(TomlConfigParser.parse(file.path()).is_err());
    }

    #[test]
    fn test_validation_absolute_packages() {
        let config = ImageConfiguration {
            image: ImageSection {
                packages: "/etc/packages".to_string(),
                title: None,
            },
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must be relative"));
    }
}
