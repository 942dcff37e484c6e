//! Configuration file support for ferro-anno.
//!
//! Annotation thresholds can be set in a `.ferro-anno.toml` file.
//!
//! # Example Configuration
//!
//! ```toml
//! [annotator]
//! neargene = 1000
//! splice_window = 2
//! frameshift_lookahead_codons = 30
//! merge_upstream = false
//! collection_capacity = 20
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro-anno.toml` in current directory
//! 2. `~/.config/ferro/anno.toml`
//!
//! Missing keys take their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::annotation::collection::DEFAULT_CAPACITY;
use crate::annotation::frameshift::MIN_LOOKAHEAD_CODONS;
use crate::error::AnnotationError;
use crate::Result;

/// Default distance within which a variant outside a transcript is
/// up/downstream of it.
pub const DEFAULT_NEARGENE: u64 = 1000;

/// Default number of intronic bases next to an exon that count as splicing.
pub const DEFAULT_SPLICE_WINDOW: u64 = 2;

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Annotator section.
    #[serde(default)]
    pub annotator: AnnotatorConfig,
}

/// Annotation thresholds and resolver behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Up/downstream distance in bases.
    pub neargene: u64,
    /// Intronic bases next to an exon that count as splicing.
    pub splice_window: u64,
    /// Codons compared before a frameshift is named.
    pub frameshift_lookahead_codons: usize,
    /// Merge upstream candidates into one gene list, like downstream ones.
    pub merge_upstream: bool,
    /// Initial capacity of each precedence bucket.
    pub collection_capacity: usize,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            neargene: DEFAULT_NEARGENE,
            splice_window: DEFAULT_SPLICE_WINDOW,
            frameshift_lookahead_codons: MIN_LOOKAHEAD_CODONS,
            merge_upstream: false,
            collection_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl AnnotatorConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the up/downstream distance.
    pub fn with_neargene(mut self, neargene: u64) -> Self {
        self.neargene = neargene;
        self
    }

    /// Set the splicing window.
    pub fn with_splice_window(mut self, splice_window: u64) -> Self {
        self.splice_window = splice_window;
        self
    }

    /// Set the frameshift lookahead, raised to the minimum if smaller.
    pub fn with_frameshift_lookahead(mut self, codons: usize) -> Self {
        self.frameshift_lookahead_codons = codons.max(MIN_LOOKAHEAD_CODONS);
        self
    }

    /// Set whether upstream candidates are merged.
    pub fn with_upstream_merge(mut self, merge: bool) -> Self {
        self.merge_upstream = merge;
        self
    }

    /// Load configuration from the default locations.
    ///
    /// Returns defaults when no file is found. A file that exists but does
    /// not parse is an error.
    pub fn load() -> Result<Self> {
        let cwd_config = PathBuf::from(".ferro-anno.toml");
        if cwd_config.exists() {
            return Self::load_from_path(&cwd_config);
        }

        if let Some(home) = dirs_home() {
            let home_config = home.join(".config").join("ferro").join("anno.toml");
            if home_config.exists() {
                return Self::load_from_path(&home_config);
            }
        }

        log::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(content)?;
        file.annotator.validated()
    }

    /// Save configuration to a TOML file.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let file = FileConfig {
            annotator: self.clone(),
        };
        let content = toml::to_string_pretty(&file).map_err(|e| AnnotationError::Config {
            msg: e.to_string(),
        })?;
        fs::write(path, content)?;
        Ok(())
    }

    fn validated(mut self) -> Result<Self> {
        if self.frameshift_lookahead_codons < MIN_LOOKAHEAD_CODONS {
            log::warn!(
                "frameshift_lookahead_codons {} raised to {}",
                self.frameshift_lookahead_codons,
                MIN_LOOKAHEAD_CODONS
            );
            self.frameshift_lookahead_codons = MIN_LOOKAHEAD_CODONS;
        }
        if self.collection_capacity == 0 {
            return Err(AnnotationError::Config {
                msg: "collection_capacity must be positive".to_string(),
            });
        }
        Ok(self)
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_empty_config() {
        let config = AnnotatorConfig::parse("").unwrap();
        assert_eq!(config, AnnotatorConfig::default());
        assert_eq!(config.neargene, 1000);
        assert_eq!(config.splice_window, 2);
        assert_eq!(config.frameshift_lookahead_codons, 30);
        assert!(!config.merge_upstream);
    }

    #[test]
    fn test_parse_partial_section() {
        let content = r#"
[annotator]
neargene = 5000
merge_upstream = true
"#;
        let config = AnnotatorConfig::parse(content).unwrap();
        assert_eq!(config.neargene, 5000);
        assert!(config.merge_upstream);
        assert_eq!(config.splice_window, 2);
    }

    #[test]
    fn test_lookahead_raised_to_minimum() {
        let content = r#"
[annotator]
frameshift_lookahead_codons = 5
"#;
        let config = AnnotatorConfig::parse(content).unwrap();
        assert_eq!(config.frameshift_lookahead_codons, MIN_LOOKAHEAD_CODONS);

        let config = AnnotatorConfig::new().with_frameshift_lookahead(100);
        assert_eq!(config.frameshift_lookahead_codons, 100);
    }

    #[test]
    fn test_invalid_config() {
        let err = AnnotatorConfig::parse("[annotator]\nneargene = \"far\"\n").unwrap_err();
        assert!(matches!(err, AnnotationError::Config { .. }));

        let err = AnnotatorConfig::parse("[annotator]\ncollection_capacity = 0\n").unwrap_err();
        assert!(matches!(err, AnnotationError::Config { .. }));
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("anno.toml");
        let config = AnnotatorConfig::new()
            .with_neargene(250)
            .with_splice_window(5)
            .with_upstream_merge(true);

        config.to_file(&path).unwrap();
        let loaded = AnnotatorConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = AnnotatorConfig::load_from_path(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, AnnotationError::Io { .. }));
    }
}
