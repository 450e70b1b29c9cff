//! Lint configuration.
//!
//! The only recognised option is the target PHP version, which gates the
//! native type hints the parameter checks are allowed to suggest:
//!
//! ```toml
//! # .phpdoc-lint.toml
//! php_version = 70400   # or "7.4", or "7.4.3"
//! ```
//!
//! The effective version is resolved exactly once per session with
//! [`LintConfig::effective_php_version`]: the configured value wins,
//! otherwise the host runtime's version is used.  The result is an
//! immutable [`PhpVersion`] that the [`Linter`](crate::Linter) threads into
//! every check.
//!
//! # Discovery
//!
//! [`LintConfig::discover`] looks for, in order:
//!   1. `<workspace>/.phpdoc-lint.toml`
//!   2. `<user config dir>/phpdoc-lint/config.toml`
//!
//! and falls back to the default (no configured version) when neither
//! exists.

use std::fmt;
use std::path::{Path, PathBuf};

use etcetera::BaseStrategy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid php_version {0:?}: expected an id like 70400 or a version like \"7.4\"")]
    InvalidVersion(String),
}

/// A PHP version as a `PHP_VERSION_ID` (`major * 10000 + minor * 100 +
/// patch`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "VersionValue")]
pub struct PhpVersion(u32);

impl PhpVersion {
    /// First release with `string`, `int`, `float` and `bool` hints.
    pub const SCALAR_HINTS: PhpVersion = PhpVersion(70000);
    /// First release with the `object` hint.
    pub const OBJECT_HINT: PhpVersion = PhpVersion(70200);

    const MIN_ID: u32 = 50000;

    pub const fn from_id(id: u32) -> Self {
        PhpVersion(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }

    /// Parse `"7.4"`, `"7.4.3"`, `"8"` or a bare id such as `"70400"`.
    ///
    /// A bare number below 100 is read as a major version.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidVersion(text.to_string());
        let trimmed = text.trim();
        if let Ok(id) = trimmed.parse::<u32>()
            && id >= 100
        {
            return Self::checked(id).ok_or_else(invalid);
        }

        let mut parts = trimmed.split('.');
        let mut component = |max: u32| -> Result<u32, ConfigError> {
            match parts.next() {
                None => Ok(0),
                Some(p) => p
                    .parse::<u32>()
                    .ok()
                    .filter(|v| *v <= max)
                    .ok_or_else(invalid),
            }
        };
        let major = component(99)?;
        let minor = component(99)?;
        let patch = component(99)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Self::checked(major * 10000 + minor * 100 + patch).ok_or_else(invalid)
    }

    fn checked(id: u32) -> Option<Self> {
        (id >= Self::MIN_ID).then_some(PhpVersion(id))
    }
}

impl fmt::Display for PhpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.0 / 10000,
            (self.0 / 100) % 100,
            self.0 % 100
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VersionValue {
    Id(u32),
    Text(String),
}

impl TryFrom<VersionValue> for PhpVersion {
    type Error = ConfigError;

    fn try_from(value: VersionValue) -> Result<Self, Self::Error> {
        match value {
            VersionValue::Id(id) => {
                PhpVersion::checked(id).ok_or_else(|| ConfigError::InvalidVersion(id.to_string()))
            }
            VersionValue::Text(text) => PhpVersion::parse(&text),
        }
    }
}

/// Settings loaded from `.phpdoc-lint.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// Target PHP version; `None` defers to the host runtime.
    #[serde(default)]
    pub php_version: Option<PhpVersion>,
}

impl LintConfig {
    /// Workspace-level configuration file name.
    pub const FILE_NAME: &'static str = ".phpdoc-lint.toml";

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            origin: "inline configuration".to_string(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            origin: path.display().to_string(),
            source,
        })
    }

    /// Load the first configuration file found for `workspace_root`.
    pub fn discover(workspace_root: &Path) -> Result<Self, ConfigError> {
        let candidates = std::iter::once(workspace_root.join(Self::FILE_NAME))
            .chain(Self::user_config_path());
        for path in candidates {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "loading lint configuration");
                return Self::from_file(&path);
            }
        }
        tracing::debug!("no lint configuration found, using defaults");
        Ok(Self::default())
    }

    fn user_config_path() -> Option<PathBuf> {
        let strategy = etcetera::choose_base_strategy().ok()?;
        Some(strategy.config_dir().join("phpdoc-lint").join("config.toml"))
    }

    /// Resolve the version every check in this session will use.
    pub fn effective_php_version(&self, runtime: PhpVersion) -> PhpVersion {
        let version = self.php_version.unwrap_or(runtime);
        tracing::debug!(
            %version,
            configured = self.php_version.is_some(),
            "resolved effective PHP version"
        );
        version
    }
}
