use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::PlatformLimits;
use crate::storage::FsStore;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "draftflow.json";

const DEFAULT_ROOT: &str = "content/generated";

/// Settings handed to every producer and consumer at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftflowConfig {
    /// Directory holding the record documents.
    #[serde(default = "default_root")]
    pub root_directory: PathBuf,
    /// Maximum content length per platform.
    #[serde(default)]
    pub platform_limits: PlatformLimits,
}

fn default_root() -> PathBuf {
    PathBuf::from(DEFAULT_ROOT)
}

impl Default for DraftflowConfig {
    fn default() -> Self {
        Self {
            root_directory: default_root(),
            platform_limits: PlatformLimits::default(),
        }
    }
}

impl DraftflowConfig {
    /// Read config from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(CoreError::Io(e)),
        };
        serde_json::from_str(&raw)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))
    }

    /// Write config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Default config for `draftflow init`, rooted at `root` when given.
    pub fn default_init(root: Option<PathBuf>) -> Self {
        Self {
            root_directory: root.unwrap_or_else(default_root),
            ..Self::default()
        }
    }

    /// Filesystem store at the configured root.
    pub fn store(&self) -> FsStore {
        FsStore::open(&self.root_directory)
    }
}
