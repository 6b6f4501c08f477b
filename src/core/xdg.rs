//! XDG Base Directory Support
//!
//! Vitrine keeps two things on disk: its TOML configuration and the
//! local collections built by `vitrine ingest`. Each location is taken
//! from a `VITRINE_*` variable, then the matching `XDG_*` variable, then
//! the XDG default under the home directory.

use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "vitrine";
const CONFIG_FILE: &str = "config.toml";

/// One overridable base directory
struct BaseDir {
    app_var: &'static str,
    xdg_var: &'static str,
    home_default: &'static str,
}

const CONFIG: BaseDir = BaseDir {
    app_var: "VITRINE_CONFIG_DIR",
    xdg_var: "XDG_CONFIG_HOME",
    home_default: ".config",
};

const DATA: BaseDir = BaseDir {
    app_var: "VITRINE_DATA_DIR",
    xdg_var: "XDG_DATA_HOME",
    home_default: ".local/share",
};

impl BaseDir {
    fn resolve(&self, lookup: &impl Fn(&str) -> Option<String>, home: &Path) -> PathBuf {
        if let Some(dir) = lookup(self.app_var) {
            PathBuf::from(dir)
        } else if let Some(base) = lookup(self.xdg_var) {
            Path::new(&base).join(APP_DIR)
        } else {
            home.join(self.home_default).join(APP_DIR)
        }
    }
}

/// Resolved configuration and data directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl XdgDirs {
    /// Resolve from the process environment
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::resolve_with(|name| std::env::var(name).ok().filter(|v| !v.is_empty()), &home)
    }

    /// Resolve with an explicit variable lookup and home directory
    pub fn resolve_with(lookup: impl Fn(&str) -> Option<String>, home: &Path) -> Self {
        let dirs = Self {
            config_dir: CONFIG.resolve(&lookup, home),
            data_dir: DATA.resolve(&lookup, home),
        };
        tracing::debug!(
            config = ?dirs.config_dir,
            data = ?dirs.data_dir,
            "Resolved vitrine directories"
        );
        dirs
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Storage root handed to the collection manager
    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    /// Directory holding one subdirectory per ingested collection
    pub fn collections_dir(&self) -> PathBuf {
        self.data_dir.join("collections")
    }

    /// Create the config and collections directories
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(self.collections_dir())
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
