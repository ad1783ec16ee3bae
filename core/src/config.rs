//! Settings — the console's small YAML configuration.
//!
//! Lives at `settings.yaml` inside the config directory. Every field has a
//! default, so a missing file is simply the default configuration; a file
//! that exists but does not parse is an error the caller must surface.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};


pub const SETTINGS_FILE: &str = "settings.yaml";


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Endpoint of the annotation service.
    pub service_url: String,
    /// Client-side timeout for remote calls and identity requests.
    pub request_timeout_ms: u64,
    /// Window within which a second trigger tap opens the console.
    pub trigger_hold_ms: u64,
    /// Theme name for the TUI.
    pub theme: String,
}


impl Default for Settings {
    fn default() -> Self {
        Settings {
            service_url: "https://api.pagemark.dev/v1/console".to_string(),
            request_timeout_ms: 10_000,
            trigger_hold_ms: 500,
            theme: "dark".to_string(),
        }
    }
}


impl Settings {
    pub fn load(path: &Path) -> Result<Settings, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("cannot parse {}: {}", path.display(), e))
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("cannot serialize settings: {}", e))?;
        std::fs::write(path, content).map_err(|e| format!("cannot write {}: {}", path.display(), e))
    }

    /// Load from the config directory; an absent file is the default
    /// configuration, a malformed one is an error.
    pub fn load_or_default(config_dir: &Path) -> Result<Settings, String> {
        let path = config_dir.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Settings::default());
        }
        Settings::load(&path)
    }
}


/// The config directory: `PM_CONFIG_DIR` when set, else
/// `~/.config/pagemark`.
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PM_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home).join(".config").join("pagemark")
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
