use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_TRACKER_URL: &str = "TRACKER_URL";
const ENV_ISSUE_CACHE: &str = "TRACKER_ISSUE_CACHE";

/// Icons shown in front of each tracker row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Glyphs {
    pub running: String,
    pub paused: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            running: "\u{25B6}".to_string(), // ▶
            paused: "\u{23F8}".to_string(),  // ⏸
        }
    }
}

/// Launcher key combinations for the secondary actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bindings {
    pub delete: String,
    pub edit_description: String,
    pub open: String,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            delete: "Alt+d".to_string(),
            edit_description: "Alt+e".to_string(),
            open: "Alt+o".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_selector_program")]
    pub program: String,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            program: default_selector_program(),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_tracker_url")]
    pub tracker_url: String,
    #[serde(default = "default_issue_cache")]
    pub issue_cache: PathBuf,
    /// Program and arguments that print the issue map as JSON on stdout.
    #[serde(default)]
    pub export_command: Vec<String>,
    /// Prefix the issue key is appended to, e.g. `https://jira.example.com/browse/`.
    #[serde(default)]
    pub browse_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub glyphs: Glyphs,
    #[serde(default)]
    pub bindings: Bindings,
    #[serde(default)]
    pub selector: SelectorConfig,
}

fn default_tracker_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_issue_cache() -> PathBuf {
    ProjectDirs::from("com", "trackmenu", "trackmenu")
        .map(|dirs| dirs.cache_dir().join("issues.json"))
        .unwrap_or_else(|| PathBuf::from("issues.json"))
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_selector_program() -> String {
    "rofi".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracker_url: default_tracker_url(),
            issue_cache: default_issue_cache(),
            export_command: Vec::new(),
            browse_url: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
            glyphs: Glyphs::default(),
            bindings: Bindings::default(),
            selector: SelectorConfig::default(),
        }
    }
}

impl Config {
    /// Load the config from `path`, or from the default location when `path` is `None`.
    /// A missing file yields the defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            Self::parse(&contents)?
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Config::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        config.normalize();
        Ok(config)
    }

    fn parse(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse config file")
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "trackmenu", "trackmenu")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_TRACKER_URL).filter(|v| !v.is_empty()) {
            self.tracker_url = url;
        }
        if let Some(path) = lookup(ENV_ISSUE_CACHE).filter(|v| !v.is_empty()) {
            self.issue_cache = PathBuf::from(path);
        }
    }

    fn normalize(&mut self) {
        self.tracker_url = self.tracker_url.trim().trim_end_matches('/').to_string();
        self.issue_cache = expand_home(&self.issue_cache);
    }

    /// Browser URL for an issue, or `None` when no browse prefix is configured.
    pub fn issue_url(&self, key: &str) -> Option<String> {
        let prefix = self.browse_url.trim();
        if prefix.is_empty() {
            return None;
        }
        Some(format!("{}{}", prefix, urlencoding::encode(key)))
    }
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
