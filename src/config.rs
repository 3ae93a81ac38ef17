// config.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::commands::Profile;
use crate::history::{DEFAULT_HISTORY_KEY, DEFAULT_MAX_ENTRIES};
use crate::routes::{default_routes, Route, RouteTable};

pub const DEFAULT_CONFIG_FILE: &str = "site-terminal.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub prompt: String,
    pub user: String,
    pub banner: String,
    /// Directory holding the built site.
    pub site_root: PathBuf,
    pub log_level: Option<String>,
    pub theme: ThemeConfig,
    pub history: HistoryConfig,
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub name: String,
    pub tagline: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_entries: usize,
    pub key: String,
    /// Where history is persisted; in-memory only when unset.
    pub state_dir: Option<PathBuf>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            prompt: "guest@terminal:~$ ".into(),
            user: "guest".into(),
            banner: "Welcome to the site terminal!\n\
                     Type 'help' for available commands. \
                     You can navigate the entire site using this terminal."
                .into(),
            site_root: PathBuf::from("site"),
            log_level: None,
            theme: ThemeConfig::default(),
            history: HistoryConfig::default(),
            routes: default_routes(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        let profile = Profile::default();
        Self {
            name: profile.theme_name,
            tagline: profile.theme_tagline,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            key: DEFAULT_HISTORY_KEY.into(),
            state_dir: None,
        }
    }
}

impl TerminalConfig {
    /// Reads `path` if given, else `site-terminal.toml` in the working
    /// directory if it exists, else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn route_table(&self) -> RouteTable {
        RouteTable::new(self.routes.clone())
    }

    pub fn profile(&self) -> Profile {
        Profile {
            user: self.user.clone(),
            theme_name: self.theme.name.clone(),
            theme_tagline: self.theme.tagline.clone(),
        }
    }
}
