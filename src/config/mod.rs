// ABOUTME: Configuration types and parsing for dockward.yml.
// ABOUTME: Handles file discovery, defaults, and template generation.

mod listen;

pub use listen::{ListenConfig, default_socket_path};

use crate::error::{Error, Result};
use crate::runtime::RuntimeConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "dockward.yml";
pub const CONFIG_FILENAME_ALT: &str = "dockward.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".dockward/config.yml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Written as a one-key map: `socket: <path>` or `tcp: <addr>`.
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub listen: ListenConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// `tracing` filter directive, e.g. `info` or `dockward=debug`.
    #[serde(default = "default_log")]
    pub log: String,
}

fn default_log() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen: ListenConfig::default(),
            runtime: RuntimeConfig::default(),
            log: default_log(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Locate a config file in `dir`, in order of preference.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load the config file from `dir`, or defaults when there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        match Self::find(dir) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

/// Write a commented template config into `dir`.
pub fn init_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, template_yaml())?;
    Ok(config_path)
}

fn template_yaml() -> String {
    format!(
        r#"# Where Docker clients connect. Use `tcp: 127.0.0.1:2375` for TCP.
listen:
  socket: {}

# Engine to forward to. Omit to auto-detect Podman, then Docker.
runtime:
  # runtime: podman
  # socket: /run/podman/podman.sock
  default_stop_timeout: 10s

log: info
"#,
        default_socket_path().display()
    )
}
