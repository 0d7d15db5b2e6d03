//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`].  A missing file named by the environment is
//! not an error: the defaults apply.  A file named on the command line
//! must exist.  Anything present must parse and validate; fields left out
//! of the file take their default values.

use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::ConfigPort;
use crate::config::{ConfigError, SystemConfig};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "HUMIDIFIER_CONFIG";

pub struct JsonFileConfig {
    path: Option<PathBuf>,
    required: bool,
}

impl JsonFileConfig {
    /// Optional file: defaults apply if it does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            required: false,
        }
    }

    /// The file must exist; a missing one is [`ConfigError::NotFound`].
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            required: true,
        }
    }

    /// No file at all; [`load`](ConfigPort::load) yields the defaults.
    pub fn defaults() -> Self {
        Self {
            path: None,
            required: false,
        }
    }

    /// `--config <path>` from `args`, else `$HUMIDIFIER_CONFIG`, else none.
    pub fn from_args_or_env(args: impl IntoIterator<Item = String>) -> Self {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if let Some(path) = arg.strip_prefix("--config=") {
                return Self::required(path);
            }
            if arg == "--config" {
                if let Some(path) = args.next() {
                    return Self::required(path);
                }
            }
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::new(path),
            None => Self::defaults(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Parse and validate a JSON document.
    pub fn parse(text: &str) -> Result<SystemConfig, ConfigError> {
        let cfg: SystemConfig =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let Some(path) = &self.path else {
            info!("config: no file given, using defaults");
            return Ok(SystemConfig::default());
        };
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let cfg = Self::parse(&text)?;
                info!("config: loaded {}", path.display());
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && self.required => {
                Err(ConfigError::NotFound)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("config: {} not found, using defaults", path.display());
                Ok(SystemConfig::default())
            }
            Err(e) => Err(ConfigError::Parse(format!("{}: {}", path.display(), e))),
        }
    }
}
