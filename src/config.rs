use std::collections::HashMap;
use std::path::Path;
use std::{fs, io};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::logs::LogConfig;
use crate::policy::config::PolicyConfig;
use crate::types::view::View;

pub trait CommonConfig {
    fn default() -> Self;
    fn complete(&mut self) -> Result<()>;
}

/// Top-level configuration file.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "LogConfig::default")]
    pub logs: LogConfig,

    #[serde(default = "PolicyConfig::default")]
    pub policy: PolicyConfig,

    /// Per-view settings, keyed by view name.
    #[serde(default)]
    pub views: HashMap<String, View>,
}

impl CommonConfig for Config {
    fn default() -> Self {
        Self {
            logs: LogConfig::default(),
            policy: PolicyConfig::default(),
            views: HashMap::new(),
        }
    }

    fn complete(&mut self) -> Result<()> {
        self.logs.complete().context("validate logs config")?;
        self.policy.complete().context("validate policy config")?;

        for (name, view) in self.views.iter_mut() {
            view.name = name.clone();
        }

        Ok(())
    }
}

impl Config {
    /// Loads and validates the config file. The file must exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match Self::read(path)? {
            Some(cfg) => Ok(cfg),
            None => bail!("config file '{}' not found", path.display()),
        }
    }

    /// Like [`load`](Self::load), but returns `None` when the file does not
    /// exist. Callers decide how to report it; the logger may not be set up
    /// yet.
    pub fn read(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        let s = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("read config file '{}'", path.display()));
            }
        };

        let mut cfg = Self::parse(&s)
            .with_context(|| format!("parse config file '{}'", path.display()))?;
        cfg.complete().context("validate config")?;
        Ok(Some(cfg))
    }

    pub fn parse(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parse config toml")?;
        Ok(cfg)
    }

    /// Returns the settings of a view. An unknown view has no settings.
    pub fn view(&self, name: &str) -> View {
        match self.views.get(name) {
            Some(view) => view.clone(),
            None => View::new(name),
        }
    }
}
