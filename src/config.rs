//! Layered settings.
//!
//! Sources in increasing precedence: built-in defaults, an optional TOML
//! file, `RAIDWATCH_*` environment variables and command-line flags.
//!
//! ```toml
//! hostname = "array1.example.net"
//! community = "monitor"
//! timeout = 20
//! blacklist = "battery,absent_drives"
//! fan_warning = 5500
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::decode::{Blacklist, Thresholds};
use crate::error::SettingsError;

/// Prefix for environment overrides, e.g. `RAIDWATCH_COMMUNITY`.
pub const ENV_PREFIX: &str = "RAIDWATCH";

/// Everything a check run is configured with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub hostname: String,
    pub community: String,
    pub snmp_version: String,
    /// Overall run timeout in seconds.
    pub timeout: u64,
    /// Comma-separated category tags.
    #[serde(default)]
    pub blacklist: String,
    pub fan_warning: Option<i64>,
    pub fan_critical: Option<i64>,
    pub temperature_warning: Option<i64>,
    pub temperature_critical: Option<i64>,
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub hostname: Option<String>,
    pub community: Option<String>,
    pub snmp_version: Option<String>,
    pub timeout: Option<u64>,
    pub blacklist: Option<String>,
    pub fan_warning: Option<i64>,
    pub fan_critical: Option<i64>,
    pub temperature_warning: Option<i64>,
    pub temperature_critical: Option<i64>,
}

impl Settings {
    /// Load settings from every source.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self, SettingsError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX), overrides)
    }

    fn load_with_env(path: Option<&Path>, env: Environment, overrides: &Overrides) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            .set_default("hostname", "localhost")?
            .set_default("community", "public")?
            .set_default("snmp_version", "2c")?
            .set_default("timeout", 10_i64)?
            .set_default("blacklist", "")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(env)
            .set_override_option("hostname", overrides.hostname.clone())?
            .set_override_option("community", overrides.community.clone())?
            .set_override_option("snmp_version", overrides.snmp_version.clone())?
            .set_override_option("timeout", overrides.timeout)?
            .set_override_option("blacklist", overrides.blacklist.clone())?
            .set_override_option("fan_warning", overrides.fan_warning)?
            .set_override_option("fan_critical", overrides.fan_critical)?
            .set_override_option("temperature_warning", overrides.temperature_warning)?
            .set_override_option("temperature_critical", overrides.temperature_critical)?
            .build()?
            .try_deserialize()?;

        // reject unknown tags before any query runs
        settings.blacklist()?;
        Ok(settings)
    }

    pub fn blacklist(&self) -> Result<Blacklist, SettingsError> {
        Ok(self.blacklist.parse()?)
    }

    /// Default thresholds with any configured overrides applied.
    pub fn thresholds(&self) -> Thresholds {
        let mut thresholds = Thresholds::default();
        if let Some(v) = self.fan_warning {
            thresholds.fan_warning = v;
        }
        if let Some(v) = self.fan_critical {
            thresholds.fan_critical = v;
        }
        if let Some(v) = self.temperature_warning {
            thresholds.temperature_warning = v;
        }
        if let Some(v) = self.temperature_critical {
            thresholds.temperature_critical = v;
        }
        thresholds
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
