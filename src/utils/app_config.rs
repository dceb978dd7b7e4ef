/// Application configuration management
/// Stores user preferences in ~/.config/timon-dash/config.toml

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::{PollingScheduler, ServiceRegistry, StatusChecker};
use crate::screens::Locale;
use crate::utils::constants::{
    service_def, APP_NAME, DEFAULT_POLL_INTERVAL, DEFAULT_PROBE_TIMEOUT, DEFAULT_TARGET_HOST,
};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub target_host: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub probe_timeout_secs: Option<u64>,
    pub lang: Option<Locale>,
    /// Per-service port overrides, keyed by service key
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub ports: HashMap<String, u16>,
}

/// Values given on the command line; they win over the config file
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub target_host: Option<String>,
    pub interval_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub lang: Option<Locale>,
}

/// Fully resolved runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub target_host: String,
    pub poll_interval: Duration,
    pub probe_timeout: Duration,
    pub lang: Locale,
    pub ports: HashMap<String, u16>,
}

impl AppConfig {
    /// Get config directory
    pub fn config_dir() -> Result<PathBuf> {
        let base = dirs::config_dir().context("Could not determine config directory")?;
        Ok(base.join(APP_NAME))
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path()?)
    }

    /// Load configuration from file; a missing file yields defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    /// Config with every field set to its default, for `config init`
    pub fn with_defaults() -> Self {
        Self {
            target_host: Some(DEFAULT_TARGET_HOST.to_string()),
            poll_interval_secs: Some(DEFAULT_POLL_INTERVAL.as_secs()),
            probe_timeout_secs: Some(DEFAULT_PROBE_TIMEOUT.as_secs()),
            lang: Some(Locale::default()),
            ports: HashMap::new(),
        }
    }

    /// Merge CLI overrides, file values and defaults, then validate
    pub fn resolve(&self, overrides: &ConfigOverrides) -> Result<Settings> {
        let target_host = overrides
            .target_host
            .clone()
            .or_else(|| self.target_host.clone())
            .unwrap_or_else(|| DEFAULT_TARGET_HOST.to_string());

        let interval_secs = overrides
            .interval_secs
            .or(self.poll_interval_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL.as_secs());

        let timeout_secs = overrides
            .timeout_secs
            .or(self.probe_timeout_secs)
            .unwrap_or(DEFAULT_PROBE_TIMEOUT.as_secs());

        let lang = overrides.lang.or(self.lang).unwrap_or_default();

        if target_host.trim().is_empty() {
            bail!("target_host must not be empty");
        }
        if interval_secs == 0 {
            bail!("poll interval must be at least 1 second");
        }
        if timeout_secs == 0 {
            bail!("probe timeout must be at least 1 second");
        }
        if timeout_secs >= interval_secs {
            bail!(
                "probe timeout ({}s) must be shorter than the poll interval ({}s)",
                timeout_secs,
                interval_secs
            );
        }
        for (key, port) in &self.ports {
            if service_def(key).is_none() {
                bail!("unknown service '{}' in [ports]", key);
            }
            if *port == 0 {
                bail!("port for '{}' must not be 0", key);
            }
        }

        Ok(Settings {
            target_host,
            poll_interval: Duration::from_secs(interval_secs),
            probe_timeout: Duration::from_secs(timeout_secs),
            lang,
            ports: self.ports.clone(),
        })
    }
}

impl Settings {
    pub fn registry(&self) -> ServiceRegistry {
        ServiceRegistry::with_port_overrides(&self.ports)
    }

    pub fn checker(&self) -> Result<StatusChecker> {
        StatusChecker::new(self.target_host.clone(), self.probe_timeout)
    }

    pub fn scheduler(&self) -> Result<PollingScheduler> {
        Ok(PollingScheduler::new(
            self.registry(),
            self.checker()?,
            self.poll_interval,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());

        let settings = config.resolve(&ConfigOverrides::default()).unwrap();
        assert_eq!(settings.target_host, "localhost");
        assert_eq!(settings.poll_interval, Duration::from_secs(30));
        assert_eq!(settings.probe_timeout, Duration::from_secs(5));
        assert_eq!(settings.lang, Locale::En);
    }

    #[test]
    fn test_load_file_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "target_host = \"10.0.0.5\"").unwrap();
        writeln!(file, "poll_interval_secs = 60").unwrap();
        writeln!(file, "lang = \"es\"").unwrap();
        writeln!(file, "[ports]").unwrap();
        writeln!(file, "veterinaria = 9002").unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        let settings = config.resolve(&ConfigOverrides::default()).unwrap();

        assert_eq!(settings.target_host, "10.0.0.5");
        assert_eq!(settings.poll_interval, Duration::from_secs(60));
        assert_eq!(settings.lang, Locale::Es);
        assert_eq!(settings.registry().get("veterinaria").unwrap().port, 9002);
    }

    #[test]
    fn test_overrides_win() {
        let config = AppConfig {
            target_host: Some("file-host".to_string()),
            poll_interval_secs: Some(60),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            target_host: Some("cli-host".to_string()),
            interval_secs: Some(10),
            timeout_secs: Some(2),
            lang: Some(Locale::Es),
        };

        let settings = config.resolve(&overrides).unwrap();
        assert_eq!(settings.target_host, "cli-host");
        assert_eq!(settings.poll_interval, Duration::from_secs(10));
        assert_eq!(settings.probe_timeout, Duration::from_secs(2));
        assert_eq!(settings.lang, Locale::Es);
    }

    #[test]
    fn test_validation_errors() {
        let config = AppConfig::default();

        let zero = ConfigOverrides {
            interval_secs: Some(0),
            ..Default::default()
        };
        assert!(config.resolve(&zero).is_err());

        let slow = ConfigOverrides {
            interval_secs: Some(5),
            timeout_secs: Some(5),
            ..Default::default()
        };
        assert!(config.resolve(&slow).is_err());

        let mut unknown = AppConfig::default();
        unknown.ports.insert("clients".to_string(), 9000);
        assert!(unknown.resolve(&ConfigOverrides::default()).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::with_defaults();
        config.ports.insert("petshop".to_string(), 18004);
        config.save_to(&path).unwrap();

        let reloaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval_secs = \"soon\"").unwrap();

        assert!(AppConfig::load_from(file.path()).is_err());
    }
}
