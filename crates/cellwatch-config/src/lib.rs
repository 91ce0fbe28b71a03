//! Shared configuration for the cellwatch CLI.
//!
//! TOML profiles with figment layering (defaults ← file ← `CELLWATCH_*`
//! environment) and translation to `cellwatch_core::MonitorConfig`.
//! Core never reads config files -- it receives a pre-built
//! `MonitorConfig`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cellwatch_core::MonitorConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    /// Global defaults, overridable per profile.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named reporting profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub https: bool,

    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Seconds between reporting cycles.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            port: default_port(),
            https: false,
            health_path: default_health_path(),
            interval_secs: default_interval(),
        }
    }
}

fn default_port() -> u16 {
    5000
}
fn default_health_path() -> String {
    "/api/health".into()
}
fn default_interval() -> u64 {
    3
}

/// A named reporting profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// A known server host, tried ahead of every discovery strategy.
    pub server: Option<String>,

    /// Override the shared port.
    pub port: Option<u16>,

    /// Override the https flag.
    pub https: Option<bool>,

    /// Override the health route.
    pub health_path: Option<String>,

    /// Override the reporting interval.
    pub interval_secs: Option<u64>,

    /// Stable device identity. Generated (and not persisted) when absent.
    pub device_id: Option<String>,

    /// Hardware model string sent at registration.
    pub device_model: Option<String>,

    /// Extra hosts for the priority-list strategy, tried in order.
    #[serde(default)]
    pub priority_hosts: Vec<String>,
}

// ── Loading ─────────────────────────────────────────────────────────

/// Default config file location (`~/.config/cellwatch/config.toml` on
/// Linux).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "cellwatch", "cellwatch")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("cellwatch.toml"))
}

/// Load configuration with figment layering:
/// serialized defaults ← TOML file ← `CELLWATCH_*` environment.
pub fn load_config(path: &std::path::Path) -> Result<Config, ConfigError> {
    let config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CELLWATCH_").split("__"))
        .extract()?;
    Ok(config)
}

/// Load from the default path, falling back to defaults when the file
/// does not exist or fails to parse.
pub fn load_config_or_default() -> Config {
    load_config(&config_path()).unwrap_or_default()
}

/// Write a starter config file (no-op if one already exists).
pub fn write_default_config(path: &std::path::Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, rendered)?;
    Ok(true)
}

// ── Resolution ──────────────────────────────────────────────────────

impl Config {
    /// The profile to use: the named one, or the configured default, or
    /// an empty profile when neither exists.
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<Profile, ConfigError> {
        match name.or(self.default_profile.as_deref()) {
            None => Ok(Profile::default()),
            Some(wanted) => match self.profiles.get(wanted) {
                Some(profile) => Ok(profile.clone()),
                // An absent *default* profile is fine; an explicitly
                // requested one must exist.
                None if name.is_none() => Ok(Profile::default()),
                None => Err(ConfigError::ProfileNotFound {
                    name: wanted.into(),
                    available: {
                        let mut names: Vec<_> =
                            self.profiles.keys().map(String::as_str).collect();
                        names.sort_unstable();
                        names.join(", ")
                    },
                }),
            },
        }
    }

    /// Build a [`MonitorConfig`] from this config and a profile.
    pub fn to_monitor_config(&self, profile: &Profile) -> Result<MonitorConfig, ConfigError> {
        let base = MonitorConfig::default();

        let port = profile.port.unwrap_or(self.defaults.port);
        if port == 0 {
            return Err(ConfigError::Validation {
                field: "port".into(),
                reason: "must be nonzero".into(),
            });
        }

        let health_path = profile
            .health_path
            .clone()
            .unwrap_or_else(|| self.defaults.health_path.clone());
        if !health_path.starts_with('/') {
            return Err(ConfigError::Validation {
                field: "health_path".into(),
                reason: "must start with '/'".into(),
            });
        }

        let interval_secs = profile.interval_secs.unwrap_or(self.defaults.interval_secs);
        if !(1..=3600).contains(&interval_secs) {
            return Err(ConfigError::Validation {
                field: "interval_secs".into(),
                reason: "must be between 1 and 3600".into(),
            });
        }

        // A pinned server leads the priority list; discovery still runs
        // the remaining strategies if it does not answer.
        let mut priority_hosts = Vec::new();
        if let Some(server) = &profile.server {
            priority_hosts.push(server.clone());
        }
        priority_hosts.extend(profile.priority_hosts.iter().cloned());
        priority_hosts.extend(base.priority_hosts.iter().cloned());
        priority_hosts.dedup();

        Ok(MonitorConfig {
            device_id: profile
                .device_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            device_model: profile
                .device_model
                .clone()
                .unwrap_or_else(|| base.device_model.clone()),
            https: profile.https.unwrap_or(self.defaults.https),
            port,
            health_path,
            interval: Duration::from_secs(interval_secs),
            priority_hosts,
            ..base
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_toml(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_resolve_without_a_file() {
        let config = Config::default();
        let profile = config.resolve_profile(None).unwrap();
        let monitor = config.to_monitor_config(&profile).unwrap();

        assert_eq!(monitor.port, 5000);
        assert_eq!(monitor.health_path, "/api/health");
        assert_eq!(monitor.interval, Duration::from_secs(3));
        assert!(!monitor.https);
    }

    #[test]
    fn profile_overrides_win_over_defaults() {
        let (_dir, path) = write_toml(
            r#"
            default_profile = "lab"

            [defaults]
            port = 5000

            [profiles.lab]
            server = "192.168.50.20"
            port = 8080
            https = true
            interval_secs = 10
            device_id = "lab-handset-1"
            "#,
        );

        let config = load_config(&path).unwrap();
        let profile = config.resolve_profile(None).unwrap();
        let monitor = config.to_monitor_config(&profile).unwrap();

        assert_eq!(monitor.port, 8080);
        assert!(monitor.https);
        assert_eq!(monitor.interval, Duration::from_secs(10));
        assert_eq!(monitor.device_id, "lab-handset-1");
        assert_eq!(monitor.priority_hosts[0], "192.168.50.20");
    }

    #[test]
    fn pinned_server_leads_the_priority_list() {
        let config = Config::default();
        let profile = Profile {
            server: Some("10.1.2.3".into()),
            priority_hosts: vec!["10.9.9.9".into()],
            ..Profile::default()
        };

        let monitor = config.to_monitor_config(&profile).unwrap();
        assert_eq!(monitor.priority_hosts[0], "10.1.2.3");
        assert_eq!(monitor.priority_hosts[1], "10.9.9.9");
        // Built-in fallbacks still trail the list.
        assert!(monitor.priority_hosts.contains(&"127.0.0.1".to_string()));
    }

    #[test]
    fn unknown_named_profile_is_an_error() {
        let config = Config::default();
        let err = config.resolve_profile(Some("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound { .. }));
    }

    #[test]
    fn out_of_range_interval_is_rejected() {
        let config = Config::default();
        let profile = Profile {
            interval_secs: Some(0),
            ..Profile::default()
        };
        let err = config.to_monitor_config(&profile).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "interval_secs"));
    }

    #[test]
    fn relative_health_path_is_rejected() {
        let config = Config::default();
        let profile = Profile {
            health_path: Some("api/health".into()),
            ..Profile::default()
        };
        let err = config.to_monitor_config(&profile).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "health_path"));
    }

    #[test]
    fn missing_device_id_generates_one() {
        let config = Config::default();
        let a = config
            .to_monitor_config(&Profile::default())
            .unwrap()
            .device_id;
        let b = config
            .to_monitor_config(&Profile::default())
            .unwrap()
            .device_id;
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn starter_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(write_default_config(&path).unwrap());
        assert!(!write_default_config(&path).unwrap(), "second write is a no-op");

        let config = load_config(&path).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
    }
}
