// Settings module
// Application configuration (config.toml + environment) and the session store

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_API_BASE: &str = "TRIP_PLANNER_API_BASE";
pub const ENV_TOKEN: &str = "TRIP_PLANNER_TOKEN";
pub const ENV_TRIP_ID: &str = "TRIP_PLANNER_TRIP_ID";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the REST collaborator
    pub api_base: String,
    pub request_timeout_secs: u64,
    /// Retries for idempotent reads; writes are never retried
    pub max_retries: usize,
    pub retry_delay_ms: u64,
    /// Trip opened at startup
    pub default_trip_id: Option<i64>,
    /// First hour row shown on the board
    pub first_hour: u8,
    /// Hour row bound (exclusive)
    pub last_hour: u8,
    /// Override for the key-value state file
    pub state_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 20,
            max_retries: 2,
            retry_delay_ms: 400,
            default_trip_id: None,
            first_hour: 8,
            last_hour: 23,
            state_path: None,
        }
    }
}

impl AppConfig {
    /// Load from a TOML file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        Self::from_toml(&data)
            .with_context(|| format!("failed to parse config from {}", path.display()))
    }

    pub fn from_toml(data: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(data)?;
        config.normalize();
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            self.api_base = base.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TRIP_ID) {
            match raw.trim().parse() {
                Ok(id) => self.default_trip_id = Some(id),
                Err(err) => log::warn!("Ignoring invalid {}='{}': {}", ENV_TRIP_ID, raw, err),
            }
        }
        self.normalize();
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "TripPlanner", "TripPlanner")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Resolved key-value state file location.
    pub fn resolved_state_path(&self) -> Option<PathBuf> {
        self.state_path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "TripPlanner", "TripPlanner")
                .map(|dirs| dirs.data_dir().join("board_state.json"))
        })
    }

    /// Hour rows shown on the board.
    pub fn visible_hours(&self) -> std::ops::Range<u8> {
        self.first_hour..self.last_hour
    }

    fn normalize(&mut self) {
        while self.api_base.ends_with('/') {
            self.api_base.pop();
        }
        self.last_hour = self.last_hour.min(24);
        if self.first_hour >= self.last_hour {
            log::warn!(
                "Hour range {}..{} is empty, falling back to 8..23",
                self.first_hour,
                self.last_hour
            );
            self.first_hour = 8;
            self.last_hour = 23;
        }
    }
}

/// Opaque bearer token held for the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var(ENV_TOKEN).ok())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn sign_out(&mut self) {
        self.token = None;
    }
}
