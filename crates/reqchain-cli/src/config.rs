//! TOML configuration for the scheduler binary.
//!
//! The core crates never read configuration; everything here is resolved
//! once at startup and handed to them as constructor arguments.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub feed: FeedConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// URL of the OSLC requirement document.
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the ArcadeDB server, e.g. `http://localhost:2480`.
    pub url: String,
    pub database: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between cycle starts.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// How long an in-flight cycle may keep running after a shutdown
    /// request.
    #[serde(default = "default_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            interval_secs: default_interval_secs(),
            shutdown_grace_secs: default_grace_secs(),
        }
    }
}

fn default_username() -> String {
    "root".to_string()
}

fn default_interval_secs() -> u64 {
    300
}

fn default_grace_secs() -> u64 {
    30
}

pub fn load(path: &Path) -> anyhow::Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
}
