//! Handles settings for the application. Configuration is written in
//! `settings.toml`.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

/// Where the ledger lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rent {
    /// Skip the due-date filter; every occupied unit is charged each cycle.
    /// Re-runs on the same day then duplicate charges, so keep this off
    /// outside of manual testing.
    #[serde(default)]
    pub demo: bool,
    /// Record charges as Cash with the `--` sentinel instead of generated
    /// reference tokens.
    #[serde(default)]
    pub cash_reference: bool,
    #[serde(default = "default_check_interval_hours")]
    pub check_interval_hours: u64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub rent: Rent,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_check_interval_hours() -> u64 {
    24
}
