//! Grid configuration loaded from environment variables.
//!
//! The planner used to exist as several near-identical pages. Here they are a
//! single board whose behaviour is selected by a [`GridConfig`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::error::ConfigError;

const PEOPLE_VAR: &str = "TURNARIO_PEOPLE";
const COLUMNS_VAR: &str = "TURNARIO_COLUMNS";
const NOTES_VAR: &str = "TURNARIO_NOTES";

/// Names shown on a fresh board
pub const DEFAULT_PEOPLE: &[&str] = &["Sandra", "Emeka", "Precious"];

/// How day columns are labelled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnStyle {
    /// Weekday name only, e.g. `Monday`. Keys never change between weeks.
    Static,
    /// Weekday name and date, e.g. `Monday 03/06`. Keys change every week.
    #[default]
    Dated,
}

impl FromStr for ColumnStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "dated" => Ok(Self::Dated),
            _ => Err(ConfigError::InvalidValue {
                key: COLUMNS_VAR,
                value: s.to_string(),
                expected: "static, dated",
            }),
        }
    }
}

/// Where the popup editor commits its draft
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteMode {
    /// The note replaces the shift text of the cell
    #[default]
    Overwrite,
    /// The note is kept in its own field next to the shift text
    Separate,
}

impl FromStr for NoteMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "separate" => Ok(Self::Separate),
            _ => Err(ConfigError::InvalidValue {
                key: NOTES_VAR,
                value: s.to_string(),
                expected: "overwrite, separate",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub people: Vec<String>,
    pub columns: ColumnStyle,
    pub notes: NoteMode,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            people: DEFAULT_PEOPLE.iter().map(|p| p.to_string()).collect(),
            columns: ColumnStyle::default(),
            notes: NoteMode::default(),
        }
    }
}

impl GridConfig {
    /// Load configuration from the environment.
    ///
    /// Reads `TURNARIO_PEOPLE`, `TURNARIO_COLUMNS` and `TURNARIO_NOTES`,
    /// either from the environment or from a `.env` file. Unset variables
    /// fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(PEOPLE_VAR) {
            config.people = parse_people(&raw);
            debug!(count = config.people.len(), "Default people from environment");
        }
        if let Some(raw) = lookup(COLUMNS_VAR) {
            config.columns = raw.parse()?;
        }
        if let Some(raw) = lookup(NOTES_VAR) {
            config.notes = raw.parse()?;
        }

        Ok(config)
    }
}

/// Split a comma-separated list of names, dropping blanks
fn parse_people(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
