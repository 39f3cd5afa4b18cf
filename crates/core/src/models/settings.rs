use chrono::{Months, NaiveDate};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::profile::{DEFAULT_ANNUAL_INTEREST_RATE, DEFAULT_INITIAL_AMOUNT};
use crate::errors::CoreError;

/// Prefix of the environment variables read by [`Settings::load`],
/// e.g. `COMPOUND_TRACKER_INITIAL_AMOUNT`.
pub const ENV_PREFIX: &str = "COMPOUND_TRACKER";

/// Application defaults, layered from built-ins, an optional TOML file and
/// the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Principal of the fallback baseline profile
    pub initial_amount: f64,

    /// Annual rate (percent) of the fallback baseline profile
    pub annual_interest_rate: f64,

    /// Start date of the fallback baseline profile. Defaults to one year before today.
    pub start_date: Option<NaiveDate>,

    /// Directory holding the local snapshot file, and the baseline when
    /// no `baseline_url` is set
    pub data_dir: PathBuf,

    /// Base URL `transactions.json` is fetched from
    pub baseline_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_amount: DEFAULT_INITIAL_AMOUNT,
            annual_interest_rate: DEFAULT_ANNUAL_INTEREST_RATE,
            start_date: None,
            data_dir: PathBuf::from("."),
            baseline_url: None,
        }
    }
}

impl Settings {
    /// Built-in defaults, overridden by `path` (if it exists) and then by
    /// `COMPOUND_TRACKER_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults overridden by an in-memory TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, CoreError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// The configured start date, or the same day one year before `today`.
    pub fn start_date_or_default(&self, today: NaiveDate) -> NaiveDate {
        self.start_date
            .or_else(|| today.checked_sub_months(Months::new(12)))
            .unwrap_or(today)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if !self.initial_amount.is_finite() || self.initial_amount < 0.0 {
            return Err(CoreError::Config(format!(
                "initial_amount must be a non-negative number, got {}",
                self.initial_amount
            )));
        }
        if !self.annual_interest_rate.is_finite() {
            return Err(CoreError::Config(format!(
                "annual_interest_rate must be finite, got {}",
                self.annual_interest_rate
            )));
        }
        Ok(())
    }
}
