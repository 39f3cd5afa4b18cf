use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;
use crate::calendar;

/// Longest profile name kept on write, in characters.
pub const MAX_PROFILE_NAME_CHARS: usize = 50;

pub const DEFAULT_INITIAL_AMOUNT: f64 = 1000.0;
pub const DEFAULT_ANNUAL_INTEREST_RATE: f64 = 7.0;

/// The three inputs of the growth curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationConfig {
    /// Starting principal, non-negative
    pub initial_amount: f64,

    /// Annual rate as a percentage: `7.0` means 7%
    pub annual_interest_rate: f64,

    /// First day of growth (`YYYY-MM-DD`)
    pub start_date: String,
}

impl ValuationConfig {
    pub fn new(initial_amount: f64, annual_interest_rate: f64, start_date: NaiveDate) -> Self {
        Self {
            initial_amount,
            annual_interest_rate,
            start_date: calendar::format_date(start_date),
        }
    }

    pub fn parsed_start_date(&self) -> Option<NaiveDate> {
        calendar::parse_date(&self.start_date)
    }
}

/// Partial config used when creating a profile; every `None` takes its default.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigOverrides {
    pub initial_amount: Option<f64>,
    pub annual_interest_rate: Option<f64>,
    pub start_date: Option<NaiveDate>,
}

impl ConfigOverrides {
    /// Fill missing fields: 1000 at 7% starting `today`.
    pub fn resolve(&self, today: NaiveDate) -> ValuationConfig {
        ValuationConfig::new(
            self.initial_amount.unwrap_or(DEFAULT_INITIAL_AMOUNT),
            self.annual_interest_rate
                .unwrap_or(DEFAULT_ANNUAL_INTEREST_RATE),
            self.start_date.unwrap_or(today),
        )
    }
}

/// A named, independently valued balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    pub config: ValuationConfig,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_modified: DateTime<Utc>,
}

/// Fields of a profile that can be replaced by an update. `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub emoji: Option<String>,
    pub config: Option<ValuationConfig>,
}

impl ProfileUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn config(config: ValuationConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::default()
        }
    }
}

/// Cut a name down to [`MAX_PROFILE_NAME_CHARS`] characters (not bytes).
pub fn truncate_name(name: &str) -> String {
    name.chars().take(MAX_PROFILE_NAME_CHARS).collect()
}
