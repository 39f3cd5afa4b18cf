use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::traits::BaselineProvider;
use crate::errors::CoreError;
use crate::models::app_state::{AppState, LegacyDocument};
use crate::models::profile::ValuationConfig;
use crate::models::settings::Settings;

/// Version stamped on the built-in baseline, matching legacy documents.
pub const DEFAULT_BASELINE_VERSION: &str = "1.0.0";

/// The baseline used when none can be fetched: a single profile with the
/// configured principal and rate, starting one year before `today` unless
/// the settings name a start date.
pub fn default_baseline(settings: &Settings, today: NaiveDate, now: DateTime<Utc>) -> AppState {
    LegacyDocument {
        config: ValuationConfig::new(
            settings.initial_amount,
            settings.annual_interest_rate,
            settings.start_date_or_default(today),
        ),
        transactions: Vec::new(),
        version: DEFAULT_BASELINE_VERSION.to_string(),
        last_modified: now,
    }
    .into_app_state()
}

/// Serves a fixed, already-parsed document. Useful for embedding a baseline
/// at build time and for tests.
pub struct StaticBaselineProvider {
    state: AppState,
}

impl StaticBaselineProvider {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Parse `json` up front; either document shape is accepted.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(Self::new(crate::storage::format::read_document(json)?))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl BaselineProvider for StaticBaselineProvider {
    fn name(&self) -> &str {
        "Static"
    }

    async fn fetch_baseline(&self) -> Result<AppState, CoreError> {
        Ok(self.state.clone())
    }
}
