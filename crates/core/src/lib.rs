pub mod calendar;
pub mod clock;
pub mod currency;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use tracing::{info, warn};

use clock::{Clock, SystemClock};
use errors::CoreError;
use models::{
    app_state::AppState,
    chart::{ChartRange, GrowthPoint},
    profile::{ConfigOverrides, Profile, ProfileUpdate},
    settings::Settings,
    transaction::{NewTransaction, Transaction, TransactionType},
};
use providers::{fallback::default_baseline, traits::BaselineProvider};
use services::{
    chart_service::ChartService, profile_service::ProfileService,
    valuation_service::ValuationService,
};
use storage::{manager::StorageManager, store::SnapshotStore};

/// Longest custom series horizon accepted, in days (100 years).
const MAX_SERIES_HORIZON_DAYS: i64 = 36_500;

/// Main entry point for the Compound Tracker core library.
///
/// Holds the current [`AppState`], the snapshot store it is persisted to and
/// the clock that stands in for "now". Every mutation builds a new state,
/// swaps it in and immediately writes the full snapshot; a failed write is
/// logged and does not undo the change.
#[must_use]
pub struct CompoundTracker<S, C = SystemClock> {
    state: AppState,
    store: S,
    clock: C,
    settings: Settings,
    profile_service: ProfileService,
    valuation_service: ValuationService,
    chart_service: ChartService,
}

impl<S, C> std::fmt::Debug for CompoundTracker<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompoundTracker")
            .field("profiles", &self.state.profiles.len())
            .field("active_profile_id", &self.state.active_profile_id)
            .field("version", &self.state.version)
            .field("settings", &self.settings)
            .finish()
    }
}

impl<S: SnapshotStore, C: Clock> CompoundTracker<S, C> {
    /// Start up: fetch the baseline (or fall back to the built-in default),
    /// merge the local snapshot over it and repair any broken invariants.
    /// Nothing is written until the first mutation.
    pub async fn load(
        provider: &dyn BaselineProvider,
        store: S,
        clock: C,
        settings: Settings,
    ) -> Result<Self, CoreError> {
        let profile_service = ProfileService::new();
        let baseline = fetch_baseline_or_default(provider, &settings, &clock).await;
        let local = StorageManager::load_snapshot(&store);
        let merged = profile_service.merge_data(baseline, local, clock.now());
        let state = repair_or_default(&profile_service, merged, &settings, &clock)?;

        info!(
            profiles = state.profiles.len(),
            active = %state.active_profile_id,
            "loaded app state"
        );
        Ok(Self::build(state, store, clock, settings))
    }

    /// Wrap an existing state without touching the baseline or the store.
    pub fn from_state(
        state: AppState,
        store: S,
        clock: C,
        settings: Settings,
    ) -> Result<Self, CoreError> {
        let state = ProfileService::new().repair(state)?;
        Ok(Self::build(state, store, clock, settings))
    }

    // ── State Access ────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn active_profile_id(&self) -> &str {
        &self.state.active_profile_id
    }

    /// All profiles, ordered by id.
    #[must_use]
    pub fn profiles(&self) -> Vec<&Profile> {
        self.state.profiles.values().collect()
    }

    pub fn active_profile(&self) -> Result<&Profile, CoreError> {
        self.state.active_profile().ok_or(CoreError::NoActiveProfile)
    }

    /// Transactions of the active profile, newest first.
    pub fn transactions(&self) -> Result<Vec<&Transaction>, CoreError> {
        let mut transactions: Vec<&Transaction> =
            self.active_profile()?.transactions.iter().collect();
        transactions.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
        Ok(transactions)
    }

    // ── Profile Management ──────────────────────────────────────────

    pub fn switch_profile(&mut self, profile_id: &str) -> Result<(), CoreError> {
        let next = self
            .profile_service
            .switch_profile(&self.state, profile_id, self.clock.now())?;
        self.commit(next);
        Ok(())
    }

    /// Create a profile and make it active. Returns its id.
    pub fn add_profile(
        &mut self,
        name: &str,
        emoji: &str,
        overrides: &ConfigOverrides,
    ) -> Result<String, CoreError> {
        let now = self.clock.now();
        let profile =
            self.profile_service
                .create_profile(name, emoji, overrides, self.clock.today(), now)?;
        let id = profile.id.clone();
        let next = self.profile_service.add_profile(&self.state, profile, now);
        info!(profile = %id, "added profile");
        self.commit(next);
        Ok(id)
    }

    pub fn update_profile(
        &mut self,
        profile_id: &str,
        update: &ProfileUpdate,
    ) -> Result<(), CoreError> {
        let next =
            self.profile_service
                .update_profile(&self.state, profile_id, update, self.clock.now())?;
        self.commit(next);
        Ok(())
    }

    /// Delete a profile. Fails on the last remaining one.
    pub fn delete_profile(&mut self, profile_id: &str) -> Result<(), CoreError> {
        let next = self
            .profile_service
            .delete_profile(&self.state, profile_id, self.clock.now())?;
        info!(profile = %profile_id, active = %next.active_profile_id, "deleted profile");
        self.commit(next);
        Ok(())
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Record a transaction on the active profile. Returns its id.
    ///
    /// Withdrawals larger than the active profile's balance today are
    /// rejected with [`CoreError::InsufficientBalance`].
    pub fn add_transaction(&mut self, new: NewTransaction) -> Result<String, CoreError> {
        let today = self.clock.today();
        let now = self.clock.now();
        let transaction = self.profile_service.build_transaction(new, today, now)?;

        if transaction.transaction_type == TransactionType::Withdrawal {
            let profile = self.active_profile()?;
            self.valuation_service.validate_withdrawal(
                &profile.config,
                &profile.transactions,
                transaction.amount,
                today,
            )?;
        }

        let id = transaction.id.clone();
        let next = self
            .profile_service
            .add_transaction(&self.state, transaction, now)?;
        self.commit(next);
        Ok(id)
    }

    pub fn delete_transaction(&mut self, transaction_id: &str) -> Result<(), CoreError> {
        let next =
            self.profile_service
                .delete_transaction(&self.state, transaction_id, self.clock.now())?;
        self.commit(next);
        Ok(())
    }

    // ── Valuation ───────────────────────────────────────────────────

    /// Balance of the active profile today.
    pub fn current_value(&self) -> Result<f64, CoreError> {
        self.current_value_at(self.clock.today())
    }

    /// Balance of the active profile on `date`.
    pub fn current_value_at(&self, date: NaiveDate) -> Result<f64, CoreError> {
        let profile = self.active_profile()?;
        Ok(self
            .valuation_service
            .current_value(&profile.config, &profile.transactions, date))
    }

    /// Balance of any profile on `date`.
    pub fn profile_value_at(&self, profile_id: &str, date: NaiveDate) -> Result<f64, CoreError> {
        let profile = self
            .state
            .profile(profile_id)
            .ok_or_else(|| CoreError::ProfileNotFound(profile_id.to_string()))?;
        Ok(self
            .valuation_service
            .current_value(&profile.config, &profile.transactions, date))
    }

    /// Undecimated daily series of the active profile over `horizon_days`.
    pub fn growth_series(&self, horizon_days: i64) -> Result<Vec<GrowthPoint>, CoreError> {
        if !(0..=MAX_SERIES_HORIZON_DAYS).contains(&horizon_days) {
            return Err(CoreError::ValidationError(format!(
                "Horizon of {horizon_days} days is outside 0..={MAX_SERIES_HORIZON_DAYS}"
            )));
        }
        let profile = self.active_profile()?;
        Ok(self.valuation_service.generate_growth_series(
            &profile.config,
            &profile.transactions,
            horizon_days,
        ))
    }

    /// Decimated chart series of the active profile for a preset range.
    pub fn chart(&self, range: ChartRange) -> Result<Vec<GrowthPoint>, CoreError> {
        let profile = self.active_profile()?;
        Ok(self
            .chart_service
            .generate_chart(&profile.config, &profile.transactions, range))
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// The whole state as JSON, or only the active profile if
    /// `current_profile_only`.
    pub fn export_json(&self, current_profile_only: bool) -> Result<String, CoreError> {
        if current_profile_only {
            let id = self.active_profile()?.id.clone();
            let projected = self.profile_service.project_profile(&self.state, &id)?;
            StorageManager::export_to_json(&projected)
        } else {
            StorageManager::export_to_json(&self.state)
        }
    }

    /// Replace the whole state with an imported document (either shape).
    pub fn import_json(&mut self, json: &str) -> Result<(), CoreError> {
        let imported = StorageManager::import_from_json(json)?;
        let next = self.profile_service.repair(imported)?;
        info!(profiles = next.profiles.len(), "imported app state");
        self.commit(next);
        Ok(())
    }

    /// Discard the local snapshot and start over from the baseline.
    ///
    /// The snapshot is only cleared once a usable state has been built, so
    /// a failed reset leaves both the state and the snapshot as they were.
    pub async fn reset_to_baseline(
        &mut self,
        provider: &dyn BaselineProvider,
    ) -> Result<(), CoreError> {
        let baseline = fetch_baseline_or_default(provider, &self.settings, &self.clock).await;
        let state = repair_or_default(&self.profile_service, baseline, &self.settings, &self.clock)?;

        if let Err(e) = StorageManager::clear_snapshot(&mut self.store) {
            warn!(error = %e, "failed to clear local snapshot");
        }
        self.state = state;
        info!("reset to baseline");
        Ok(())
    }

    // ── Internal ────────────────────────────────────────────────────

    fn commit(&mut self, state: AppState) {
        self.state = state;
        if let Err(e) = StorageManager::save_snapshot(&mut self.store, &self.state) {
            warn!(error = %e, "failed to persist snapshot");
        }
    }

    fn build(state: AppState, store: S, clock: C, settings: Settings) -> Self {
        Self {
            state,
            store,
            clock,
            settings,
            profile_service: ProfileService::new(),
            valuation_service: ValuationService::new(),
            chart_service: ChartService::new(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl<C: Clock> CompoundTracker<storage::store::FileSnapshotStore, C> {
    /// Start up from `settings` alone: the snapshot lives in `data_dir` and
    /// the baseline comes from `baseline_url`, or from `data_dir` if unset.
    pub async fn open(settings: Settings, clock: C) -> Result<Self, CoreError> {
        let store = storage::store::FileSnapshotStore::in_dir(&settings.data_dir);
        let provider = providers::baseline_provider(&settings);
        Self::load(provider.as_ref(), store, clock, settings).await
    }
}

async fn fetch_baseline_or_default<C: Clock>(
    provider: &dyn BaselineProvider,
    settings: &Settings,
    clock: &C,
) -> AppState {
    match provider.fetch_baseline().await {
        Ok(state) => state,
        Err(e) => {
            warn!(
                provider = provider.name(),
                error = %e,
                "baseline unavailable, using built-in default"
            );
            default_baseline(settings, clock.today(), clock.now())
        }
    }
}

/// Repair `state`, or fall back to the built-in default if it has nothing usable.
fn repair_or_default<C: Clock>(
    profile_service: &ProfileService,
    state: AppState,
    settings: &Settings,
    clock: &C,
) -> Result<AppState, CoreError> {
    match profile_service.repair(state) {
        Ok(state) => Ok(state),
        Err(e) => {
            warn!(error = %e, "state unusable, starting from the built-in default");
            profile_service.repair(default_baseline(settings, clock.today(), clock.now()))
        }
    }
}
