use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::app_state::{AppState, LocalSnapshot, APP_STATE_VERSION};
use crate::models::profile::{truncate_name, ConfigOverrides, Profile, ProfileUpdate, ValuationConfig};
use crate::models::transaction::{NewTransaction, Transaction};

/// Profile and transaction bookkeeping over [`AppState`].
///
/// Pure business logic with no I/O and no clock of its own: timestamps come
/// in as arguments. Every mutation takes the current state by reference and
/// returns a new one, so a failed operation leaves the caller's state as it was.
pub struct ProfileService;

impl ProfileService {
    pub fn new() -> Self {
        Self
    }

    // ── Construction ────────────────────────────────────────────────

    /// A fresh profile with a new id and no transactions. Missing config
    /// fields default to 1000 at 7% starting `today`.
    pub fn create_profile(
        &self,
        name: &str,
        emoji: &str,
        overrides: &ConfigOverrides,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Profile, CoreError> {
        let config = overrides.resolve(today);
        validate_config(&config)?;

        Ok(Profile {
            id: Uuid::new_v4().to_string(),
            name: truncate_name(name),
            emoji: emoji.to_string(),
            config,
            transactions: Vec::new(),
            created_at: now,
            last_modified: now,
        })
    }

    /// Turn boundary input into a stored transaction.
    ///
    /// Rules:
    /// - Amount must be finite and positive
    /// - Date defaults to `today`
    /// - Note defaults to empty
    pub fn build_transaction(
        &self,
        new: NewTransaction,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Transaction, CoreError> {
        if !new.amount.is_finite() || new.amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Transaction amount must be a positive number, got {}",
                new.amount
            )));
        }

        let date = new.date.unwrap_or(today);
        let transaction = Transaction::new(new.transaction_type, new.amount, date, now);
        Ok(match new.note {
            Some(note) => transaction.with_note(note),
            None => transaction,
        })
    }

    // ── Reconciliation ──────────────────────────────────────────────

    /// Reconcile the baseline document with the local snapshot.
    ///
    /// With no snapshot the baseline is returned as is. Otherwise every
    /// top-level field present in the snapshot replaces the baseline's
    /// wholesale (profiles are not merged one by one), transactions are
    /// re-sorted by date and `last_modified` is set to `now`.
    pub fn merge_data(
        &self,
        baseline: AppState,
        local: Option<LocalSnapshot>,
        now: DateTime<Utc>,
    ) -> AppState {
        let Some(local) = local else {
            return baseline;
        };

        let mut merged = baseline;
        if let Some(profiles) = local.profiles {
            merged.profiles = profiles;
        }
        if let Some(active_profile_id) = local.active_profile_id {
            merged.active_profile_id = active_profile_id;
        }
        if let Some(version) = local.version {
            merged.version = version;
        }
        for profile in merged.profiles.values_mut() {
            sort_by_date(&mut profile.transactions);
        }
        merged.last_modified = now;

        debug!(profiles = merged.profiles.len(), "merged local snapshot over baseline");
        merged
    }

    /// Bring a loaded or imported state back within its invariants:
    /// names are cut to length, a dangling active id is repointed to the
    /// first profile, and an empty version is stamped. Fails if there are
    /// no profiles at all.
    pub fn repair(&self, state: AppState) -> Result<AppState, CoreError> {
        let Some(first_id) = state.first_profile_id().map(str::to_string) else {
            return Err(CoreError::InvalidDocument(
                "document contains no profiles".into(),
            ));
        };

        let mut repaired = state;
        for profile in repaired.profiles.values_mut() {
            profile.name = truncate_name(&profile.name);
        }
        if !repaired.profiles.contains_key(&repaired.active_profile_id) {
            info!(
                missing = %repaired.active_profile_id,
                fallback = %first_id,
                "active profile not found, switching to first profile"
            );
            repaired.active_profile_id = first_id;
        }
        if repaired.version.is_empty() {
            repaired.version = APP_STATE_VERSION.to_string();
        }
        Ok(repaired)
    }

    // ── Profiles ────────────────────────────────────────────────────

    pub fn switch_profile(
        &self,
        state: &AppState,
        profile_id: &str,
        now: DateTime<Utc>,
    ) -> Result<AppState, CoreError> {
        ensure_profile(state, profile_id)?;

        Ok(AppState {
            active_profile_id: profile_id.to_string(),
            last_modified: now,
            ..state.clone()
        })
    }

    /// Insert `profile` and make it the active one.
    pub fn add_profile(&self, state: &AppState, profile: Profile, now: DateTime<Utc>) -> AppState {
        let mut profiles = state.profiles.clone();
        let active_profile_id = profile.id.clone();
        profiles.insert(profile.id.clone(), profile);

        AppState {
            profiles,
            active_profile_id,
            last_modified: now,
            version: state.version.clone(),
        }
    }

    pub fn update_profile(
        &self,
        state: &AppState,
        profile_id: &str,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<AppState, CoreError> {
        let current = ensure_profile(state, profile_id)?;
        if let Some(config) = &update.config {
            validate_config(config)?;
        }

        let updated = Profile {
            name: update
                .name
                .as_deref()
                .map(truncate_name)
                .unwrap_or_else(|| current.name.clone()),
            emoji: update.emoji.clone().unwrap_or_else(|| current.emoji.clone()),
            config: update.config.clone().unwrap_or_else(|| current.config.clone()),
            last_modified: now,
            ..current.clone()
        };

        Ok(replace_profile(state, updated, now))
    }

    /// Remove a profile. The last remaining profile cannot be removed; if the
    /// active profile goes, the first remaining one becomes active.
    pub fn delete_profile(
        &self,
        state: &AppState,
        profile_id: &str,
        now: DateTime<Utc>,
    ) -> Result<AppState, CoreError> {
        ensure_profile(state, profile_id)?;
        if state.profile_count() == 1 {
            return Err(CoreError::LastProfile);
        }

        let mut profiles = state.profiles.clone();
        profiles.remove(profile_id);

        let active_profile_id = if state.active_profile_id == profile_id {
            profiles
                .keys()
                .next()
                .cloned()
                .ok_or(CoreError::LastProfile)?
        } else {
            state.active_profile_id.clone()
        };

        Ok(AppState {
            profiles,
            active_profile_id,
            last_modified: now,
            version: state.version.clone(),
        })
    }

    /// Keep only `profile_id`, active. Used for single-profile export.
    pub fn project_profile(&self, state: &AppState, profile_id: &str) -> Result<AppState, CoreError> {
        let profile = ensure_profile(state, profile_id)?.clone();
        let mut projected = AppState::with_profile(profile, state.last_modified);
        projected.version = state.version.clone();
        Ok(projected)
    }

    // ── Transactions (active profile) ───────────────────────────────

    pub fn add_transaction(
        &self,
        state: &AppState,
        transaction: Transaction,
        now: DateTime<Utc>,
    ) -> Result<AppState, CoreError> {
        let current = state.active_profile().ok_or(CoreError::NoActiveProfile)?;

        let mut transactions = current.transactions.clone();
        transactions.push(transaction);

        let updated = Profile {
            transactions,
            last_modified: now,
            ..current.clone()
        };
        Ok(replace_profile(state, updated, now))
    }

    pub fn delete_transaction(
        &self,
        state: &AppState,
        transaction_id: &str,
        now: DateTime<Utc>,
    ) -> Result<AppState, CoreError> {
        let current = state.active_profile().ok_or(CoreError::NoActiveProfile)?;
        if !current.transactions.iter().any(|t| t.id == transaction_id) {
            return Err(CoreError::TransactionNotFound(transaction_id.to_string()));
        }

        let updated = Profile {
            transactions: current
                .transactions
                .iter()
                .filter(|t| t.id != transaction_id)
                .cloned()
                .collect(),
            last_modified: now,
            ..current.clone()
        };
        Ok(replace_profile(state, updated, now))
    }
}

impl Default for ProfileService {
    fn default() -> Self {
        Self::new()
    }
}

/// Initial amount finite and non-negative, rate finite, start date parseable.
pub fn validate_config(config: &ValuationConfig) -> Result<(), CoreError> {
    if !config.initial_amount.is_finite() || config.initial_amount < 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Initial amount must be a non-negative number, got {}",
            config.initial_amount
        )));
    }
    if !config.annual_interest_rate.is_finite() {
        return Err(CoreError::ValidationError(format!(
            "Annual interest rate must be a finite number, got {}",
            config.annual_interest_rate
        )));
    }
    if config.parsed_start_date().is_none() {
        return Err(CoreError::ValidationError(format!(
            "Start date '{}' is not a valid YYYY-MM-DD date",
            config.start_date
        )));
    }
    Ok(())
}

fn ensure_profile<'a>(state: &'a AppState, profile_id: &str) -> Result<&'a Profile, CoreError> {
    state
        .profile(profile_id)
        .ok_or_else(|| CoreError::ProfileNotFound(profile_id.to_string()))
}

fn replace_profile(state: &AppState, profile: Profile, now: DateTime<Utc>) -> AppState {
    let mut profiles = state.profiles.clone();
    profiles.insert(profile.id.clone(), profile);
    AppState {
        profiles,
        active_profile_id: state.active_profile_id.clone(),
        last_modified: now,
        version: state.version.clone(),
    }
}

/// Stable sort by calendar date; unparseable dates go last.
fn sort_by_date(transactions: &mut [Transaction]) {
    transactions.sort_by_key(|t| {
        let date = t.parsed_date();
        (date.is_none(), date)
    });
}
