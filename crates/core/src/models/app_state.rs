use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::profile::{Profile, ValuationConfig};
use super::transaction::Transaction;

/// Version stamped on documents written by this crate.
pub const APP_STATE_VERSION: &str = "2.0.0";

/// Id, name and emoji given to the single profile of a legacy document.
pub const LEGACY_PROFILE_ID: &str = "default";
pub const LEGACY_PROFILE_NAME: &str = "My Savings";
pub const LEGACY_PROFILE_EMOJI: &str = "💰";

/// The whole persisted document: every profile plus which one is active.
///
/// Never mutated in place by the crate: each operation in
/// [`crate::services::profile_service`] returns a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Profiles keyed by id. Ordered so exports are deterministic.
    pub profiles: BTreeMap<String, Profile>,

    /// Must name a key of `profiles`
    pub active_profile_id: String,

    #[serde(default)]
    pub last_modified: DateTime<Utc>,

    #[serde(default)]
    pub version: String,
}

impl AppState {
    /// A state holding exactly one profile, which is active.
    pub fn with_profile(profile: Profile, now: DateTime<Utc>) -> Self {
        let active_profile_id = profile.id.clone();
        let mut profiles = BTreeMap::new();
        profiles.insert(profile.id.clone(), profile);
        Self {
            profiles,
            active_profile_id,
            last_modified: now,
            version: APP_STATE_VERSION.to_string(),
        }
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(id)
    }

    /// The active profile; falls back to the first profile if the active id is dangling.
    pub fn active_profile(&self) -> Option<&Profile> {
        self.profiles
            .get(&self.active_profile_id)
            .or_else(|| self.profiles.values().next())
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    pub fn first_profile_id(&self) -> Option<&str> {
        self.profiles.keys().next().map(String::as_str)
    }
}

/// Pre-profiles document shape: one config and one transaction list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDocument {
    pub config: ValuationConfig,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub last_modified: DateTime<Utc>,
}

impl LegacyDocument {
    /// Wrap the legacy config and transactions in a single active profile.
    pub fn into_app_state(self) -> AppState {
        let profile = Profile {
            id: LEGACY_PROFILE_ID.to_string(),
            name: LEGACY_PROFILE_NAME.to_string(),
            emoji: LEGACY_PROFILE_EMOJI.to_string(),
            config: self.config,
            transactions: self.transactions,
            created_at: self.last_modified,
            last_modified: self.last_modified,
        };
        let mut state = AppState::with_profile(profile, self.last_modified);
        if !self.version.is_empty() {
            state.version = self.version;
        }
        state
    }
}

/// Either accepted shape of a baseline or imported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaselineDocument {
    Profiles(AppState),
    Legacy(LegacyDocument),
}

impl BaselineDocument {
    pub fn into_app_state(self) -> AppState {
        match self {
            BaselineDocument::Profiles(state) => state,
            BaselineDocument::Legacy(legacy) => legacy.into_app_state(),
        }
    }
}

impl From<AppState> for BaselineDocument {
    fn from(state: AppState) -> Self {
        BaselineDocument::Profiles(state)
    }
}

/// The locally persisted snapshot. Only the fields actually present in the
/// stored document are `Some`; each one overrides the baseline wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<BTreeMap<String, Profile>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_profile_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl From<AppState> for LocalSnapshot {
    fn from(state: AppState) -> Self {
        Self {
            profiles: Some(state.profiles),
            active_profile_id: Some(state.active_profile_id),
            last_modified: Some(state.last_modified),
            version: Some(state.version),
        }
    }
}
