use serde_json::Value;

use crate::errors::CoreError;
use crate::models::app_state::{AppState, BaselineDocument, LegacyDocument, LocalSnapshot};

/// Name of the snapshot file; the fixed key the local state lives under.
pub const SNAPSHOT_FILE_NAME: &str = "money-tracker-data.json";

/// Name of the baseline document served next to the app.
pub const BASELINE_FILE_NAME: &str = "transactions.json";

/// Parse a baseline or imported document in either accepted shape:
///
/// ```text
/// { profiles, activeProfileId, lastModified, version }   // current
/// { config, transactions, version, lastModified }        // legacy, single profile
/// ```
pub fn read_document(json: &str) -> Result<AppState, CoreError> {
    let value: Value = serde_json::from_str(json)?;
    let document: BaselineDocument = serde_json::from_value(value).map_err(|e| {
        CoreError::InvalidDocument(format!(
            "expected an app state or a legacy {{config, transactions}} document: {e}"
        ))
    })?;
    Ok(document.into_app_state())
}

/// Parse the local snapshot, keeping track of which top-level fields it
/// actually contains. A legacy-shaped snapshot is converted and counts as
/// carrying every field.
pub fn read_snapshot(json: &str) -> Result<LocalSnapshot, CoreError> {
    let value: Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(CoreError::InvalidDocument(
            "snapshot must be a JSON object".into(),
        ));
    }

    if value.get("profiles").is_none() && value.get("config").is_some() {
        let legacy: LegacyDocument = serde_json::from_value(value)?;
        return Ok(LocalSnapshot::from(legacy.into_app_state()));
    }

    Ok(serde_json::from_value(value)?)
}

/// Serialize a state as pretty-printed JSON (the export/snapshot format).
pub fn write_document(state: &AppState) -> Result<String, CoreError> {
    serde_json::to_string_pretty(state)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize app state: {e}")))
}
