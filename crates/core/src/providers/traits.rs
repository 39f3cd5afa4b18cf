use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::app_state::AppState;

/// Source of the baseline document the app starts from when there is no
/// local state (and which local state is merged over).
///
/// Loading it is the only asynchronous step: nothing is valued until it
/// resolves or the caller falls back to
/// [`default_baseline`](super::fallback::default_baseline).
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait BaselineProvider: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch and normalize the baseline. Either document shape is accepted.
    async fn fetch_baseline(&self) -> Result<AppState, CoreError>;
}
