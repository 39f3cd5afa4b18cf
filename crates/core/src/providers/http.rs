use async_trait::async_trait;
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::BaselineProvider;
use crate::errors::CoreError;
use crate::models::app_state::AppState;
use crate::storage::format::{self, BASELINE_FILE_NAME};

/// Fetches `transactions.json` from the directory the app is served from.
pub struct HttpBaselineProvider {
    client: Client,
    url: String,
}

impl HttpBaselineProvider {
    /// `base_url` is the app's base path, e.g. `https://example.org/tracker/`.
    pub fn new(base_url: &str) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            url: baseline_url(base_url),
        }
    }

    /// The full URL of the baseline document.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl BaselineProvider for HttpBaselineProvider {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn fetch_baseline(&self) -> Result<AppState, CoreError> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Network(format!(
                "Failed to fetch {BASELINE_FILE_NAME}: HTTP {status}"
            )));
        }

        let body = resp.text().await?;
        format::read_document(&body)
    }
}

/// Join the base path and the baseline file name with exactly one slash.
fn baseline_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.is_empty() {
        format!("/{BASELINE_FILE_NAME}")
    } else {
        format!("{base}/{BASELINE_FILE_NAME}")
    }
}
