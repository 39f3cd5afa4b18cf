pub mod fallback;
pub mod traits;

// Baseline sources
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
pub mod http;

use crate::models::settings::Settings;
use traits::BaselineProvider;

/// The baseline source named by `settings`: HTTP when a `baseline_url` is
/// set, otherwise `transactions.json` in `data_dir`.
pub fn baseline_provider(settings: &Settings) -> Box<dyn BaselineProvider> {
    match settings.baseline_url.as_deref() {
        Some(url) => Box::new(http::HttpBaselineProvider::new(url)),
        #[cfg(not(target_arch = "wasm32"))]
        None => Box::new(file::FileBaselineProvider::in_dir(&settings.data_dir)),
        #[cfg(target_arch = "wasm32")]
        None => Box::new(http::HttpBaselineProvider::new("")),
    }
}
