pub mod app_state;
pub mod chart;
pub mod profile;
pub mod settings;
pub mod transaction;
