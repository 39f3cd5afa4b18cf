pub mod chart_service;
pub mod growth_service;
pub mod profile_service;
pub mod valuation_service;
