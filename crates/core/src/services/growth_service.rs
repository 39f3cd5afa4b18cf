/// Compounding periods per year. Interest compounds once per calendar day.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Grow `principal` at `annual_rate_percent` (7.0 = 7%) compounded daily
/// over `elapsed_days` whole days:
///
/// ```text
/// principal × (1 + r/365)^elapsed_days,   r = annual_rate_percent / 100
/// ```
///
/// `elapsed_days == 0` returns `principal` unchanged. Callers clamp negative
/// day counts to zero before calling; non-finite inputs propagate as
/// `NaN`/`inf` rather than panicking.
pub fn grow(principal: f64, annual_rate_percent: f64, elapsed_days: i64) -> f64 {
    let daily_rate = annual_rate_percent / 100.0 / DAYS_PER_YEAR;
    principal * (1.0 + daily_rate).powf(elapsed_days as f64)
}
