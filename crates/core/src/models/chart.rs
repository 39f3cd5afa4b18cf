use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// One day of a growth series.
///
/// The core generates these; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPoint {
    /// Calendar date of this point
    pub date: NaiveDate,

    /// Offset in days from the profile's start date
    pub day: i64,

    /// Principal plus every transaction dated on or before `date`, each grown to `date`
    pub amount: f64,

    /// Whether any transaction is dated exactly on `date`
    pub has_transaction: bool,

    /// The transactions dated exactly on `date`
    pub transactions_on_this_day: Vec<Transaction>,
}

/// Preset chart horizons offered by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartRange {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
}

impl ChartRange {
    pub const ALL: [ChartRange; 4] = [
        ChartRange::OneMonth,
        ChartRange::SixMonths,
        ChartRange::OneYear,
        ChartRange::FiveYears,
    ];

    /// Horizon in days for this range.
    pub fn days(self) -> i64 {
        match self {
            ChartRange::OneMonth => 30,
            ChartRange::SixMonths => 180,
            ChartRange::OneYear => 365,
            ChartRange::FiveYears => 365 * 5,
        }
    }

    /// Parse a label such as `"6M"`. Unknown labels fall back to one year.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        ChartRange::ALL
            .into_iter()
            .find(|range| range.label() == label)
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartRange::OneMonth => "1M",
            ChartRange::SixMonths => "6M",
            ChartRange::OneYear => "1Y",
            ChartRange::FiveYears => "5Y",
        }
    }
}

impl std::fmt::Display for ChartRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
