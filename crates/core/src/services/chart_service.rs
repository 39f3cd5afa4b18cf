use crate::models::chart::{ChartRange, GrowthPoint};
use crate::models::profile::ValuationConfig;
use crate::models::transaction::Transaction;

use super::valuation_service::ValuationService;

/// Series longer than this are decimated for display.
pub const MAX_CHART_POINTS: usize = 100;

/// Generates chart-ready growth series.
///
/// The core computes all the numbers; the frontend only renders.
/// Chart data includes:
/// - Daily value from the start date over the selected range
/// - Transaction markers, which survive decimation
pub struct ChartService {
    valuation_service: ValuationService,
}

impl ChartService {
    pub fn new() -> Self {
        Self {
            valuation_service: ValuationService::new(),
        }
    }

    /// Full growth series over `range`, decimated to roughly
    /// [`MAX_CHART_POINTS`] points.
    pub fn generate_chart(
        &self,
        config: &ValuationConfig,
        transactions: &[Transaction],
        range: ChartRange,
    ) -> Vec<GrowthPoint> {
        let series = self
            .valuation_service
            .generate_growth_series(config, transactions, range.days());
        decimate(series, MAX_CHART_POINTS)
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// Thin a series for display.
///
/// Series of at most `max_points` are returned untouched. Longer ones keep
/// every `ceil(len / max_points)`-th point, the last point, and every point
/// with `has_transaction`, so markers are never dropped.
pub fn decimate(series: Vec<GrowthPoint>, max_points: usize) -> Vec<GrowthPoint> {
    let len = series.len();
    if max_points == 0 || len <= max_points {
        return series;
    }

    let step = len.div_ceil(max_points);
    series
        .into_iter()
        .enumerate()
        .filter(|(index, point)| index % step == 0 || *index == len - 1 || point.has_transaction)
        .map(|(_, point)| point)
        .collect()
}
