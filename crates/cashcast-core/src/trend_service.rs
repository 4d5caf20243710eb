//! Month-over-month classification of category spend.

use cashcast_domain::{CategoryBudgetResult, MonthProjection, TrendDirection, TrendResult};

/// Absolute fractional change still considered stable.
pub const STABLE_BAND: f64 = 0.05;

pub struct TrendService;

impl TrendService {
    /// `delta / previous`, infinite with the sign of `delta` when `previous` is zero.
    pub fn percent_change(previous: f64, current: f64) -> f64 {
        let delta = current - previous;
        if previous == 0.0 {
            if delta > 0.0 {
                f64::INFINITY
            } else if delta < 0.0 {
                f64::NEG_INFINITY
            } else {
                0.0
            }
        } else {
            delta / previous
        }
    }

    pub fn classify(percent_change: f64) -> TrendDirection {
        if percent_change.abs() <= STABLE_BAND {
            TrendDirection::Stable
        } else if percent_change > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        }
    }

    /// One trend per category in `current`, compared with the most recent month of
    /// `history` that evaluated the same category.
    pub fn evaluate(
        current: &[CategoryBudgetResult],
        history: &[MonthProjection],
    ) -> Vec<TrendResult> {
        let mut trends: Vec<TrendResult> = Vec::new();
        for result in current {
            if trends.iter().any(|trend| trend.category == result.category) {
                continue;
            }
            let previous = history.iter().rev().find_map(|projection| {
                projection
                    .category_budgets
                    .iter()
                    .find(|prior| prior.category == result.category)
                    .map(|prior| (projection.month, prior.spent))
            });
            let trend = match previous {
                None => TrendResult {
                    category: result.category.clone(),
                    current: result.spent,
                    previous: None,
                    previous_month: None,
                    delta: 0.0,
                    percent_change: 0.0,
                    direction: TrendDirection::NoHistory,
                },
                Some((month, spent)) => {
                    let percent_change = Self::percent_change(spent, result.spent);
                    TrendResult {
                        category: result.category.clone(),
                        current: result.spent,
                        previous: Some(spent),
                        previous_month: Some(month),
                        delta: result.spent - spent,
                        percent_change,
                        direction: Self::classify(percent_change),
                    }
                }
            };
            trends.push(trend);
        }
        trends
    }
}
