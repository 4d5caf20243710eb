//! Summary derived from a projection and its alerts.

use serde::{Deserialize, Serialize};

use crate::month::MonthKey;

/// A month paired with its ending balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalancePoint {
    pub month: MonthKey,
    pub balance: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionAnalysis {
    /// Deduplicated sentences, most severe first.
    pub insights: Vec<String>,
    pub critical: usize,
    pub warnings: usize,
    pub info: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest_balance: Option<BalancePoint>,
    pub deficit_months: usize,
}

impl ProjectionAnalysis {
    pub fn total_alerts(&self) -> usize {
        self.critical + self.warnings + self.info
    }
}
