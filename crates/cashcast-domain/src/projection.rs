//! Month-by-month projection output and the per-rule results attached to it.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    month::MonthKey,
    transaction::{DeferredStatus, FlowKind},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CeilingState {
    NotReached,
    Reached,
    Exceeded,
}

impl CeilingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CeilingState::NotReached => "NOT_REACHED",
            CeilingState::Reached => "REACHED",
            CeilingState::Exceeded => "EXCEEDED",
        }
    }
}

impl fmt::Display for CeilingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CeilingStatus {
    pub rule_id: Uuid,
    pub ceiling: f64,
    pub outflow: f64,
    pub state: CeilingState,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeferredResolution {
    pub transaction_id: Uuid,
    pub kind: FlowKind,
    pub amount: f64,
    pub priority: u32,
    pub target_month: MonthKey,
    pub status: DeferredStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl DeferredResolution {
    /// Signed balance effect of the resolution in its month (zero unless cash moves).
    pub fn cash_effect(&self) -> f64 {
        if self.status.moves_cash() {
            self.kind.sign() * self.amount
        } else {
            0.0
        }
    }
}

/// Amount contributed by one recurring charge in a month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringResolution {
    pub charge_id: Uuid,
    pub kind: FlowKind,
    pub amount: f64,
    /// Month of the override in force, when the base amount was replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_month: Option<MonthKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    Ok,
    Warning,
    Reached,
    Exceeded,
    Inactive,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::Ok => "OK",
            BudgetStatus::Warning => "WARNING",
            BudgetStatus::Reached => "REACHED",
            BudgetStatus::Exceeded => "EXCEEDED",
            BudgetStatus::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBudgetResult {
    pub budget_id: Uuid,
    pub category: String,
    pub budget: f64,
    pub spent: f64,
    pub ratio: f64,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RollingBudgetResult {
    pub budget_id: Uuid,
    pub category: String,
    pub window_months: u32,
    pub window_start: MonthKey,
    pub budget: f64,
    pub spent: f64,
    pub ratio: f64,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultiMonthBudgetResult {
    pub budget_id: Uuid,
    pub category: String,
    pub period_start: MonthKey,
    pub period_end: MonthKey,
    pub budget: f64,
    pub spent: f64,
    pub ratio: f64,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    NoHistory,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "INCREASING",
            TrendDirection::Decreasing => "DECREASING",
            TrendDirection::Stable => "STABLE",
            TrendDirection::NoHistory => "NO_HISTORY",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub category: String,
    pub current: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_month: Option<MonthKey>,
    pub delta: f64,
    /// Fractional change (0.4 = +40%); infinite when the previous spend was zero.
    pub percent_change: f64,
    pub direction: TrendDirection,
}

/// Cash-flow totals of one month before any rule is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthFlows {
    pub opening_balance: f64,
    pub income: f64,
    pub expenses: f64,
    pub fixed_charges: f64,
    pub deferred_in: f64,
    pub carried_over_deficit: f64,
}

impl MonthFlows {
    pub fn ending_balance(&self) -> f64 {
        self.opening_balance + self.income - self.expenses - self.fixed_charges + self.deferred_in
            - self.carried_over_deficit
    }
}

/// The computed state of one simulated month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthProjection {
    pub month: MonthKey,
    pub opening_balance: f64,
    pub income: f64,
    pub expenses: f64,
    pub fixed_charges: f64,
    pub deferred_in: f64,
    pub carried_over_deficit: f64,
    pub ending_balance: f64,
    #[serde(default)]
    pub recurring: Vec<RecurringResolution>,
    #[serde(default)]
    pub ceilings: Vec<CeilingStatus>,
    #[serde(default)]
    pub deferred_resolutions: Vec<DeferredResolution>,
    #[serde(default)]
    pub category_budgets: Vec<CategoryBudgetResult>,
    #[serde(default)]
    pub rolling_budgets: Vec<RollingBudgetResult>,
    #[serde(default)]
    pub multi_month_budgets: Vec<MultiMonthBudgetResult>,
    #[serde(default)]
    pub trends: Vec<TrendResult>,
    #[serde(default)]
    pub category_spending: BTreeMap<String, f64>,
}

impl MonthProjection {
    /// Starts a projection from its cash flows; rule results are attached by the `with_*` stages.
    pub fn from_flows(month: MonthKey, flows: MonthFlows) -> Self {
        Self {
            month,
            opening_balance: flows.opening_balance,
            income: flows.income,
            expenses: flows.expenses,
            fixed_charges: flows.fixed_charges,
            deferred_in: flows.deferred_in,
            carried_over_deficit: flows.carried_over_deficit,
            ending_balance: flows.ending_balance(),
            recurring: Vec::new(),
            ceilings: Vec::new(),
            deferred_resolutions: Vec::new(),
            category_budgets: Vec::new(),
            rolling_budgets: Vec::new(),
            multi_month_budgets: Vec::new(),
            trends: Vec::new(),
            category_spending: BTreeMap::new(),
        }
    }

    pub fn with_recurring(mut self, recurring: Vec<RecurringResolution>) -> Self {
        self.recurring = recurring;
        self
    }

    pub fn with_deferred(mut self, resolutions: Vec<DeferredResolution>) -> Self {
        self.deferred_resolutions = resolutions;
        self
    }

    pub fn with_category_spending(mut self, spending: BTreeMap<String, f64>) -> Self {
        self.category_spending = spending;
        self
    }

    pub fn with_ceilings(mut self, ceilings: Vec<CeilingStatus>) -> Self {
        self.ceilings = ceilings;
        self
    }

    pub fn with_budgets(
        mut self,
        category: Vec<CategoryBudgetResult>,
        rolling: Vec<RollingBudgetResult>,
        multi_month: Vec<MultiMonthBudgetResult>,
    ) -> Self {
        self.category_budgets = category;
        self.rolling_budgets = rolling;
        self.multi_month_budgets = multi_month;
        self
    }

    pub fn with_trends(mut self, trends: Vec<TrendResult>) -> Self {
        self.trends = trends;
        self
    }

    /// Total outflow used for ceilings: expenses plus fixed charges.
    pub fn outflow(&self) -> f64 {
        self.expenses + self.fixed_charges
    }

    pub fn is_deficit(&self) -> bool {
        self.ending_balance < 0.0
    }

    /// Recomputes the balance recurrence from the stored fields.
    pub fn expected_ending_balance(&self) -> f64 {
        MonthFlows {
            opening_balance: self.opening_balance,
            income: self.income,
            expenses: self.expenses,
            fixed_charges: self.fixed_charges,
            deferred_in: self.deferred_in,
            carried_over_deficit: self.carried_over_deficit,
        }
        .ending_balance()
    }

    pub fn count_deferred(&self, status: DeferredStatus) -> usize {
        self.deferred_resolutions
            .iter()
            .filter(|resolution| resolution.status == status)
            .count()
    }
}
