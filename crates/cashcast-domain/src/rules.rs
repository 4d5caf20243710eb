//! Spending ceilings and the three budget shapes evaluated per month.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::month::MonthKey;

/// Hard cap on an account's total monthly outflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CeilingRule {
    pub id: Uuid,
    pub account_id: Uuid,
    pub amount: f64,
    pub start_month: MonthKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_month: Option<MonthKey>,
}

impl CeilingRule {
    pub fn new(account_id: Uuid, amount: f64, start_month: MonthKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            amount,
            start_month,
            end_month: None,
        }
    }

    pub fn ending(mut self, end_month: MonthKey) -> Self {
        self.end_month = Some(end_month);
        self
    }

    pub fn is_active_in(&self, month: MonthKey) -> bool {
        self.start_month <= month && self.end_month.map_or(true, |end| month <= end)
    }
}

/// Spend limit for one category within a single month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBudget {
    pub id: Uuid,
    pub account_id: Uuid,
    pub category: String,
    pub amount: f64,
    /// Restricts the budget to one month; `None` applies it to every month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<MonthKey>,
}

impl CategoryBudget {
    pub fn new(account_id: Uuid, category: impl Into<String>, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            category: category.into(),
            amount,
            month: None,
        }
    }

    pub fn for_month(mut self, month: MonthKey) -> Self {
        self.month = Some(month);
        self
    }

    pub fn applies_to(&self, month: MonthKey) -> bool {
        self.month.map_or(true, |only| only == month)
    }
}

/// Spend limit for one category over a trailing window ending at the evaluated month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RollingCategoryBudget {
    pub id: Uuid,
    pub account_id: Uuid,
    pub category: String,
    pub amount: f64,
    pub window_months: u32,
}

impl RollingCategoryBudget {
    pub fn new(
        account_id: Uuid,
        category: impl Into<String>,
        amount: f64,
        window_months: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            category: category.into(),
            amount,
            window_months,
        }
    }

    /// First month of the window ending at `month`. A zero-length window counts as one month.
    pub fn window_start(&self, month: MonthKey) -> MonthKey {
        month.add_months(1 - self.window_months.max(1) as i32)
    }
}

/// Spend limit for one category accumulated over a fixed calendar period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultiMonthBudget {
    pub id: Uuid,
    pub account_id: Uuid,
    pub category: String,
    pub amount: f64,
    pub period_start: MonthKey,
    pub period_end: MonthKey,
}

impl MultiMonthBudget {
    pub fn new(
        account_id: Uuid,
        category: impl Into<String>,
        amount: f64,
        period_start: MonthKey,
        period_end: MonthKey,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            category: category.into(),
            amount,
            period_start,
            period_end,
        }
    }

    pub fn covers(&self, month: MonthKey) -> bool {
        self.period_start <= month && month <= self.period_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(year: i32, month: u32) -> MonthKey {
        MonthKey::new(year, month).unwrap()
    }

    #[test]
    fn rolling_window_includes_current_month() {
        let budget = RollingCategoryBudget::new(Uuid::new_v4(), "fuel", 300.0, 3);
        assert_eq!(budget.window_start(key(2025, 2)), key(2024, 12));

        let degenerate = RollingCategoryBudget::new(Uuid::new_v4(), "fuel", 300.0, 0);
        assert_eq!(degenerate.window_start(key(2025, 2)), key(2025, 2));
    }

    #[test]
    fn ceiling_window_is_inclusive() {
        let rule = CeilingRule::new(Uuid::new_v4(), 2000.0, key(2025, 1)).ending(key(2025, 3));
        assert!(rule.is_active_in(key(2025, 1)));
        assert!(rule.is_active_in(key(2025, 3)));
        assert!(!rule.is_active_in(key(2025, 4)));
        assert!(!rule.is_active_in(key(2024, 12)));
    }
}
