//! Category budget evaluation for the single-month, rolling and multi-month shapes.

use std::collections::BTreeMap;

use cashcast_domain::{
    BudgetStatus, CategoryBudget, CategoryBudgetResult, MonthKey, MultiMonthBudget,
    MultiMonthBudgetResult, RollingBudgetResult, RollingCategoryBudget,
};

use crate::history::SpendHistory;

/// Ratio at which a budget starts warning.
pub const WARNING_RATIO: f64 = 0.8;

/// Stateless budgeting utilities shared by the three budget shapes.
pub struct BudgetService;

impl BudgetService {
    /// `spent / budget`; a zero budget yields `+inf` for any spend and `0` otherwise.
    pub fn ratio(spent: f64, budget: f64) -> f64 {
        if budget == 0.0 {
            if spent > 0.0 {
                f64::INFINITY
            } else {
                0.0
            }
        } else {
            spent / budget
        }
    }

    /// Single-month mapping: an exactly consumed budget still reports `WARNING`.
    pub fn monthly_status(ratio: f64) -> BudgetStatus {
        if ratio > 1.0 {
            BudgetStatus::Exceeded
        } else if ratio >= WARNING_RATIO {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Ok
        }
    }

    /// Rolling and multi-month mapping, which distinguishes an exactly consumed budget.
    pub fn windowed_status(ratio: f64) -> BudgetStatus {
        if ratio > 1.0 {
            BudgetStatus::Exceeded
        } else if ratio == 1.0 {
            BudgetStatus::Reached
        } else if ratio >= WARNING_RATIO {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Ok
        }
    }

    pub fn evaluate_category(
        budgets: &[&CategoryBudget],
        month: MonthKey,
        spending: &BTreeMap<String, f64>,
    ) -> Vec<CategoryBudgetResult> {
        budgets
            .iter()
            .filter(|budget| budget.applies_to(month))
            .map(|budget| {
                let spent = spending.get(&budget.category).copied().unwrap_or(0.0);
                let ratio = Self::ratio(spent, budget.amount);
                CategoryBudgetResult {
                    budget_id: budget.id,
                    category: budget.category.clone(),
                    budget: budget.amount,
                    spent,
                    ratio,
                    status: Self::monthly_status(ratio),
                }
            })
            .collect()
    }

    /// Evaluates spend over each trailing window ending at `month`. `history` must
    /// already contain `month`.
    pub fn evaluate_rolling(
        budgets: &[&RollingCategoryBudget],
        month: MonthKey,
        history: &SpendHistory,
    ) -> Vec<RollingBudgetResult> {
        budgets
            .iter()
            .map(|budget| {
                let window_start = budget.window_start(month);
                let spent = history.spent_between(window_start, month, &budget.category);
                let ratio = Self::ratio(spent, budget.amount);
                RollingBudgetResult {
                    budget_id: budget.id,
                    category: budget.category.clone(),
                    window_months: budget.window_months.max(1),
                    window_start,
                    budget: budget.amount,
                    spent,
                    ratio,
                    status: Self::windowed_status(ratio),
                }
            })
            .collect()
    }

    /// Evaluates cumulative spend from each period start through `month`; months outside
    /// the period report `INACTIVE` with a zero ratio.
    pub fn evaluate_multi_month(
        budgets: &[&MultiMonthBudget],
        month: MonthKey,
        history: &SpendHistory,
    ) -> Vec<MultiMonthBudgetResult> {
        budgets
            .iter()
            .map(|budget| {
                let (spent, ratio, status) = if budget.covers(month) {
                    let through = month.min(budget.period_end);
                    let spent =
                        history.spent_between(budget.period_start, through, &budget.category);
                    let ratio = Self::ratio(spent, budget.amount);
                    (spent, ratio, Self::windowed_status(ratio))
                } else {
                    (0.0, 0.0, BudgetStatus::Inactive)
                };
                MultiMonthBudgetResult {
                    budget_id: budget.id,
                    category: budget.category.clone(),
                    period_start: budget.period_start,
                    period_end: budget.period_end,
                    budget: budget.amount,
                    spent,
                    ratio,
                    status,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn key(year: i32, month: u32) -> MonthKey {
        MonthKey::new(year, month).unwrap()
    }

    fn spending(category: &str, amount: f64) -> BTreeMap<String, f64> {
        BTreeMap::from([(category.to_string(), amount)])
    }

    #[test]
    fn monthly_thresholds() {
        let budget = CategoryBudget::new(Uuid::new_v4(), "groceries", 100.0);
        let status_for = |spent: f64| {
            let by_category = spending("groceries", spent);
            BudgetService::evaluate_category(&[&budget], key(2025, 1), &by_category)[0].status
        };
        assert_eq!(status_for(79.0), BudgetStatus::Ok);
        assert_eq!(status_for(80.0), BudgetStatus::Warning);
        assert_eq!(status_for(100.0), BudgetStatus::Warning);
        assert_eq!(status_for(120.0), BudgetStatus::Exceeded);
    }

    #[test]
    fn single_month_budget_only_applies_to_its_month() {
        let budget =
            CategoryBudget::new(Uuid::new_v4(), "gifts", 200.0).for_month(key(2025, 12));
        let spend = spending("gifts", 50.0);
        assert!(BudgetService::evaluate_category(&[&budget], key(2025, 11), &spend).is_empty());
        assert_eq!(
            BudgetService::evaluate_category(&[&budget], key(2025, 12), &spend).len(),
            1
        );
    }

    #[test]
    fn windowed_thresholds_distinguish_reached() {
        assert_eq!(BudgetService::windowed_status(0.79), BudgetStatus::Ok);
        assert_eq!(BudgetService::windowed_status(0.8), BudgetStatus::Warning);
        assert_eq!(BudgetService::windowed_status(1.0), BudgetStatus::Reached);
        assert_eq!(BudgetService::windowed_status(1.2), BudgetStatus::Exceeded);
    }

    #[test]
    fn zero_budget_with_spend_is_unbounded() {
        assert_eq!(BudgetService::ratio(10.0, 0.0), f64::INFINITY);
        assert_eq!(BudgetService::ratio(0.0, 0.0), 0.0);
        assert_eq!(
            BudgetService::windowed_status(BudgetService::ratio(10.0, 0.0)),
            BudgetStatus::Exceeded
        );
    }

    #[test]
    fn rolling_sums_trailing_window() {
        let mut history = SpendHistory::default();
        history.record(key(2025, 1), &spending("fuel", 100.0));
        history.record(key(2025, 2), &spending("fuel", 120.0));
        history.record(key(2025, 3), &spending("fuel", 80.0));
        history.record(key(2025, 4), &spending("fuel", 100.0));

        let budget = RollingCategoryBudget::new(Uuid::new_v4(), "fuel", 300.0, 3);
        let april = BudgetService::evaluate_rolling(&[&budget], key(2025, 4), &history);
        assert_eq!(april[0].window_start, key(2025, 2));
        assert_eq!(april[0].spent, 300.0);
        assert_eq!(april[0].status, BudgetStatus::Reached);

        let march = BudgetService::evaluate_rolling(&[&budget], key(2025, 3), &history);
        assert_eq!(march[0].status, BudgetStatus::Reached);
    }

    #[test]
    fn multi_month_accumulates_and_goes_inactive() {
        let mut history = SpendHistory::default();
        for month in 1..=4 {
            history.record(key(2025, month), &spending("travel", 150.0));
        }
        let budget =
            MultiMonthBudget::new(Uuid::new_v4(), "travel", 350.0, key(2025, 2), key(2025, 3));

        let before = BudgetService::evaluate_multi_month(&[&budget], key(2025, 1), &history);
        assert_eq!(before[0].status, BudgetStatus::Inactive);
        assert_eq!(before[0].ratio, 0.0);

        let feb = BudgetService::evaluate_multi_month(&[&budget], key(2025, 2), &history);
        assert_eq!(feb[0].spent, 150.0);
        assert_eq!(feb[0].status, BudgetStatus::Ok);

        let mar = BudgetService::evaluate_multi_month(&[&budget], key(2025, 3), &history);
        assert_eq!(mar[0].spent, 300.0);
        assert_eq!(mar[0].status, BudgetStatus::Warning);

        let after = BudgetService::evaluate_multi_month(&[&budget], key(2025, 4), &history);
        assert_eq!(after[0].status, BudgetStatus::Inactive);
    }
}
