use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    month::MonthKey,
    recurring::RecurringCharge,
    rules::{CategoryBudget, CeilingRule, MultiMonthBudget, RollingCategoryBudget},
    transaction::Transaction,
};

/// Everything the projection engine needs for one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRequest {
    pub account_id: Uuid,
    pub initial_balance: f64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub recurring_charges: Vec<RecurringCharge>,
    #[serde(default)]
    pub ceiling_rules: Vec<CeilingRule>,
    #[serde(default)]
    pub category_budgets: Vec<CategoryBudget>,
    #[serde(default)]
    pub rolling_budgets: Vec<RollingCategoryBudget>,
    #[serde(default)]
    pub multi_month_budgets: Vec<MultiMonthBudget>,
    pub start_month: MonthKey,
    /// Number of months to project; zero or negative yields no months.
    pub months: i32,
}

impl ProjectionRequest {
    pub fn new(account_id: Uuid, initial_balance: f64, start_month: MonthKey, months: i32) -> Self {
        Self {
            account_id,
            initial_balance,
            transactions: Vec::new(),
            recurring_charges: Vec::new(),
            ceiling_rules: Vec::new(),
            category_budgets: Vec::new(),
            rolling_budgets: Vec::new(),
            multi_month_budgets: Vec::new(),
            start_month,
            months,
        }
    }

    pub fn with_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = transactions;
        self
    }

    pub fn with_recurring_charges(mut self, charges: Vec<RecurringCharge>) -> Self {
        self.recurring_charges = charges;
        self
    }

    pub fn with_ceiling_rules(mut self, rules: Vec<CeilingRule>) -> Self {
        self.ceiling_rules = rules;
        self
    }

    pub fn with_category_budgets(mut self, budgets: Vec<CategoryBudget>) -> Self {
        self.category_budgets = budgets;
        self
    }

    pub fn with_rolling_budgets(mut self, budgets: Vec<RollingCategoryBudget>) -> Self {
        self.rolling_budgets = budgets;
        self
    }

    pub fn with_multi_month_budgets(mut self, budgets: Vec<MultiMonthBudget>) -> Self {
        self.multi_month_budgets = budgets;
        self
    }

    /// Last projected month, or `None` when the request covers no months.
    pub fn end_month(&self) -> Option<MonthKey> {
        (self.months > 0).then(|| self.start_month.add_months(self.months - 1))
    }
}
