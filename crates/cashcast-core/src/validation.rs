//! Structural checks run before a request reaches the engine.

use cashcast_domain::{MonthKey, ProjectionRequest};
use uuid::Uuid;

use crate::error::CoreError;

/// Longest horizon accepted at the validation boundary (50 years).
pub const MAX_PROJECTION_MONTHS: i32 = 600;

pub struct RequestValidator;

impl RequestValidator {
    /// Rejects requests the engine would accept but whose output would be meaningless.
    pub fn validate(request: &ProjectionRequest) -> Result<(), CoreError> {
        if !request.initial_balance.is_finite() {
            return Err(CoreError::Validation(format!(
                "initial balance must be finite, got {}",
                request.initial_balance
            )));
        }
        if request.months > MAX_PROJECTION_MONTHS {
            return Err(CoreError::HorizonTooLong(request.months));
        }

        for txn in &request.transactions {
            if !txn.amount.is_finite() {
                return Err(CoreError::Validation(format!(
                    "transaction {} has a non-finite amount",
                    txn.id
                )));
            }
        }

        for charge in &request.recurring_charges {
            check_amount("recurring charge", charge.id, charge.amount)?;
            for amount in charge.monthly_overrides.values() {
                check_amount("recurring charge", charge.id, *amount)?;
            }
            check_window("recurring charge", charge.id, charge.start_month, charge.end_month)?;
        }
        for rule in &request.ceiling_rules {
            check_amount("ceiling rule", rule.id, rule.amount)?;
            check_window("ceiling rule", rule.id, rule.start_month, rule.end_month)?;
        }
        for budget in &request.category_budgets {
            check_amount("category budget", budget.id, budget.amount)?;
        }
        for budget in &request.rolling_budgets {
            check_amount("rolling budget", budget.id, budget.amount)?;
            if budget.window_months == 0 {
                return Err(CoreError::EmptyRollingWindow(budget.id));
            }
        }
        for budget in &request.multi_month_budgets {
            check_amount("multi-month budget", budget.id, budget.amount)?;
            check_window(
                "multi-month budget",
                budget.id,
                budget.period_start,
                Some(budget.period_end),
            )?;
        }
        Ok(())
    }
}

fn check_amount(rule: &'static str, id: Uuid, amount: f64) -> Result<(), CoreError> {
    if amount.is_nan() || amount < 0.0 {
        return Err(CoreError::InvalidAmount { rule, id, amount });
    }
    Ok(())
}

fn check_window(
    rule: &'static str,
    id: Uuid,
    start: MonthKey,
    end: Option<MonthKey>,
) -> Result<(), CoreError> {
    match end {
        Some(end) if end < start => Err(CoreError::InvalidWindow { rule, id, start, end }),
        _ => Ok(()),
    }
}
