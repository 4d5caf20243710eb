//! Resolution of recurring charge amounts, including carried-forward overrides.

use cashcast_domain::{MonthKey, RecurringCharge, RecurringResolution};

/// Stateless helpers that resolve what a recurring charge contributes to a month.
pub struct RecurringService;

impl RecurringService {
    /// Latest override dated at or before `month`, regardless of where a projection starts.
    pub fn override_in_force(charge: &RecurringCharge, month: MonthKey) -> Option<(MonthKey, f64)> {
        charge
            .monthly_overrides
            .range(..=month)
            .next_back()
            .map(|(key, amount)| (*key, *amount))
    }

    /// Amount the charge contributes in `month`, or `None` when it is not active.
    pub fn effective_amount(charge: &RecurringCharge, month: MonthKey) -> Option<f64> {
        Self::resolve(charge, month).map(|resolution| resolution.amount)
    }

    pub fn resolve(charge: &RecurringCharge, month: MonthKey) -> Option<RecurringResolution> {
        if !charge.is_active_in(month) {
            return None;
        }
        let (amount, override_month) = match Self::override_in_force(charge, month) {
            Some((key, amount)) => (amount, Some(key)),
            None => (charge.amount, None),
        };
        Some(RecurringResolution {
            charge_id: charge.id,
            kind: charge.kind,
            amount,
            override_month,
            category: charge.category.clone(),
            label: charge.label.clone(),
        })
    }

    /// Resolves every active charge in input order.
    pub fn resolve_all(charges: &[&RecurringCharge], month: MonthKey) -> Vec<RecurringResolution> {
        charges
            .iter()
            .filter_map(|charge| Self::resolve(charge, month))
            .collect()
    }
}
