//! Classification of monthly outflow against spending ceilings.

use cashcast_domain::{CeilingRule, CeilingState, CeilingStatus, MonthKey};

pub struct CeilingService;

impl CeilingService {
    pub fn classify(outflow: f64, ceiling: f64) -> CeilingState {
        if outflow > ceiling {
            CeilingState::Exceeded
        } else if outflow == ceiling {
            CeilingState::Reached
        } else {
            CeilingState::NotReached
        }
    }

    /// One status per rule active in `month`, in input order.
    pub fn evaluate(rules: &[&CeilingRule], month: MonthKey, outflow: f64) -> Vec<CeilingStatus> {
        rules
            .iter()
            .filter(|rule| rule.is_active_in(month))
            .map(|rule| CeilingStatus {
                rule_id: rule.id,
                ceiling: rule.amount,
                outflow,
                state: Self::classify(outflow, rule.amount),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn classifies_against_exact_ceiling() {
        assert_eq!(CeilingService::classify(999.99, 1000.0), CeilingState::NotReached);
        assert_eq!(CeilingService::classify(1000.0, 1000.0), CeilingState::Reached);
        assert_eq!(CeilingService::classify(1000.01, 1000.0), CeilingState::Exceeded);
    }

    #[test]
    fn skips_inactive_rules() {
        let jan = MonthKey::new(2025, 1).unwrap();
        let active = CeilingRule::new(Uuid::new_v4(), 500.0, jan);
        let later = CeilingRule::new(Uuid::new_v4(), 500.0, jan.add_months(2));
        let statuses = CeilingService::evaluate(&[&active, &later], jan, 600.0);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].rule_id, active.id);
        assert_eq!(statuses[0].state, CeilingState::Exceeded);
    }
}
