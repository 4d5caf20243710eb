//! Basic alerts: one alert per detected condition, sorted by month then code.

use cashcast_domain::{
    Alert, AlertKind, BudgetStatus, CeilingState, DeferredStatus, MonthProjection,
};

pub struct AlertService;

impl AlertService {
    pub fn generate(projections: &[MonthProjection]) -> Vec<Alert> {
        let mut alerts = Vec::new();
        let mut previous_ending: Option<f64> = None;

        for projection in projections {
            let month = projection.month;
            let reference = previous_ending.unwrap_or(projection.opening_balance);

            if projection.is_deficit() && reference >= 0.0 {
                alerts.push(Alert::new(
                    month,
                    AlertKind::DeficitStart,
                    format!(
                        "Balance turns negative in {} ({:.2})",
                        month, projection.ending_balance
                    ),
                ));
            }
            if projection.carried_over_deficit > 0.0 {
                alerts.push(Alert::new(
                    month,
                    AlertKind::DeficitCarry,
                    format!(
                        "{:.2} of deficit carried into {}",
                        projection.carried_over_deficit, month
                    ),
                ));
            }
            if let Some(previous) = previous_ending {
                let deepening = previous < 0.0 && projection.ending_balance < previous;
                if projection.is_deficit() && deepening {
                    alerts.push(Alert::new(
                        month,
                        AlertKind::DeficitWorsening,
                        format!(
                            "Deficit deepens from {:.2} to {:.2} in {}",
                            previous, projection.ending_balance, month
                        ),
                    ));
                }
            }

            for (status, kind, label) in [
                (DeferredStatus::Pending, AlertKind::DeferredPending, "pending"),
                (DeferredStatus::Forced, AlertKind::DeferredForced, "forced"),
                (DeferredStatus::Expired, AlertKind::DeferredExpired, "expired"),
            ] {
                let count = projection.count_deferred(status);
                if count > 0 {
                    alerts.push(Alert::new(
                        month,
                        kind,
                        format!("{} deferred item(s) {} in {}", count, label, month),
                    ));
                }
            }

            for ceiling in &projection.ceilings {
                let kind = match ceiling.state {
                    CeilingState::Exceeded => AlertKind::CeilingExceeded,
                    CeilingState::Reached => AlertKind::CeilingReached,
                    CeilingState::NotReached => continue,
                };
                alerts.push(Alert::new(
                    month,
                    kind,
                    format!(
                        "Outflow {:.2} against ceiling {:.2} in {}",
                        ceiling.outflow, ceiling.ceiling, month
                    ),
                ));
            }

            let budget_statuses = projection
                .category_budgets
                .iter()
                .map(|r| (r.category.as_str(), r.status, r.spent, r.budget))
                .chain(
                    projection
                        .rolling_budgets
                        .iter()
                        .map(|r| (r.category.as_str(), r.status, r.spent, r.budget)),
                )
                .chain(
                    projection
                        .multi_month_budgets
                        .iter()
                        .map(|r| (r.category.as_str(), r.status, r.spent, r.budget)),
                );
            for (category, status, spent, budget) in budget_statuses {
                let kind = match status {
                    BudgetStatus::Exceeded => AlertKind::BudgetExceeded,
                    BudgetStatus::Warning | BudgetStatus::Reached => AlertKind::BudgetWarning,
                    BudgetStatus::Ok | BudgetStatus::Inactive => continue,
                };
                alerts.push(
                    Alert::new(
                        month,
                        kind,
                        format!(
                            "{} spent {:.2} of {:.2} in {}",
                            category, spent, budget, month
                        ),
                    )
                    .with_category(category),
                );
            }

            previous_ending = Some(projection.ending_balance);
        }

        // stable: alerts sharing a key keep generation order
        alerts.sort_by(|a, b| {
            a.month
                .cmp(&b.month)
                .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
        });
        alerts
    }
}

#[cfg(test)]
mod tests {
    use cashcast_domain::{
        CategoryBudgetResult, CeilingStatus, DeferredResolution, FlowKind, MonthFlows, MonthKey,
        MultiMonthBudgetResult, RollingBudgetResult, Severity,
    };
    use uuid::Uuid;

    use super::*;

    fn key(year: i32, month: u32) -> MonthKey {
        MonthKey::new(year, month).unwrap()
    }

    fn month(at: MonthKey, opening: f64, expenses: f64, carried: f64) -> MonthProjection {
        MonthProjection::from_flows(
            at,
            MonthFlows {
                opening_balance: opening,
                expenses,
                carried_over_deficit: carried,
                ..MonthFlows::default()
            },
        )
    }

    fn deferred(status: DeferredStatus) -> DeferredResolution {
        DeferredResolution {
            transaction_id: Uuid::new_v4(),
            kind: FlowKind::Expense,
            amount: 40.0,
            priority: 0,
            target_month: key(2025, 3),
            status,
            category: None,
        }
    }

    fn ceiling(state: CeilingState) -> CeilingStatus {
        CeilingStatus {
            rule_id: Uuid::new_v4(),
            ceiling: 250.0,
            outflow: 300.0,
            state,
        }
    }

    fn category_result(category: &str, status: BudgetStatus) -> CategoryBudgetResult {
        CategoryBudgetResult {
            budget_id: Uuid::new_v4(),
            category: category.into(),
            budget: 100.0,
            spent: 90.0,
            ratio: 0.9,
            status,
        }
    }

    fn rolling_result(category: &str, status: BudgetStatus) -> RollingBudgetResult {
        RollingBudgetResult {
            budget_id: Uuid::new_v4(),
            category: category.into(),
            window_months: 3,
            window_start: key(2024, 11),
            budget: 300.0,
            spent: 300.0,
            ratio: 1.0,
            status,
        }
    }

    fn multi_month_result(category: &str, status: BudgetStatus) -> MultiMonthBudgetResult {
        MultiMonthBudgetResult {
            budget_id: Uuid::new_v4(),
            category: category.into(),
            period_start: key(2025, 1),
            period_end: key(2025, 6),
            budget: 500.0,
            spent: 650.0,
            ratio: 1.3,
            status,
        }
    }

    fn kinds(alerts: &[Alert]) -> Vec<AlertKind> {
        alerts.iter().map(|alert| alert.kind).collect()
    }

    #[test]
    fn every_condition_in_one_month_sorts_by_code() {
        let january = month(key(2025, 1), 100.0, 300.0, 0.0)
            .with_deferred(vec![
                deferred(DeferredStatus::Pending),
                deferred(DeferredStatus::Forced),
                deferred(DeferredStatus::Pending),
                deferred(DeferredStatus::Expired),
                deferred(DeferredStatus::Applied),
            ])
            .with_ceilings(vec![
                ceiling(CeilingState::Reached),
                ceiling(CeilingState::NotReached),
                ceiling(CeilingState::Exceeded),
            ])
            .with_budgets(
                vec![category_result("dining", BudgetStatus::Warning)],
                vec![rolling_result("groceries", BudgetStatus::Reached)],
                vec![multi_month_result("travel", BudgetStatus::Exceeded)],
            );

        let alerts = AlertService::generate(&[january]);
        assert_eq!(
            kinds(&alerts),
            vec![
                AlertKind::BudgetExceeded,
                AlertKind::BudgetWarning,
                AlertKind::BudgetWarning,
                AlertKind::CeilingExceeded,
                AlertKind::CeilingReached,
                AlertKind::DeferredExpired,
                AlertKind::DeferredForced,
                AlertKind::DeferredPending,
                AlertKind::DeficitStart,
            ]
        );

        let categories: Vec<Option<&str>> =
            alerts[..3].iter().map(|alert| alert.category.as_deref()).collect();
        assert_eq!(categories, vec![Some("travel"), Some("dining"), Some("groceries")]);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[4].severity, Severity::Warning);
        assert_eq!(alerts[7].severity, Severity::Info);
        assert_eq!(alerts[7].message, "2 deferred item(s) pending in 2025-01");
    }

    #[test]
    fn quiet_results_raise_nothing() {
        let calm = month(key(2025, 1), 500.0, 100.0, 0.0)
            .with_deferred(vec![deferred(DeferredStatus::Applied)])
            .with_ceilings(vec![ceiling(CeilingState::NotReached)])
            .with_budgets(
                vec![
                    category_result("dining", BudgetStatus::Ok),
                    category_result("fuel", BudgetStatus::Inactive),
                ],
                vec![rolling_result("groceries", BudgetStatus::Ok)],
                vec![multi_month_result("travel", BudgetStatus::Inactive)],
            );

        assert!(AlertService::generate(&[calm]).is_empty());
    }

    #[test]
    fn month_orders_before_code() {
        let january = month(key(2025, 1), 0.0, 50.0, 0.0);
        let february = month(key(2025, 2), -50.0, 20.0, 50.0).with_budgets(
            vec![category_result("dining", BudgetStatus::Exceeded)],
            Vec::new(),
            Vec::new(),
        );

        let alerts = AlertService::generate(&[january, february]);
        assert_eq!(
            kinds(&alerts),
            vec![
                AlertKind::DeficitStart,
                AlertKind::BudgetExceeded,
                AlertKind::DeficitCarry,
                AlertKind::DeficitWorsening,
            ]
        );
        assert_eq!(alerts[0].month, key(2025, 1));
        assert!(alerts[1..].iter().all(|alert| alert.month == key(2025, 2)));
    }

    #[test]
    fn recovering_deficit_is_not_worsening() {
        let january = month(key(2025, 1), 0.0, 100.0, 0.0);
        let mut february = month(key(2025, 2), -100.0, 0.0, 0.0);
        february.ending_balance = -40.0;

        let alerts = AlertService::generate(&[january, february]);
        assert_eq!(kinds(&alerts), vec![AlertKind::DeficitStart]);
    }
}
