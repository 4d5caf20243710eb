//! Advanced alerts keyed by `(domain, category, rule_id)` and globally ranked.

use std::cmp::Ordering;

use cashcast_domain::{
    AdvancedAlert, AlertDetails, BudgetDetails, BudgetScope, BudgetStatus, CeilingDetails,
    CeilingState, DeferredDetails, DeferredStatus, DeficitDetails, MonthProjection,
    Severity, TrendDetails, TrendDirection,
};

use crate::trend_service::STABLE_BAND;

pub const NEGATIVE_BALANCE_RULE: &str = "negative-balance";
pub const CARRIED_DEFICIT_RULE: &str = "carried-deficit";
pub const PENDING_DEFERRED_RULE: &str = "pending";

pub struct AdvancedAlertService;

impl AdvancedAlertService {
    /// Generates alerts for every month and returns them ranked.
    pub fn generate(projections: &[MonthProjection]) -> Vec<AdvancedAlert> {
        let mut alerts = Vec::new();
        let mut previous_ending: Option<f64> = None;
        for projection in projections {
            Self::deficit_alerts(projection, previous_ending, &mut alerts);
            Self::deferred_alerts(projection, &mut alerts);
            Self::ceiling_alerts(projection, &mut alerts);
            Self::budget_alerts(projection, &mut alerts);
            Self::trend_alerts(projection, &mut alerts);
            previous_ending = Some(projection.ending_balance);
        }
        Self::rank(alerts)
    }

    /// Total order: severity, domain, category (missing first), rule id, then month.
    pub fn compare(a: &AdvancedAlert, b: &AdvancedAlert) -> Ordering {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.domain.cmp(&b.domain))
            .then_with(|| a.sort_category().cmp(b.sort_category()))
            .then_with(|| a.rule_id.cmp(&b.rule_id))
            .then_with(|| a.month.cmp(&b.month))
    }

    /// Sorts the alerts and assigns `priority_rank` as the 1-based position.
    pub fn rank(mut alerts: Vec<AdvancedAlert>) -> Vec<AdvancedAlert> {
        alerts.sort_by(Self::compare);
        for (position, alert) in alerts.iter_mut().enumerate() {
            alert.priority_rank = Some(position as u32 + 1);
        }
        alerts
    }

    fn deficit_alerts(
        projection: &MonthProjection,
        previous_ending: Option<f64>,
        alerts: &mut Vec<AdvancedAlert>,
    ) {
        let details = DeficitDetails {
            ending_balance: Some(projection.ending_balance),
            previous_ending_balance: previous_ending,
            carried_over_deficit: (projection.carried_over_deficit > 0.0)
                .then_some(projection.carried_over_deficit),
        };
        if projection.is_deficit() {
            alerts.push(AdvancedAlert::new(
                projection.month,
                Severity::Critical,
                NEGATIVE_BALANCE_RULE,
                format!(
                    "{} ends {:.2} below zero",
                    projection.month, -projection.ending_balance
                ),
                AlertDetails::Deficit(details),
            ));
        } else if projection.carried_over_deficit > 0.0 {
            alerts.push(AdvancedAlert::new(
                projection.month,
                Severity::Warning,
                CARRIED_DEFICIT_RULE,
                format!(
                    "{} absorbs a carried deficit of {:.2}",
                    projection.month, projection.carried_over_deficit
                ),
                AlertDetails::Deficit(details),
            ));
        }
    }

    fn deferred_alerts(projection: &MonthProjection, alerts: &mut Vec<AdvancedAlert>) {
        for resolution in &projection.deferred_resolutions {
            let (rule, verb) = match resolution.status {
                DeferredStatus::Forced => ("forced", "was forced"),
                DeferredStatus::Expired => ("expired", "expired"),
                DeferredStatus::Applied | DeferredStatus::Pending => continue,
            };
            let alert = AdvancedAlert::new(
                projection.month,
                Severity::Warning,
                format!("{}:{}", rule, resolution.transaction_id),
                format!(
                    "Deferred {} of {:.2} {} in {}",
                    resolution.kind.as_str().to_ascii_lowercase(),
                    resolution.amount,
                    verb,
                    projection.month
                ),
                AlertDetails::Deferred(DeferredDetails {
                    transaction_id: Some(resolution.transaction_id),
                    status: Some(resolution.status),
                    amount: Some(resolution.amount),
                    priority: Some(resolution.priority),
                    pending_count: None,
                }),
            );
            alerts.push(with_optional_category(alert, resolution.category.as_deref()));
        }

        let pending = projection.count_deferred(DeferredStatus::Pending);
        if pending > 0 {
            alerts.push(AdvancedAlert::new(
                projection.month,
                Severity::Info,
                PENDING_DEFERRED_RULE,
                format!("{} deferred item(s) still pending in {}", pending, projection.month),
                AlertDetails::Deferred(DeferredDetails {
                    status: Some(DeferredStatus::Pending),
                    pending_count: Some(pending),
                    ..DeferredDetails::default()
                }),
            ));
        }
    }

    fn ceiling_alerts(projection: &MonthProjection, alerts: &mut Vec<AdvancedAlert>) {
        for ceiling in &projection.ceilings {
            let (severity, verb) = match ceiling.state {
                CeilingState::Exceeded => (Severity::Critical, "exceeds"),
                CeilingState::Reached => (Severity::Warning, "reaches"),
                CeilingState::NotReached => continue,
            };
            alerts.push(AdvancedAlert::new(
                projection.month,
                severity,
                ceiling.rule_id.to_string(),
                format!(
                    "Outflow of {:.2} {} the {:.2} ceiling in {}",
                    ceiling.outflow, verb, ceiling.ceiling, projection.month
                ),
                AlertDetails::Ceiling(CeilingDetails {
                    ceiling: Some(ceiling.ceiling),
                    outflow: Some(ceiling.outflow),
                    state: Some(ceiling.state),
                }),
            ));
        }
    }

    fn budget_alerts(projection: &MonthProjection, alerts: &mut Vec<AdvancedAlert>) {
        let monthly = projection.category_budgets.iter().map(|r| {
            (BudgetScope::Monthly, r.budget_id, &r.category, r.budget, r.spent, r.ratio, r.status)
        });
        let rolling = projection.rolling_budgets.iter().map(|r| {
            (BudgetScope::Rolling, r.budget_id, &r.category, r.budget, r.spent, r.ratio, r.status)
        });
        let multi = projection.multi_month_budgets.iter().map(|r| {
            let scope = BudgetScope::MultiMonth;
            (scope, r.budget_id, &r.category, r.budget, r.spent, r.ratio, r.status)
        });

        for (scope, budget_id, category, budget, spent, ratio, status) in
            monthly.chain(rolling).chain(multi)
        {
            let severity = match status {
                BudgetStatus::Exceeded => Severity::Critical,
                BudgetStatus::Warning | BudgetStatus::Reached => Severity::Warning,
                BudgetStatus::Ok | BudgetStatus::Inactive => continue,
            };
            alerts.push(
                AdvancedAlert::new(
                    projection.month,
                    severity,
                    budget_id.to_string(),
                    format!(
                        "{} at {:.0}% of its {:.2} budget in {}",
                        category,
                        ratio * 100.0,
                        budget,
                        projection.month
                    ),
                    AlertDetails::Budget(BudgetDetails {
                        scope: Some(scope),
                        budget: Some(budget),
                        spent: Some(spent),
                        ratio: Some(ratio),
                        status: Some(status),
                    }),
                )
                .with_category(category.as_str()),
            );
        }
    }

    /// Only increases strictly above the stable band raise an alert.
    fn trend_alerts(projection: &MonthProjection, alerts: &mut Vec<AdvancedAlert>) {
        for trend in &projection.trends {
            let rising = trend.direction == TrendDirection::Increasing;
            if !rising || trend.percent_change <= STABLE_BAND {
                continue;
            }
            alerts.push(
                AdvancedAlert::new(
                    projection.month,
                    Severity::Info,
                    trend_rule(&trend.category),
                    format!(
                        "{} spending up {:.0}% in {}",
                        trend.category,
                        trend.percent_change * 100.0,
                        projection.month
                    ),
                    AlertDetails::Trend(TrendDetails {
                        current: Some(trend.current),
                        previous: trend.previous,
                        percent_change: Some(trend.percent_change),
                    }),
                )
                .with_category(trend.category.as_str()),
            );
        }
    }
}

fn trend_rule(category: &str) -> String {
    format!("trend:{}", category)
}

fn with_optional_category(alert: AdvancedAlert, category: Option<&str>) -> AdvancedAlert {
    match category {
        Some(category) => alert.with_category(category),
        None => alert,
    }
}
