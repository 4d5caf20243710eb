//! Free-text insights and headline figures for a projection.

use cashcast_domain::{
    Alert, AlertKind, BalancePoint, MonthProjection, ProjectionAnalysis, Severity,
};
use tracing::debug;

/// Number of worsening months that makes the deficit a trend.
pub const DEFICIT_TREND_THRESHOLD: usize = 2;

pub const DEFICIT_TREND_INSIGHT: &str =
    "The deficit deepens across several months; income does not cover recurring outflow.";

pub struct AnalysisService;

impl AnalysisService {
    pub fn analyze(projections: &[MonthProjection], alerts: &[Alert]) -> ProjectionAnalysis {
        let mut sorted: Vec<&Alert> = alerts.iter().collect();
        sorted.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
        });

        let mut insights: Vec<String> = Vec::new();
        for alert in &sorted {
            let insight = Self::insight_for(alert);
            if !insights.contains(&insight) {
                insights.push(insight);
            }
        }

        let worsening = alerts
            .iter()
            .filter(|alert| alert.kind == AlertKind::DeficitWorsening)
            .count();
        if worsening >= DEFICIT_TREND_THRESHOLD {
            insights.push(DEFICIT_TREND_INSIGHT.to_string());
        }

        let count = |severity: Severity| alerts.iter().filter(|a| a.severity == severity).count();
        let analysis = ProjectionAnalysis {
            insights,
            critical: count(Severity::Critical),
            warnings: count(Severity::Warning),
            info: count(Severity::Info),
            lowest_balance: Self::lowest_balance(projections),
            deficit_months: projections.iter().filter(|p| p.is_deficit()).count(),
        };
        debug!(
            insights = analysis.insights.len(),
            critical = analysis.critical,
            deficit_months = analysis.deficit_months,
            "analysis complete"
        );
        analysis
    }

    /// Earliest month holding the minimum ending balance.
    pub fn lowest_balance(projections: &[MonthProjection]) -> Option<BalancePoint> {
        projections.iter().fold(None, |lowest: Option<BalancePoint>, projection| {
            match lowest {
                Some(point) if point.balance <= projection.ending_balance => Some(point),
                _ => Some(BalancePoint {
                    month: projection.month,
                    balance: projection.ending_balance,
                }),
            }
        })
    }

    /// Month-independent sentence for an alert, so repeats collapse into one insight.
    pub fn insight_for(alert: &Alert) -> String {
        let subject = alert.category.as_deref().unwrap_or("A category");
        match alert.kind {
            AlertKind::DeficitStart => "The balance turns negative during the horizon.".to_string(),
            AlertKind::DeficitCarry => {
                "A deficit is carried into the following month and reduces its balance.".to_string()
            }
            AlertKind::DeficitWorsening => {
                "An existing deficit grows from one month to the next.".to_string()
            }
            AlertKind::DeferredPending => {
                "Some deferred items are still waiting for their target month.".to_string()
            }
            AlertKind::DeferredForced => {
                "Deferred items hit their maximum deferral and were applied.".to_string()
            }
            AlertKind::DeferredExpired => {
                "Deferred items expired without being applied.".to_string()
            }
            AlertKind::CeilingReached => {
                "Monthly outflow reaches the spending ceiling.".to_string()
            }
            AlertKind::CeilingExceeded => {
                "Monthly outflow exceeds the spending ceiling.".to_string()
            }
            AlertKind::BudgetWarning => format!("{} spending is close to its budget.", subject),
            AlertKind::BudgetExceeded => format!("{} spending exceeds its budget.", subject),
        }
    }
}
