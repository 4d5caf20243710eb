//! JSON and text renderings of a projection run.

use std::fmt::Write as _;

use cashcast_core::{AdvancedAlertService, AlertService, AnalysisService, ProjectionService};
use cashcast_domain::{
    AdvancedAlert, Alert, AlertFilter, MonthKey, MonthProjection, ProjectionAnalysis,
    ProjectionRequest, Severity,
};
use colored::Colorize;
use serde::Serialize;
use uuid::Uuid;

/// Everything `project` prints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionReport {
    pub account_id: Uuid,
    pub start_month: MonthKey,
    pub months: Vec<MonthProjection>,
    pub alerts: Vec<Alert>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_alerts: Option<Vec<AdvancedAlert>>,
    pub analysis: ProjectionAnalysis,
}

impl ProjectionReport {
    /// Runs the engine; advanced alerts are produced only when a filter is given.
    pub fn build(request: &ProjectionRequest, advanced: Option<&AlertFilter>) -> Self {
        let months = ProjectionService::project(request);
        let alerts = AlertService::generate(&months);
        let analysis = AnalysisService::analyze(&months, &alerts);
        let advanced_alerts =
            advanced.map(|filter| filter.apply(&AdvancedAlertService::generate(&months)));
        Self {
            account_id: request.account_id,
            start_month: request.start_month,
            months,
            alerts,
            advanced_alerts,
            analysis,
        }
    }

    pub fn render_text(&self, currency: &str, color: bool) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "{}", heading("Projection", color));
        let _ = writeln!(
            text,
            "{:<8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "Month", "Opening", "Income", "Outflow", "Deferred", "Carried", "Ending"
        );
        for month in &self.months {
            let ending = format!("{:>12.2}", month.ending_balance);
            let ending = if color && month.is_deficit() {
                ending.red().to_string()
            } else {
                ending
            };
            let _ = writeln!(
                text,
                "{:<8} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {}",
                month.month.to_string(),
                month.opening_balance,
                month.income,
                month.outflow(),
                month.deferred_in,
                month.carried_over_deficit,
                ending
            );
        }
        let _ = writeln!(text, "Amounts in {}", currency);

        let _ = writeln!(text, "\n{}", heading("Alerts", color));
        if self.alerts.is_empty() {
            let _ = writeln!(text, "No alerts.");
        }
        for alert in &self.alerts {
            let _ = writeln!(
                text,
                "{} {} {} {}",
                alert.month,
                severity_label(alert.severity, color),
                alert.kind,
                alert.message
            );
        }

        if let Some(advanced) = &self.advanced_alerts {
            let _ = writeln!(text, "\n{}", heading("Ranked alerts", color));
            text.push_str(&render_ranked(advanced, color));
        }

        let analysis = &self.analysis;
        let _ = writeln!(text, "\n{}", heading("Analysis", color));
        let _ = writeln!(
            text,
            "{} critical, {} warning, {} info; {} month(s) in deficit",
            analysis.critical, analysis.warnings, analysis.info, analysis.deficit_months
        );
        if let Some(lowest) = analysis.lowest_balance {
            let _ = writeln!(
                text,
                "Lowest balance: {:.2} {} in {}",
                lowest.balance, currency, lowest.month
            );
        }
        for insight in &analysis.insights {
            let _ = writeln!(text, "- {}", insight);
        }
        text
    }
}

/// Ranked alerts printed by `alerts`.
#[derive(Debug, Clone, Serialize)]
pub struct AlertReport {
    pub alerts: Vec<AdvancedAlert>,
}

impl AlertReport {
    pub fn render_text(&self, color: bool) -> String {
        if self.alerts.is_empty() {
            return "No alerts.\n".to_string();
        }
        render_ranked(&self.alerts, color)
    }
}

fn render_ranked(alerts: &[AdvancedAlert], color: bool) -> String {
    let mut text = String::new();
    for alert in alerts {
        let _ = writeln!(
            text,
            "#{:<3} {} {} [{}] {}",
            alert.priority_rank.unwrap_or_default(),
            alert.month,
            severity_label(alert.severity, color),
            alert.group_id,
            alert.message
        );
    }
    text
}

fn heading(title: &str, color: bool) -> String {
    let line = format!("=== {} ===", title);
    if color {
        line.bold().to_string()
    } else {
        line
    }
}

fn severity_label(severity: Severity, color: bool) -> String {
    let label = format!("{:<8}", severity.as_str());
    if !color {
        return label;
    }
    match severity {
        Severity::Critical => label.red().bold().to_string(),
        Severity::Warning => label.yellow().to_string(),
        Severity::Info => label.cyan().to_string(),
    }
}
