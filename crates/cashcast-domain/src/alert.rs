//! Alert types derived from projections.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    month::MonthKey,
    projection::{BudgetStatus, CeilingState},
    transaction::DeferredStatus,
};

/// Alert urgency. Ordering puts the most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }

    /// Returns `true` when `self` is at least as urgent as `threshold`.
    pub fn at_least(&self, threshold: Severity) -> bool {
        *self <= threshold
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CRITICAL" => Ok(Severity::Critical),
            "WARNING" => Ok(Severity::Warning),
            "INFO" => Ok(Severity::Info),
            other => Err(format!("Unknown severity: {}", other)),
        }
    }
}

/// Condition codes emitted by the basic alert generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    DeficitStart,
    DeficitCarry,
    DeficitWorsening,
    DeferredPending,
    DeferredForced,
    DeferredExpired,
    CeilingReached,
    CeilingExceeded,
    BudgetWarning,
    BudgetExceeded,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::DeficitStart => "DEFICIT_START",
            AlertKind::DeficitCarry => "DEFICIT_CARRY",
            AlertKind::DeficitWorsening => "DEFICIT_WORSENING",
            AlertKind::DeferredPending => "DEFERRED_PENDING",
            AlertKind::DeferredForced => "DEFERRED_FORCED",
            AlertKind::DeferredExpired => "DEFERRED_EXPIRED",
            AlertKind::CeilingReached => "CEILING_REACHED",
            AlertKind::CeilingExceeded => "CEILING_EXCEEDED",
            AlertKind::BudgetWarning => "BUDGET_WARNING",
            AlertKind::BudgetExceeded => "BUDGET_EXCEEDED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AlertKind::DeficitStart
            | AlertKind::DeficitWorsening
            | AlertKind::CeilingExceeded
            | AlertKind::BudgetExceeded => Severity::Critical,
            AlertKind::DeficitCarry
            | AlertKind::DeferredForced
            | AlertKind::DeferredExpired
            | AlertKind::CeilingReached
            | AlertKind::BudgetWarning => Severity::Warning,
            AlertKind::DeferredPending => Severity::Info,
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected condition in one month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub month: MonthKey,
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Alert {
    pub fn new(month: MonthKey, kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            month,
            kind,
            severity: kind.severity(),
            message: message.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Area of the projection an advanced alert is about. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertDomain {
    Deficit,
    Deferred,
    Ceiling,
    Budget,
    Trend,
}

impl AlertDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertDomain::Deficit => "DEFICIT",
            AlertDomain::Deferred => "DEFERRED",
            AlertDomain::Ceiling => "CEILING",
            AlertDomain::Budget => "BUDGET",
            AlertDomain::Trend => "TREND",
        }
    }
}

impl fmt::Display for AlertDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEFICIT" => Ok(AlertDomain::Deficit),
            "DEFERRED" => Ok(AlertDomain::Deferred),
            "CEILING" => Ok(AlertDomain::Ceiling),
            "BUDGET" => Ok(AlertDomain::Budget),
            "TREND" => Ok(AlertDomain::Trend),
            other => Err(format!("Unknown alert domain: {}", other)),
        }
    }
}

/// Which budget shape produced a budget alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetScope {
    Monthly,
    Rolling,
    MultiMonth,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeficitDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ending_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_ending_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carried_over_deficit: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeferredDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeferredStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_count: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CeilingDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outflow: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<CeilingState>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<BudgetScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BudgetStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
}

/// Structured payload of an advanced alert, one variant per domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "domain", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertDetails {
    Deficit(DeficitDetails),
    Deferred(DeferredDetails),
    Ceiling(CeilingDetails),
    Budget(BudgetDetails),
    Trend(TrendDetails),
}

impl AlertDetails {
    pub fn domain(&self) -> AlertDomain {
        match self {
            AlertDetails::Deficit(_) => AlertDomain::Deficit,
            AlertDetails::Deferred(_) => AlertDomain::Deferred,
            AlertDetails::Ceiling(_) => AlertDomain::Ceiling,
            AlertDetails::Budget(_) => AlertDomain::Budget,
            AlertDetails::Trend(_) => AlertDomain::Trend,
        }
    }
}

/// Alert keyed by `(domain, category, rule_id)` and ranked against every other alert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedAlert {
    pub month: MonthKey,
    pub severity: Severity,
    pub domain: AlertDomain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub rule_id: String,
    pub group_id: String,
    /// 1-based position after global sorting; unset until ranked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_rank: Option<u32>,
    pub message: String,
    pub details: AlertDetails,
}

impl AdvancedAlert {
    pub fn new(
        month: MonthKey,
        severity: Severity,
        rule_id: impl Into<String>,
        message: impl Into<String>,
        details: AlertDetails,
    ) -> Self {
        let domain = details.domain();
        Self {
            month,
            severity,
            domain,
            category: None,
            rule_id: rule_id.into(),
            group_id: domain.as_str().to_string(),
            priority_rank: None,
            message: message.into(),
            details,
        }
    }

    /// Sets the category and derives the `domain:category` group.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.group_id = Self::group_for(self.domain, Some(&category));
        self.category = Some(category);
        self
    }

    pub fn group_for(domain: AlertDomain, category: Option<&str>) -> String {
        match category {
            Some(category) if !category.is_empty() => format!("{}:{}", domain, category),
            _ => domain.as_str().to_string(),
        }
    }

    /// Category used for ordering; a missing category sorts as the empty string.
    pub fn sort_category(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }
}

/// Narrows a ranked alert list without changing its order or ranks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertFilter {
    #[serde(default)]
    pub min_severity: Option<Severity>,
    #[serde(default)]
    pub domains: Vec<AlertDomain>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub month: Option<MonthKey>,
}

impl AlertFilter {
    pub fn matches(&self, alert: &AdvancedAlert) -> bool {
        if let Some(threshold) = self.min_severity {
            if !alert.severity.at_least(threshold) {
                return false;
            }
        }
        if !self.domains.is_empty() && !self.domains.contains(&alert.domain) {
            return false;
        }
        if let Some(category) = &self.category {
            if alert.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(month) = self.month {
            if alert.month != month {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, alerts: &[AdvancedAlert]) -> Vec<AdvancedAlert> {
        alerts
            .iter()
            .filter(|alert| self.matches(alert))
            .cloned()
            .collect()
    }
}
