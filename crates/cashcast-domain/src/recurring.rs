//! Scheduled fixed cash flows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{month::MonthKey, transaction::FlowKind};

/// A monthly cash flow active between `start_month` and the optional `end_month`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringCharge {
    pub id: Uuid,
    pub account_id: Uuid,
    pub kind: FlowKind,
    pub amount: f64,
    pub start_month: MonthKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_month: Option<MonthKey>,
    /// Amount changes keyed by the month they take effect in.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub monthly_overrides: BTreeMap<MonthKey, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RecurringCharge {
    pub fn new(account_id: Uuid, kind: FlowKind, amount: f64, start_month: MonthKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            kind,
            amount,
            start_month,
            end_month: None,
            monthly_overrides: BTreeMap::new(),
            category: None,
            label: None,
        }
    }

    pub fn ending(mut self, end_month: MonthKey) -> Self {
        self.end_month = Some(end_month);
        self
    }

    pub fn with_override(mut self, month: MonthKey, amount: f64) -> Self {
        self.monthly_overrides.insert(month, amount);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_active_in(&self, month: MonthKey) -> bool {
        self.start_month <= month && self.end_month.map_or(true, |end| month <= end)
    }
}
