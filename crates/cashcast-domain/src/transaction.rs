//! Ledger transactions and their optional deferral terms.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::month::MonthKey;

/// Direction of a cash flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowKind {
    Income,
    Expense,
}

impl FlowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Income => "INCOME",
            FlowKind::Expense => "EXPENSE",
        }
    }

    /// Sign applied to a normalized amount when it moves the balance.
    pub fn sign(&self) -> f64 {
        match self {
            FlowKind::Income => 1.0,
            FlowKind::Expense => -1.0,
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single dated cash movement on an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub kind: FlowKind,
    /// Expenses may be recorded signed or unsigned; see [`Transaction::normalized_amount`].
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferral: Option<Deferral>,
}

impl Transaction {
    pub fn new(account_id: Uuid, kind: FlowKind, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            kind,
            amount,
            date,
            category: None,
            deferral: None,
        }
    }

    pub fn income(account_id: Uuid, amount: f64, date: NaiveDate) -> Self {
        Self::new(account_id, FlowKind::Income, amount, date)
    }

    pub fn expense(account_id: Uuid, amount: f64, date: NaiveDate) -> Self {
        Self::new(account_id, FlowKind::Expense, amount, date)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_deferral(mut self, deferral: Deferral) -> Self {
        self.deferral = Some(deferral);
        self
    }

    /// Month the transaction is dated in.
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }

    pub fn is_deferred(&self) -> bool {
        self.deferral.is_some()
    }

    /// Expenses are always counted as a positive cost. Income is taken as recorded.
    pub fn normalized_amount(&self) -> f64 {
        match self.kind {
            FlowKind::Expense => self.amount.abs(),
            FlowKind::Income => self.amount,
        }
    }
}

/// Resolution state of a deferred transaction in a given month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeferredStatus {
    Applied,
    Pending,
    Forced,
    Expired,
}

impl DeferredStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeferredStatus::Applied => "APPLIED",
            DeferredStatus::Pending => "PENDING",
            DeferredStatus::Forced => "FORCED",
            DeferredStatus::Expired => "EXPIRED",
        }
    }

    /// Whether the amount lands in the month's balance.
    pub fn moves_cash(&self) -> bool {
        matches!(self, DeferredStatus::Applied | DeferredStatus::Forced)
    }

    /// Whether the item leaves the open set once this status is reached.
    pub fn is_final(&self) -> bool {
        !matches!(self, DeferredStatus::Pending)
    }
}

impl fmt::Display for DeferredStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terms under which a transaction's cash effect is pushed to a later month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Deferral {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferred_to: Option<MonthKey>,
    /// Last month in which the item may still be resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferred_until: Option<MonthKey>,
    /// Lower values are resolved first.
    #[serde(default)]
    pub priority: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_deferral_months: Option<u32>,
    /// Status recorded upstream; `APPLIED` and `EXPIRED` items are already settled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeferredStatus>,
}

impl Deferral {
    pub fn to(month: MonthKey) -> Self {
        Self {
            deferred_to: Some(month),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_max_months(mut self, months: u32) -> Self {
        self.max_deferral_months = Some(months);
        self
    }

    pub fn until(mut self, month: MonthKey) -> Self {
        self.deferred_until = Some(month);
        self
    }

    pub fn with_status(mut self, status: DeferredStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Month the item is meant to land in, falling back to its origin month.
    pub fn target_month(&self, origin: MonthKey) -> MonthKey {
        self.deferred_to.or(self.deferred_until).unwrap_or(origin)
    }

    /// Month in which the deferral budget runs out, if one is set.
    pub fn forced_month(&self, origin: MonthKey) -> Option<MonthKey> {
        self.max_deferral_months
            .map(|months| origin.add_months(months as i32))
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self.status,
            Some(DeferredStatus::Applied) | Some(DeferredStatus::Expired)
        )
    }
}
