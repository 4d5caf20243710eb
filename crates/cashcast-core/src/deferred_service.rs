//! Month-by-month resolution of deferred transactions.

use cashcast_domain::{
    Deferral, DeferredResolution, DeferredStatus, FlowKind, MonthKey, Transaction,
};
use tracing::trace;

/// Stateless classification rules for a single deferred item.
pub struct DeferredService;

impl DeferredService {
    /// Status of a deferred item in `month`, or `None` while the item's origin month
    /// has not been reached.
    ///
    /// Rules are checked in order: expiry past `deferred_until`, the target month
    /// reached (overdue targets are caught up), the deferral budget exhausted, pending.
    pub fn classify(
        origin: MonthKey,
        deferral: &Deferral,
        month: MonthKey,
    ) -> Option<DeferredStatus> {
        if month < origin {
            return None;
        }
        if deferral.deferred_until.is_some_and(|until| month > until) {
            return Some(DeferredStatus::Expired);
        }
        if month >= deferral.target_month(origin) {
            return Some(DeferredStatus::Applied);
        }
        if deferral
            .forced_month(origin)
            .is_some_and(|forced| month >= forced)
        {
            return Some(DeferredStatus::Forced);
        }
        Some(DeferredStatus::Pending)
    }
}

/// Result of resolving the open deferred items for one month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeferredOutcome {
    /// Resolutions ordered by ascending priority, ties in input order.
    pub resolutions: Vec<DeferredResolution>,
    /// Signed cash effect of everything applied or forced this month.
    pub deferred_in: f64,
}

/// Open deferred expenses for one projection run.
///
/// Only expense transactions are queued; a deferral on income is ignored.
///
/// Holds references only; the caller's transactions are never modified. Items leave
/// the queue once applied, forced or expired, so nothing is resolved twice.
#[derive(Debug, Clone)]
pub struct DeferredQueue<'a> {
    open: Vec<&'a Transaction>,
}

impl<'a> DeferredQueue<'a> {
    pub fn new(transactions: &[&'a Transaction]) -> Self {
        let mut open: Vec<&'a Transaction> = transactions
            .iter()
            .copied()
            .filter(|txn| {
                txn.kind == FlowKind::Expense
                    && txn
                        .deferral
                        .as_ref()
                        .is_some_and(|deferral| !deferral.is_settled())
            })
            .collect();
        // stable: equal priorities keep input order
        open.sort_by_key(|txn| txn.deferral.as_ref().map_or(0, |deferral| deferral.priority));
        Self { open }
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn resolve_month(&mut self, month: MonthKey) -> DeferredOutcome {
        let mut outcome = DeferredOutcome::default();
        let mut still_open = Vec::with_capacity(self.open.len());

        for txn in self.open.drain(..) {
            let Some(deferral) = txn.deferral.as_ref() else {
                continue;
            };
            let origin = txn.month();
            let Some(status) = DeferredService::classify(origin, deferral, month) else {
                still_open.push(txn);
                continue;
            };
            let resolution = DeferredResolution {
                transaction_id: txn.id,
                kind: txn.kind,
                amount: txn.amount.abs(),
                priority: deferral.priority,
                target_month: deferral.target_month(origin),
                status,
                category: txn.category.clone(),
            };
            trace!(
                month = %month,
                transaction = %txn.id,
                status = %status,
                "deferred item resolved"
            );
            outcome.deferred_in += resolution.cash_effect();
            outcome.resolutions.push(resolution);
            if !status.is_final() {
                still_open.push(txn);
            }
        }

        self.open = still_open;
        outcome
    }
}
