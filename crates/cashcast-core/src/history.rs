//! Per-month category spend used by the windowed budget evaluators.

use std::collections::BTreeMap;

use cashcast_domain::{FlowKind, MonthKey, Transaction};

/// Category spend indexed by month.
///
/// Months before the projection start are seeded from raw, non-deferred expenses;
/// projected months are recorded as the calculator produces them.
#[derive(Debug, Clone, Default)]
pub struct SpendHistory {
    months: BTreeMap<MonthKey, BTreeMap<String, f64>>,
}

impl SpendHistory {
    /// Seeds history with categorised expenses dated strictly before `start`.
    pub fn seed(transactions: &[&Transaction], start: MonthKey) -> Self {
        let mut history = Self::default();
        for txn in transactions {
            if txn.kind != FlowKind::Expense || txn.is_deferred() {
                continue;
            }
            let month = txn.month();
            if month >= start {
                continue;
            }
            if let Some(category) = &txn.category {
                *history
                    .months
                    .entry(month)
                    .or_default()
                    .entry(category.clone())
                    .or_default() += txn.normalized_amount();
            }
        }
        history
    }

    /// Stores the spend of a projected month, replacing anything seeded for it.
    pub fn record(&mut self, month: MonthKey, spending: &BTreeMap<String, f64>) {
        self.months.insert(month, spending.clone());
    }

    pub fn spent(&self, month: MonthKey, category: &str) -> f64 {
        self.months
            .get(&month)
            .and_then(|spending| spending.get(category))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum of spend for `category` over `from..=to`.
    pub fn spent_between(&self, from: MonthKey, to: MonthKey, category: &str) -> f64 {
        if from > to {
            return 0.0;
        }
        self.months
            .range(from..=to)
            .filter_map(|(_, spending)| spending.get(category))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn seeds_only_prior_categorised_expenses() {
        let account = Uuid::new_v4();
        let day = |m| NaiveDate::from_ymd_opt(2025, m, 10).unwrap();
        let txns = [
            Transaction::expense(account, 40.0, day(1)).with_category("fuel"),
            Transaction::expense(account, -60.0, day(2)).with_category("fuel"),
            Transaction::expense(account, 99.0, day(3)).with_category("fuel"),
            Transaction::income(account, 500.0, day(2)).with_category("fuel"),
            Transaction::expense(account, 10.0, day(2)),
        ];
        let refs: Vec<&Transaction> = txns.iter().collect();
        let start = MonthKey::new(2025, 3).unwrap();
        let history = SpendHistory::seed(&refs, start);

        let jan = MonthKey::new(2025, 1).unwrap();
        let feb = MonthKey::new(2025, 2).unwrap();
        assert_eq!(history.spent(jan, "fuel"), 40.0);
        assert_eq!(history.spent(feb, "fuel"), 60.0);
        assert_eq!(history.spent(start, "fuel"), 0.0);
        assert_eq!(history.spent_between(jan, start, "fuel"), 100.0);
        assert_eq!(history.spent_between(start, jan, "fuel"), 0.0);
    }
}
