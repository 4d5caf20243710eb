//! The month projection calculator.

use std::collections::BTreeMap;

use cashcast_domain::{
    CategoryBudget, CeilingRule, FlowKind, MonthFlows, MonthKey, MonthProjection,
    MultiMonthBudget, ProjectionRequest, RecurringCharge, RollingCategoryBudget, Transaction,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    budget_service::BudgetService, ceiling_service::CeilingService,
    deferred_service::DeferredQueue, deficit_service::DeficitService, history::SpendHistory,
    recurring_service::RecurringService, trend_service::TrendService,
};

/// Inputs of one request narrowed to a single account. Borrows only.
struct AccountScope<'a> {
    transactions: Vec<&'a Transaction>,
    charges: Vec<&'a RecurringCharge>,
    ceilings: Vec<&'a CeilingRule>,
    category_budgets: Vec<&'a CategoryBudget>,
    rolling_budgets: Vec<&'a RollingCategoryBudget>,
    multi_month_budgets: Vec<&'a MultiMonthBudget>,
}

impl<'a> AccountScope<'a> {
    fn new(request: &'a ProjectionRequest) -> Self {
        let account = request.account_id;
        Self {
            transactions: owned_by(&request.transactions, account, |t| t.account_id),
            charges: owned_by(&request.recurring_charges, account, |c| c.account_id),
            ceilings: owned_by(&request.ceiling_rules, account, |r| r.account_id),
            category_budgets: owned_by(&request.category_budgets, account, |b| b.account_id),
            rolling_budgets: owned_by(&request.rolling_budgets, account, |b| b.account_id),
            multi_month_budgets: owned_by(&request.multi_month_budgets, account, |b| b.account_id),
        }
    }
}

fn owned_by<T>(items: &[T], account: Uuid, account_of: impl Fn(&T) -> Uuid) -> Vec<&T> {
    items.iter().filter(|item| account_of(item) == account).collect()
}

/// Totals of the transactions dated in one month. Deferred expenses are left to the
/// deferred queue; income always counts in its own month.
#[derive(Debug, Default)]
struct DatedTotals {
    income: f64,
    expenses: f64,
    category_spending: BTreeMap<String, f64>,
}

impl DatedTotals {
    fn collect(transactions: &[&Transaction], month: MonthKey) -> Self {
        let mut totals = Self::default();
        for txn in transactions.iter().filter(|txn| month.contains(txn.date)) {
            match txn.kind {
                FlowKind::Income => totals.income += txn.normalized_amount(),
                FlowKind::Expense if txn.is_deferred() => {}
                FlowKind::Expense => {
                    let cost = txn.normalized_amount();
                    totals.expenses += cost;
                    if let Some(category) = &txn.category {
                        add_spend(&mut totals.category_spending, category, cost);
                    }
                }
            }
        }
        totals
    }
}

fn add_spend(spending: &mut BTreeMap<String, f64>, category: &str, amount: f64) {
    *spending.entry(category.to_string()).or_default() += amount;
}

/// Produces one [`MonthProjection`] per requested month.
pub struct ProjectionService;

impl ProjectionService {
    /// Runs the projection for `request.months` months starting at `request.start_month`.
    ///
    /// Pure and restartable: the request is only borrowed and the same request always
    /// yields the same projections. A non-positive month count yields no months.
    pub fn project(request: &ProjectionRequest) -> Vec<MonthProjection> {
        if request.months <= 0 {
            return Vec::new();
        }
        let scope = AccountScope::new(request);
        let mut history = SpendHistory::seed(&scope.transactions, request.start_month);
        let mut deferred = DeferredQueue::new(&scope.transactions);
        let mut projections: Vec<MonthProjection> = Vec::with_capacity(request.months as usize);

        let mut opening_balance = request.initial_balance;
        let mut previous_ending: Option<f64> = None;

        for offset in 0..request.months {
            let month = request.start_month.add_months(offset);
            let dated = DatedTotals::collect(&scope.transactions, month);
            let recurring = RecurringService::resolve_all(&scope.charges, month);
            let resolved = deferred.resolve_month(month);

            let mut income = dated.income;
            let mut fixed_charges = 0.0;
            let mut category_spending = dated.category_spending;
            for resolution in &recurring {
                match resolution.kind {
                    FlowKind::Income => income += resolution.amount,
                    FlowKind::Expense => {
                        fixed_charges += resolution.amount;
                        if let Some(category) = &resolution.category {
                            add_spend(&mut category_spending, category, resolution.amount);
                        }
                    }
                }
            }
            for resolution in &resolved.resolutions {
                if resolution.kind == FlowKind::Expense && resolution.status.moves_cash() {
                    if let Some(category) = &resolution.category {
                        add_spend(&mut category_spending, category, resolution.amount);
                    }
                }
            }

            let flows = MonthFlows {
                opening_balance,
                income,
                expenses: dated.expenses,
                fixed_charges,
                deferred_in: resolved.deferred_in,
                carried_over_deficit: DeficitService::carried_over(previous_ending),
            };
            let projection = MonthProjection::from_flows(month, flows)
                .with_recurring(recurring)
                .with_deferred(resolved.resolutions)
                .with_category_spending(category_spending);

            history.record(month, &projection.category_spending);
            let ceilings = CeilingService::evaluate(&scope.ceilings, month, projection.outflow());
            let category_results = BudgetService::evaluate_category(
                &scope.category_budgets,
                month,
                &projection.category_spending,
            );
            let rolling_results =
                BudgetService::evaluate_rolling(&scope.rolling_budgets, month, &history);
            let multi_month_results =
                BudgetService::evaluate_multi_month(&scope.multi_month_budgets, month, &history);
            let trends = TrendService::evaluate(&category_results, &projections);

            let projection = projection
                .with_ceilings(ceilings)
                .with_budgets(category_results, rolling_results, multi_month_results)
                .with_trends(trends);

            debug!(
                month = %month,
                opening = projection.opening_balance,
                ending = projection.ending_balance,
                carried = projection.carried_over_deficit,
                "projected month"
            );

            previous_ending = Some(projection.ending_balance);
            opening_balance = projection.ending_balance;
            projections.push(projection);
        }

        projections
    }
}
