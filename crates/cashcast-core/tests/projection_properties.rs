use cashcast_core::{AdvancedAlertService, AlertService, ProjectionService};
use cashcast_domain::{
    AlertFilter, BudgetStatus, CategoryBudget, CeilingRule, Deferral, FlowKind, MonthKey,
    MultiMonthBudget, ProjectionRequest, RecurringCharge, RollingCategoryBudget, Severity,
    Transaction,
};
use chrono::NaiveDate;
use uuid::Uuid;

fn key(year: i32, month: u32) -> MonthKey {
    MonthKey::new(year, month).unwrap()
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn household_request() -> ProjectionRequest {
    let account = Uuid::new_v4();
    let start = key(2025, 1);
    ProjectionRequest::new(account, 750.0, start, 18)
        .with_transactions(vec![
            Transaction::expense(account, 320.0, day(2024, 12, 20)).with_category("groceries"),
            Transaction::expense(account, -310.0, day(2025, 1, 4)).with_category("groceries"),
            Transaction::expense(account, 95.5, day(2025, 1, 12)).with_category("dining"),
            Transaction::income(account, 150.25, day(2025, 2, 2)),
            Transaction::expense(account, 410.0, day(2025, 2, 8)).with_category("groceries"),
            Transaction::expense(account, 2600.0, day(2025, 3, 1)).with_category("travel"),
            Transaction::expense(account, 600.0, day(2025, 2, 14))
                .with_category("home")
                .with_deferral(Deferral::to(key(2025, 5)).with_priority(2).with_max_months(2)),
            Transaction::expense(account, 75.0, day(2025, 1, 30))
                .with_deferral(Deferral::to(key(2025, 9)).until(key(2025, 3))),
            Transaction::expense(Uuid::new_v4(), 999.0, day(2025, 2, 1)).with_category("groceries"),
        ])
        .with_recurring_charges(vec![
            RecurringCharge::new(account, FlowKind::Income, 2100.0, start)
                .with_override(key(2024, 11), 2050.0)
                .with_override(key(2025, 7), 2200.0),
            RecurringCharge::new(account, FlowKind::Expense, 1450.0, start)
                .ending(key(2026, 3))
                .with_category("housing"),
        ])
        .with_ceiling_rules(vec![CeilingRule::new(account, 1900.0, start).ending(key(2025, 12))])
        .with_category_budgets(vec![
            CategoryBudget::new(account, "groceries", 400.0),
            CategoryBudget::new(account, "travel", 500.0).for_month(key(2025, 3)),
        ])
        .with_rolling_budgets(vec![RollingCategoryBudget::new(account, "groceries", 900.0, 3)])
        .with_multi_month_budgets(vec![MultiMonthBudget::new(
            account,
            "travel",
            2000.0,
            key(2025, 2),
            key(2025, 6),
        )])
}

#[test]
fn balance_recurrence_holds_for_every_month() {
    let months = ProjectionService::project(&household_request());
    assert_eq!(months.len(), 18);
    assert_eq!(months[0].opening_balance, 750.0);
    assert_eq!(months[0].carried_over_deficit, 0.0);

    for month in &months {
        assert_eq!(month.ending_balance, month.expected_ending_balance());
    }
    for pair in months.windows(2) {
        assert_eq!(pair[1].opening_balance, pair[0].ending_balance);
        assert_eq!(pair[1].month, pair[0].month.add_months(1));
        let expected_carry = if pair[0].ending_balance < 0.0 {
            -pair[0].ending_balance
        } else {
            0.0
        };
        assert_eq!(pair[1].carried_over_deficit, expected_carry);
    }
}

#[test]
fn projection_is_deterministic_and_leaves_input_untouched() {
    let request = household_request();
    let before = serde_json::to_string(&request).unwrap();

    let first = ProjectionService::project(&request);
    let second = ProjectionService::project(&request);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(serde_json::to_string(&request).unwrap(), before);
    assert_eq!(AlertService::generate(&first), AlertService::generate(&second));
    assert_eq!(
        AdvancedAlertService::generate(&first),
        AdvancedAlertService::generate(&second)
    );
}

#[test]
fn override_dated_before_start_applies_from_first_month() {
    let months = ProjectionService::project(&household_request());
    assert_eq!(months[0].income, 2050.0);
    assert_eq!(months[5].income, 2050.0);
    assert_eq!(months[6].income, 2200.0);
    assert_eq!(months[17].income, 2200.0);
    assert_eq!(months[15].fixed_charges, 0.0);
}

#[test]
fn budgets_use_projected_and_seeded_spend() {
    let months = ProjectionService::project(&household_request());

    let january = &months[0];
    assert_eq!(january.category_spending.get("groceries"), Some(&310.0));
    assert_eq!(january.category_spending.get("housing"), Some(&1450.0));
    assert_eq!(january.rolling_budgets[0].spent, 630.0);

    let february = &months[1];
    assert_eq!(february.category_budgets[0].status, BudgetStatus::Exceeded);
    assert_eq!(february.multi_month_budgets[0].status, BudgetStatus::Ok);
    assert_eq!(february.rolling_budgets[0].spent, 1040.0);

    let march = &months[2];
    assert_eq!(march.category_budgets.len(), 2);
    assert_eq!(march.category_budgets[1].status, BudgetStatus::Exceeded);
    assert_eq!(march.multi_month_budgets[0].spent, 2600.0);
    assert_eq!(march.multi_month_budgets[0].status, BudgetStatus::Exceeded);

    assert_eq!(months[6].multi_month_budgets[0].status, BudgetStatus::Inactive);
}

#[test]
fn ranked_alerts_are_totally_ordered() {
    let months = ProjectionService::project(&household_request());
    let ranked = AdvancedAlertService::generate(&months);
    assert!(!ranked.is_empty());

    for (position, alert) in ranked.iter().enumerate() {
        assert_eq!(alert.priority_rank, Some(position as u32 + 1));
    }
    for pair in ranked.windows(2) {
        assert_ne!(
            AdvancedAlertService::compare(&pair[0], &pair[1]),
            std::cmp::Ordering::Greater
        );
    }

    let critical = AlertFilter {
        min_severity: Some(Severity::Critical),
        ..AlertFilter::default()
    }
    .apply(&ranked);
    assert!(critical.iter().all(|alert| alert.severity == Severity::Critical));
    assert!(critical
        .iter()
        .zip(critical.iter().skip(1))
        .all(|(a, b)| a.priority_rank < b.priority_rank));
}
