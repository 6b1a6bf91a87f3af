//! Aggregation engine
//!
//! Pure functions over in-memory transactions. Nothing here touches the
//! store, so every function is safe to call from concurrent requests.

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};
use crate::models::Transaction;
use crate::reports::{CategoryTotal, MonthlyTotal};
use crate::types::OwnerId;

/// Sum of all amounts; zero for an empty slice
pub fn sum_amounts<T: Transaction>(transactions: &[T]) -> CoreResult<Decimal> {
    transactions
        .iter()
        .try_fold(Decimal::ZERO, |total, t| add_amount(total, t.amount()))
}

fn add_amount(total: Decimal, amount: Decimal) -> CoreResult<Decimal> {
    total.checked_add(amount).ok_or_else(|| CoreError::InternalError {
        message: format!("adding {} to {} overflowed", amount, total),
    })
}

/// Group by category (exact, case-sensitive match) with per-group total and count.
///
/// Ordered by total descending; equal totals keep first-seen order.
pub fn group_by_category<T: Transaction>(expenses: &[T]) -> CoreResult<Vec<CategoryTotal>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CategoryTotal> = Vec::new();

    for expense in expenses {
        let slot = *index.entry(expense.label()).or_insert_with(|| {
            groups.push(CategoryTotal {
                category: expense.label().to_string(),
                total_amount: Decimal::ZERO,
                transaction_count: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.total_amount = add_amount(group.total_amount, expense.amount())?;
        group.transaction_count += 1;
    }

    // sort_by is stable, so ties stay in first-seen order
    groups.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
    Ok(groups)
}

/// Bucket the transactions dated in `year` by calendar month.
///
/// Always returns 12 entries, months without transactions carry a zero total.
pub fn group_by_month<T: Transaction>(transactions: &[T], year: i32) -> CoreResult<Vec<MonthlyTotal>> {
    let mut totals = [Decimal::ZERO; 12];

    for transaction in transactions.iter().filter(|t| t.date().year() == year) {
        let slot = &mut totals[transaction.date().month0() as usize];
        *slot = add_amount(*slot, transaction.amount())?;
    }

    Ok(totals
        .iter()
        .enumerate()
        .map(|(i, total)| MonthlyTotal {
            month: i as u32 + 1,
            total: *total,
        })
        .collect())
}

/// Income minus expenses, may be negative
pub fn net_balance(income_total: Decimal, expense_total: Decimal) -> Decimal {
    income_total - expense_total
}

/// Percentage of `budget_total_amount` consumed by `total_expenses`
pub fn budget_utilization(total_expenses: Decimal, budget_total_amount: Decimal) -> CoreResult<Decimal> {
    if budget_total_amount.is_zero() {
        return Err(CoreError::DivisionByZero {
            context: format!("utilization of {} against a zero budget", total_expenses),
        });
    }

    let ratio = total_expenses
        .checked_div(budget_total_amount)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| CoreError::InternalError {
            message: format!("utilization of {} / {} overflowed", total_expenses, budget_total_amount),
        })?;

    Ok(ratio.normalize())
}

/// Keep only the records owned by `owner`
pub fn filter_owned<T: Transaction>(transactions: Vec<T>, owner: OwnerId) -> Vec<T> {
    let before = transactions.len();
    let owned: Vec<T> = transactions.into_iter().filter(|t| t.owner_id() == owner).collect();
    if owned.len() != before {
        log::warn!(
            "dropped {} {} records not owned by {} from a store result",
            before - owned.len(),
            T::KIND,
            owner
        );
    }
    owned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, Income};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn expense(id: i64, amount: Decimal, category: &str, date: (i32, u32, u32)) -> Expense {
        Expense {
            id,
            owner_id: 1,
            amount,
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            budget_id: None,
            description: None,
        }
    }

    fn income(id: i64, amount: Decimal, date: (i32, u32, u32)) -> Income {
        Income {
            id,
            owner_id: 1,
            amount,
            source: "salary".to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            budget_id: None,
            description: None,
        }
    }

    fn march_expenses() -> Vec<Expense> {
        vec![
            expense(1, dec!(50), "food", (2024, 3, 5)),
            expense(2, dec!(30), "food", (2024, 3, 20)),
            expense(3, dec!(20), "transport", (2024, 3, 10)),
        ]
    }

    #[test]
    fn test_sum_amounts_empty() {
        let empty: Vec<Expense> = vec![];
        assert_eq!(sum_amounts(&empty).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_sum_amounts_order_independent() {
        let mut expenses = vec![
            expense(1, dec!(0.1), "a", (2024, 1, 1)),
            expense(2, dec!(0.2), "b", (2024, 1, 2)),
            expense(3, dec!(1234.56), "c", (2024, 1, 3)),
            expense(4, dec!(7.89), "d", (2024, 1, 4)),
        ];
        let forward = sum_amounts(&expenses).unwrap();
        expenses.reverse();
        assert_eq!(sum_amounts(&expenses).unwrap(), forward);
        expenses.swap(0, 2);
        assert_eq!(sum_amounts(&expenses).unwrap(), forward);
        assert_eq!(forward, dec!(1242.75));
    }

    #[test]
    fn test_sum_amounts_does_not_mutate() {
        let expenses = march_expenses();
        let copy = expenses.clone();
        sum_amounts(&expenses).unwrap();
        assert_eq!(expenses, copy);
    }

    #[test]
    fn test_group_by_category_scenario() {
        let groups = group_by_category(&march_expenses()).unwrap();
        assert_eq!(
            groups,
            vec![
                CategoryTotal {
                    category: "food".to_string(),
                    total_amount: dec!(80),
                    transaction_count: 2,
                },
                CategoryTotal {
                    category: "transport".to_string(),
                    total_amount: dec!(20),
                    transaction_count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_group_by_category_ties_keep_first_seen() {
        let expenses = vec![
            expense(1, dec!(10), "rent", (2024, 1, 1)),
            expense(2, dec!(10), "gym", (2024, 1, 2)),
            expense(3, dec!(25), "travel", (2024, 1, 3)),
            expense(4, dec!(10), "books", (2024, 1, 4)),
        ];
        let order: Vec<String> = group_by_category(&expenses).unwrap().into_iter().map(|g| g.category).collect();
        assert_eq!(order, vec!["travel", "rent", "gym", "books"]);
    }

    #[test]
    fn test_group_by_category_is_case_sensitive() {
        let expenses = vec![
            expense(1, dec!(5), "Food", (2024, 1, 1)),
            expense(2, dec!(5), "food", (2024, 1, 2)),
        ];
        assert_eq!(group_by_category(&expenses).unwrap().len(), 2);
    }

    #[test]
    fn test_group_by_month_always_twelve() {
        let empty: Vec<Income> = vec![];
        let months = group_by_month(&empty, 2024).unwrap();
        assert_eq!(months.len(), 12);
        assert!(months.iter().all(|m| m.total.is_zero()));
        assert_eq!(months.first().unwrap().month, 1);
        assert_eq!(months.last().unwrap().month, 12);
    }

    #[test]
    fn test_group_by_month_buckets_and_skips_other_years() {
        let incomes = vec![
            income(1, dec!(200), (2024, 3, 1)),
            income(2, dec!(50), (2024, 3, 31)),
            income(3, dec!(75), (2024, 12, 31)),
            income(4, dec!(999), (2023, 12, 31)),
            income(5, dec!(999), (2025, 1, 1)),
        ];
        let months = group_by_month(&incomes, 2024).unwrap();
        assert_eq!(months[2].total, dec!(250));
        assert_eq!(months[11].total, dec!(75));
        assert_eq!(months.iter().map(|m| m.total).sum::<Decimal>(), dec!(325));
    }

    #[test]
    fn test_overflowing_totals_are_errors() {
        let expenses = vec![
            expense(1, Decimal::MAX, "rent", (2024, 3, 1)),
            expense(2, Decimal::MAX, "rent", (2024, 3, 2)),
        ];
        assert!(matches!(sum_amounts(&expenses), Err(CoreError::InternalError { .. })));
        assert!(matches!(group_by_category(&expenses), Err(CoreError::InternalError { .. })));
        assert!(matches!(group_by_month(&expenses, 2024), Err(CoreError::InternalError { .. })));
    }

    #[test]
    fn test_net_balance_can_be_negative() {
        assert_eq!(net_balance(dec!(200), dec!(100)), dec!(100));
        assert_eq!(net_balance(dec!(50), dec!(80.25)), dec!(-30.25));
    }

    #[test]
    fn test_budget_utilization() {
        assert_eq!(budget_utilization(dec!(0), dec!(100)).unwrap(), dec!(0));
        assert_eq!(budget_utilization(dec!(100), dec!(100)).unwrap(), dec!(100));
        assert_eq!(budget_utilization(dec!(125), dec!(500)).unwrap(), dec!(25));
        assert_eq!(budget_utilization(dec!(750), dec!(500)).unwrap(), dec!(150));
    }

    #[test]
    fn test_budget_utilization_zero_budget() {
        let err = budget_utilization(dec!(10), Decimal::ZERO).unwrap_err();
        assert!(matches!(err, CoreError::DivisionByZero { .. }));
    }

    #[test]
    fn test_filter_owned() {
        let mut expenses = march_expenses();
        expenses[1].owner_id = 2;
        let owned = filter_owned(expenses, 1);
        assert_eq!(owned.len(), 2);
        assert!(owned.iter().all(|e| e.owner_id == 1));
    }
}
