//! Report structures for API responses
//!
//! Amounts serialize as decimal strings, field names as camelCase.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::models::{Expense, Income};
use super::types::BudgetId;

/// Per-category expense total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: Decimal,
    pub transaction_count: usize,
}

/// Total of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// 1..=12
    pub month: u32,
    pub total: Decimal,
}

/// Income and expenses of one month
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month: u32,
    pub year: i32,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_balance: Decimal,
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
}

/// Expenses of one year broken down by category, largest first
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryExpenseReport {
    pub year: i32,
    pub categories: Vec<CategoryTotal>,
}

/// Month-by-month view of one year
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualOverview {
    pub year: i32,
    /// Always 12 entries
    pub monthly_incomes: Vec<MonthlyTotal>,
    /// Always 12 entries
    pub monthly_expenses: Vec<MonthlyTotal>,
    pub annual_income: Decimal,
    pub annual_expenses: Decimal,
    pub net_annual_balance: Decimal,
}

/// One budget compared against its linked transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetComparison {
    pub budget_id: BudgetId,
    pub name: String,
    pub total_budget_amount: Decimal,
    pub total_expenses: Decimal,
    pub total_incomes: Decimal,
    /// Percentage of the budget consumed by linked expenses
    pub budget_utilization: Decimal,
}

/// Budgets starting in one year
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetComparisonReport {
    pub year: i32,
    pub budget_comparison: Vec<BudgetComparison>,
}
