//! Basic types for the reporting core

use serde::{Deserialize, Serialize};

/// Owner (user) identifier supplied by the identity layer
pub type OwnerId = i64;
/// Budget identifier
pub type BudgetId = i64;
/// Expense or income identifier
pub type TransactionId = i64;

/// Kind of transaction a store query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money spent, classified by category
    Expense,
    /// Money received, classified by source
    Income,
}

impl std::str::FromStr for TransactionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" | "expenses" => Ok(TransactionKind::Expense),
            "income" | "incomes" => Ok(TransactionKind::Income),
            _ => Err(format!("Invalid transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Expense => write!(f, "expense"),
            TransactionKind::Income => write!(f, "income"),
        }
    }
}

/// Report produced by the assembler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Income and expenses of one month
    Monthly,
    /// Expenses of one year grouped by category
    CategoryExpenses,
    /// Month-by-month income and expenses of one year
    AnnualOverview,
    /// Budgets of one year with linked totals and utilization
    BudgetComparison,
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::Monthly => write!(f, "monthly"),
            ReportKind::CategoryExpenses => write!(f, "category_expenses"),
            ReportKind::AnnualOverview => write!(f, "annual_overview"),
            ReportKind::BudgetComparison => write!(f, "budget_comparison"),
        }
    }
}
