//! Reporting core: turns owner-scoped budgets, expenses and incomes into
//! monthly, category, annual and budget-comparison reports.

pub mod aggregation;
pub mod assembler;
pub mod error;
pub mod models;
pub mod reports;
pub mod store;
pub mod time;
pub mod types;

pub use assembler::{ReportAssembler, ReportSettings};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity, ReportError, StoreError};
pub use models::{Budget, Expense, Income, NewBudget, NewExpense, NewIncome, Transaction};
pub use reports::{
    AnnualOverview, BudgetComparison, BudgetComparisonReport, CategoryExpenseReport, CategoryTotal, MonthlyReport,
    MonthlyTotal,
};
pub use store::{InMemoryStore, RecordWriter, StoreData, StoreRef, TransactionStore, WriterRef};
pub use time::{DateRange, Period};
pub use types::{BudgetId, OwnerId, ReportKind, TransactionId, TransactionKind};
