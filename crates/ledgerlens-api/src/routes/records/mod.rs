//! Record routes - create budgets, expenses and incomes

pub mod api;

pub use api::{api_create_budget, api_create_expense, api_create_income};
