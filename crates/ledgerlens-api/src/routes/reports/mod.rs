//! Report routes - monthly, category, annual and budget comparison

pub mod api;

pub use api::{api_annual_overview, api_budget_comparison, api_category_expenses, api_monthly_report};
