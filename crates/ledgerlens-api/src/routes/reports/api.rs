//! Reports API endpoints - JSON responses

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use ledgerlens_core::{AnnualOverview, BudgetComparisonReport, CategoryExpenseReport, MonthlyReport};

use crate::routes::owner_id;
use crate::{ApiError, AppState};

type Params = Query<HashMap<String, String>>;

pub async fn api_monthly_report(
    state: State<AppState>,
    headers: HeaderMap,
    query: Params,
) -> Result<Json<MonthlyReport>, ApiError> {
    let owner = owner_id(&state, &headers)?;
    let month = positive_param::<u32>(&query, "month")?;
    let year = positive_param::<i32>(&query, "year")?;

    let report = state.assembler.monthly_report(owner, month, year).await?;
    Ok(Json(report))
}

pub async fn api_category_expenses(
    state: State<AppState>,
    headers: HeaderMap,
    query: Params,
) -> Result<Json<CategoryExpenseReport>, ApiError> {
    let owner = owner_id(&state, &headers)?;
    let year = positive_param::<i32>(&query, "year")?;

    let report = state.assembler.category_expense_report(owner, year).await?;
    Ok(Json(report))
}

pub async fn api_annual_overview(
    state: State<AppState>,
    headers: HeaderMap,
    query: Params,
) -> Result<Json<AnnualOverview>, ApiError> {
    let owner = owner_id(&state, &headers)?;
    let year = positive_param::<i32>(&query, "year")?;

    let report = state.assembler.annual_overview(owner, year).await?;
    Ok(Json(report))
}

pub async fn api_budget_comparison(
    state: State<AppState>,
    headers: HeaderMap,
    query: Params,
) -> Result<Json<BudgetComparisonReport>, ApiError> {
    let owner = owner_id(&state, &headers)?;
    let year = positive_param::<i32>(&query, "year")?;

    let report = state.assembler.budget_comparison(owner, year).await?;
    Ok(Json(report))
}

/// Required query parameter holding a positive integer
fn positive_param<T: TryFrom<i64>>(query: &HashMap<String, String>, name: &str) -> Result<T, ApiError> {
    let raw = query
        .get(name)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest {
            message: format!("{} is required", name),
        })?;

    raw.parse::<i64>()
        .ok()
        .filter(|value| *value >= 1)
        .and_then(|value| T::try_from(value).ok())
        .ok_or_else(|| ApiError::BadRequest {
            message: format!("{} must be a positive integer", name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_positive_param() {
        let query = params(&[("year", "2024"), ("month", "0"), ("neg", "-3"), ("word", "abc")]);
        assert_eq!(positive_param::<i32>(&query, "year").unwrap(), 2024);
        assert!(matches!(positive_param::<u32>(&query, "month"), Err(ApiError::BadRequest { .. })));
        assert!(matches!(positive_param::<u32>(&query, "neg"), Err(ApiError::BadRequest { .. })));
        assert!(matches!(positive_param::<i32>(&query, "word"), Err(ApiError::BadRequest { .. })));
        assert!(matches!(positive_param::<i32>(&query, "missing"), Err(ApiError::BadRequest { .. })));
    }

    #[test]
    fn test_positive_param_out_of_range() {
        let query = params(&[("year", "99999999999")]);
        assert!(matches!(positive_param::<i32>(&query, "year"), Err(ApiError::BadRequest { .. })));
    }
}
