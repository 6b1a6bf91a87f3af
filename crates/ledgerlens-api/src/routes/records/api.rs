//! Records API endpoints - JSON bodies in, created records out

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use ledgerlens_core::{Budget, CoreError, Expense, Income, NewBudget, NewExpense, NewIncome};

use crate::routes::owner_id;
use crate::{ApiError, AppState};

pub async fn api_create_expense(
    state: State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<NewExpense>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let owner = owner_id(&state, &headers)?;
    let expense = state.records.create_expense(owner, draft).await.map_err(CoreError::from)?;

    log::debug!("created expense {} for owner {}", expense.id, owner);
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn api_create_income(
    state: State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<NewIncome>,
) -> Result<(StatusCode, Json<Income>), ApiError> {
    let owner = owner_id(&state, &headers)?;
    let income = state.records.create_income(owner, draft).await.map_err(CoreError::from)?;

    log::debug!("created income {} for owner {}", income.id, owner);
    Ok((StatusCode::CREATED, Json(income)))
}

pub async fn api_create_budget(
    state: State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<NewBudget>,
) -> Result<(StatusCode, Json<Budget>), ApiError> {
    let owner = owner_id(&state, &headers)?;
    let budget = state.records.create_budget(owner, draft).await.map_err(CoreError::from)?;

    log::debug!("created budget {} for owner {}", budget.id, owner);
    Ok((StatusCode::CREATED, Json(budget)))
}
