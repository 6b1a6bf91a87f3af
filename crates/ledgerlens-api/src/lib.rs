//! HTTP JSON API over the report assembler
//!
//! Routes are organized into modules:
//! - routes::reports: monthly, category, annual and budget comparison reports
//! - routes::records: creation of budgets, expenses and incomes

pub mod error;
pub mod routes;

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use ledgerlens_config::Config;
use ledgerlens_core::{ReportAssembler, WriterRef};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<ReportAssembler>,
    pub records: WriterRef,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::records::{api_create_budget, api_create_expense, api_create_income};
    use routes::reports::{api_annual_overview, api_budget_comparison, api_category_expenses, api_monthly_report};

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/reports/monthly", get(api_monthly_report))
        .route("/api/reports/category-expenses", get(api_category_expenses))
        .route("/api/reports/annual-overview", get(api_annual_overview))
        .route("/api/reports/budget-comparison", get(api_budget_comparison))
        .route("/api/budgets", post(api_create_budget))
        .route("/api/expenses", post(api_create_expense))
        .route("/api/incomes", post(api_create_income))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Serve the API until `shutdown` resolves
pub async fn start_server<F>(state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting ledgerlens server on http://{}", addr);
    log::info!("Report routes: /api/reports/{{monthly,category-expenses,annual-overview,budget-comparison}}");
    log::info!("Record routes: POST /api/{{budgets,expenses,incomes}}");

    axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;
    log::info!("Server stopped gracefully");
    Ok(())
}
