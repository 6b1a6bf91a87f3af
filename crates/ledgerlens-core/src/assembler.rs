//! Report assembler
//!
//! Resolves the requested period, queries the store under a timeout,
//! hands the records to the aggregation engine and shapes the payload.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ledgerlens_config::{Config, ZeroBudgetPolicy};
use rust_decimal::Decimal;

use crate::aggregation::{budget_utilization, filter_owned, group_by_category, group_by_month, net_balance, sum_amounts};
use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger, ErrorSeverity, ReportError, ReportResult, StoreError};
use crate::models::{Budget, Transaction};
use crate::reports::{AnnualOverview, BudgetComparison, BudgetComparisonReport, CategoryExpenseReport, MonthlyReport};
use crate::store::StoreRef;
use crate::time::Period;
use crate::types::{OwnerId, ReportKind};

/// Knobs the assembler reads from configuration
#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Upper bound for every single store query
    pub query_timeout: Duration,
    pub zero_budget_policy: ZeroBudgetPolicy,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ReportSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            query_timeout: config.query_timeout(),
            zero_budget_policy: config.reports.zero_budget_policy,
        }
    }
}

/// Builds the four reports on top of a transaction store
pub struct ReportAssembler {
    store: StoreRef,
    settings: ReportSettings,
    logger: Arc<dyn ErrorLogger>,
}

impl ReportAssembler {
    pub fn new(store: StoreRef, settings: ReportSettings) -> Self {
        Self {
            store,
            settings,
            logger: Arc::new(DefaultErrorLogger),
        }
    }

    /// Replace the error logger
    pub fn with_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Income and expenses of one month
    pub async fn monthly_report(&self, owner: OwnerId, month: u32, year: i32) -> ReportResult<MonthlyReport> {
        let period = format!("{:04}-{:02}", year, month);
        let result = self.build_monthly(owner, month, year).await;
        self.finish(ReportKind::Monthly, owner, period, result)
    }

    /// Expenses of one year grouped by category
    pub async fn category_expense_report(&self, owner: OwnerId, year: i32) -> ReportResult<CategoryExpenseReport> {
        let result = self.build_category(owner, year).await;
        self.finish(ReportKind::CategoryExpenses, owner, year.to_string(), result)
    }

    /// Twelve-month series of income and expenses plus annual totals
    pub async fn annual_overview(&self, owner: OwnerId, year: i32) -> ReportResult<AnnualOverview> {
        let result = self.build_annual(owner, year).await;
        self.finish(ReportKind::AnnualOverview, owner, year.to_string(), result)
    }

    /// Budgets starting in `year` with linked totals and utilization
    pub async fn budget_comparison(&self, owner: OwnerId, year: i32) -> ReportResult<BudgetComparisonReport> {
        let result = self.build_budget_comparison(owner, year).await;
        self.finish(ReportKind::BudgetComparison, owner, year.to_string(), result)
    }

    // ==================== Builders ====================

    async fn build_monthly(&self, owner: OwnerId, month: u32, year: i32) -> CoreResult<MonthlyReport> {
        let period = Period::month(year, month)?;
        let range = period.range()?;
        log::debug!("monthly report for owner {} over {}", owner, range);

        let (incomes, expenses) = tokio::try_join!(
            self.query("find_incomes", self.store.find_incomes(owner, range)),
            self.query("find_expenses", self.store.find_expenses(owner, range)),
        )?;
        let mut incomes = filter_owned(incomes, owner);
        let mut expenses = filter_owned(expenses, owner);
        incomes.sort_by_key(|i| (i.date, i.id));
        expenses.sort_by_key(|e| (e.date, e.id));

        let total_income = sum_amounts(&incomes)?;
        let total_expenses = sum_amounts(&expenses)?;

        Ok(MonthlyReport {
            month,
            year,
            total_income,
            total_expenses,
            net_balance: net_balance(total_income, total_expenses),
            incomes,
            expenses,
        })
    }

    async fn build_category(&self, owner: OwnerId, year: i32) -> CoreResult<CategoryExpenseReport> {
        let range = Period::year(year)?.range()?;
        log::debug!("category report for owner {} over {}", owner, range);

        let expenses = self
            .query("find_expenses", self.store.find_expenses(owner, range))
            .await?;
        let expenses = filter_owned(expenses, owner);

        Ok(CategoryExpenseReport {
            year,
            categories: group_by_category(&expenses)?,
        })
    }

    async fn build_annual(&self, owner: OwnerId, year: i32) -> CoreResult<AnnualOverview> {
        let range = Period::year(year)?.range()?;
        log::debug!("annual overview for owner {} over {}", owner, range);

        let (incomes, expenses) = tokio::try_join!(
            self.query("find_incomes", self.store.find_incomes(owner, range)),
            self.query("find_expenses", self.store.find_expenses(owner, range)),
        )?;
        // The store filters by range; dropping strays keeps the 12-month series
        // and the annual totals summing the same records.
        let incomes: Vec<_> = filter_owned(incomes, owner)
            .into_iter()
            .filter(|i| range.contains(&i.date()))
            .collect();
        let expenses: Vec<_> = filter_owned(expenses, owner)
            .into_iter()
            .filter(|e| range.contains(&e.date()))
            .collect();

        let annual_income = sum_amounts(&incomes)?;
        let annual_expenses = sum_amounts(&expenses)?;

        Ok(AnnualOverview {
            year,
            monthly_incomes: group_by_month(&incomes, year)?,
            monthly_expenses: group_by_month(&expenses, year)?,
            annual_income,
            annual_expenses,
            net_annual_balance: net_balance(annual_income, annual_expenses),
        })
    }

    async fn build_budget_comparison(&self, owner: OwnerId, year: i32) -> CoreResult<BudgetComparisonReport> {
        let range = Period::year(year)?.range()?;
        log::debug!("budget comparison for owner {} over {}", owner, range);

        let mut budgets: Vec<Budget> = self
            .query("find_budgets", self.store.find_budgets(owner, range))
            .await?
            .into_iter()
            .filter(|b| b.owner_id == owner && range.contains(&b.start_date))
            .collect();
        budgets.sort_by_key(|b| (b.start_date, b.id));

        let mut budget_comparison = Vec::with_capacity(budgets.len());
        for budget in budgets {
            budget_comparison.push(self.compare_budget(owner, year, budget).await?);
        }

        Ok(BudgetComparisonReport {
            year,
            budget_comparison,
        })
    }

    async fn compare_budget(&self, owner: OwnerId, year: i32, budget: Budget) -> CoreResult<BudgetComparison> {
        let (expenses, incomes) = tokio::try_join!(
            self.query("find_linked_expenses", self.store.find_linked_expenses(owner, budget.id)),
            self.query("find_linked_incomes", self.store.find_linked_incomes(owner, budget.id)),
        )?;
        let expenses: Vec<_> = filter_owned(expenses, owner)
            .into_iter()
            .filter(|e| e.budget_id == Some(budget.id))
            .collect();
        let incomes: Vec<_> = filter_owned(incomes, owner)
            .into_iter()
            .filter(|i| i.budget_id == Some(budget.id))
            .collect();

        let total_expenses = sum_amounts(&expenses)?;
        let total_incomes = sum_amounts(&incomes)?;

        let utilization = match budget_utilization(total_expenses, budget.total_amount) {
            Ok(value) => value,
            Err(err @ CoreError::DivisionByZero { .. }) => match self.settings.zero_budget_policy {
                ZeroBudgetPolicy::Zero => {
                    let context = ErrorContext::new("budget_comparison_report".to_string())
                        .with_owner(owner)
                        .with_data("period", serde_json::json!(year.to_string()))
                        .with_data("budget_id", serde_json::json!(budget.id));
                    self.logger.log_warning(
                        &format!("budget '{}' has a zero total amount, reporting 0% utilization", budget.name),
                        &context,
                    );
                    Decimal::ZERO
                }
                ZeroBudgetPolicy::Error => {
                    return Err(CoreError::DivisionByZero {
                        context: format!("budget {} ('{}'): {}", budget.id, budget.name, err),
                    })
                }
            },
            Err(err) => return Err(err),
        };

        Ok(BudgetComparison {
            budget_id: budget.id,
            name: budget.name,
            total_budget_amount: budget.total_amount,
            total_expenses,
            total_incomes,
            budget_utilization: utilization,
        })
    }

    // ==================== Helpers ====================

    /// Run one store query under the configured timeout
    async fn query<T, F>(&self, operation: &str, fut: F) -> CoreResult<T>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let timeout = self.settings.query_timeout;
        let outcome = match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                after_ms: timeout.as_millis() as u64,
            }),
        };

        outcome.map_err(|e| CoreError::StoreUnavailable {
            message: format!("{}: {}", operation, e),
        })
    }

    fn finish<T>(&self, kind: ReportKind, owner: OwnerId, period: String, result: CoreResult<T>) -> ReportResult<T> {
        result.map_err(|source| {
            let error = ReportError::new(kind, owner, period, source);
            match error.source.severity() {
                ErrorSeverity::Error | ErrorSeverity::Critical => self.logger.log_error(&error, &error.context()),
                _ => log::debug!("{}", error),
            }
            error
        })
    }
}
