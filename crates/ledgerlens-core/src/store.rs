//! Transaction store contract and the bundled in-memory store

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{Budget, Expense, Income, NewBudget, NewExpense, NewIncome, Transaction};
use crate::time::DateRange;
use crate::types::{BudgetId, OwnerId};

/// Shared store handle
pub type StoreRef = Arc<dyn TransactionStore>;

/// Read contract the report assembler consumes.
///
/// Every query filters strictly by owner. Date ranges are half-open.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Expenses of `owner` dated inside `range`
    async fn find_expenses(&self, owner: OwnerId, range: DateRange) -> Result<Vec<Expense>, StoreError>;

    /// Incomes of `owner` dated inside `range`
    async fn find_incomes(&self, owner: OwnerId, range: DateRange) -> Result<Vec<Income>, StoreError>;

    /// Budgets of `owner` whose start date lies inside `range`
    async fn find_budgets(&self, owner: OwnerId, range: DateRange) -> Result<Vec<Budget>, StoreError>;

    /// Expenses of `owner` linked to `budget`, whatever their date
    async fn find_linked_expenses(&self, owner: OwnerId, budget: BudgetId) -> Result<Vec<Expense>, StoreError>;

    /// Incomes of `owner` linked to `budget`, whatever their date
    async fn find_linked_incomes(&self, owner: OwnerId, budget: BudgetId) -> Result<Vec<Income>, StoreError>;

    /// Release the store. Later queries fail with [`StoreError::Closed`].
    async fn close(&self) -> Result<(), StoreError>;
}

/// Shared write handle
pub type WriterRef = Arc<dyn RecordWriter>;

/// Write contract behind the record routes.
///
/// Drafts are validated and linked budgets must belong to the same owner.
#[async_trait]
pub trait RecordWriter: Send + Sync {
    async fn create_expense(&self, owner: OwnerId, draft: NewExpense) -> Result<Expense, StoreError>;

    async fn create_income(&self, owner: OwnerId, draft: NewIncome) -> Result<Income, StoreError>;

    async fn create_budget(&self, owner: OwnerId, draft: NewBudget) -> Result<Budget, StoreError>;
}

/// Serialized store contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub incomes: Vec<Income>,
}

impl StoreData {
    /// Apply the write-path rules to every record.
    ///
    /// Ids share one space across budgets, expenses and incomes.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        let ids = self
            .budgets
            .iter()
            .map(|b| b.id)
            .chain(self.expenses.iter().map(|e| e.id))
            .chain(self.incomes.iter().map(|i| i.id));
        for id in ids {
            if !seen.insert(id) {
                return Err(StoreError::Validation {
                    message: format!("duplicate record id {}", id),
                });
            }
        }

        for budget in &self.budgets {
            budget.validate().map_err(|message| rejected("budget", budget.id, message))?;
        }
        for expense in &self.expenses {
            expense.validate().map_err(|message| rejected("expense", expense.id, message))?;
            check_budget_link(self, expense.owner_id, expense.budget_id)
                .map_err(|message| rejected("expense", expense.id, message))?;
        }
        for income in &self.incomes {
            income.validate().map_err(|message| rejected("income", income.id, message))?;
            check_budget_link(self, income.owner_id, income.budget_id)
                .map_err(|message| rejected("income", income.id, message))?;
        }
        Ok(())
    }

    fn max_id(&self) -> i64 {
        let budgets = self.budgets.iter().map(|b| b.id);
        let expenses = self.expenses.iter().map(|e| e.id);
        let incomes = self.incomes.iter().map(|i| i.id);
        budgets.chain(expenses).chain(incomes).max().unwrap_or(0)
    }
}

/// Store keeping all records in memory
pub struct InMemoryStore {
    data: RwLock<StoreData>,
    next_id: AtomicI64,
    closed: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(StoreData::default())
    }
}

impl InMemoryStore {
    /// Create a store over existing records, taken as already valid
    pub fn new(data: StoreData) -> Self {
        let next_id = data.max_id() + 1;
        Self {
            data: RwLock::new(data),
            next_id: AtomicI64::new(next_id),
            closed: AtomicBool::new(false),
        }
    }

    /// Load records from a JSON snapshot file
    pub async fn load_snapshot(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| StoreError::Snapshot {
            message: format!("{}: {}", path.display(), e),
        })?;
        let data: StoreData = serde_json::from_str(&content).map_err(|e| StoreError::Snapshot {
            message: format!("{}: {}", path.display(), e),
        })?;
        data.validate()?;

        log::info!(
            "loaded snapshot {}: {} budgets, {} expenses, {} incomes",
            path.display(),
            data.budgets.len(),
            data.expenses.len(),
            data.incomes.len()
        );

        Ok(Self::new(data))
    }

    /// Copy of the current records
    pub async fn snapshot(&self) -> StoreData {
        self.data.read().await.clone()
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

fn rejected(kind: &str, id: i64, message: String) -> StoreError {
    StoreError::Validation {
        message: format!("{} {}: {}", kind, id, message),
    }
}

fn check_budget_link(data: &StoreData, owner: OwnerId, budget: Option<BudgetId>) -> Result<(), String> {
    match budget {
        Some(id) if !data.budgets.iter().any(|b| b.id == id && b.owner_id == owner) => {
            Err(format!("Budget {} not found", id))
        }
        _ => Ok(()),
    }
}

fn owned_in_range<T: Transaction + Clone>(items: &[T], owner: OwnerId, range: &DateRange) -> Vec<T> {
    items
        .iter()
        .filter(|t| t.owner_id() == owner && range.contains(&t.date()))
        .cloned()
        .collect()
}

fn owned_linked<T: Transaction + Clone>(items: &[T], owner: OwnerId, budget: BudgetId) -> Vec<T> {
    items
        .iter()
        .filter(|t| t.owner_id() == owner && t.budget_id() == Some(budget))
        .cloned()
        .collect()
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn find_expenses(&self, owner: OwnerId, range: DateRange) -> Result<Vec<Expense>, StoreError> {
        self.ensure_open()?;
        Ok(owned_in_range(&self.data.read().await.expenses, owner, &range))
    }

    async fn find_incomes(&self, owner: OwnerId, range: DateRange) -> Result<Vec<Income>, StoreError> {
        self.ensure_open()?;
        Ok(owned_in_range(&self.data.read().await.incomes, owner, &range))
    }

    async fn find_budgets(&self, owner: OwnerId, range: DateRange) -> Result<Vec<Budget>, StoreError> {
        self.ensure_open()?;
        let data = self.data.read().await;
        Ok(data
            .budgets
            .iter()
            .filter(|b| b.owner_id == owner && range.contains(&b.start_date))
            .cloned()
            .collect())
    }

    async fn find_linked_expenses(&self, owner: OwnerId, budget: BudgetId) -> Result<Vec<Expense>, StoreError> {
        self.ensure_open()?;
        Ok(owned_linked(&self.data.read().await.expenses, owner, budget))
    }

    async fn find_linked_incomes(&self, owner: OwnerId, budget: BudgetId) -> Result<Vec<Income>, StoreError> {
        self.ensure_open()?;
        Ok(owned_linked(&self.data.read().await.incomes, owner, budget))
    }

    async fn close(&self) -> Result<(), StoreError> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            log::info!("in-memory store closed");
        }
        Ok(())
    }
}

#[async_trait]
impl RecordWriter for InMemoryStore {
    async fn create_expense(&self, owner: OwnerId, draft: NewExpense) -> Result<Expense, StoreError> {
        self.ensure_open()?;
        draft.validate().map_err(|message| StoreError::Validation { message })?;

        let mut data = self.data.write().await;
        check_budget_link(&data, owner, draft.budget_id).map_err(|message| StoreError::Validation { message })?;
        let expense = draft.into_expense(self.allocate_id(), owner);
        data.expenses.push(expense.clone());
        Ok(expense)
    }

    async fn create_income(&self, owner: OwnerId, draft: NewIncome) -> Result<Income, StoreError> {
        self.ensure_open()?;
        draft.validate().map_err(|message| StoreError::Validation { message })?;

        let mut data = self.data.write().await;
        check_budget_link(&data, owner, draft.budget_id).map_err(|message| StoreError::Validation { message })?;
        let income = draft.into_income(self.allocate_id(), owner);
        data.incomes.push(income.clone());
        Ok(income)
    }

    async fn create_budget(&self, owner: OwnerId, draft: NewBudget) -> Result<Budget, StoreError> {
        self.ensure_open()?;
        draft.validate().map_err(|message| StoreError::Validation { message })?;

        let budget = draft.into_budget(self.allocate_id(), owner);
        self.data.write().await.budgets.push(budget.clone());
        Ok(budget)
    }
}
