//! Core data models: budgets, expenses and incomes

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{BudgetId, OwnerId, TransactionId, TransactionKind};

/// Common view over expenses and incomes used by the aggregation engine
pub trait Transaction {
    const KIND: TransactionKind;

    fn owner_id(&self) -> OwnerId;
    fn amount(&self) -> Decimal;
    fn date(&self) -> NaiveDate;
    fn budget_id(&self) -> Option<BudgetId>;
    /// Category for expenses, source for incomes
    fn label(&self) -> &str;
}

/// Money spent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: TransactionId,
    pub owner_id: OwnerId,
    /// Strictly positive
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<BudgetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Transaction for Expense {
    const KIND: TransactionKind = TransactionKind::Expense;

    fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn budget_id(&self) -> Option<BudgetId> {
        self.budget_id
    }

    fn label(&self) -> &str {
        &self.category
    }
}

/// Money received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: TransactionId,
    pub owner_id: OwnerId,
    /// Strictly positive
    pub amount: Decimal,
    pub source: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<BudgetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Transaction for Income {
    const KIND: TransactionKind = TransactionKind::Income;

    fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn budget_id(&self) -> Option<BudgetId> {
        self.budget_id
    }

    fn label(&self) -> &str {
        &self.source
    }
}

/// A spending plan over a date span. Expenses and incomes refer to it by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,
    pub owner_id: OwnerId,
    pub name: String,
    /// Strictly positive
    pub total_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Expense {
    /// Same field rules as [`NewExpense::validate`]
    pub fn validate(&self) -> Result<(), String> {
        check_positive(self.amount, "Amount must be greater than 0")?;
        check_present(&self.category, "Category is required")
    }
}

impl Income {
    /// Same field rules as [`NewIncome::validate`]
    pub fn validate(&self) -> Result<(), String> {
        check_positive(self.amount, "Amount must be greater than 0")?;
        check_present(&self.source, "Source is required")
    }
}

impl Budget {
    /// Same field rules as [`NewBudget::validate`]
    pub fn validate(&self) -> Result<(), String> {
        check_present(&self.name, "Budget name is required")?;
        check_positive(self.total_amount, "Total amount must be greater than 0")
    }
}

fn check_positive(amount: Decimal, message: &str) -> Result<(), String> {
    if amount <= Decimal::ZERO {
        return Err(message.to_string());
    }
    Ok(())
}

fn check_present(text: &str, message: &str) -> Result<(), String> {
    if text.trim().is_empty() {
        return Err(message.to_string());
    }
    Ok(())
}

// ==================== Write Models ====================

/// Expense fields accepted by the store write path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub budget_id: Option<BudgetId>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewExpense {
    /// Check the field rules enforced on write
    pub fn validate(&self) -> Result<(), String> {
        check_positive(self.amount, "Amount must be greater than 0")?;
        check_present(&self.category, "Category is required")
    }

    pub fn into_expense(self, id: TransactionId, owner_id: OwnerId) -> Expense {
        Expense {
            id,
            owner_id,
            amount: self.amount,
            category: self.category,
            date: self.date,
            budget_id: self.budget_id,
            description: self.description,
        }
    }
}

/// Income fields accepted by the store write path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncome {
    pub amount: Decimal,
    pub source: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub budget_id: Option<BudgetId>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewIncome {
    /// Check the field rules enforced on write
    pub fn validate(&self) -> Result<(), String> {
        check_positive(self.amount, "Amount must be greater than 0")?;
        check_present(&self.source, "Source is required")
    }

    pub fn into_income(self, id: TransactionId, owner_id: OwnerId) -> Income {
        Income {
            id,
            owner_id,
            amount: self.amount,
            source: self.source,
            date: self.date,
            budget_id: self.budget_id,
            description: self.description,
        }
    }
}

/// Budget fields accepted by the store write path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub name: String,
    pub total_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewBudget {
    /// Check the field rules enforced on write
    pub fn validate(&self) -> Result<(), String> {
        check_present(&self.name, "Budget name is required")?;
        check_positive(self.total_amount, "Total amount must be greater than 0")
    }

    pub fn into_budget(self, id: BudgetId, owner_id: OwnerId) -> Budget {
        Budget {
            id,
            owner_id,
            name: self.name,
            total_amount: self.total_amount,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expense_transaction_view() {
        let expense = NewExpense {
            amount: dec!(12.50),
            category: "food".to_string(),
            date: date(2024, 3, 5),
            budget_id: Some(7),
            description: None,
        }
        .into_expense(1, 42);

        assert_eq!(expense.owner_id(), 42);
        assert_eq!(expense.amount(), dec!(12.50));
        assert_eq!(expense.label(), "food");
        assert_eq!(expense.budget_id(), Some(7));
        assert_eq!(Expense::KIND, TransactionKind::Expense);
        assert_eq!(Income::KIND, TransactionKind::Income);
    }

    #[test]
    fn test_new_expense_rejects_non_positive_amount() {
        let draft = NewExpense {
            amount: dec!(0),
            category: "food".to_string(),
            date: date(2024, 3, 5),
            budget_id: None,
            description: None,
        };
        assert_eq!(draft.validate().unwrap_err(), "Amount must be greater than 0");
    }

    #[test]
    fn test_new_income_requires_source() {
        let draft = NewIncome {
            amount: dec!(10),
            source: "  ".to_string(),
            date: date(2024, 3, 1),
            budget_id: None,
            description: None,
        };
        assert_eq!(draft.validate().unwrap_err(), "Source is required");
    }

    #[test]
    fn test_new_budget_rules() {
        let mut draft = NewBudget {
            name: "Groceries".to_string(),
            total_amount: dec!(500),
            start_date: date(2024, 1, 1),
            end_date: date(2024, 12, 31),
        };
        assert!(draft.validate().is_ok());

        draft.total_amount = dec!(-1);
        assert!(draft.validate().is_err());

        draft.total_amount = dec!(1);
        draft.name = String::new();
        assert_eq!(draft.validate().unwrap_err(), "Budget name is required");
    }

    #[test]
    fn test_stored_records_follow_write_rules() {
        let mut expense: Expense =
            serde_json::from_str(r#"{"id":1,"ownerId":1,"amount":"-40","category":"","date":"2024-03-05"}"#).unwrap();
        assert_eq!(expense.validate().unwrap_err(), "Amount must be greater than 0");
        expense.amount = dec!(40);
        assert_eq!(expense.validate().unwrap_err(), "Category is required");
        expense.category = "food".to_string();
        assert!(expense.validate().is_ok());

        let budget = Budget {
            id: 2,
            owner_id: 1,
            name: "Zero".to_string(),
            total_amount: Decimal::ZERO,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 12, 31),
        };
        assert_eq!(budget.validate().unwrap_err(), "Total amount must be greater than 0");
    }

    #[test]
    fn test_expense_json_shape() {
        let json = r#"{"id":3,"ownerId":1,"amount":"50","category":"food","date":"2024-03-05"}"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.amount, dec!(50));
        assert_eq!(expense.budget_id, None);

        let value = serde_json::to_value(&expense).unwrap();
        assert_eq!(value["ownerId"], 1);
        assert!(value.get("budgetId").is_none());
    }
}
