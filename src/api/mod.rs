//! Upstream Brex API: the endpoints we read and the trait handlers fetch through.

pub mod client;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{BrexError, Result};

pub use client::BrexClient;

/// A paginated listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    CardAccounts,
    CashAccounts,
    Expenses,
    CardExpenses,
    CardTransactions,
    CashTransactions { account_id: String },
    Budgets,
    BudgetPrograms,
    CardStatements,
    CashStatements { account_id: String },
}

impl Collection {
    /// Path segments below the API base URL.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::CardAccounts => vec!["v2", "accounts", "card"],
            Self::CashAccounts => vec!["v2", "accounts", "cash"],
            Self::Expenses => vec!["v1", "expenses"],
            Self::CardExpenses => vec!["v1", "expenses", "card"],
            Self::CardTransactions => vec!["v2", "transactions", "card", "primary"],
            Self::CashTransactions { account_id } => vec!["v2", "transactions", "cash", account_id.as_str()],
            Self::Budgets => vec!["v2", "budgets"],
            Self::BudgetPrograms => vec!["v1", "budget_programs"],
            Self::CardStatements => vec!["v2", "accounts", "card", "primary", "statements"],
            Self::CashStatements { account_id } => vec!["v2", "accounts", "cash", account_id.as_str(), "statements"],
        }
    }
}

/// A single-object endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    CashAccount(String),
    Expense(String),
    CardExpense(String),
    Budget(String),
    BudgetProgram(String),
}

impl ItemRef {
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::CashAccount(id) => vec!["v2", "accounts", "cash", id.as_str()],
            Self::Expense(id) => vec!["v1", "expenses", id.as_str()],
            Self::CardExpense(id) => vec!["v1", "expenses", "card", id.as_str()],
            Self::Budget(id) => vec!["v2", "budgets", id.as_str()],
            Self::BudgetProgram(id) => vec!["v1", "budget_programs", id.as_str()],
        }
    }
}

/// Paging and filter parameters for a listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
    /// Extra query pairs. Array filters repeat their key (`status[]`).
    pub filters: Vec<(String, String)>,
}

impl ListParams {
    pub fn filter(mut self, key: &str, value: impl Into<String>) -> Self {
        self.filters.push((key.to_string(), value.into()));
        self
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 2);
        if let Some(ref cursor) = self.cursor {
            pairs.push(("cursor".to_string(), cursor.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

/// One page of results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub next_cursor: Option<String>,
}

impl Page {
    /// Accepts `{"items": [...], "next_cursor": ...}` or a bare array.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Self {
                items,
                next_cursor: None,
            }),
            Value::Object(mut map) => {
                let items = match map.remove("items") {
                    Some(Value::Array(items)) => items,
                    Some(other) => {
                        return Err(BrexError::DataShape(format!(
                            "'items' is {}, expected an array",
                            type_name(&other)
                        )));
                    }
                    None => return Err(BrexError::DataShape("page has no 'items'".into())),
                };
                let next_cursor = map
                    .remove("next_cursor")
                    .and_then(|c| c.as_str().map(String::from))
                    .filter(|c| !c.is_empty());
                Ok(Self { items, next_cursor })
            }
            other => Err(BrexError::DataShape(format!(
                "page is {}, expected an object or array",
                type_name(&other)
            ))),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read access to the Brex API. Constructed once and shared by all handlers.
#[async_trait]
pub trait BrexApi: Send + Sync {
    async fn list(&self, collection: &Collection, params: &ListParams) -> Result<Page>;

    async fn get(&self, item: &ItemRef) -> Result<Value>;
}
