use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The kinds of upstream data a handler can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Expense,
    CardTransaction,
    CashTransaction,
    Account,
    Budget,
    BudgetProgram,
    Statement,
}

impl DataKind {
    pub const ALL: [DataKind; 7] = [
        DataKind::Expense,
        DataKind::CardTransaction,
        DataKind::CashTransaction,
        DataKind::Account,
        DataKind::Budget,
        DataKind::BudgetProgram,
        DataKind::Statement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DataKind::Expense => "expense",
            DataKind::CardTransaction => "card_transaction",
            DataKind::CashTransaction => "cash_transaction",
            DataKind::Account => "account",
            DataKind::Budget => "budget",
            DataKind::BudgetProgram => "budget_program",
            DataKind::Statement => "statement",
        }
    }

    /// Built-in summary projection for this kind.
    fn builtin_fields(&self) -> &'static [&'static str] {
        match self {
            DataKind::Expense => &[
                "id",
                "status",
                "payment_status",
                "purchased_at",
                "updated_at",
                "category",
                "memo",
                "budget_id",
                "merchant.raw_descriptor",
                "original_amount.amount",
                "original_amount.currency",
                "billing_amount.amount",
                "billing_amount.currency",
            ],
            DataKind::CardTransaction => &[
                "id",
                "card_id",
                "type",
                "description",
                "posted_at_date",
                "amount.amount",
                "amount.currency",
                "merchant.raw_descriptor",
            ],
            DataKind::CashTransaction => &[
                "id",
                "type",
                "description",
                "posted_at_date",
                "amount.amount",
                "amount.currency",
            ],
            DataKind::Account => &[
                "id",
                "name",
                "status",
                "primary",
                "current_balance.amount",
                "current_balance.currency",
                "available_balance.amount",
                "available_balance.currency",
            ],
            DataKind::Budget => &[
                "budget_id",
                "name",
                "parent_budget_id",
                "period_recurrence_type",
                "spend_budget_status",
                "start_date",
                "end_date",
                "amount.amount",
                "amount.currency",
            ],
            DataKind::BudgetProgram => &[
                "id",
                "name",
                "budget_program_status",
                "created_at",
                "updated_at",
            ],
            DataKind::Statement => &[
                "id",
                "period.start_date",
                "period.end_date",
                "start_balance.amount",
                "end_balance.amount",
                "end_balance.currency",
            ],
        }
    }
}

/// Default projection per data kind, shared by every handler.
#[derive(Debug, Clone)]
pub struct SummaryFields {
    table: HashMap<DataKind, Vec<String>>,
}

impl Default for SummaryFields {
    fn default() -> Self {
        let table = DataKind::ALL
            .iter()
            .map(|kind| {
                let fields = kind.builtin_fields().iter().map(|f| f.to_string()).collect();
                (*kind, fields)
            })
            .collect();
        Self { table }
    }
}

impl SummaryFields {
    /// Built-in table with per-kind replacements applied. Empty overrides are
    /// ignored so a kind can never end up with no summary fields.
    pub fn with_overrides(overrides: &HashMap<DataKind, Vec<String>>) -> Self {
        let mut fields = Self::default();
        for (kind, list) in overrides {
            if !list.is_empty() {
                fields.table.insert(*kind, list.clone());
            }
        }
        fields
    }

    pub fn for_kind(&self, kind: DataKind) -> &[String] {
        self.table.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_defaults() {
        let fields = SummaryFields::default();
        for kind in DataKind::ALL {
            assert!(!fields.for_kind(kind).is_empty(), "{}", kind.label());
        }
    }

    #[test]
    fn overrides_replace_one_kind() {
        let overrides = HashMap::from([
            (DataKind::Expense, vec!["id".to_string()]),
            (DataKind::Budget, Vec::new()),
        ]);
        let fields = SummaryFields::with_overrides(&overrides);
        assert_eq!(fields.for_kind(DataKind::Expense), ["id"]);
        assert!(fields.for_kind(DataKind::Budget).contains(&"budget_id".to_string()));
    }

    #[test]
    fn kind_names_match_serde() {
        for kind in DataKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json.trim_matches('"'), kind.label());
        }
    }
}
