use super::fields::DataKind;
use super::query::strip_query;
use super::template::{ParsedParams, PathTemplate};
use crate::error::{BrexError, Result};

/// Every addressable resource the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRoute {
    CardAccounts,
    CashAccounts,
    CardExpenses,
    Expenses,
    CardTransactions,
    CashTransactions,
    Budgets,
    BudgetPrograms,
    CardStatements,
    CashStatements,
}

impl ResourceRoute {
    /// Routes in match priority order. `brex://expenses{/id}` would happily
    /// capture `card` as an id, so the more specific card route comes first.
    pub const ALL: [ResourceRoute; 10] = [
        ResourceRoute::CardAccounts,
        ResourceRoute::CashAccounts,
        ResourceRoute::CardExpenses,
        ResourceRoute::Expenses,
        ResourceRoute::CardTransactions,
        ResourceRoute::CashTransactions,
        ResourceRoute::Budgets,
        ResourceRoute::BudgetPrograms,
        ResourceRoute::CardStatements,
        ResourceRoute::CashStatements,
    ];

    pub fn pattern(&self) -> &'static str {
        match self {
            Self::CardAccounts => "brex://accounts/card",
            Self::CashAccounts => "brex://accounts/cash{/id}",
            Self::CardExpenses => "brex://expenses/card{/id}",
            Self::Expenses => "brex://expenses{/id}",
            Self::CardTransactions => "brex://transactions/card/primary",
            Self::CashTransactions => "brex://transactions/cash{/id}",
            Self::Budgets => "brex://budgets{/id}",
            Self::BudgetPrograms => "brex://budget_programs{/id}",
            Self::CardStatements => "brex://statements/card/primary",
            Self::CashStatements => "brex://statements/cash{/id}",
        }
    }

    /// The concrete collection URI, i.e. the pattern with optional segments dropped.
    pub fn base_uri(&self) -> &'static str {
        let pattern = self.pattern();
        pattern.find('{').map_or(pattern, |i| &pattern[..i])
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CardAccounts => "Card accounts",
            Self::CashAccounts => "Cash accounts",
            Self::CardExpenses => "Card expenses",
            Self::Expenses => "Expenses",
            Self::CardTransactions => "Primary card transactions",
            Self::CashTransactions => "Cash transactions",
            Self::Budgets => "Budgets",
            Self::BudgetPrograms => "Budget programs",
            Self::CardStatements => "Primary card statements",
            Self::CashStatements => "Cash statements",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CardAccounts => "All card accounts.",
            Self::CashAccounts => "Cash accounts, or one account with /{id}.",
            Self::CardExpenses => "Card expenses, or one card expense with /{id}.",
            Self::Expenses => "All expenses, or one expense with /{id}.",
            Self::CardTransactions => "Settled transactions on the primary card account.",
            Self::CashTransactions => "Transactions for the cash account given as /{id}.",
            Self::Budgets => "Budgets, or one budget with /{id}.",
            Self::BudgetPrograms => "Budget programs, or one program with /{id}.",
            Self::CardStatements => "Finalized statements for the primary card account.",
            Self::CashStatements => "Finalized statements for the cash account given as /{id}.",
        }
    }

    pub fn kind(&self) -> DataKind {
        match self {
            Self::CardAccounts | Self::CashAccounts => DataKind::Account,
            Self::CardExpenses | Self::Expenses => DataKind::Expense,
            Self::CardTransactions => DataKind::CardTransaction,
            Self::CashTransactions => DataKind::CashTransaction,
            Self::Budgets => DataKind::Budget,
            Self::BudgetPrograms => DataKind::BudgetProgram,
            Self::CardStatements | Self::CashStatements => DataKind::Statement,
        }
    }
}

/// Compiled templates, tried in priority order.
#[derive(Debug, Clone)]
pub struct ResourceRouter {
    routes: Vec<(PathTemplate, ResourceRoute)>,
}

impl ResourceRouter {
    pub fn new() -> Result<Self> {
        let routes = ResourceRoute::ALL
            .iter()
            .map(|route| Ok((PathTemplate::new(route.pattern())?, *route)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { routes })
    }

    /// Resolve a URI (query string allowed) to its route and path parameters.
    pub fn route(&self, uri: &str) -> Result<(ResourceRoute, ParsedParams)> {
        let path = strip_query(uri);
        self.routes
            .iter()
            .find(|(template, _)| template.matches(path))
            .map(|(template, route)| (*route, template.parse(path)))
            .ok_or_else(|| BrexError::UnknownResource(uri.to_string()))
    }

    pub fn templates(&self) -> impl Iterator<Item = (&PathTemplate, ResourceRoute)> {
        self.routes.iter().map(|(t, r)| (t, *r))
    }
}
