use tracing::info;

use super::Handlers;
use crate::api::{Collection, ItemRef, ListParams, Page};
use crate::core::envelope::Envelope;
use crate::core::query::{ShapeHints, query_params};
use crate::core::routes::ResourceRoute;
use crate::error::{BrexError, Result};

impl Handlers {
    /// Read a `brex://` resource. The query string carries paging and
    /// shaping hints (`cursor`, `limit`, `fields`, `summary_only`).
    pub async fn read_resource(&self, uri: &str) -> Result<Envelope> {
        let (route, params) = self.router.route(uri)?;
        let hints = ShapeHints::from_params(&query_params(uri), &self.limits)?;
        let id = params.get("id").cloned();
        info!(uri, ?route, "reading resource");

        let list = ListParams {
            cursor: hints.cursor.clone(),
            limit: Some(self.page_size(hints.limit)?),
            filters: Vec::new(),
        };

        let page = match (route, id) {
            // Card accounts come back as one unpaginated array.
            (ResourceRoute::CardAccounts, _) => {
                self.api.list(&Collection::CardAccounts, &ListParams::default()).await?
            }
            (ResourceRoute::CashAccounts, None) => self.api.list(&Collection::CashAccounts, &list).await?,
            (ResourceRoute::CashAccounts, Some(id)) => self.fetch_one(ItemRef::CashAccount(id)).await?,
            (ResourceRoute::CardExpenses, None) => {
                let list = list.filter("expand[]", "merchant");
                self.api.list(&Collection::CardExpenses, &list).await?
            }
            (ResourceRoute::CardExpenses, Some(id)) => self.fetch_one(ItemRef::CardExpense(id)).await?,
            (ResourceRoute::Expenses, None) => {
                let list = list.filter("expand[]", "merchant");
                self.api.list(&Collection::Expenses, &list).await?
            }
            (ResourceRoute::Expenses, Some(id)) => self.fetch_one(ItemRef::Expense(id)).await?,
            (ResourceRoute::CardTransactions, _) => {
                self.api.list(&Collection::CardTransactions, &list).await?
            }
            (ResourceRoute::CashTransactions, Some(account_id)) => {
                self.api.list(&Collection::CashTransactions { account_id }, &list).await?
            }
            (ResourceRoute::CashTransactions, None) => {
                return Err(BrexError::validation(
                    "cash transactions need an account: brex://transactions/cash/{id}",
                ));
            }
            (ResourceRoute::Budgets, None) => self.api.list(&Collection::Budgets, &list).await?,
            (ResourceRoute::Budgets, Some(id)) => self.fetch_one(ItemRef::Budget(id)).await?,
            (ResourceRoute::BudgetPrograms, None) => {
                self.api.list(&Collection::BudgetPrograms, &list).await?
            }
            (ResourceRoute::BudgetPrograms, Some(id)) => {
                self.fetch_one(ItemRef::BudgetProgram(id)).await?
            }
            (ResourceRoute::CardStatements, _) => {
                self.api.list(&Collection::CardStatements, &list).await?
            }
            (ResourceRoute::CashStatements, Some(account_id)) => {
                self.api.list(&Collection::CashStatements { account_id }, &list).await?
            }
            (ResourceRoute::CashStatements, None) => {
                return Err(BrexError::validation(
                    "cash statements need an account: brex://statements/cash/{id}",
                ));
            }
        };

        self.shape(route.kind(), page, hints.summary_only, hints.fields)
    }

    async fn fetch_one(&self, item: ItemRef) -> Result<Page> {
        let value = self.api.get(&item).await?;
        Ok(Page {
            items: vec![value],
            next_cursor: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::config::types::BrexConfig;
    use crate::handlers::testing::FakeApi;

    fn handlers(api: FakeApi) -> (Arc<FakeApi>, Handlers) {
        let api = Arc::new(api);
        let handlers = Handlers::new(api.clone(), &BrexConfig::default()).unwrap();
        (api, handlers)
    }

    fn expense_page() -> Page {
        Page {
            items: vec![json!({
                "id": "exp_1",
                "memo": "team lunch",
                "merchant": {"raw_descriptor": "CAFE", "mcc": "5812"},
                "original_amount": {"amount": 4200, "currency": "USD"},
                "receipts": [{"id": "r1"}]
            })],
            next_cursor: Some("c2".into()),
        }
    }

    #[tokio::test]
    async fn list_passes_paging_and_returns_verbatim() {
        let (api, h) = handlers(FakeApi::with_pages(vec![expense_page()]));
        let env = h.read_resource("brex://expenses/card?limit=10&cursor=c1").await.unwrap();

        assert_eq!(env.items, expense_page().items);
        assert_eq!(env.meta.count, 1);
        assert_eq!(env.meta.next_cursor.as_deref(), Some("c2"));
        assert!(!env.meta.summary_applied);

        let lists = api.lists.lock().unwrap();
        let (collection, params) = &lists[0];
        assert_eq!(*collection, Collection::CardExpenses);
        assert_eq!(params.cursor.as_deref(), Some("c1"));
        assert_eq!(params.limit, Some(10));
        assert_eq!(params.filters, vec![("expand[]".to_string(), "merchant".to_string())]);
    }

    #[tokio::test]
    async fn summary_only_uses_kind_defaults() {
        let (_, h) = handlers(FakeApi::with_pages(vec![expense_page()]));
        let env = h.read_resource("brex://expenses?summary_only=true").await.unwrap();
        assert!(env.meta.summary_applied);
        assert_eq!(
            env.items[0],
            json!({
                "id": "exp_1",
                "memo": "team lunch",
                "merchant": {"raw_descriptor": "CAFE"},
                "original_amount": {"amount": 4200, "currency": "USD"}
            })
        );
    }

    #[tokio::test]
    async fn explicit_fields_from_query() {
        let (_, h) = handlers(FakeApi::with_pages(vec![expense_page()]));
        let env = h
            .read_resource("brex://expenses/card?fields=id,original_amount.amount")
            .await
            .unwrap();
        assert_eq!(env.items[0], json!({"id": "exp_1", "original_amount": {"amount": 4200}}));
    }

    #[tokio::test]
    async fn single_item_read() {
        let (api, h) = handlers(FakeApi::with_item(json!({"budget_id": "b1", "name": "Travel"})));
        let env = h.read_resource("brex://budgets/b1").await.unwrap();
        assert_eq!(env.meta.count, 1);
        assert!(env.meta.next_cursor.is_none());
        assert_eq!(api.gets.lock().unwrap()[0], ItemRef::Budget("b1".into()));
    }

    #[tokio::test]
    async fn card_expense_id_is_not_a_generic_expense() {
        let (api, h) = handlers(FakeApi::with_item(json!({"id": "exp_123"})));
        h.read_resource("brex://expenses/card/exp_123").await.unwrap();
        assert_eq!(api.gets.lock().unwrap()[0], ItemRef::CardExpense("exp_123".into()));
    }

    #[tokio::test]
    async fn cash_transactions_require_account() {
        let (api, h) = handlers(FakeApi::default());
        let err = h.read_resource("brex://transactions/cash").await.unwrap_err();
        assert!(matches!(err, BrexError::Validation(_)));
        assert!(api.lists.lock().unwrap().is_empty());

        h.read_resource("brex://transactions/cash/acct_9").await.unwrap();
        let lists = api.lists.lock().unwrap();
        assert_eq!(
            lists[0].0,
            Collection::CashTransactions {
                account_id: "acct_9".into()
            }
        );
    }

    #[tokio::test]
    async fn bad_limit_never_reaches_the_api() {
        let (api, h) = handlers(FakeApi::default());
        let err = h.read_resource("brex://budgets?limit=500").await.unwrap_err();
        assert!(matches!(err, BrexError::Validation(_)));
        assert!(api.lists.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_resource() {
        let (_, h) = handlers(FakeApi::default());
        let err = h.read_resource("brex://payments").await.unwrap_err();
        assert!(matches!(err, BrexError::UnknownResource(_)));
    }

    #[tokio::test]
    async fn upstream_not_found_propagates() {
        let (_, h) = handlers(FakeApi::default());
        let err = h.read_resource("brex://expenses/missing").await.unwrap_err();
        assert!(matches!(err, BrexError::Upstream { status: 404, .. }));
    }

    #[tokio::test]
    async fn card_accounts_ignore_paging() {
        let (api, h) = handlers(FakeApi::default());
        h.read_resource("brex://accounts/card?limit=5").await.unwrap();
        assert_eq!(api.lists.lock().unwrap()[0].1, ListParams::default());
    }
}
