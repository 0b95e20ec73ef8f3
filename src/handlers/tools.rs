use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::Handlers;
use crate::api::{Collection, ItemRef, ListParams, Page};
use crate::core::envelope::Envelope;
use crate::core::fields::DataKind;
use crate::error::{BrexError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseType {
    Card,
    Billpay,
    Reimbursement,
    Clawback,
    Unset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    Draft,
    Submitted,
    Approved,
    OutOfPolicy,
    Void,
    Canceled,
    Split,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    NotStarted,
    Processing,
    Canceled,
    Declined,
    Cleared,
    Refunding,
    Refunded,
    CashAdvance,
    Credited,
    AwaitingPayment,
    Scheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Card,
    Cash,
}

/// Shaping options shared by every tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ShapeArgs {
    /// Dotted field paths to keep, e.g. ["id", "amount.amount"]
    #[serde(default)]
    pub fields: Option<Vec<String>>,
    /// Return only the summary field set for this kind of data
    #[serde(default)]
    pub summary_only: Option<bool>,
}

impl ShapeArgs {
    fn fields(&self) -> Option<Vec<String>> {
        let fields: Vec<String> = self
            .fields
            .iter()
            .flatten()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(String::from)
            .collect();
        (!fields.is_empty()).then_some(fields)
    }

    fn summary_only(&self) -> bool {
        self.summary_only.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ExpenseFilters {
    /// Only expenses of these types
    #[serde(default)]
    pub expense_type: Option<Vec<ExpenseType>>,
    /// Only expenses in these approval states
    #[serde(default)]
    pub status: Option<Vec<ExpenseStatus>>,
    /// Only expenses in these payment states
    #[serde(default)]
    pub payment_status: Option<Vec<PaymentStatus>>,
    /// Purchased on or after this date (YYYY-MM-DD or RFC 3339)
    #[serde(default)]
    pub start_date: Option<String>,
    /// Purchased on or before this date (YYYY-MM-DD or RFC 3339)
    #[serde(default)]
    pub end_date: Option<String>,
}

impl ExpenseFilters {
    fn apply(&self, mut params: ListParams) -> Result<ListParams> {
        for t in self.expense_type.iter().flatten() {
            params = params.filter("expense_type[]", plain(t)?);
        }
        for s in self.status.iter().flatten() {
            params = params.filter("status[]", plain(s)?);
        }
        for s in self.payment_status.iter().flatten() {
            params = params.filter("payment_status[]", plain(s)?);
        }

        let start = self.start_date.as_deref().map(|d| parse_date(d, false)).transpose()?;
        let end = self.end_date.as_deref().map(|d| parse_date(d, true)).transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(BrexError::validation("start_date is after end_date"));
            }
        }
        if let Some(start) = start {
            params = params.filter("purchased_at_start", format_date(start));
        }
        if let Some(end) = end {
            params = params.filter("purchased_at_end", format_date(end));
        }
        Ok(params.filter("expand[]", "merchant"))
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetExpensesRequest {
    #[serde(flatten)]
    pub filters: ExpenseFilters,
    /// Page size (1-100)
    #[serde(default)]
    pub limit: Option<u32>,
    /// Cursor from a previous response's meta.next_cursor
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(flatten)]
    pub shape: ShapeArgs,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetAllExpensesRequest {
    #[serde(flatten)]
    pub filters: ExpenseFilters,
    /// Stop after this many expenses
    #[serde(default)]
    pub max_items: Option<usize>,
    /// Page size used while walking pages (1-100)
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(flatten)]
    pub shape: ShapeArgs,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetCardTransactionsRequest {
    /// Only transactions posted on or after this date (YYYY-MM-DD or RFC 3339)
    #[serde(default)]
    pub posted_at_start: Option<String>,
    /// Page size (1-100)
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(flatten)]
    pub shape: ShapeArgs,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetCashTransactionsRequest {
    /// Cash account id
    pub account_id: String,
    /// Only transactions posted on or after this date (YYYY-MM-DD or RFC 3339)
    #[serde(default)]
    pub posted_at_start: Option<String>,
    /// Page size (1-100)
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(flatten)]
    pub shape: ShapeArgs,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetAccountDetailsRequest {
    /// A cash account id; omit to list accounts
    #[serde(default)]
    pub account_id: Option<String>,
    /// Restrict the listing to card or cash accounts
    #[serde(default)]
    pub account_type: Option<AccountType>,
    #[serde(flatten)]
    pub shape: ShapeArgs,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetBudgetsRequest {
    /// Page size (1-100)
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(flatten)]
    pub shape: ShapeArgs,
}

impl Handlers {
    pub async fn get_expenses(&self, req: GetExpensesRequest) -> Result<Envelope> {
        let params = self.list_params(req.cursor, req.limit)?;
        let params = req.filters.apply(params)?;
        let page = self.api.list(&Collection::Expenses, &params).await?;
        self.shape(DataKind::Expense, page, req.shape.summary_only(), req.shape.fields())
    }

    pub async fn get_card_expenses(&self, req: GetExpensesRequest) -> Result<Envelope> {
        if req.filters.expense_type.is_some() {
            return Err(BrexError::validation("expense_type does not apply to card expenses"));
        }
        let params = self.list_params(req.cursor, req.limit)?;
        let params = req.filters.apply(params)?;
        let page = self.api.list(&Collection::CardExpenses, &params).await?;
        self.shape(DataKind::Expense, page, req.shape.summary_only(), req.shape.fields())
    }

    /// Walk expense pages until the cursor runs out or `max_items` is reached.
    /// A truncated walk reports the cursor to resume from.
    pub async fn get_all_expenses(&self, req: GetAllExpensesRequest) -> Result<Envelope> {
        let cap = self.limits.max_items;
        let max_items = match req.max_items {
            Some(0) => return Err(BrexError::validation("max_items must be positive")),
            Some(n) if n > cap => {
                return Err(BrexError::validation(format!("max_items must be at most {cap}")));
            }
            Some(n) => n,
            None => cap,
        };
        let page_size = self.page_size(req.page_size)?;

        let mut items = Vec::new();
        let mut cursor = None;
        let mut pages = 0usize;
        loop {
            let remaining = max_items - items.len();
            let limit = page_size.min(u32::try_from(remaining).unwrap_or(u32::MAX));
            let params = req.filters.apply(ListParams {
                cursor: cursor.take(),
                limit: Some(limit),
                filters: Vec::new(),
            })?;
            let page = self.api.list(&Collection::Expenses, &params).await?;
            pages += 1;

            let fetched = page.items.len();
            items.extend(page.items);
            cursor = page.next_cursor;
            if cursor.is_none() || fetched == 0 || items.len() >= max_items {
                break;
            }
        }
        items.truncate(max_items);
        info!(pages, count = items.len(), truncated = cursor.is_some(), "expenses collected");

        let page = Page {
            items,
            next_cursor: cursor,
        };
        self.shape(DataKind::Expense, page, req.shape.summary_only(), req.shape.fields())
    }

    pub async fn get_card_transactions(&self, req: GetCardTransactionsRequest) -> Result<Envelope> {
        let mut params = self.list_params(req.cursor, req.limit)?;
        if let Some(ref start) = req.posted_at_start {
            params = params.filter("posted_at_start", format_date(parse_date(start, false)?));
        }
        let page = self.api.list(&Collection::CardTransactions, &params).await?;
        self.shape(DataKind::CardTransaction, page, req.shape.summary_only(), req.shape.fields())
    }

    pub async fn get_cash_transactions(&self, req: GetCashTransactionsRequest) -> Result<Envelope> {
        let account_id = non_blank(&req.account_id, "account_id")?;
        let mut params = self.list_params(req.cursor, req.limit)?;
        if let Some(ref start) = req.posted_at_start {
            params = params.filter("posted_at_start", format_date(parse_date(start, false)?));
        }
        let collection = Collection::CashTransactions { account_id };
        let page = self.api.list(&collection, &params).await?;
        self.shape(DataKind::CashTransaction, page, req.shape.summary_only(), req.shape.fields())
    }

    /// One cash account by id, or every card and cash account.
    pub async fn get_account_details(&self, req: GetAccountDetailsRequest) -> Result<Envelope> {
        let page = if let Some(ref id) = req.account_id {
            if req.account_type == Some(AccountType::Card) {
                return Err(BrexError::validation(
                    "account_id lookups are only supported for cash accounts",
                ));
            }
            let item = self.api.get(&ItemRef::CashAccount(non_blank(id, "account_id")?)).await?;
            Page {
                items: vec![item],
                next_cursor: None,
            }
        } else {
            let mut items = Vec::new();
            if req.account_type != Some(AccountType::Cash) {
                let card = self.api.list(&Collection::CardAccounts, &ListParams::default()).await?;
                items.extend(card.items);
            }
            if req.account_type != Some(AccountType::Card) {
                let params = self.list_params(None, Some(self.limits.max_page_size))?;
                let cash = self.api.list(&Collection::CashAccounts, &params).await?;
                items.extend(cash.items);
            }
            Page {
                items,
                next_cursor: None,
            }
        };
        self.shape(DataKind::Account, page, req.shape.summary_only(), req.shape.fields())
    }

    pub async fn get_budgets(&self, req: GetBudgetsRequest) -> Result<Envelope> {
        let params = self.list_params(req.cursor, req.limit)?;
        let page = self.api.list(&Collection::Budgets, &params).await?;
        self.shape(DataKind::Budget, page, req.shape.summary_only(), req.shape.fields())
    }

    fn list_params(&self, cursor: Option<String>, limit: Option<u32>) -> Result<ListParams> {
        Ok(ListParams {
            cursor: cursor.filter(|c| !c.is_empty()),
            limit: Some(self.page_size(limit)?),
            filters: Vec::new(),
        })
    }
}

fn plain<T: Serialize>(value: &T) -> Result<String> {
    serde_plain::to_string(value).map_err(|e| BrexError::validation(e.to_string()))
}

fn non_blank(value: &str, name: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BrexError::validation(format!("{name} must not be empty")));
    }
    Ok(value.to_string())
}

/// Parse `YYYY-MM-DD` or RFC 3339. Bare dates become the start of the day,
/// or its last second when `end_of_day` is set.
pub fn parse_date(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        BrexError::validation(format!("invalid date '{raw}', expected YYYY-MM-DD or RFC 3339"))
    })?;
    let (h, m, sec) = if end_of_day { (23, 59, 59) } else { (0, 0, 0) };
    date.and_hms_opt(h, m, sec)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| BrexError::validation(format!("invalid date '{raw}'")))
}

fn format_date(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
