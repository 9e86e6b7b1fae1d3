use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dashboard::summary::CategoryBreakdown;
use crate::expense::repo::{CategoryTotal, Expense};

/// Fields accepted when creating or replacing an expense entry.
#[derive(Debug, Deserialize)]
pub struct ExpensePayload {
    pub amount: Decimal,
    pub category: String,
    pub date: Date,
    pub description: Option<String>,
}

/// Wire form of a single expense entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub amount: Decimal,
    pub category: String,
    pub date: Date,
    pub description: String,
    pub created_at: OffsetDateTime,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            amount: expense.amount,
            category: expense.category,
            date: expense.date,
            description: expense.description,
            created_at: expense.created_at,
        }
    }
}

/// Envelope for the month-filtered listing.
#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<ExpenseResponse>,
    pub total: Decimal,
    pub month: u32,
    pub year: i32,
}

/// Per-category totals plus the ranked head of the breakdown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummaryResponse {
    pub total: Decimal,
    pub month: u32,
    pub year: i32,
    pub categories: Vec<CategoryTotal>,
    pub top_categories: Vec<CategoryBreakdown>,
}
