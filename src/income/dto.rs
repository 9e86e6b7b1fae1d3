use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::income::repo::{CategoryTotal, Income};

/// Fields accepted when creating or replacing an income entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomePayload {
    pub amount: Decimal,
    pub category: String,
    pub date: Date,
    pub description: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

/// Wire form of a single income entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeResponse {
    pub id: Uuid,
    pub amount: Decimal,
    pub category: String,
    pub date: Date,
    pub description: String,
    pub is_recurring: bool,
    pub created_at: OffsetDateTime,
}

impl From<Income> for IncomeResponse {
    fn from(income: Income) -> Self {
        Self {
            id: income.id,
            amount: income.amount,
            category: income.category,
            date: income.date,
            description: income.description,
            is_recurring: income.is_recurring,
            created_at: income.created_at,
        }
    }
}

/// Envelope for the month-filtered listing.
#[derive(Debug, Serialize)]
pub struct IncomeListResponse {
    pub incomes: Vec<IncomeResponse>,
    pub total: Decimal,
    pub month: u32,
    pub year: i32,
}

/// Per-category totals for the selected month.
#[derive(Debug, Serialize)]
pub struct IncomeSummaryResponse {
    pub total: Decimal,
    pub month: u32,
    pub year: i32,
    pub categories: Vec<CategoryTotal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn payload_accepts_camel_case_and_defaults_recurring() {
        let parsed: IncomePayload = serde_json::from_str(
            r#"{"amount":"2500.00","category":"Salary","date":"2025-06-01"}"#,
        )
        .unwrap();
        assert_eq!(parsed.amount, "2500.00".parse::<Decimal>().unwrap());
        assert_eq!(parsed.date, date!(2025 - 06 - 01));
        assert!(!parsed.is_recurring);
        assert!(parsed.description.is_none());
    }

    #[test]
    fn payload_accepts_numeric_amounts_too() {
        let parsed: IncomePayload = serde_json::from_str(
            r#"{"amount":120.5,"category":"Gift","date":"2025-06-15","isRecurring":true}"#,
        )
        .unwrap();
        assert_eq!(parsed.amount, "120.5".parse::<Decimal>().unwrap());
        assert!(parsed.is_recurring);
    }

    #[test]
    fn response_uses_camel_case_keys() {
        let income = Income {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            amount: "10.00".parse().unwrap(),
            category: "Salary".into(),
            date: date!(2025 - 06 - 01),
            description: String::new(),
            is_recurring: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let value = serde_json::to_value(IncomeResponse::from(income)).unwrap();
        assert!(value.get("isRecurring").is_some());
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["date"], "2025-06-01");
        assert!(value.get("userId").is_none());
    }
}
