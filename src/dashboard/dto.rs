use rust_decimal::Decimal;
use serde::Serialize;

use crate::dashboard::summary::{CategoryBreakdown, RecentTransaction};

/// Headline figures for the selected month. `budget_used` stays zero until
/// budgets exist server-side; the SPA already renders the slot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub budget_used: Decimal,
    pub monthly_savings: Decimal,
    pub savings_rate: Decimal,
}

/// Budget progress rows. Reserved: the server never produces any yet, the
/// list in [`DashboardData`] is always empty.
#[allow(dead_code)]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub category: String,
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
}

/// Full dashboard snapshot, recomputed on every request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub summary: DashboardSummary,
    pub budgets: Vec<BudgetProgress>,
    pub category_expenses: Vec<CategoryBreakdown>,
    pub top_categories: Vec<CategoryBreakdown>,
    pub recent_transactions: Vec<RecentTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_camel_case_with_empty_budgets() {
        let data = DashboardData {
            summary: DashboardSummary {
                total_income: "1000".parse().unwrap(),
                total_expense: "400".parse().unwrap(),
                balance: "600".parse().unwrap(),
                budget_used: Decimal::ZERO,
                monthly_savings: "600".parse().unwrap(),
                savings_rate: "60.0".parse().unwrap(),
            },
            budgets: Vec::new(),
            category_expenses: Vec::new(),
            top_categories: Vec::new(),
            recent_transactions: Vec::new(),
        };
        let value = serde_json::to_value(&data).unwrap();
        assert!(value.get("summary").is_some());
        assert_eq!(value["summary"]["totalIncome"], "1000");
        assert_eq!(value["summary"]["budgetUsed"], "0");
        assert_eq!(value["budgets"], serde_json::json!([]));
        assert!(value.get("categoryExpenses").is_some());
        assert!(value.get("topCategories").is_some());
        assert!(value.get("recentTransactions").is_some());
    }
}
