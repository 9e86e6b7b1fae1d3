use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    dashboard::{
        dto::{DashboardData, DashboardSummary},
        summary,
    },
    error::ApiError,
    expense::repo::Expense,
    income::repo::Income,
    period::PeriodQuery,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<DashboardData>, ApiError> {
    let period = query.resolve()?;

    let total_income = Income::monthly_total(&state.db, user_id, period.month, period.year)
        .await
        .map_err(|e| ApiError::internal("An error occurred", e))?;
    let total_expense = Expense::monthly_total(&state.db, user_id, period.month, period.year)
        .await
        .map_err(|e| ApiError::internal("An error occurred", e))?;
    let balance = total_income - total_expense;

    let category_rows = Expense::category_summary(&state.db, user_id, period.month, period.year)
        .await
        .map_err(|e| ApiError::internal("An error occurred", e))?;
    let category_expenses = summary::category_breakdown(category_rows, total_expense);
    let top_categories = summary::top_categories(&category_expenses);

    // The feed deliberately ignores the month filter: it always shows the
    // newest activity overall.
    let incomes = Income::list_for_user(&state.db, user_id, None, None)
        .await
        .map_err(|e| ApiError::internal("An error occurred", e))?;
    let expenses = Expense::list_for_user(&state.db, user_id, None, None)
        .await
        .map_err(|e| ApiError::internal("An error occurred", e))?;
    let recent_transactions = summary::recent_transactions(incomes, expenses);

    Ok(Json(DashboardData {
        summary: DashboardSummary {
            total_income,
            total_expense,
            balance,
            budget_used: Decimal::ZERO,
            monthly_savings: balance,
            savings_rate: summary::savings_rate(total_income, balance),
        },
        budgets: Vec::new(),
        category_expenses,
        top_categories,
        recent_transactions,
    }))
}
