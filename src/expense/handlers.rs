use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::dto::MessageResponse,
    auth::jwt::AuthUser,
    dashboard::summary,
    error::ApiError,
    expense::{
        dto::{ExpenseListResponse, ExpensePayload, ExpenseResponse, ExpenseSummaryResponse},
        repo::Expense,
    },
    period::PeriodQuery,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expense", get(list_expenses).post(create_expense))
        .route("/expense/summary", get(expense_summary))
        .route(
            "/expense/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

fn validate(payload: &ExpensePayload) -> Result<(), ApiError> {
    if payload.amount <= Decimal::ZERO {
        return Err(ApiError::validation("Amount must be greater than 0"));
    }
    if payload.category.trim().is_empty() {
        return Err(ApiError::validation("Category is required"));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ExpenseListResponse>, ApiError> {
    let period = query.resolve()?;
    let expenses =
        Expense::list_for_user(&state.db, user_id, Some(period.month), Some(period.year))
            .await
            .map_err(|e| ApiError::internal("An error occurred while fetching expenses", e))?;
    let total = Expense::monthly_total(&state.db, user_id, period.month, period.year)
        .await
        .map_err(|e| ApiError::internal("An error occurred while fetching expenses", e))?;

    Ok(Json(ExpenseListResponse {
        expenses: expenses.into_iter().map(ExpenseResponse::from).collect(),
        total,
        month: period.month,
        year: period.year,
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ExpensePayload>,
) -> Result<(StatusCode, HeaderMap, Json<ExpenseResponse>), ApiError> {
    validate(&payload)?;

    let expense = Expense::create(
        &state.db,
        user_id,
        payload.amount,
        &payload.category,
        payload.date,
        payload.description.as_deref().unwrap_or(""),
    )
    .await
    .map_err(|e| ApiError::internal("An error occurred while creating expense", e))?;

    info!(user_id = %user_id, expense_id = %expense.id, "expense created");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        format!("/api/expense/{}", expense.id).parse().unwrap(),
    );
    Ok((StatusCode::CREATED, headers, Json(expense.into())))
}

#[instrument(skip(state))]
pub async fn get_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseResponse>, ApiError> {
    let expense = Expense::find_by_id(&state.db, id, user_id)
        .await
        .map_err(|e| ApiError::internal("An error occurred while fetching expense", e))?
        .ok_or(ApiError::NotFound("Expense"))?;
    Ok(Json(expense.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate(&payload)?;

    let updated = Expense::update(
        &state.db,
        id,
        user_id,
        payload.amount,
        &payload.category,
        payload.date,
        payload.description.as_deref().unwrap_or(""),
    )
    .await
    .map_err(|e| ApiError::internal("An error occurred while updating expense", e))?;

    if !updated {
        return Err(ApiError::NotFound("Expense"));
    }

    info!(user_id = %user_id, expense_id = %id, "expense updated");
    Ok(Json(MessageResponse::new("Expense updated successfully")))
}

#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = Expense::delete(&state.db, id, user_id)
        .await
        .map_err(|e| ApiError::internal("An error occurred while deleting expense", e))?;

    if !deleted {
        return Err(ApiError::NotFound("Expense"));
    }

    info!(user_id = %user_id, expense_id = %id, "expense deleted");
    Ok(Json(MessageResponse::new("Expense deleted successfully")))
}

#[instrument(skip(state))]
pub async fn expense_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ExpenseSummaryResponse>, ApiError> {
    let period = query.resolve()?;
    let total = Expense::monthly_total(&state.db, user_id, period.month, period.year)
        .await
        .map_err(|e| ApiError::internal("An error occurred while fetching expense summary", e))?;
    let categories = Expense::category_summary(&state.db, user_id, period.month, period.year)
        .await
        .map_err(|e| ApiError::internal("An error occurred while fetching expense summary", e))?;

    // Ranked by the same descending order the store returned.
    let top_categories = summary::top_categories(&summary::category_breakdown(
        categories.clone(),
        total,
    ));

    Ok(Json(ExpenseSummaryResponse {
        total,
        month: period.month,
        year: period.year,
        categories,
        top_categories,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn payload(amount: &str) -> ExpensePayload {
        ExpensePayload {
            amount: amount.parse().unwrap(),
            category: "Utilities".into(),
            date: date!(2025 - 06 - 01),
            description: None,
        }
    }

    #[test]
    fn a_positive_amount_passes() {
        assert!(validate(&payload("12.34")).is_ok());
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        assert!(validate(&payload("0")).is_err());
        assert!(validate(&payload("-1")).is_err());
    }

    #[test]
    fn blank_categories_are_rejected() {
        let mut p = payload("5.00");
        p.category = "  ".into();
        assert!(validate(&p).is_err());
    }
}
