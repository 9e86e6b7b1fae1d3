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
    error::ApiError,
    income::{
        dto::{IncomeListResponse, IncomePayload, IncomeResponse, IncomeSummaryResponse},
        repo::Income,
    },
    period::PeriodQuery,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/income", get(list_incomes).post(create_income))
        .route("/income/summary", get(income_summary))
        .route(
            "/income/:id",
            get(get_income).put(update_income).delete(delete_income),
        )
}

fn validate(payload: &IncomePayload) -> Result<(), ApiError> {
    if payload.amount <= Decimal::ZERO {
        return Err(ApiError::validation("Amount must be greater than 0"));
    }
    if payload.category.trim().is_empty() {
        return Err(ApiError::validation("Category is required"));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_incomes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<IncomeListResponse>, ApiError> {
    let period = query.resolve()?;
    let incomes =
        Income::list_for_user(&state.db, user_id, Some(period.month), Some(period.year))
            .await
            .map_err(|e| ApiError::internal("An error occurred while fetching incomes", e))?;
    let total = Income::monthly_total(&state.db, user_id, period.month, period.year)
        .await
        .map_err(|e| ApiError::internal("An error occurred while fetching incomes", e))?;

    Ok(Json(IncomeListResponse {
        incomes: incomes.into_iter().map(IncomeResponse::from).collect(),
        total,
        month: period.month,
        year: period.year,
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<IncomePayload>,
) -> Result<(StatusCode, HeaderMap, Json<IncomeResponse>), ApiError> {
    validate(&payload)?;

    let income = Income::create(
        &state.db,
        user_id,
        payload.amount,
        &payload.category,
        payload.date,
        payload.description.as_deref().unwrap_or(""),
        payload.is_recurring,
    )
    .await
    .map_err(|e| ApiError::internal("An error occurred while creating income", e))?;

    info!(user_id = %user_id, income_id = %income.id, "income created");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        format!("/api/income/{}", income.id).parse().unwrap(),
    );
    Ok((StatusCode::CREATED, headers, Json(income.into())))
}

#[instrument(skip(state))]
pub async fn get_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<IncomeResponse>, ApiError> {
    let income = Income::find_by_id(&state.db, id, user_id)
        .await
        .map_err(|e| ApiError::internal("An error occurred while fetching income", e))?
        .ok_or(ApiError::NotFound("Income"))?;
    Ok(Json(income.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<IncomePayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate(&payload)?;

    let updated = Income::update(
        &state.db,
        id,
        user_id,
        payload.amount,
        &payload.category,
        payload.date,
        payload.description.as_deref().unwrap_or(""),
        payload.is_recurring,
    )
    .await
    .map_err(|e| ApiError::internal("An error occurred while updating income", e))?;

    if !updated {
        return Err(ApiError::NotFound("Income"));
    }

    info!(user_id = %user_id, income_id = %id, "income updated");
    Ok(Json(MessageResponse::new("Income updated successfully")))
}

#[instrument(skip(state))]
pub async fn delete_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = Income::delete(&state.db, id, user_id)
        .await
        .map_err(|e| ApiError::internal("An error occurred while deleting income", e))?;

    if !deleted {
        return Err(ApiError::NotFound("Income"));
    }

    info!(user_id = %user_id, income_id = %id, "income deleted");
    Ok(Json(MessageResponse::new("Income deleted successfully")))
}

#[instrument(skip(state))]
pub async fn income_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<IncomeSummaryResponse>, ApiError> {
    let period = query.resolve()?;
    let total = Income::monthly_total(&state.db, user_id, period.month, period.year)
        .await
        .map_err(|e| ApiError::internal("An error occurred while fetching income summary", e))?;
    let categories = Income::category_summary(&state.db, user_id, period.month, period.year)
        .await
        .map_err(|e| ApiError::internal("An error occurred while fetching income summary", e))?;

    Ok(Json(IncomeSummaryResponse {
        total,
        month: period.month,
        year: period.year,
        categories,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn payload(amount: &str, category: &str) -> IncomePayload {
        IncomePayload {
            amount: amount.parse().unwrap(),
            category: category.into(),
            date: date!(2025 - 06 - 01),
            description: None,
            is_recurring: false,
        }
    }

    #[test]
    fn a_positive_amount_and_category_pass() {
        assert!(validate(&payload("0.01", "Salary")).is_ok());
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        assert!(validate(&payload("0", "Salary")).is_err());
        assert!(validate(&payload("-5.00", "Salary")).is_err());
    }

    #[test]
    fn blank_categories_are_rejected() {
        assert!(validate(&payload("10.00", "")).is_err());
        assert!(validate(&payload("10.00", "   ")).is_err());
    }
}
