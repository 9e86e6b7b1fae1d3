use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
            RegisterRequest, ResetPasswordRequest, UserSummary, VerifyOtpRequest,
        },
        jwt::{AdminUser, AuthUser, JwtKeys},
        otp,
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 6;
const INVALID_OTP: &str = "Invalid or expired OTP";
// Identical reply whether or not the address is registered.
const FORGOT_PASSWORD_REPLY: &str = "If an account with that email exists, an OTP has been sent";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/forgot-password", post(forgot_password))
        .route("/user/verify-otp", post(verify_otp))
        .route("/user/reset-password", post(reset_password))
        .route("/user/me", get(me))
        .route("/user", get(list_users))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn is_valid_otp(code: &str) -> bool {
    lazy_static! {
        static ref OTP_RE: Regex = Regex::new(r"^\d{6}$").unwrap();
    }
    OTP_RE.is_match(code)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }

    // The unique index still guards the race between this check and the
    // insert.
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already exists".into()));
    }

    let hash = hash_password(&payload.password)
        .map_err(|e| ApiError::internal("An error occurred while registering", e))?;
    let user = User::create(&state.db, &payload.name, &payload.email, &hash).await?;

    info!(user_id = %user.id, "user registered");
    Ok(Json(MessageResponse::new("User registered successfully")))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }

    // Unknown email and wrong password answer identically.
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::Auth("Invalid credentials".into())
        })?;

    let ok = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| ApiError::internal("An error occurred while logging in", e))?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Auth("Invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys
        .sign(&user)
        .map_err(|e| ApiError::internal("An error occurred while logging in", e))?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        token,
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    }))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !is_valid_email(&payload.email) {
        return Err(ApiError::validation("Invalid email"));
    }

    if let Some(user) = User::find_by_email(&state.db, &payload.email).await? {
        let code = otp::generate_code();
        let expiry = otp::expiry_from(OffsetDateTime::now_utc());
        User::set_otp(&state.db, &user.email, &code, expiry).await?;
        state
            .mailer
            .send_otp(&user.email, &code)
            .await
            .map_err(|e| ApiError::internal("An error occurred while sending the OTP", e))?;
        info!(user_id = %user.id, "password reset OTP issued");
    } else {
        warn!(email = %payload.email, "password reset for unknown email");
    }

    Ok(Json(MessageResponse::new(FORGOT_PASSWORD_REPLY)))
}

#[instrument(skip(state, payload))]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !is_valid_email(&payload.email) {
        return Err(ApiError::validation("Invalid email"));
    }
    if !is_valid_otp(&payload.otp_code) {
        return Err(ApiError::validation("OTP must be a 6-digit code"));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| ApiError::validation(INVALID_OTP))?;

    let now = OffsetDateTime::now_utc();
    if !otp::code_is_valid(user.otp_code.as_deref(), user.otp_expiry, &payload.otp_code, now) {
        // A lapsed code can never become valid again; drop it from the row.
        if user.otp_expiry.is_some_and(|expiry| expiry <= now) {
            User::clear_otp(&state.db, &user.email).await?;
        }
        warn!(user_id = %user.id, "OTP verification rejected");
        return Err(ApiError::validation(INVALID_OTP));
    }

    // Verification is a read: the code stays usable until the reset lands.
    Ok(Json(MessageResponse::new("OTP verified successfully")))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !is_valid_email(&payload.email) {
        return Err(ApiError::validation("Invalid email"));
    }
    if !is_valid_otp(&payload.otp_code) {
        return Err(ApiError::validation("OTP must be a 6-digit code"));
    }
    if payload.new_password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }
    if payload.new_password != payload.confirm_password {
        return Err(ApiError::validation("Passwords do not match"));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| ApiError::validation(INVALID_OTP))?;

    let now = OffsetDateTime::now_utc();
    if !otp::code_is_valid(user.otp_code.as_deref(), user.otp_expiry, &payload.otp_code, now) {
        warn!(user_id = %user.id, "password reset with bad OTP");
        return Err(ApiError::validation(INVALID_OTP));
    }

    let hash = hash_password(&payload.new_password)
        .map_err(|e| ApiError::internal("An error occurred while resetting the password", e))?;
    User::update_password(&state.db, &user.email, &hash).await?;

    info!(user_id = %user.id, "password reset completed");
    Ok(Json(MessageResponse::new("Password reset successfully")))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserSummary>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "token subject no longer exists");
            ApiError::Auth("User not found".into())
        })?;

    Ok(Json(UserSummary {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        created_at: user.created_at,
    }))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = User::list_all(&state.db).await?;
    info!(admin_id = %admin_id, count = users.len(), "user listing served");
    Ok(Json(
        users
            .into_iter()
            .map(|user| UserSummary {
                id: user.id,
                name: user.name,
                email: user.email,
                role: user.role,
                created_at: user.created_at,
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_emails() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("first.last@sub.domain.co"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn otp_must_be_exactly_six_digits() {
        assert!(is_valid_otp("000000"));
        assert!(is_valid_otp("482913"));
        assert!(!is_valid_otp("12345"));
        assert!(!is_valid_otp("1234567"));
        assert!(!is_valid_otp("12a456"));
        assert!(!is_valid_otp(""));
    }
}
