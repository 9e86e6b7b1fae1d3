use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::Role;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body starting a password reset.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body checking a reset code without using it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp_code: String,
}

/// Request body completing a password reset.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp_code: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Flat login payload the SPA keeps client-side for the session.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Plain `{"message"}` confirmation shared by the state-changing endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Profile view of a user; never carries credential or reset material.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn verify_request_uses_camel_case() {
        let parsed: VerifyOtpRequest =
            serde_json::from_str(r#"{"email":"a@b.io","otpCode":"123456"}"#).unwrap();
        assert_eq!(parsed.otp_code, "123456");
    }

    #[test]
    fn reset_request_uses_camel_case() {
        let parsed: ResetPasswordRequest = serde_json::from_str(
            r#"{"email":"a@b.io","otpCode":"123456","newPassword":"hunter22","confirmPassword":"hunter22"}"#,
        )
        .unwrap();
        assert_eq!(parsed.new_password, "hunter22");
        assert_eq!(parsed.confirm_password, "hunter22");
    }

    #[test]
    fn user_summary_serializes_without_credentials() {
        let summary = UserSummary {
            id: Uuid::nil(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::User,
            created_at: datetime!(2025-06-01 12:00 UTC),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["role"], "user");
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("otpCode").is_none());
        assert!(value.get("createdAt").is_some());
    }
}
