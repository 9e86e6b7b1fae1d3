use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Access level stored on the user row and carried in issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub otp_code: Option<String>,
    pub otp_expiry: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Exact-match lookup; emails are compared case-sensitively.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, otp_code, otp_expiry,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, otp_code, otp_expiry,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Insert a new user with the default role. The unique index on email is
    /// the real duplicate guard; callers map that violation to a client error.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, role, otp_code, otp_expiry,
                      created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Store a fresh reset code, replacing whatever code was there before.
    pub async fn set_otp(
        db: &PgPool,
        email: &str,
        code: &str,
        expiry: OffsetDateTime,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET otp_code = $2, otp_expiry = $3, updated_at = now()
            WHERE email = $1
            "#,
        )
        .bind(email)
        .bind(code)
        .bind(expiry)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn clear_otp(db: &PgPool, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET otp_code = NULL, otp_expiry = NULL, updated_at = now()
            WHERE email = $1
            "#,
        )
        .bind(email)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Swap in a new password hash and drop the reset code in the same
    /// statement, so a used code cannot be replayed.
    pub async fn update_password(
        db: &PgPool,
        email: &str,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, otp_code = NULL, otp_expiry = NULL, updated_at = now()
            WHERE email = $1
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn list_all(db: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, otp_code, otp_expiry,
                   created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }
}
