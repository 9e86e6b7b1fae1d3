use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Expense row as stored. Same ownership rule as incomes: every query is
/// scoped to the owning user.
#[derive(Debug, Clone, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub category: String,
    pub date: Date,
    pub description: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// One category's share of a month, as summed by the store.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

impl Expense {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        amount: Decimal,
        category: &str,
        date: Date,
        description: &str,
    ) -> Result<Expense, sqlx::Error> {
        sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (user_id, amount, category, date, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, amount, category, date, description,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .bind(category)
        .bind(date)
        .bind(description)
        .fetch_one(db)
        .await
    }

    /// Newest-first listing, optionally narrowed to one calendar month.
    pub async fn list_for_user(
        db: &PgPool,
        user_id: Uuid,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Vec<Expense>, sqlx::Error> {
        match (month, year) {
            (Some(month), Some(year)) => {
                sqlx::query_as::<_, Expense>(
                    r#"
                    SELECT id, user_id, amount, category, date, description,
                           created_at, updated_at
                    FROM expenses
                    WHERE user_id = $1
                      AND EXTRACT(MONTH FROM date) = $2
                      AND EXTRACT(YEAR FROM date) = $3
                    ORDER BY date DESC
                    "#,
                )
                .bind(user_id)
                .bind(month as i32)
                .bind(year)
                .fetch_all(db)
                .await
            }
            _ => {
                sqlx::query_as::<_, Expense>(
                    r#"
                    SELECT id, user_id, amount, category, date, description,
                           created_at, updated_at
                    FROM expenses
                    WHERE user_id = $1
                    ORDER BY date DESC
                    "#,
                )
                .bind(user_id)
                .fetch_all(db)
                .await
            }
        }
    }

    pub async fn find_by_id(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Expense>, sqlx::Error> {
        sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, user_id, amount, category, date, description,
                   created_at, updated_at
            FROM expenses
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Full-row replacement. `false` means no row matched the id for this
    /// user.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
        amount: Decimal,
        category: &str,
        date: Date,
        description: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET amount = $3, category = $4, date = $5, description = $6, updated_at = now()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(amount)
        .bind(category)
        .bind(date)
        .bind(description)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Sum for one calendar month; zero when the month is empty.
    pub async fn monthly_total(
        db: &PgPool,
        user_id: Uuid,
        month: u32,
        year: i32,
    ) -> Result<Decimal, sqlx::Error> {
        sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM expenses
            WHERE user_id = $1
              AND EXTRACT(MONTH FROM date) = $2
              AND EXTRACT(YEAR FROM date) = $3
            "#,
        )
        .bind(user_id)
        .bind(month as i32)
        .bind(year)
        .fetch_one(db)
        .await
    }

    /// Per-category sums for one month, largest first. Ties keep whatever
    /// order the store hands back.
    pub async fn category_summary(
        db: &PgPool,
        user_id: Uuid,
        month: u32,
        year: i32,
    ) -> Result<Vec<CategoryTotal>, sqlx::Error> {
        sqlx::query_as::<_, CategoryTotal>(
            r#"
            SELECT category, COALESCE(SUM(amount), 0) AS total
            FROM expenses
            WHERE user_id = $1
              AND EXTRACT(MONTH FROM date) = $2
              AND EXTRACT(YEAR FROM date) = $3
            GROUP BY category
            ORDER BY total DESC
            "#,
        )
        .bind(user_id)
        .bind(month as i32)
        .bind(year)
        .fetch_all(db)
        .await
    }
}
