use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;
use uuid::Uuid;

use crate::expense::repo::{CategoryTotal, Expense};
use crate::income::repo::Income;

/// How many entries the recent-activity feed shows.
pub const RECENT_LIMIT: usize = 10;
/// How many categories count as "top".
pub const TOP_CATEGORIES: usize = 3;

/// Which ledger a feed entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// One row of the unified recent-activity feed.
#[derive(Debug, Clone, Serialize)]
pub struct RecentTransaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: Date,
}

/// A category's total and its share of the month's overall spend.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub amount: Decimal,
    pub percentage: Decimal,
}

/// Share of `total` that `amount` represents, as a percentage rounded to one
/// decimal place (banker's rounding). Zero when there is nothing to divide
/// by.
pub fn percentage_of(amount: Decimal, total: Decimal) -> Decimal {
    if total > Decimal::ZERO {
        (amount / total * Decimal::ONE_HUNDRED).round_dp(1)
    } else {
        Decimal::ZERO
    }
}

/// Attach percentages to the per-category totals. Order is preserved; the
/// store already returns rows sorted by amount descending.
pub fn category_breakdown(
    rows: Vec<CategoryTotal>,
    total_expense: Decimal,
) -> Vec<CategoryBreakdown> {
    rows.into_iter()
        .map(|row| CategoryBreakdown {
            percentage: percentage_of(row.total, total_expense),
            category: row.category,
            amount: row.total,
        })
        .collect()
}

/// First [`TOP_CATEGORIES`] entries of the breakdown, same order, not
/// re-ranked.
pub fn top_categories(breakdown: &[CategoryBreakdown]) -> Vec<CategoryBreakdown> {
    breakdown.iter().take(TOP_CATEGORIES).cloned().collect()
}

/// Balance as a share of income, one decimal place. Zero when no income was
/// recorded; negative when the month overspent.
pub fn savings_rate(total_income: Decimal, balance: Decimal) -> Decimal {
    percentage_of(balance, total_income)
}

/// Merge both ledgers into one newest-first feed capped at [`RECENT_LIMIT`].
/// The sort is stable and incomes are queued ahead of expenses, so entries
/// sharing a date keep a fixed, reproducible order.
pub fn recent_transactions(incomes: Vec<Income>, expenses: Vec<Expense>) -> Vec<RecentTransaction> {
    let mut feed: Vec<RecentTransaction> = incomes
        .into_iter()
        .map(|row| RecentTransaction {
            id: row.id,
            kind: TransactionKind::Income,
            amount: row.amount,
            category: row.category,
            description: row.description,
            date: row.date,
        })
        .chain(expenses.into_iter().map(|row| RecentTransaction {
            id: row.id,
            kind: TransactionKind::Expense,
            amount: row.amount,
            category: row.category,
            description: row.description,
            date: row.date,
        }))
        .collect();
    feed.sort_by(|a, b| b.date.cmp(&a.date));
    feed.truncate(RECENT_LIMIT);
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::OffsetDateTime;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn income(amount: &str, category: &str, date: Date) -> Income {
        let now = OffsetDateTime::UNIX_EPOCH;
        Income {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            amount: dec(amount),
            category: category.into(),
            date,
            description: String::new(),
            is_recurring: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn expense(amount: &str, category: &str, date: Date) -> Expense {
        let now = OffsetDateTime::UNIX_EPOCH;
        Expense {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            amount: dec(amount),
            category: category.into(),
            date,
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn totals(rows: &[(&str, &str)]) -> Vec<CategoryTotal> {
        rows.iter()
            .map(|(category, total)| CategoryTotal {
                category: (*category).into(),
                total: dec(total),
            })
            .collect()
    }

    #[test]
    fn percentages_are_rounded_to_one_decimal() {
        assert_eq!(percentage_of(dec("200"), dec("300")), dec("66.7"));
        assert_eq!(percentage_of(dec("100"), dec("300")), dec("33.3"));
    }

    #[test]
    fn percentage_rounding_is_half_to_even() {
        // 24.50 of 200.00 is exactly 12.25 percent.
        assert_eq!(percentage_of(dec("24.50"), dec("200")), dec("12.2"));
        // 24.70 of 200.00 is exactly 12.35 percent.
        assert_eq!(percentage_of(dec("24.70"), dec("200")), dec("12.4"));
    }

    #[test]
    fn a_zero_total_yields_zero_percent() {
        assert_eq!(percentage_of(dec("50"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percentage_of(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn breakdown_keeps_store_order_and_adds_shares() {
        let rows = totals(&[("Rent/Housing", "600"), ("Food & Dining", "300"), ("Travel", "100")]);
        let breakdown = category_breakdown(rows, dec("1000"));
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[0].category, "Rent/Housing");
        assert_eq!(breakdown[0].percentage, dec("60.0"));
        assert_eq!(breakdown[1].percentage, dec("30.0"));
        assert_eq!(breakdown[2].percentage, dec("10.0"));
    }

    #[test]
    fn an_empty_month_breaks_down_to_nothing() {
        assert!(category_breakdown(Vec::new(), Decimal::ZERO).is_empty());
    }

    #[test]
    fn top_categories_takes_at_most_three() {
        let breakdown = category_breakdown(
            totals(&[("A", "500"), ("B", "250"), ("C", "150"), ("D", "75"), ("E", "25")]),
            dec("1000"),
        );
        let top = top_categories(&breakdown);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].category, "A");
        assert_eq!(top[2].category, "C");
    }

    #[test]
    fn top_categories_handles_fewer_than_three() {
        let breakdown = category_breakdown(totals(&[("A", "70"), ("B", "30")]), dec("100"));
        assert_eq!(top_categories(&breakdown).len(), 2);
        assert!(top_categories(&[]).is_empty());
    }

    #[test]
    fn savings_rate_follows_the_balance() {
        assert_eq!(savings_rate(dec("1000"), dec("250")), dec("25.0"));
        assert_eq!(savings_rate(dec("1000"), dec("-250")), dec("-25.0"));
        assert_eq!(savings_rate(Decimal::ZERO, dec("-300")), Decimal::ZERO);
    }

    #[test]
    fn a_thousand_in_and_eight_hundred_out_saves_twenty_percent() {
        let total_income = dec("1000");
        let balance = total_income - dec("800");
        assert_eq!(balance, dec("200"));
        assert_eq!(savings_rate(total_income, balance), dec("20.0"));
    }

    #[test]
    fn breakdown_amounts_sum_to_the_total() {
        let rows = totals(&[
            ("Rent/Housing", "612.40"),
            ("Food & Dining", "287.35"),
            ("Travel", "100.25"),
        ]);
        let total: Decimal = rows.iter().map(|row| row.total).sum();
        let breakdown = category_breakdown(rows, total);
        let sum: Decimal = breakdown.iter().map(|entry| entry.amount).sum();
        assert_eq!(sum, total);
    }

    #[test]
    fn feed_is_newest_first_and_capped() {
        let june = date!(2025 - 06 - 01);
        let incomes: Vec<Income> = (1..=7)
            .rev()
            .map(|day| income("10", "Salary", june.replace_day(day).unwrap()))
            .collect();
        let expenses: Vec<Expense> = (8..=14)
            .rev()
            .map(|day| expense("5", "Food & Dining", june.replace_day(day).unwrap()))
            .collect();

        let feed = recent_transactions(incomes, expenses);
        assert_eq!(feed.len(), RECENT_LIMIT);
        assert_eq!(feed[0].date, date!(2025 - 06 - 14));
        for pair in feed.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }

    #[test]
    fn incomes_come_before_expenses_on_a_shared_date() {
        let day = date!(2025 - 06 - 10);
        let feed = recent_transactions(
            vec![income("10", "Salary", day)],
            vec![expense("5", "Travel", day)],
        );
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].kind, TransactionKind::Income);
        assert_eq!(feed[1].kind, TransactionKind::Expense);
    }

    #[test]
    fn kind_serializes_lowercase_under_the_type_key() {
        let feed = recent_transactions(vec![income("10", "Salary", date!(2025 - 06 - 10))], vec![]);
        let value = serde_json::to_value(&feed[0]).unwrap();
        assert_eq!(value["type"], "income");
        assert_eq!(value["date"], "2025-06-10");
    }
}
