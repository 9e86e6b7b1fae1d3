use serde::Deserialize;
use time::OffsetDateTime;

use crate::error::ApiError;

/// Optional `?month=&year=` filter accepted by the ledger and dashboard
/// routes. Parts left out fall back to the current month, server time.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PeriodQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// A concrete calendar month resolved from a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub month: u32,
    pub year: i32,
}

impl PeriodQuery {
    pub fn resolve(self) -> Result<Period, ApiError> {
        let now = OffsetDateTime::now_utc();
        let month = self.month.unwrap_or(u8::from(now.month()) as u32);
        let year = self.year.unwrap_or(now.year());
        Period::new(month, year)
    }
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self, ApiError> {
        if !(1..=12).contains(&month) {
            return Err(ApiError::validation("Month must be between 1 and 12"));
        }
        if !(1900..=9999).contains(&year) {
            return Err(ApiError::validation("Year is out of range"));
        }
        Ok(Self { month, year })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_full_month_range() {
        for month in 1..=12 {
            assert!(Period::new(month, 2025).is_ok());
        }
    }

    #[test]
    fn rejects_out_of_range_months() {
        assert!(Period::new(0, 2025).is_err());
        assert!(Period::new(13, 2025).is_err());
    }

    #[test]
    fn rejects_unreasonable_years() {
        assert!(Period::new(6, 1899).is_err());
        assert!(Period::new(6, 10_000).is_err());
    }

    #[test]
    fn missing_parts_default_to_the_current_month() {
        let query = PeriodQuery {
            month: None,
            year: None,
        };
        let now = OffsetDateTime::now_utc();
        let period = query.resolve().unwrap();
        assert_eq!(period.month, u8::from(now.month()) as u32);
        assert_eq!(period.year, now.year());
    }

    #[test]
    fn explicit_parts_win_over_the_defaults() {
        let query = PeriodQuery {
            month: Some(2),
            year: Some(2024),
        };
        let period = query.resolve().unwrap();
        assert_eq!(period.month, 2);
        assert_eq!(period.year, 2024);
    }
}
