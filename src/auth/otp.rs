use rand::Rng;
use time::{Duration, OffsetDateTime};

/// How long an issued reset code stays usable.
pub const OTP_TTL: Duration = Duration::minutes(10);

/// Uniformly random six-digit reset code.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

pub fn expiry_from(now: OffsetDateTime) -> OffsetDateTime {
    now + OTP_TTL
}

/// Whether a presented code matches the stored one and is still live.
/// Expiry is strict: a code presented exactly at its expiry instant is dead.
/// Checking does not consume the code; only a completed reset or a newer
/// code replaces it.
pub fn code_is_valid(
    stored_code: Option<&str>,
    stored_expiry: Option<OffsetDateTime>,
    presented: &str,
    now: OffsetDateTime,
) -> bool {
    match (stored_code, stored_expiry) {
        (Some(code), Some(expiry)) => code == presented && expiry > now,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..500 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(!code.starts_with('0'));
        }
    }

    #[test]
    fn a_live_code_matches() {
        let now = OffsetDateTime::now_utc();
        let expiry = expiry_from(now);
        assert!(code_is_valid(Some("482913"), Some(expiry), "482913", now));
    }

    #[test]
    fn checking_does_not_consume_the_code() {
        let now = OffsetDateTime::now_utc();
        let expiry = expiry_from(now);
        assert!(code_is_valid(Some("482913"), Some(expiry), "482913", now));
        assert!(code_is_valid(Some("482913"), Some(expiry), "482913", now));
    }

    #[test]
    fn the_wrong_code_never_matches() {
        let now = OffsetDateTime::now_utc();
        let expiry = expiry_from(now);
        assert!(!code_is_valid(Some("482913"), Some(expiry), "482914", now));
    }

    #[test]
    fn expiry_is_strict() {
        let now = OffsetDateTime::now_utc();
        // One tick short of expiry is alive, the instant itself is not.
        assert!(code_is_valid(
            Some("111111"),
            Some(now + Duration::nanoseconds(1)),
            "111111",
            now
        ));
        assert!(!code_is_valid(Some("111111"), Some(now), "111111", now));
        assert!(!code_is_valid(
            Some("111111"),
            Some(now - Duration::minutes(1)),
            "111111",
            now
        ));
    }

    #[test]
    fn a_row_without_a_code_rejects_everything() {
        let now = OffsetDateTime::now_utc();
        assert!(!code_is_valid(None, None, "123456", now));
        assert!(!code_is_valid(Some("123456"), None, "123456", now));
        assert!(!code_is_valid(None, Some(expiry_from(now)), "123456", now));
    }
}
