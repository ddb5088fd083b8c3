//! Input validation helpers
//!
//! Centralized length limits and range checks shared by the model
//! `validate()` methods. Every failure is a `RepoError::Validation`.

use rust_decimal::Decimal;

use crate::db::repository::{RepoError, RepoResult};

// ── Text length limits ──────────────────────────────────────────────

/// Person names, movie titles, cities
pub const MAX_NAME_LEN: usize = 200;

/// Summaries, review bodies, descriptions
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, post code, promo code, payment method, genre
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Street addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Ranges ──────────────────────────────────────────────────────────

/// Movie and review ratings
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 10;

/// Promo percentage
pub const MAX_PERCENT: i64 = 100;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> RepoResult<()> {
    if value.trim().is_empty() {
        return Err(RepoError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(RepoError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> RepoResult<()> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(RepoError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate an email address: `local@domain`, no whitespace.
pub fn validate_email(value: &str, field: &str) -> RepoResult<()> {
    validate_required_text(value, field, MAX_EMAIL_LEN)?;
    let value = value.trim();
    let well_formed = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !well_formed {
        return Err(RepoError::Validation(format!(
            "{field} is not a valid email address: {value}"
        )));
    }
    Ok(())
}

// ── Numbers ─────────────────────────────────────────────────────────

/// Validate an integer inside an inclusive range.
pub fn validate_range(value: i64, field: &str, min: i64, max: i64) -> RepoResult<()> {
    if value < min || value > max {
        return Err(RepoError::Validation(format!(
            "{field} must be within {min}..={max}, got {value}"
        )));
    }
    Ok(())
}

/// Validate a 1..=10 rating.
pub fn validate_rating(value: i32, field: &str) -> RepoResult<()> {
    validate_range(value.into(), field, MIN_RATING.into(), MAX_RATING.into())
}

/// Validate an integer that must be strictly positive.
pub fn validate_positive_int(value: i32, field: &str) -> RepoResult<()> {
    if value <= 0 {
        return Err(RepoError::Validation(format!(
            "{field} must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Validate a money amount that may be zero.
pub fn validate_non_negative(value: Decimal, field: &str) -> RepoResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(RepoError::Validation(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}

/// Validate a money amount that must be above zero.
pub fn validate_positive(value: Decimal, field: &str) -> RepoResult<()> {
    if value <= Decimal::ZERO {
        return Err(RepoError::Validation(format!(
            "{field} must be greater than zero, got {value}"
        )));
    }
    Ok(())
}

/// Validate a percentage in 0..=100.
pub fn validate_percent(value: Decimal, field: &str) -> RepoResult<()> {
    if value < Decimal::ZERO || value > Decimal::from(MAX_PERCENT) {
        return Err(RepoError::Validation(format!(
            "{field} must be within 0..={MAX_PERCENT}, got {value}"
        )));
    }
    Ok(())
}

/// Validate an optional time window: start must not be after end.
pub fn validate_window(starts_at: Option<i64>, ends_at: Option<i64>, field: &str) -> RepoResult<()> {
    if let (Some(start), Some(end)) = (starts_at, ends_at)
        && start > end
    {
        return Err(RepoError::Validation(format!(
            "{field} starts after it ends ({start} > {end})"
        )));
    }
    Ok(())
}
