//! Promo Code Model (lookup)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use crate::db::repository::{RepoError, RepoResult};
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_non_negative, validate_optional_text,
    validate_percent, validate_required_text, validate_window,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "serde_helpers::float_option")]
    pub percent_off: Option<Decimal>,
    #[serde(default, with = "serde_helpers::float_option")]
    pub amount_off_dkk: Option<Decimal>,
    #[serde(default)]
    pub starts_at: Option<i64>,
    #[serde(default)]
    pub ends_at: Option<i64>,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

/// Create promo code payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromoCodeCreate {
    pub code: String,
    pub description: Option<String>,
    #[serde(default, with = "serde_helpers::float_option")]
    pub percent_off: Option<Decimal>,
    #[serde(default, with = "serde_helpers::float_option")]
    pub amount_off_dkk: Option<Decimal>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    /// Defaults to active
    pub is_active: Option<bool>,
}

/// Update promo code payload (code stays fixed)
///
/// Discounts and window bounds are patches: an absent field is left alone,
/// an explicit null clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromoCodeUpdate {
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::float_patch"
    )]
    pub percent_off: Option<Option<Decimal>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::float_patch"
    )]
    pub amount_off_dkk: Option<Option<Decimal>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::patch"
    )]
    pub starts_at: Option<Option<i64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::patch"
    )]
    pub ends_at: Option<Option<i64>>,
    pub is_active: Option<bool>,
}

fn validate_discounts(percent_off: Option<Decimal>, amount_off_dkk: Option<Decimal>) -> RepoResult<()> {
    if let Some(percent) = percent_off {
        validate_percent(percent, "percent_off")?;
    }
    if let Some(amount) = amount_off_dkk {
        validate_non_negative(amount, "amount_off_dkk")?;
    }
    Ok(())
}

impl PromoCodeCreate {
    pub fn validate(&self) -> RepoResult<()> {
        validate_required_text(&self.code, "code", MAX_SHORT_TEXT_LEN)?;
        if self.code.chars().any(char::is_whitespace) {
            return Err(RepoError::Validation(format!(
                "code must not contain whitespace: '{}'",
                self.code
            )));
        }
        validate_optional_text(&self.description, "description", MAX_NOTE_LEN)?;
        validate_discounts(self.percent_off, self.amount_off_dkk)?;
        validate_window(self.starts_at, self.ends_at, "promo window")
    }
}

impl PromoCodeUpdate {
    pub fn validate(&self) -> RepoResult<()> {
        validate_optional_text(&self.description, "description", MAX_NOTE_LEN)?;
        validate_discounts(self.percent_off.flatten(), self.amount_off_dkk.flatten())
    }

    pub fn apply_to(self, target: &mut PromoCode) {
        if let Some(description) = self.description {
            target.description = Some(description);
        }
        if let Some(percent) = self.percent_off {
            target.percent_off = percent;
        }
        if let Some(amount) = self.amount_off_dkk {
            target.amount_off_dkk = amount;
        }
        if let Some(starts_at) = self.starts_at {
            target.starts_at = starts_at;
        }
        if let Some(ends_at) = self.ends_at {
            target.ends_at = ends_at;
        }
        if let Some(is_active) = self.is_active {
            target.is_active = is_active;
        }
    }
}

impl PromoCode {
    /// Active, and `at` falls inside the optional window (bounds inclusive)
    pub fn is_valid_at(&self, at: i64) -> bool {
        self.is_active
            && self.starts_at.is_none_or(|start| at >= start)
            && self.ends_at.is_none_or(|end| at <= end)
    }

    /// Ensure the stored record still satisfies the create-time rules
    pub fn validate(&self) -> RepoResult<()> {
        validate_discounts(self.percent_off, self.amount_off_dkk)?;
        validate_window(self.starts_at, self.ends_at, "promo window")
    }
}

/// Promo terms captured when a promo is applied to a rental
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedPromo {
    pub code: String,
    #[serde(default, with = "serde_helpers::float_option")]
    pub percent_off: Option<Decimal>,
    #[serde(default, with = "serde_helpers::float_option")]
    pub amount_off_dkk: Option<Decimal>,
    #[serde(default)]
    pub starts_at: Option<i64>,
    #[serde(default)]
    pub ends_at: Option<i64>,
    pub applied_at: i64,
}

impl AppliedPromo {
    pub fn from_promo(promo: &PromoCode, applied_at: i64) -> Self {
        Self {
            code: promo.code.clone(),
            percent_off: promo.percent_off,
            amount_off_dkk: promo.amount_off_dkk,
            starts_at: promo.starts_at,
            ends_at: promo.ends_at,
            applied_at,
        }
    }

    /// Discount on a subtotal: percentage first, then the fixed amount,
    /// never more than the subtotal itself
    pub fn discount_on(&self, subtotal: Decimal) -> Decimal {
        let mut discount = Decimal::ZERO;
        if let Some(percent) = self.percent_off {
            discount += (subtotal * percent / Decimal::ONE_HUNDRED).round_dp(2);
        }
        if let Some(amount) = self.amount_off_dkk {
            discount += amount;
        }
        discount.min(subtotal).max(Decimal::ZERO)
    }
}
