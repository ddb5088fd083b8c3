//! Fee Type Model (lookup)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{FeeCalculation, FeeCode};
use surrealdb::RecordId;

use super::serde_helpers;
use crate::db::repository::{RepoError, RepoResult};
use crate::utils::validation::{MAX_NOTE_LEN, validate_non_negative, validate_optional_text};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub code: FeeCode,
    #[serde(default)]
    pub description: Option<String>,
    pub calculation: FeeCalculation,
    #[serde(with = "rust_decimal::serde::float")]
    pub default_amount_dkk: Decimal,
    #[serde(default)]
    pub is_taxable: bool,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

/// Create fee type payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeTypeCreate {
    pub code: FeeCode,
    pub description: Option<String>,
    pub calculation: FeeCalculation,
    #[serde(with = "rust_decimal::serde::float")]
    pub default_amount_dkk: Decimal,
    #[serde(default)]
    pub is_taxable: bool,
}

/// Update fee type payload (code stays fixed)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeeTypeUpdate {
    pub description: Option<String>,
    pub calculation: Option<FeeCalculation>,
    #[serde(default, with = "serde_helpers::float_option")]
    pub default_amount_dkk: Option<Decimal>,
    pub is_taxable: Option<bool>,
    pub is_active: Option<bool>,
}

impl FeeTypeCreate {
    pub fn validate(&self) -> RepoResult<()> {
        validate_optional_text(&self.description, "description", MAX_NOTE_LEN)?;
        validate_non_negative(self.default_amount_dkk, "default_amount_dkk")
    }
}

impl FeeTypeUpdate {
    pub fn validate(&self) -> RepoResult<()> {
        validate_optional_text(&self.description, "description", MAX_NOTE_LEN)?;
        if let Some(amount) = self.default_amount_dkk {
            validate_non_negative(amount, "default_amount_dkk")?;
        }
        Ok(())
    }

    pub fn apply_to(self, target: &mut FeeType) {
        if let Some(description) = self.description {
            target.description = Some(description);
        }
        if let Some(calculation) = self.calculation {
            target.calculation = calculation;
        }
        if let Some(amount) = self.default_amount_dkk {
            target.default_amount_dkk = amount;
        }
        if let Some(is_taxable) = self.is_taxable {
            target.is_taxable = is_taxable;
        }
        if let Some(is_active) = self.is_active {
            target.is_active = is_active;
        }
    }
}

impl FeeType {
    /// Snapshot of the calculation fields for a fee charged now
    pub fn rule(&self) -> AppliedFeeRule {
        AppliedFeeRule::from_fee_type(self)
    }

    /// Amount this fee type charges in the given situation
    pub fn assess(&self, basis: &FeeBasis) -> RepoResult<Decimal> {
        self.rule().assess(basis)
    }
}

/// Inputs a fee calculation may depend on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeeBasis {
    /// Whole days past the due date
    pub days_overdue: i64,
    /// Amount a percentage fee is taken of
    pub base_amount_dkk: Decimal,
}

/// Fee rule captured when a fee is charged on a rental
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedFeeRule {
    pub calculation: FeeCalculation,
    #[serde(with = "rust_decimal::serde::float")]
    pub default_amount_dkk: Decimal,
    #[serde(default)]
    pub is_taxable: bool,
}

impl AppliedFeeRule {
    pub fn from_fee_type(fee_type: &FeeType) -> Self {
        Self {
            calculation: fee_type.calculation,
            default_amount_dkk: fee_type.default_amount_dkk,
            is_taxable: fee_type.is_taxable,
        }
    }

    /// Compute the fee amount
    ///
    /// - `flat`: the default amount
    /// - `per_day`: default amount times overdue days, at least one day
    /// - `percentage`: default amount as percent of the base, 2 decimals
    /// - `other`: no rule; callers must supply the amount
    pub fn assess(&self, basis: &FeeBasis) -> RepoResult<Decimal> {
        match self.calculation {
            FeeCalculation::Flat => Ok(self.default_amount_dkk),
            FeeCalculation::PerDay => {
                let days = basis.days_overdue.max(1);
                Ok(self.default_amount_dkk * Decimal::from(days))
            }
            FeeCalculation::Percentage => Ok((basis.base_amount_dkk * self.default_amount_dkk
                / Decimal::ONE_HUNDRED)
                .round_dp(2)),
            FeeCalculation::Other => Err(RepoError::Validation(
                "Fee calculation 'other' requires an explicit amount".into(),
            )),
        }
    }
}
