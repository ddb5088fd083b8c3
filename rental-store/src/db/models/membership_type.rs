//! Membership Type Model (lookup)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::MembershipCode;
use surrealdb::RecordId;

use super::serde_helpers;
use crate::db::repository::RepoResult;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_non_negative, validate_optional_text,
    validate_required_text,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub code: MembershipCode,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_cost_dkk: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::vec_or_empty")]
    pub benefits: Vec<String>,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

/// Create membership type payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipTypeCreate {
    pub code: MembershipCode,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_cost_dkk: Decimal,
    #[serde(default)]
    pub benefits: Vec<String>,
}

/// Update membership type payload (code is the lookup key and stays fixed)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipTypeUpdate {
    pub description: Option<String>,
    #[serde(default, with = "serde_helpers::float_option")]
    pub monthly_cost_dkk: Option<Decimal>,
    pub benefits: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

fn validate_benefits(benefits: &[String]) -> RepoResult<()> {
    for benefit in benefits {
        validate_required_text(benefit, "benefit", MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}

impl MembershipTypeCreate {
    pub fn validate(&self) -> RepoResult<()> {
        validate_optional_text(&self.description, "description", MAX_NOTE_LEN)?;
        validate_non_negative(self.monthly_cost_dkk, "monthly_cost_dkk")?;
        validate_benefits(&self.benefits)
    }
}

impl MembershipTypeUpdate {
    pub fn validate(&self) -> RepoResult<()> {
        validate_optional_text(&self.description, "description", MAX_NOTE_LEN)?;
        if let Some(cost) = self.monthly_cost_dkk {
            validate_non_negative(cost, "monthly_cost_dkk")?;
        }
        if let Some(benefits) = &self.benefits {
            validate_benefits(benefits)?;
        }
        Ok(())
    }

    /// Apply the set fields onto an existing record
    pub fn apply_to(self, target: &mut MembershipType) {
        if let Some(description) = self.description {
            target.description = Some(description);
        }
        if let Some(cost) = self.monthly_cost_dkk {
            target.monthly_cost_dkk = cost;
        }
        if let Some(benefits) = self.benefits {
            target.benefits = benefits;
        }
        if let Some(is_active) = self.is_active {
            target.is_active = is_active;
        }
    }
}

/// Membership terms captured when a membership is attached to a customer
///
/// Later edits to the membership type do not reach customers that already
/// hold it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedMembership {
    pub code: MembershipCode,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_cost_dkk: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::vec_or_empty")]
    pub benefits: Vec<String>,
    pub captured_at: i64,
}

impl AppliedMembership {
    pub fn from_type(membership_type: &MembershipType, captured_at: i64) -> Self {
        Self {
            code: membership_type.code,
            monthly_cost_dkk: membership_type.monthly_cost_dkk,
            benefits: membership_type.benefits.clone(),
            captured_at,
        }
    }
}
