//! Rental Model

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{FeeCode, RentalStatus};
use surrealdb::RecordId;

use super::customer::RecentRental;
use super::fee_type::AppliedFeeRule;
use super::promo_code::AppliedPromo;
use super::serde_helpers;
use crate::db::repository::{RepoError, RepoResult};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_optional_text, validate_positive};

/// One rented copy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RentalItem {
    pub inventory_item_id: i64,
    pub movie: RecordId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_dkk: Decimal,
    pub created_at: i64,
    #[serde(default)]
    pub method: Option<String>,
}

/// Fee charged on a rental, with the rule it was charged under
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fee {
    pub id: i64,
    pub fee_type: FeeCode,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_dkk: Decimal,
    pub created_at: i64,
    pub rule: AppliedFeeRule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rental {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub customer: RecordId,
    pub location: RecordId,
    /// Employee id within the location
    #[serde(default)]
    pub employee: Option<i64>,
    pub status: RentalStatus,
    pub rented_at: i64,
    #[serde(default)]
    pub returned_at: Option<i64>,
    #[serde(default)]
    pub due_at: Option<i64>,
    #[serde(default)]
    pub reserved_at: Option<i64>,
    pub items: Vec<RentalItem>,
    #[serde(default, deserialize_with = "serde_helpers::vec_or_empty")]
    pub payments: Vec<Payment>,
    #[serde(default, deserialize_with = "serde_helpers::vec_or_empty")]
    pub fees: Vec<Fee>,
    #[serde(default)]
    pub promo: Option<AppliedPromo>,
}

impl Rental {
    pub fn validate(&self) -> RepoResult<()> {
        validate_items(self.items.iter().map(|i| i.inventory_item_id))
    }

    /// Returned and cancelled rentals are history and take no more writes
    pub fn ensure_writable(&self) -> RepoResult<()> {
        if self.status.is_terminal() {
            return Err(RepoError::Validation(format!(
                "Rental is {} and can no longer be changed",
                self.status
            )));
        }
        Ok(())
    }

    pub fn total_paid(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount_dkk).sum()
    }

    pub fn total_fees(&self) -> Decimal {
        self.fees.iter().map(|f| f.amount_dkk).sum()
    }

    pub fn inventory_item_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.items.iter().map(|i| i.inventory_item_id)
    }

    /// Summary for the customer's recent rentals cache
    pub fn recent_entry(&self) -> Option<RecentRental> {
        self.id.as_ref().map(|id| RecentRental {
            rental: id.clone(),
            status: self.status,
            rented_at: self.rented_at,
        })
    }
}

fn validate_items(ids: impl Iterator<Item = i64>) -> RepoResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(RepoError::Validation(format!(
                "Inventory item {id} appears twice on the rental"
            )));
        }
    }
    if seen.is_empty() {
        return Err(RepoError::Validation(
            "A rental must contain at least one inventory item".into(),
        ));
    }
    Ok(())
}

/// Create rental payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalCreate {
    /// "customer:key" or bare key
    pub customer_id: String,
    /// "location:key" or bare key
    pub location_id: String,
    pub employee_id: Option<i64>,
    pub inventory_item_ids: Vec<i64>,
    /// RESERVED or OPEN
    pub status: RentalStatus,
    pub due_at: Option<i64>,
}

impl RentalCreate {
    pub fn validate(&self) -> RepoResult<()> {
        if !self.status.is_initial() {
            return Err(RepoError::Validation(format!(
                "A rental cannot start as {}",
                self.status
            )));
        }
        validate_items(self.inventory_item_ids.iter().copied())
    }
}

/// Add payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_dkk: Decimal,
    pub method: Option<String>,
}

impl PaymentCreate {
    pub fn validate(&self) -> RepoResult<()> {
        validate_positive(self.amount_dkk, "payment amount_dkk")?;
        validate_optional_text(&self.method, "payment method", MAX_SHORT_TEXT_LEN)
    }
}

/// Apply fee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeCreate {
    pub code: FeeCode,
    /// Explicit amount; assessed from the fee type rule when absent
    #[serde(default, with = "serde_helpers::float_option")]
    pub amount_dkk: Option<Decimal>,
}
