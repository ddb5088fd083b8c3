//! Customer Model

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use shared::models::{MembershipCode, RentalStatus};
use surrealdb::RecordId;

use super::membership_type::AppliedMembership;
use crate::db::repository::RepoResult;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_required_text, validate_window,
};

/// Postal address embedded in a customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub post_code: String,
}

impl Address {
    pub fn validate(&self) -> RepoResult<()> {
        validate_required_text(&self.street, "address.street", MAX_ADDRESS_LEN)?;
        validate_required_text(&self.city, "address.city", MAX_NAME_LEN)?;
        validate_required_text(&self.post_code, "address.post_code", MAX_SHORT_TEXT_LEN)
    }
}

/// Membership held by a customer, with the terms it was sold under
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Membership {
    pub code: MembershipCode,
    pub starts_at: i64,
    #[serde(default)]
    pub ends_at: Option<i64>,
    pub terms: AppliedMembership,
}

impl Membership {
    pub fn is_active_at(&self, at: i64) -> bool {
        at >= self.starts_at && self.ends_at.is_none_or(|end| at <= end)
    }
}

/// Cached summary of one rental on the customer document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentRental {
    pub rental: RecordId,
    pub status: RentalStatus,
    pub rented_at: i64,
}

/// The customer's most recent rentals, oldest first
///
/// Holds at most [`RecentRentals::CAPACITY`] entries. Pushing onto a full
/// list evicts from the front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<RecentRental>", into = "Vec<RecentRental>")]
pub struct RecentRentals(VecDeque<RecentRental>);

impl RecentRentals {
    pub const CAPACITY: usize = 5;

    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, returning whatever fell off the front
    pub fn push(&mut self, entry: RecentRental) -> Vec<RecentRental> {
        self.0.push_back(entry);
        self.trim()
    }

    /// Refresh the entry for the same rental in place, or append a new one
    pub fn record(&mut self, entry: RecentRental) -> Vec<RecentRental> {
        if let Some(existing) = self.0.iter_mut().find(|e| e.rental == entry.rental) {
            *existing = entry;
            return Vec::new();
        }
        self.push(entry)
    }

    fn trim(&mut self) -> Vec<RecentRental> {
        let mut evicted = Vec::new();
        while self.0.len() > Self::CAPACITY {
            if let Some(oldest) = self.0.pop_front() {
                evicted.push(oldest);
            }
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecentRental> {
        self.0.iter()
    }

    pub fn oldest(&self) -> Option<&RecentRental> {
        self.0.front()
    }

    pub fn newest(&self) -> Option<&RecentRental> {
        self.0.back()
    }

    pub fn get(&self, rental: &RecordId) -> Option<&RecentRental> {
        self.0.iter().find(|e| &e.rental == rental)
    }
}

/// Keeps the newest entries when a stored list is over capacity
impl From<Vec<RecentRental>> for RecentRentals {
    fn from(entries: Vec<RecentRental>) -> Self {
        let mut list = Self(entries.into());
        list.trim();
        list
    }
}

impl From<RecentRentals> for Vec<RecentRental> {
    fn from(list: RecentRentals) -> Self {
        list.0.into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Lowercased email, unique
    pub email_key: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub created_at: i64,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub membership: Option<Membership>,
    #[serde(default)]
    pub recent_rentals: RecentRentals,
}

impl Customer {
    /// Case-insensitive uniqueness key for an email
    pub fn email_key(email: &str) -> String {
        email.trim().to_lowercase()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn validate(&self) -> RepoResult<()> {
        validate_required_text(&self.first_name, "first_name", MAX_NAME_LEN)?;
        validate_required_text(&self.last_name, "last_name", MAX_NAME_LEN)?;
        validate_email(&self.email, "email")?;
        validate_optional_text(&self.phone_number, "phone_number", MAX_SHORT_TEXT_LEN)?;
        if let Some(address) = &self.address {
            address.validate()?;
        }
        if let Some(membership) = &self.membership {
            validate_window(Some(membership.starts_at), membership.ends_at, "membership")?;
        }
        Ok(())
    }
}

/// Create customer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<Address>,
}

impl CustomerCreate {
    /// Build the stored document
    pub fn into_customer(self, created_at: i64) -> Customer {
        let email = self.email.trim().to_string();
        Customer {
            id: None,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email_key: Customer::email_key(&email),
            email,
            phone_number: self.phone_number,
            created_at,
            address: self.address,
            membership: None,
            recent_rentals: RecentRentals::new(),
        }
    }
}

/// Update customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl CustomerUpdate {
    pub fn apply_to(self, target: &mut Customer) {
        if let Some(first_name) = self.first_name {
            target.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = self.last_name {
            target.last_name = last_name.trim().to_string();
        }
        if let Some(email) = self.email {
            target.email = email.trim().to_string();
            target.email_key = Customer::email_key(&email);
        }
        if let Some(phone_number) = self.phone_number {
            target.phone_number = Some(phone_number);
        }
    }
}
