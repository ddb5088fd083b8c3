//! Location Model
//!
//! A store with its staff and physical inventory embedded.

use serde::{Deserialize, Serialize};
use shared::models::{InventoryStatus, MediaFormat};
use surrealdb::RecordId;

use super::serde_helpers;
use crate::db::repository::{RepoError, RepoResult};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_required_text,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

/// One physical copy of a movie held by a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub id: i64,
    pub movie: RecordId,
    pub format: MediaFormat,
    pub status: InventoryStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub address: String,
    pub city: String,
    #[serde(default, deserialize_with = "serde_helpers::vec_or_empty")]
    pub employees: Vec<Employee>,
    #[serde(default, deserialize_with = "serde_helpers::vec_or_empty")]
    pub inventory: Vec<InventoryItem>,
}

impl Location {
    pub fn validate(&self) -> RepoResult<()> {
        validate_required_text(&self.address, "address", MAX_ADDRESS_LEN)?;
        validate_required_text(&self.city, "city", MAX_NAME_LEN)
    }

    pub fn employee(&self, employee_id: i64) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == employee_id)
    }

    pub fn employee_mut(&mut self, employee_id: i64) -> Option<&mut Employee> {
        self.employees.iter_mut().find(|e| e.id == employee_id)
    }

    pub fn inventory_item(&self, item_id: i64) -> Option<&InventoryItem> {
        self.inventory.iter().find(|i| i.id == item_id)
    }

    pub fn inventory_item_mut(&mut self, item_id: i64) -> Option<&mut InventoryItem> {
        self.inventory.iter_mut().find(|i| i.id == item_id)
    }

    /// Set the status of several items; fails on the first unknown id
    pub fn set_items_status(&mut self, item_ids: &[i64], status: InventoryStatus) -> RepoResult<()> {
        for item_id in item_ids {
            let item = self.inventory_item_mut(*item_id).ok_or_else(|| {
                RepoError::NotFound(format!("Inventory item {item_id} not found at this location"))
            })?;
            item.status = status;
        }
        Ok(())
    }

    /// Available copies of a movie
    pub fn available_copies<'a>(&'a self, movie: &'a RecordId) -> impl Iterator<Item = &'a InventoryItem> {
        self.inventory
            .iter()
            .filter(move |i| &i.movie == movie && i.status.is_available())
    }
}

/// An available copy together with the store holding it
#[derive(Debug, Clone, PartialEq)]
pub struct AvailableCopy {
    pub location: RecordId,
    pub city: String,
    pub item: InventoryItem,
}

/// Create location payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationCreate {
    pub address: String,
    pub city: String,
}

/// Update location payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub address: Option<String>,
    pub city: Option<String>,
}

impl LocationUpdate {
    pub fn apply_to(self, target: &mut Location) {
        if let Some(address) = self.address {
            target.address = address;
        }
        if let Some(city) = self.city {
            target.city = city;
        }
    }
}

/// Add employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

impl EmployeeCreate {
    pub fn validate(&self) -> RepoResult<()> {
        validate_required_text(&self.first_name, "employee first_name", MAX_NAME_LEN)?;
        validate_required_text(&self.last_name, "employee last_name", MAX_NAME_LEN)?;
        validate_email(&self.email, "employee email")?;
        validate_optional_text(&self.phone_number, "employee phone_number", MAX_SHORT_TEXT_LEN)
    }

    pub fn into_employee(self, id: i64) -> Employee {
        Employee {
            id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number,
            is_active: true,
        }
    }
}

/// Add inventory item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemCreate {
    /// "movie:key" or bare key
    pub movie_id: String,
    pub format: MediaFormat,
    /// Defaults to available
    pub status: Option<InventoryStatus>,
}
