//! Inventory item format and availability

use super::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical or digital medium of an inventory item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaFormat {
    #[serde(rename = "DVD")]
    Dvd,
    #[serde(rename = "BLU-RAY")]
    BluRay,
    #[serde(rename = "VHS")]
    Vhs,
    #[serde(rename = "DIGITAL")]
    Digital,
}

impl MediaFormat {
    pub const ALL: [MediaFormat; 4] = [
        MediaFormat::Dvd,
        MediaFormat::BluRay,
        MediaFormat::Vhs,
        MediaFormat::Digital,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            MediaFormat::Dvd => "DVD",
            MediaFormat::BluRay => "BLU-RAY",
            MediaFormat::Vhs => "VHS",
            MediaFormat::Digital => "DIGITAL",
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("media format", s))
    }
}

/// Availability of an inventory item, stored as its numeric code (1-4)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum InventoryStatus {
    /// On the shelf, can be put on a rental
    Available = 1,
    /// Out with a customer
    Rented = 2,
    /// Held for a reservation
    Reserved = 3,
    /// Damaged, lost or withdrawn
    Retired = 4,
}

impl InventoryStatus {
    pub const ALL: [InventoryStatus; 4] = [
        InventoryStatus::Available,
        InventoryStatus::Rented,
        InventoryStatus::Reserved,
        InventoryStatus::Retired,
    ];

    #[inline]
    pub const fn code(&self) -> u8 {
        *self as u8
    }

    pub const fn is_available(&self) -> bool {
        matches!(self, InventoryStatus::Available)
    }
}

impl From<InventoryStatus> for u8 {
    #[inline]
    fn from(status: InventoryStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for InventoryStatus {
    type Error = UnknownVariant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(InventoryStatus::Available),
            2 => Ok(InventoryStatus::Rented),
            3 => Ok(InventoryStatus::Reserved),
            4 => Ok(InventoryStatus::Retired),
            _ => Err(UnknownVariant::new("inventory status", value.to_string())),
        }
    }
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
