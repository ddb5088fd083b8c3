//! Fee codes and calculation methods

use super::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fee type code (unique key of the fee type lookup)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeCode {
    Late,
    Damaged,
    Other,
}

impl FeeCode {
    pub const ALL: [FeeCode; 3] = [FeeCode::Late, FeeCode::Damaged, FeeCode::Other];

    pub const fn as_str(&self) -> &'static str {
        match self {
            FeeCode::Late => "LATE",
            FeeCode::Damaged => "DAMAGED",
            FeeCode::Other => "OTHER",
        }
    }
}

impl fmt::Display for FeeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeeCode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("fee code", s))
    }
}

/// How a fee type derives its amount
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeeCalculation {
    /// The default amount, once
    Flat,
    /// The default amount per overdue day
    PerDay,
    /// The default amount as a percentage of a base amount
    Percentage,
    /// Amount decided case by case
    Other,
}

impl FeeCalculation {
    pub const ALL: [FeeCalculation; 4] = [
        FeeCalculation::Flat,
        FeeCalculation::PerDay,
        FeeCalculation::Percentage,
        FeeCalculation::Other,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            FeeCalculation::Flat => "flat",
            FeeCalculation::PerDay => "per_day",
            FeeCalculation::Percentage => "percentage",
            FeeCalculation::Other => "other",
        }
    }
}

impl fmt::Display for FeeCalculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeeCalculation {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|calc| calc.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("fee calculation", s))
    }
}
