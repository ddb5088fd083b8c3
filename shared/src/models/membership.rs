//! Membership tiers

use super::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Membership tier code (unique key of the membership type lookup)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipCode {
    Gold,
    Silver,
    Bronze,
}

impl MembershipCode {
    pub const ALL: [MembershipCode; 3] = [
        MembershipCode::Gold,
        MembershipCode::Silver,
        MembershipCode::Bronze,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            MembershipCode::Gold => "GOLD",
            MembershipCode::Silver => "SILVER",
            MembershipCode::Bronze => "BRONZE",
        }
    }
}

impl fmt::Display for MembershipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipCode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("membership code", s))
    }
}
