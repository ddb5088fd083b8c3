//! Rental status and its lifecycle

use super::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rental status (also mirrored in a customer's recent rentals)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    Reserved,
    Open,
    Returned,
    Late,
    Cancelled,
}

impl RentalStatus {
    pub const ALL: [RentalStatus; 5] = [
        RentalStatus::Reserved,
        RentalStatus::Open,
        RentalStatus::Returned,
        RentalStatus::Late,
        RentalStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Reserved => "RESERVED",
            RentalStatus::Open => "OPEN",
            RentalStatus::Returned => "RETURNED",
            RentalStatus::Late => "LATE",
            RentalStatus::Cancelled => "CANCELLED",
        }
    }

    /// Returned and cancelled rentals are immutable history.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, RentalStatus::Returned | RentalStatus::Cancelled)
    }

    /// Statuses a new rental may start in
    pub const fn is_initial(&self) -> bool {
        matches!(self, RentalStatus::Reserved | RentalStatus::Open)
    }

    /// Statuses reachable from this one
    pub const fn next_statuses(&self) -> &'static [RentalStatus] {
        match self {
            RentalStatus::Reserved => &[RentalStatus::Open, RentalStatus::Cancelled],
            RentalStatus::Open => &[RentalStatus::Returned, RentalStatus::Late],
            RentalStatus::Late => &[RentalStatus::Returned],
            RentalStatus::Returned | RentalStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: RentalStatus) -> bool {
        self.next_statuses().contains(&next)
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RentalStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("rental status", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_statuses() {
        for status in RentalStatus::ALL {
            assert_eq!(status.as_str().parse::<RentalStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        let err = "PAUSED".parse::<RentalStatus>().unwrap_err();
        assert_eq!(err.value, "PAUSED");
        assert_eq!(err.to_string(), "invalid rental status: 'PAUSED'");

        // Case matters: the stored literal is upper case
        assert!("open".parse::<RentalStatus>().is_err());
    }

    #[test]
    fn test_deserialize_rejects_unknown_status() {
        let ok: RentalStatus = serde_json::from_str("\"LATE\"").unwrap();
        assert_eq!(ok, RentalStatus::Late);
        assert!(serde_json::from_str::<RentalStatus>("\"PAUSED\"").is_err());
    }

    #[test]
    fn test_transitions() {
        assert!(RentalStatus::Reserved.can_transition_to(RentalStatus::Open));
        assert!(RentalStatus::Reserved.can_transition_to(RentalStatus::Cancelled));
        assert!(!RentalStatus::Reserved.can_transition_to(RentalStatus::Returned));

        assert!(RentalStatus::Open.can_transition_to(RentalStatus::Late));
        assert!(RentalStatus::Open.can_transition_to(RentalStatus::Returned));
        assert!(!RentalStatus::Open.can_transition_to(RentalStatus::Reserved));

        assert!(RentalStatus::Late.can_transition_to(RentalStatus::Returned));
        assert!(!RentalStatus::Late.can_transition_to(RentalStatus::Open));

        for status in RentalStatus::ALL {
            assert!(!RentalStatus::Returned.can_transition_to(status));
            assert!(!RentalStatus::Cancelled.can_transition_to(status));
        }
    }

    #[test]
    fn test_terminal_and_initial() {
        assert!(RentalStatus::Returned.is_terminal());
        assert!(RentalStatus::Cancelled.is_terminal());
        assert!(!RentalStatus::Late.is_terminal());

        assert!(RentalStatus::Reserved.is_initial());
        assert!(RentalStatus::Open.is_initial());
        assert!(!RentalStatus::Late.is_initial());
    }
}
