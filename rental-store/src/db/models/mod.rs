//! Database Models

// Serde helpers
pub mod serde_helpers;

// Lookups
pub mod fee_type;
pub mod membership_type;
pub mod promo_code;

// Catalog & stores
pub mod location;
pub mod movie;

// Customers & rentals
pub mod customer;
pub mod rental;

// Re-exports
pub use customer::{
    Address, Customer, CustomerCreate, CustomerUpdate, Membership, RecentRental, RecentRentals,
};
pub use fee_type::{AppliedFeeRule, FeeBasis, FeeType, FeeTypeCreate, FeeTypeUpdate};
pub use location::{
    AvailableCopy, Employee, EmployeeCreate, InventoryItem, InventoryItemCreate, Location, LocationCreate,
    LocationUpdate,
};
pub use membership_type::{
    AppliedMembership, MembershipType, MembershipTypeCreate, MembershipTypeUpdate,
};
pub use movie::{Movie, MovieCreate, MovieUpdate, Review, ReviewCreate};
pub use promo_code::{AppliedPromo, PromoCode, PromoCodeCreate, PromoCodeUpdate};
pub use rental::{FeeCreate, Fee, Payment, PaymentCreate, Rental, RentalCreate, RentalItem};
