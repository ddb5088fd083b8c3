//! One-time shape migration for databases written by earlier revisions
//!
//! Runs at startup before the schema is applied, while legacy fields are
//! still readable:
//! - `addresses` list on customers is collapsed into the single `address`
//!   (first entry wins; legacy entries used `address` for the street line)
//! - `email_key` is filled for customers that predate it
//! - rentals without a `location` are counted and reported, never guessed
//!
//! Idempotent: a migrated database matches none of the selections.

use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use crate::db::models::{Address, Customer};
use crate::db::repository::RepoResult;

#[derive(Debug, Deserialize)]
struct LegacyAddress {
    #[serde(alias = "address")]
    street: Option<String>,
    city: Option<String>,
    post_code: Option<String>,
}

impl LegacyAddress {
    fn into_address(self) -> Option<Address> {
        Some(Address {
            street: self.street?,
            city: self.city?,
            post_code: self.post_code?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LegacyCustomer {
    id: RecordId,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_key: Option<String>,
    #[serde(default)]
    addresses: Option<Vec<LegacyAddress>>,
    #[serde(default)]
    has_address: bool,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: i64,
}

/// What the migration changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub addresses_promoted: usize,
    /// Legacy lists removed without promoting (empty, incomplete, or an
    /// `address` was already present)
    pub addresses_dropped: usize,
    pub email_keys_filled: usize,
    pub rentals_without_location: i64,
}

impl MigrationReport {
    pub fn changed_anything(&self) -> bool {
        self.addresses_promoted + self.addresses_dropped + self.email_keys_filled > 0
    }
}

/// Bring legacy documents to the current shape
pub async fn migrate_legacy_shapes(db: &Surreal<Db>) -> RepoResult<MigrationReport> {
    let mut report = MigrationReport::default();

    let legacy: Vec<LegacyCustomer> = db
        .query(
            "SELECT id, email, email_key, addresses, address != NONE AS has_address \
             FROM customer WHERE addresses != NONE OR email_key = NONE",
        )
        .await?
        .take(0)?;

    for customer in legacy {
        let mut sets: Vec<&str> = Vec::new();
        let mut address: Option<Address> = None;
        let mut email_key: Option<String> = None;

        if let Some(list) = customer.addresses {
            sets.push("addresses = NONE");
            let promoted = if customer.has_address {
                None
            } else {
                list.into_iter().next().and_then(LegacyAddress::into_address)
            };
            match promoted {
                Some(a) => {
                    address = Some(a);
                    sets.push("address = $address");
                    report.addresses_promoted += 1;
                }
                None => report.addresses_dropped += 1,
            }
        }

        if customer.email_key.is_none()
            && let Some(email) = &customer.email
        {
            email_key = Some(Customer::email_key(email));
            sets.push("email_key = $email_key");
            report.email_keys_filled += 1;
        }

        if sets.is_empty() {
            continue;
        }

        tracing::debug!(customer = %customer.id, "Migrating legacy customer shape");
        db.query(format!("UPDATE $id SET {}", sets.join(", ")))
            .bind(("id", customer.id))
            .bind(("address", address))
            .bind(("email_key", email_key))
            .await?
            .check()?;
    }

    let orphaned: Option<CountRow> = db
        .query("SELECT count() FROM rental WHERE location = NONE GROUP ALL")
        .await?
        .take(0)?;
    report.rentals_without_location = orphaned.map(|row| row.count).unwrap_or(0);

    if report.changed_anything() {
        tracing::info!(
            promoted = report.addresses_promoted,
            dropped = report.addresses_dropped,
            email_keys = report.email_keys_filled,
            "Legacy customer documents migrated"
        );
    }
    if report.rentals_without_location > 0 {
        tracing::warn!(
            count = report.rentals_without_location,
            "Rentals without a location found; they will fail the current schema on next write"
        );
    }

    Ok(report)
}
