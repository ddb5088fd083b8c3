//! Rental Repository
//!
//! Rentals reference a customer, a location and inventory items embedded in
//! that location. Creating or moving a rental also updates the items'
//! inventory status and mirrors the rental into the customer's recent
//! rentals cache. Those writes commit together in one transaction.

use super::{
    BaseRepository, CustomerRepository, FeeTypeRepository, LocationRepository,
    PromoCodeRepository, RepoError, RepoResult, embedded_id, record_id, transaction_result,
};
use crate::db::models::{
    AppliedPromo, Customer, Fee, FeeBasis, FeeCreate, Location, Payment, PaymentCreate, Rental,
    RentalCreate, RentalItem,
};
use crate::db::schema::{CUSTOMER, RENTAL};
use crate::utils::validation::validate_non_negative;
use shared::models::{InventoryStatus, RentalStatus};
use shared::util::{days_between_ceil, now_millis, record_key};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Aborts the create when any requested item stopped being available after
/// it was checked (1 = available)
const ITEMS_STILL_AVAILABLE: &str = r#"
LET $taken = (SELECT VALUE inventory[WHERE id INSIDE $item_ids AND status != 1] FROM ONLY $location_id);
IF array::len($taken) > 0 {
    THROW "Inventory items are no longer available";
};
"#;

#[derive(Clone)]
pub struct RentalRepository {
    base: BaseRepository,
    customers: CustomerRepository,
    locations: LocationRepository,
}

impl RentalRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            customers: CustomerRepository::new(db.clone()),
            locations: LocationRepository::new(db.clone()),
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Rental>> {
        self.base.select(record_id(RENTAL, id)?).await
    }

    /// A customer's rentals, newest first, optionally of one status
    pub async fn find_by_customer(
        &self,
        customer_id: &str,
        status: Option<RentalStatus>,
    ) -> RepoResult<Vec<Rental>> {
        let customer = record_id(CUSTOMER, customer_id)?;
        let rentals: Vec<Rental> = match status {
            Some(status) => self
                .base
                .db()
                .query(
                    "SELECT * FROM rental WHERE customer = $customer AND status = $status \
                     ORDER BY rented_at DESC",
                )
                .bind(("customer", customer))
                .bind(("status", status))
                .await?
                .take(0)?,
            None => self
                .base
                .db()
                .query("SELECT * FROM rental WHERE customer = $customer ORDER BY rented_at DESC")
                .bind(("customer", customer))
                .await?
                .take(0)?,
        };
        Ok(rentals)
    }

    pub async fn find_by_status(&self, status: RentalStatus) -> RepoResult<Vec<Rental>> {
        let rentals: Vec<Rental> = self
            .base
            .db()
            .query("SELECT * FROM rental WHERE status = $status ORDER BY rented_at DESC")
            .bind(("status", status))
            .await?
            .take(0)?;
        Ok(rentals)
    }

    /// Rental history of one physical copy, newest first
    pub async fn find_by_inventory_item(&self, item_id: i64) -> RepoResult<Vec<Rental>> {
        let rentals: Vec<Rental> = self
            .base
            .db()
            .query(
                "SELECT * FROM rental WHERE items.inventory_item_id CONTAINS $item_id \
                 ORDER BY rented_at DESC",
            )
            .bind(("item_id", item_id))
            .await?
            .take(0)?;
        Ok(rentals)
    }

    /// Open or reserve a rental
    ///
    /// Customer, location and employee must exist, and every item must be
    /// an available copy at that location.
    pub async fn create(&self, data: RentalCreate) -> RepoResult<Rental> {
        data.validate()?;

        let (customer_rid, customer) = self
            .customers
            .load(&data.customer_id)
            .await
            .map_err(as_reference)?;
        let (location_rid, location) = self
            .locations
            .load(&data.location_id)
            .await
            .map_err(as_reference)?;

        if let Some(employee_id) = data.employee_id {
            let employee = location.employee(employee_id).ok_or_else(|| {
                RepoError::Reference(format!(
                    "Employee {employee_id} not found at location {location_rid}"
                ))
            })?;
            if !employee.is_active {
                return Err(RepoError::Validation(format!(
                    "Employee {employee_id} is not active"
                )));
            }
        }

        let mut items = Vec::with_capacity(data.inventory_item_ids.len());
        for item_id in &data.inventory_item_ids {
            let item = location.inventory_item(*item_id).ok_or_else(|| {
                RepoError::Reference(format!(
                    "Inventory item {item_id} not found at location {location_rid}"
                ))
            })?;
            if !item.status.is_available() {
                return Err(RepoError::Validation(format!(
                    "Inventory item {item_id} is not available ({})",
                    item.status
                )));
            }
            items.push(RentalItem {
                inventory_item_id: item.id,
                movie: item.movie.clone(),
            });
        }

        let now = now_millis();
        let rid = RecordId::from_table_key(RENTAL, record_key());
        let rental = Rental {
            id: Some(rid.clone()),
            customer: customer_rid.clone(),
            location: location_rid.clone(),
            employee: data.employee_id,
            status: data.status,
            rented_at: now,
            returned_at: None,
            due_at: data.due_at,
            reserved_at: (data.status == RentalStatus::Reserved).then_some(now),
            items,
            payments: Vec::new(),
            fees: Vec::new(),
            promo: None,
        };
        rental.validate()?;

        let item_status = match rental.status {
            RentalStatus::Reserved => InventoryStatus::Reserved,
            _ => InventoryStatus::Rented,
        };
        let mut location = location;
        location.set_items_status(&data.inventory_item_ids, item_status)?;
        let mut customer = customer;
        record_recent(&customer_rid, &mut customer, &rental);

        let response = self
            .base
            .db()
            .query("BEGIN TRANSACTION")
            .query(ITEMS_STILL_AVAILABLE)
            .query("CREATE $rental_id CONTENT $rental")
            .query("UPDATE $location_id CONTENT $location")
            .query("UPDATE $customer_id CONTENT $customer")
            .query("COMMIT TRANSACTION")
            .bind(("item_ids", data.inventory_item_ids))
            .bind(("rental_id", rid.clone()))
            .bind(("rental", rental))
            .bind(("location_id", location_rid))
            .bind(("location", location))
            .bind(("customer_id", customer_rid))
            .bind(("customer", customer))
            .await?;
        transaction_result(response)?;

        let created: Rental = self
            .base
            .select(rid.clone())
            .await?
            .ok_or_else(|| RepoError::Database(format!("Rental {rid} missing after commit")))?;
        tracing::info!(
            rental = %rid,
            status = %created.status,
            items = created.items.len(),
            "Rental created"
        );
        Ok(created)
    }

    /// Move a rental along its lifecycle
    ///
    /// RESERVED -> OPEN | CANCELLED, OPEN -> RETURNED | LATE, LATE -> RETURNED.
    pub async fn transition(&self, id: &str, next: RentalStatus) -> RepoResult<Rental> {
        let (rid, mut rental) = self.load(id).await?;
        rental.ensure_writable()?;
        if !rental.status.can_transition_to(next) {
            return Err(RepoError::Validation(format!(
                "Rental cannot move from {} to {next}",
                rental.status
            )));
        }

        let previous = rental.status;
        let now = now_millis();
        rental.status = next;
        match next {
            RentalStatus::Open => rental.rented_at = now,
            RentalStatus::Returned => rental.returned_at = Some(now),
            _ => {}
        }

        let item_status = match next {
            RentalStatus::Open => Some(InventoryStatus::Rented),
            RentalStatus::Returned | RentalStatus::Cancelled => Some(InventoryStatus::Available),
            _ => None,
        };
        let location = match item_status {
            Some(status) => self.location_with_items(&rental, status).await?,
            None => None,
        };
        let customer = self.customer_with_entry(&rental).await?;

        let mut query = self
            .base
            .db()
            .query("BEGIN TRANSACTION")
            .query("UPDATE $rental_id CONTENT $rental")
            .bind(("rental_id", rid.clone()))
            .bind(("rental", rental));
        if let Some((location_rid, location)) = location {
            query = query
                .query("UPDATE $location_id CONTENT $location")
                .bind(("location_id", location_rid))
                .bind(("location", location));
        }
        if let Some((customer_rid, customer)) = customer {
            query = query
                .query("UPDATE $customer_id CONTENT $customer")
                .bind(("customer_id", customer_rid))
                .bind(("customer", customer));
        }
        transaction_result(query.query("COMMIT TRANSACTION").await?)?;

        let (_, updated) = self.load(id).await?;
        tracing::info!(rental = %id, from = %previous, to = %next, "Rental status changed");
        Ok(updated)
    }

    pub async fn add_payment(&self, id: &str, data: PaymentCreate) -> RepoResult<Payment> {
        data.validate()?;
        let (rid, mut rental) = self.load(id).await?;
        rental.ensure_writable()?;

        let payment = Payment {
            id: embedded_id(|id| rental.payments.iter().any(|p| p.id == id)),
            amount_dkk: data.amount_dkk,
            created_at: now_millis(),
            method: data.method,
        };
        rental.payments.push(payment.clone());
        self.base.replace(rid, rental).await?;
        tracing::info!(rental = %id, amount = %payment.amount_dkk, "Payment recorded");
        Ok(payment)
    }

    /// Charge a fee, capturing the fee type's rule
    ///
    /// Without an explicit amount the rule is assessed: overdue days count
    /// from `due_at` to now, the percentage base is the total paid so far.
    pub async fn apply_fee(&self, id: &str, data: FeeCreate) -> RepoResult<Fee> {
        let (rid, mut rental) = self.load(id).await?;
        rental.ensure_writable()?;

        let fee_type = FeeTypeRepository::new(self.base.db().clone())
            .find_by_code(data.code)
            .await?
            .ok_or_else(|| RepoError::Reference(format!("Fee type {} not found", data.code)))?;
        if !fee_type.is_active {
            return Err(RepoError::Validation(format!(
                "Fee type {} is not active",
                data.code
            )));
        }

        let now = now_millis();
        let rule = fee_type.rule();
        let amount_dkk = match data.amount_dkk {
            Some(amount) => {
                validate_non_negative(amount, "fee amount_dkk")?;
                amount
            }
            None => rule.assess(&FeeBasis {
                days_overdue: rental
                    .due_at
                    .map(|due| days_between_ceil(due, now))
                    .unwrap_or(0),
                base_amount_dkk: rental.total_paid(),
            })?,
        };

        let fee = Fee {
            id: embedded_id(|id| rental.fees.iter().any(|f| f.id == id)),
            fee_type: fee_type.code,
            amount_dkk,
            created_at: now,
            rule,
        };
        rental.fees.push(fee.clone());
        self.base.replace(rid, rental).await?;
        tracing::info!(rental = %id, fee = %fee.fee_type, amount = %fee.amount_dkk, "Fee applied");
        Ok(fee)
    }

    /// Apply a promo code valid right now, capturing its terms
    pub async fn apply_promo(&self, id: &str, code: &str) -> RepoResult<Rental> {
        let (rid, mut rental) = self.load(id).await?;
        rental.ensure_writable()?;
        if let Some(existing) = &rental.promo {
            return Err(RepoError::Validation(format!(
                "Rental already has promo {}",
                existing.code
            )));
        }

        let promo = PromoCodeRepository::new(self.base.db().clone())
            .find_by_code(code)
            .await?
            .ok_or_else(|| RepoError::Reference(format!("Promo code {code} not found")))?;
        let now = now_millis();
        if !promo.is_valid_at(now) {
            return Err(RepoError::Validation(format!(
                "Promo code {code} is not valid now"
            )));
        }

        rental.promo = Some(AppliedPromo::from_promo(&promo, now));
        let updated = self.base.replace(rid, rental).await?;
        tracing::info!(rental = %id, promo = %code, "Promo applied");
        Ok(updated)
    }

    async fn load(&self, id: &str) -> RepoResult<(RecordId, Rental)> {
        let rid = record_id(RENTAL, id)?;
        let rental: Rental = self
            .base
            .select(rid.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Rental {id} not found")))?;
        Ok((rid, rental))
    }

    /// The rental's location with its items moved to `status`, or None when
    /// the location no longer exists
    async fn location_with_items(
        &self,
        rental: &Rental,
        status: InventoryStatus,
    ) -> RepoResult<Option<(RecordId, Location)>> {
        match self.locations.load(&rental.location.to_string()).await {
            Ok((rid, mut location)) => {
                let item_ids: Vec<i64> = rental.inventory_item_ids().collect();
                location.set_items_status(&item_ids, status)?;
                Ok(Some((rid, location)))
            }
            Err(RepoError::NotFound(_)) => {
                tracing::warn!(location = %rental.location, "Rental location no longer exists");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// The rental's customer with the rental mirrored into recent rentals, or
    /// None when the customer no longer exists
    async fn customer_with_entry(&self, rental: &Rental) -> RepoResult<Option<(RecordId, Customer)>> {
        match self.customers.load(&rental.customer.to_string()).await {
            Ok((rid, mut customer)) => {
                record_recent(&rid, &mut customer, rental);
                Ok(Some((rid, customer)))
            }
            Err(RepoError::NotFound(_)) => {
                tracing::warn!(customer = %rental.customer, "Rental customer no longer exists");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Mirror a rental into the customer's recent rentals
fn record_recent(customer_rid: &RecordId, customer: &mut Customer, rental: &Rental) {
    let Some(entry) = rental.recent_entry() else {
        return;
    };
    for old in customer.recent_rentals.record(entry) {
        tracing::debug!(customer = %customer_rid, rental = %old.rental, "Evicted from recent rentals");
    }
}

/// A missing customer or location on create is a dangling reference
fn as_reference(err: RepoError) -> RepoError {
    match err {
        RepoError::NotFound(msg) => RepoError::Reference(msg),
        other => other,
    }
}
