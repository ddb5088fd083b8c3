//! Customer Repository

use super::{BaseRepository, MembershipTypeRepository, RepoError, RepoResult, record_id};
use crate::db::models::{
    Address, AppliedMembership, Customer, CustomerCreate, CustomerUpdate, Membership,
    RecentRental,
};
use crate::db::schema::CUSTOMER;
use shared::models::MembershipCode;
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all customers, by name
    pub async fn find_all(&self) -> RepoResult<Vec<Customer>> {
        self.base.select_all(CUSTOMER, "last_name, first_name").await
    }

    /// Find customer by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Customer>> {
        self.base.select(record_id(CUSTOMER, id)?).await
    }

    /// Find customer by email, ignoring case
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        let email_key = Customer::email_key(email);
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE email_key = $email_key")
            .bind(("email_key", email_key))
            .await?;
        let customers: Vec<Customer> = result.take(0)?;
        Ok(customers.into_iter().next())
    }

    /// Create a new customer
    pub async fn create(&self, data: CustomerCreate) -> RepoResult<Customer> {
        let customer = data.into_customer(now_millis());
        customer.validate()?;

        // Check duplicate email
        self.ensure_email_free(&customer.email, None).await?;

        let created = self.base.create(CUSTOMER, customer).await?;
        tracing::info!(customer = ?created.id, "Customer created");
        Ok(created)
    }

    /// Update a customer's contact details
    pub async fn update(&self, id: &str, data: CustomerUpdate) -> RepoResult<Customer> {
        let (rid, mut customer) = self.load(id).await?;
        let email_changed = data.email.is_some();
        data.apply_to(&mut customer);
        customer.validate()?;

        if email_changed {
            self.ensure_email_free(&customer.email, Some(&rid)).await?;
        }

        self.base.replace(rid, customer).await
    }

    /// Hard delete a customer
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = record_id(CUSTOMER, id)?;
        let deleted = self.base.delete::<Customer>(rid).await?;
        if deleted {
            tracing::info!(customer = %id, "Customer deleted");
        }
        Ok(deleted)
    }

    /// Set or clear the postal address
    pub async fn set_address(&self, id: &str, address: Option<Address>) -> RepoResult<Customer> {
        let (rid, mut customer) = self.load(id).await?;
        if let Some(address) = &address {
            address.validate()?;
        }
        customer.address = address;
        self.base.replace(rid, customer).await
    }

    /// Attach a membership, capturing the current terms of its type
    pub async fn attach_membership(
        &self,
        id: &str,
        code: MembershipCode,
        ends_at: Option<i64>,
    ) -> RepoResult<Customer> {
        let (rid, mut customer) = self.load(id).await?;

        let membership_type = MembershipTypeRepository::new(self.base.db().clone())
            .find_by_code(code)
            .await?
            .ok_or_else(|| RepoError::Reference(format!("Membership type {code} not found")))?;
        if !membership_type.is_active {
            return Err(RepoError::Validation(format!(
                "Membership type {code} is not active"
            )));
        }

        let now = now_millis();
        customer.membership = Some(Membership {
            code,
            starts_at: now,
            ends_at,
            terms: AppliedMembership::from_type(&membership_type, now),
        });
        customer.validate()?;

        let updated = self.base.replace(rid, customer).await?;
        tracing::info!(customer = %id, membership = %code, "Membership attached");
        Ok(updated)
    }

    /// Remove the membership
    pub async fn clear_membership(&self, id: &str) -> RepoResult<Customer> {
        let (rid, mut customer) = self.load(id).await?;
        customer.membership = None;
        self.base.replace(rid, customer).await
    }

    /// Mirror a rental into the recent rentals cache
    ///
    /// Refreshes the entry for the same rental, otherwise appends and evicts
    /// the oldest beyond capacity.
    pub async fn record_recent_rental(&self, id: &str, entry: RecentRental) -> RepoResult<Customer> {
        let (rid, customer) = self.load(id).await?;
        self.store_recent_rental(rid, customer, entry).await
    }

    async fn store_recent_rental(
        &self,
        rid: RecordId,
        mut customer: Customer,
        entry: RecentRental,
    ) -> RepoResult<Customer> {
        let evicted = customer.recent_rentals.record(entry);
        for old in &evicted {
            tracing::debug!(customer = %rid, rental = %old.rental, "Evicted from recent rentals");
        }
        self.base.replace(rid, customer).await
    }

    pub(crate) async fn load(&self, id: &str) -> RepoResult<(RecordId, Customer)> {
        let rid = record_id(CUSTOMER, id)?;
        let customer: Customer = self
            .base
            .select(rid.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))?;
        Ok((rid, customer))
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<&RecordId>) -> RepoResult<()> {
        if let Some(existing) = self.find_by_email(email).await?
            && existing.id.as_ref() != owner
        {
            return Err(RepoError::Duplicate(format!(
                "Customer with email '{email}' already exists"
            )));
        }
        Ok(())
    }
}
