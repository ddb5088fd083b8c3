//! Repository Module
//!
//! Provides CRUD and business operations over the SurrealDB tables.
//! Each aggregate (customer, movie, location, rental, and the three lookup
//! tables) is written as a whole document; embedded lists are changed by
//! read-modify-write of their parent.

// Lookup tables
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
pub use customer::CustomerRepository;
pub use fee_type::FeeTypeRepository;
pub use location::LocationRepository;
pub use membership_type::MembershipTypeRepository;
pub use movie::MovieRepository;
pub use promo_code::PromoCodeRepository;
pub use rental::RentalRepository;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};
use shared::util::snowflake_id;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Response, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Missing reference: {0}")]
    Reference(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl RepoError {
    /// Unified error code for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            RepoError::NotFound(_) => ErrorCode::NotFound,
            RepoError::Duplicate(_) => ErrorCode::AlreadyExists,
            RepoError::Reference(_) => ErrorCode::ReferenceNotFound,
            RepoError::Database(_) => ErrorCode::DatabaseError,
            RepoError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }
}

/// Classifies storage failures: unique index violations are conflicts,
/// field type/ASSERT failures and guards that THROW are validation errors.
impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            RepoError::Duplicate(message)
        } else if message.contains("must conform to")
            || message.contains("but expected")
            || message.contains("coerce")
            || message.starts_with("An error occurred:")
        {
            RepoError::Validation(message)
        } else {
            RepoError::Database(message)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        let code = err.code();
        let message = match err {
            RepoError::NotFound(m)
            | RepoError::Duplicate(m)
            | RepoError::Reference(m)
            | RepoError::Database(m)
            | RepoError::Validation(m) => m,
        };
        AppError::with_message(code, message)
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:key"
// =============================================================================
//
// Public methods take record ids as strings, either "customer:abc" or the
// bare key "abc". `record_id` resolves both into a `RecordId` of the
// expected table and rejects ids that point at another table.

/// Resolve a string id into a record id of `table`
pub fn record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let id = id.trim();
    if id.is_empty() {
        return Err(RepoError::Validation(format!("Empty {table} ID")));
    }
    if id.contains(':') {
        let parsed: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {id}")))?;
        if parsed.table() != table {
            return Err(RepoError::Validation(format!(
                "ID {id} does not belong to table {table}"
            )));
        }
        return Ok(parsed);
    }
    Ok(RecordId::from_table_key(table, id))
}

/// Outcome of a `BEGIN TRANSACTION ... COMMIT TRANSACTION` query
///
/// When one statement fails every other statement reports that it was not
/// executed; the failing statement's own error is the one returned.
pub(crate) fn transaction_result(mut response: Response) -> RepoResult<()> {
    let (cascaded, causes): (Vec<_>, Vec<_>) = response
        .take_errors()
        .into_iter()
        .map(|(_, err)| err)
        .partition(|err| err.to_string().contains(CANCELLED_BY_FAILURE));
    match causes.into_iter().next().or_else(|| cascaded.into_iter().next()) {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

const CANCELLED_BY_FAILURE: &str = "not executed due to a failed transaction";

/// Fresh snowflake id for an embedded sub-document, distinct from the ids
/// already used inside the parent
pub(crate) fn embedded_id(taken: impl Fn(i64) -> bool) -> i64 {
    loop {
        let id = snowflake_id();
        if !taken(id) {
            return id;
        }
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Select one record
    pub async fn select<T>(&self, id: RecordId) -> RepoResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let record: Option<T> = self.db.select(id).await?;
        Ok(record)
    }

    /// Select all records of a table, ordered by a field
    pub async fn select_all<T>(&self, table: &'static str, order_by: &'static str) -> RepoResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let records: Vec<T> = self
            .db
            .query(format!("SELECT * FROM {table} ORDER BY {order_by}"))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Create a record with a generated key
    pub async fn create<T>(&self, table: &'static str, doc: T) -> RepoResult<T>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let created: Option<T> = self.db.create(table).content(doc).await?;
        created.ok_or_else(|| RepoError::Database(format!("Failed to create {table} record")))
    }

    /// Replace a whole record
    pub async fn replace<T>(&self, id: RecordId, doc: T) -> RepoResult<T>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let label = id.to_string();
        let updated: Option<T> = self.db.update(id).content(doc).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("{label} not found")))
    }

    /// Hard delete a record; false when it did not exist
    pub async fn delete<T>(&self, id: RecordId) -> RepoResult<bool>
    where
        T: DeserializeOwned,
    {
        let deleted: Option<T> = self.db.delete(id).await?;
        Ok(deleted.is_some())
    }
}
