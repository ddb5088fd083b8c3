//! Database Module
//!
//! Embedded SurrealDB (RocksDB) connection, legacy migration and schema

pub mod migration;
pub mod models;
pub mod repository;
pub mod schema;

use std::path::Path;

use serde::Deserialize;
use shared::error::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::core::Config;
use crate::db::migration::MigrationReport;
use crate::db::repository::{
    CustomerRepository, FeeTypeRepository, LocationRepository, MembershipTypeRepository,
    MovieRepository, PromoCodeRepository, RentalRepository, RepoResult,
};

#[derive(Debug, Deserialize)]
struct CountRow {
    count: i64,
}

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the database configured in `config` and prepare it for use
    pub async fn open(config: &Config) -> Result<Self, AppError> {
        let path = config.database_path();
        std::fs::create_dir_all(&path).map_err(|e| {
            AppError::database(format!(
                "Failed to create database directory {}: {e}",
                path.display()
            ))
        })?;
        let service = Self::connect(&path, &config.db_namespace, &config.db_database)
            .await
            .map_err(AppError::from)?;
        service.prepare().await.map_err(AppError::from)?;
        Ok(service)
    }

    /// Connect without touching schema or data
    pub async fn connect(path: &Path, namespace: &str, database: &str) -> RepoResult<Self> {
        let db = Surreal::new::<RocksDb>(path).await?;
        db.use_ns(namespace).use_db(database).await?;
        tracing::info!(
            path = %path.display(),
            namespace = %namespace,
            database = %database,
            "Database connection established (SurrealDB RocksDB)"
        );
        Ok(Self { db })
    }

    /// Migrate legacy documents, then (re)apply the schema
    pub async fn prepare(&self) -> RepoResult<MigrationReport> {
        let report = migration::migrate_legacy_shapes(&self.db).await?;
        schema::apply_schema(&self.db).await?;
        Ok(report)
    }

    /// Record count per table, in schema order
    pub async fn table_counts(&self) -> RepoResult<Vec<(&'static str, i64)>> {
        let mut counts = Vec::with_capacity(schema::TABLES.len());
        for table in schema::TABLES {
            let row: Option<CountRow> = self
                .db
                .query("SELECT count() FROM type::table($table) GROUP ALL")
                .bind(("table", table))
                .await?
                .take(0)?;
            counts.push((table, row.map(|r| r.count).unwrap_or(0)));
        }
        Ok(counts)
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.db.clone())
    }

    pub fn membership_types(&self) -> MembershipTypeRepository {
        MembershipTypeRepository::new(self.db.clone())
    }

    pub fn fee_types(&self) -> FeeTypeRepository {
        FeeTypeRepository::new(self.db.clone())
    }

    pub fn promo_codes(&self) -> PromoCodeRepository {
        PromoCodeRepository::new(self.db.clone())
    }

    pub fn movies(&self) -> MovieRepository {
        MovieRepository::new(self.db.clone())
    }

    pub fn locations(&self) -> LocationRepository {
        LocationRepository::new(self.db.clone())
    }

    pub fn rentals(&self) -> RentalRepository {
        RentalRepository::new(self.db.clone())
    }
}
