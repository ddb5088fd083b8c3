//! Fee Type Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{FeeType, FeeTypeCreate, FeeTypeUpdate};
use crate::db::schema::FEE_TYPE;
use shared::models::FeeCode;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct FeeTypeRepository {
    base: BaseRepository,
}

impl FeeTypeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<FeeType>> {
        self.base.select_all(FEE_TYPE, "code").await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<FeeType>> {
        self.base.select(record_id(FEE_TYPE, id)?).await
    }

    pub async fn find_by_code(&self, code: FeeCode) -> RepoResult<Option<FeeType>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM fee_type WHERE code = $code")
            .bind(("code", code))
            .await?;
        let types: Vec<FeeType> = result.take(0)?;
        Ok(types.into_iter().next())
    }

    pub async fn create(&self, data: FeeTypeCreate) -> RepoResult<FeeType> {
        data.validate()?;

        if self.find_by_code(data.code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Fee type '{}' already exists",
                data.code
            )));
        }

        let doc = FeeType {
            id: None,
            code: data.code,
            description: data.description,
            calculation: data.calculation,
            default_amount_dkk: data.default_amount_dkk,
            is_taxable: data.is_taxable,
            is_active: true,
        };
        self.base.create(FEE_TYPE, doc).await
    }

    /// Update the lookup; fees already charged keep their captured rule
    pub async fn update(&self, id: &str, data: FeeTypeUpdate) -> RepoResult<FeeType> {
        data.validate()?;
        let rid = record_id(FEE_TYPE, id)?;
        let mut existing: FeeType = self
            .base
            .select(rid.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Fee type {id} not found")))?;
        data.apply_to(&mut existing);
        self.base.replace(rid, existing).await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = record_id(FEE_TYPE, id)?;
        self.base.delete::<FeeType>(rid).await
    }
}
