//! Membership Type Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{MembershipType, MembershipTypeCreate, MembershipTypeUpdate};
use crate::db::schema::MEMBERSHIP_TYPE;
use shared::models::MembershipCode;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct MembershipTypeRepository {
    base: BaseRepository,
}

impl MembershipTypeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<MembershipType>> {
        self.base.select_all(MEMBERSHIP_TYPE, "code").await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MembershipType>> {
        self.base.select(record_id(MEMBERSHIP_TYPE, id)?).await
    }

    pub async fn find_by_code(&self, code: MembershipCode) -> RepoResult<Option<MembershipType>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM membership_type WHERE code = $code")
            .bind(("code", code))
            .await?;
        let types: Vec<MembershipType> = result.take(0)?;
        Ok(types.into_iter().next())
    }

    pub async fn create(&self, data: MembershipTypeCreate) -> RepoResult<MembershipType> {
        data.validate()?;

        if self.find_by_code(data.code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Membership type '{}' already exists",
                data.code
            )));
        }

        let doc = MembershipType {
            id: None,
            code: data.code,
            description: data.description,
            monthly_cost_dkk: data.monthly_cost_dkk,
            benefits: data.benefits,
            is_active: true,
        };
        self.base.create(MEMBERSHIP_TYPE, doc).await
    }

    /// Update the lookup; customers keep the terms they were sold under
    pub async fn update(&self, id: &str, data: MembershipTypeUpdate) -> RepoResult<MembershipType> {
        data.validate()?;
        let rid = record_id(MEMBERSHIP_TYPE, id)?;
        let mut existing: MembershipType = self
            .base
            .select(rid.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Membership type {id} not found")))?;
        data.apply_to(&mut existing);
        self.base.replace(rid, existing).await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = record_id(MEMBERSHIP_TYPE, id)?;
        self.base.delete::<MembershipType>(rid).await
    }
}
