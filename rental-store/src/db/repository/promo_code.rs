//! Promo Code Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{PromoCode, PromoCodeCreate, PromoCodeUpdate};
use crate::db::schema::PROMO_CODE;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct PromoCodeRepository {
    base: BaseRepository,
}

impl PromoCodeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<PromoCode>> {
        self.base.select_all(PROMO_CODE, "code").await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<PromoCode>> {
        self.base.select(record_id(PROMO_CODE, id)?).await
    }

    /// Find promo by its exact code
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<PromoCode>> {
        let code_owned = code.trim().to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM promo_code WHERE code = $code")
            .bind(("code", code_owned))
            .await?;
        let promos: Vec<PromoCode> = result.take(0)?;
        Ok(promos.into_iter().next())
    }

    pub async fn create(&self, data: PromoCodeCreate) -> RepoResult<PromoCode> {
        data.validate()?;

        if self.find_by_code(&data.code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Promo code '{}' already exists",
                data.code
            )));
        }

        let doc = PromoCode {
            id: None,
            code: data.code.trim().to_string(),
            description: data.description,
            percent_off: data.percent_off,
            amount_off_dkk: data.amount_off_dkk,
            starts_at: data.starts_at,
            ends_at: data.ends_at,
            is_active: data.is_active.unwrap_or(true),
        };
        let created = self.base.create(PROMO_CODE, doc).await?;
        tracing::info!(code = %created.code, "Promo code created");
        Ok(created)
    }

    /// Update the promo; rentals keep the snapshot taken when it was applied
    pub async fn update(&self, id: &str, data: PromoCodeUpdate) -> RepoResult<PromoCode> {
        data.validate()?;
        let rid = record_id(PROMO_CODE, id)?;
        let mut existing: PromoCode = self
            .base
            .select(rid.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Promo code {id} not found")))?;
        data.apply_to(&mut existing);
        existing.validate()?;
        self.base.replace(rid, existing).await
    }

    /// Switch the promo off without deleting it
    pub async fn deactivate(&self, id: &str) -> RepoResult<PromoCode> {
        let updated = self
            .update(
                id,
                PromoCodeUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(code = %updated.code, "Promo code deactivated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = record_id(PROMO_CODE, id)?;
        self.base.delete::<PromoCode>(rid).await
    }
}
