use super::error::BootCastError;
use super::model::{BootCast, NewBootCast};
use super::{ExplorePage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::infrastructure::repositories::BootCastRepository;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub struct BootCastService {
    bootcast_repo: Arc<dyn BootCastRepository>,
}

impl BootCastService {
    pub fn new(bootcast_repo: Arc<dyn BootCastRepository>) -> Self {
        Self { bootcast_repo }
    }
}

#[async_trait]
pub trait BootCastServiceApi: Send + Sync {
    async fn create(&self, new_cast: NewBootCast) -> Result<BootCast, BootCastError>;

    /// Casts of one owner, newest first, soft-deleted ones hidden
    async fn list_for_owner(&self, uid: &str) -> Result<Vec<BootCast>, BootCastError>;

    /// Published casts for the explore page
    async fn list_published(
        &self,
        page: Option<i64>,
        per_page: Option<i64>,
    ) -> Result<ExplorePage, BootCastError>;

    async fn set_published(
        &self,
        uid: &str,
        id: Uuid,
        published: bool,
    ) -> Result<BootCast, BootCastError>;

    async fn soft_delete(&self, uid: &str, id: Uuid) -> Result<(), BootCastError>;
}

#[async_trait]
impl BootCastServiceApi for BootCastService {
    async fn create(&self, new_cast: NewBootCast) -> Result<BootCast, BootCastError> {
        let cast = self
            .bootcast_repo
            .insert(new_cast)
            .await
            .map_err(|e| BootCastError::Dependency(e.to_string()))?;

        tracing::info!(
            bootcast_id = %cast.id,
            uid = %cast.uid,
            link = %cast.link,
            "BootCast created"
        );

        Ok(cast)
    }

    async fn list_for_owner(&self, uid: &str) -> Result<Vec<BootCast>, BootCastError> {
        let uid = uid.trim();
        if uid.is_empty() {
            return Err(BootCastError::Invalid("uid is required".to_string()));
        }

        self.bootcast_repo
            .find_by_owner(uid)
            .await
            .map_err(|e| BootCastError::Dependency(e.to_string()))
    }

    async fn list_published(
        &self,
        page: Option<i64>,
        per_page: Option<i64>,
    ) -> Result<ExplorePage, BootCastError> {
        let (page, per_page) = clamp_paging(page, per_page);
        let offset = page_offset(page, per_page);

        let items = self
            .bootcast_repo
            .find_published(per_page, offset)
            .await
            .map_err(|e| BootCastError::Dependency(e.to_string()))?;
        let total = self
            .bootcast_repo
            .count_published()
            .await
            .map_err(|e| BootCastError::Dependency(e.to_string()))?;

        Ok(ExplorePage {
            items,
            page,
            per_page,
            total,
        })
    }

    async fn set_published(
        &self,
        uid: &str,
        id: Uuid,
        published: bool,
    ) -> Result<BootCast, BootCastError> {
        let cast = self
            .bootcast_repo
            .set_published(id, uid, published)
            .await
            .map_err(|e| BootCastError::Dependency(e.to_string()))?
            .ok_or(BootCastError::NotFound)?;

        tracing::info!(bootcast_id = %id, published, "BootCast visibility changed");
        Ok(cast)
    }

    async fn soft_delete(&self, uid: &str, id: Uuid) -> Result<(), BootCastError> {
        let deleted = self
            .bootcast_repo
            .soft_delete(id, uid)
            .await
            .map_err(|e| BootCastError::Dependency(e.to_string()))?;

        if !deleted {
            return Err(BootCastError::NotFound);
        }

        tracing::info!(bootcast_id = %id, "BootCast deleted");
        Ok(())
    }
}

fn clamp_paging(page: Option<i64>, per_page: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, per_page)
}

/// Rows to skip for a clamped page; saturates for absurd page numbers
fn page_offset(page: i64, per_page: i64) -> i64 {
    (page - 1).saturating_mul(per_page)
}
