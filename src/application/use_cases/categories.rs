use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{category::Category, lead::Lead},
    guard::{Caller, require_organizer},
    scope::org_scope,
    use_cases::leads::LeadRepo,
};

#[async_trait]
pub trait CategoryRepo: Send + Sync {
    async fn create(&self, organization_id: Uuid, name: &str) -> AppResult<Category>;
    async fn list(&self, organization_id: Uuid) -> AppResult<Vec<Category>>;
    async fn get(&self, organization_id: Uuid, category_id: Uuid) -> AppResult<Option<Category>>;
    async fn update(
        &self,
        organization_id: Uuid,
        category_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Category>>;
    /// Delete the category and null out every lead that referenced it,
    /// atomically. Leads survive their category.
    async fn delete(&self, organization_id: Uuid, category_id: Uuid) -> AppResult<bool>;
}

#[derive(Debug)]
pub struct CategoryListing {
    pub categories: Vec<Category>,
    /// Leads in the caller's tenant with no category at all.
    pub uncategorized_count: i64,
}

#[derive(Debug)]
pub struct CategoryDetail {
    pub category: Category,
    pub leads: Vec<Lead>,
}

#[derive(Clone)]
pub struct CategoryUseCases {
    category_repo: Arc<dyn CategoryRepo>,
    lead_repo: Arc<dyn LeadRepo>,
}

impl CategoryUseCases {
    pub fn new(category_repo: Arc<dyn CategoryRepo>, lead_repo: Arc<dyn LeadRepo>) -> Self {
        Self {
            category_repo,
            lead_repo,
        }
    }

    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn list_categories(&self, caller: &Caller) -> AppResult<CategoryListing> {
        let organization_id = org_scope(caller);
        let categories = self.category_repo.list(organization_id).await?;
        let uncategorized_count = self.lead_repo.count_uncategorized(organization_id).await?;
        Ok(CategoryListing {
            categories,
            uncategorized_count,
        })
    }

    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn get_category(&self, caller: &Caller, category_id: Uuid) -> AppResult<CategoryDetail> {
        let organization_id = org_scope(caller);
        let category = self
            .category_repo
            .get(organization_id, category_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let leads = self
            .lead_repo
            .list_by_category(organization_id, category_id)
            .await?;
        Ok(CategoryDetail { category, leads })
    }

    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn create_category(&self, caller: &Caller, name: &str) -> AppResult<Category> {
        require_organizer(caller)?;
        validate_category_name(name)?;
        self.category_repo
            .create(org_scope(caller), name.trim())
            .await
    }

    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn update_category(
        &self,
        caller: &Caller,
        category_id: Uuid,
        name: &str,
    ) -> AppResult<Category> {
        require_organizer(caller)?;
        validate_category_name(name)?;
        self.category_repo
            .update(org_scope(caller), category_id, name.trim())
            .await?
            .ok_or(AppError::NotFound)
    }

    #[instrument(skip(self, caller), fields(organization_id = %caller.organization_id))]
    pub async fn delete_category(&self, caller: &Caller, category_id: Uuid) -> AppResult<()> {
        require_organizer(caller)?;
        if !self
            .category_repo
            .delete(org_scope(caller), category_id)
            .await?
        {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

fn validate_category_name(name: &str) -> AppResult<()> {
    let name = name.trim();
    if name.is_empty() || name.len() > 30 {
        return Err(AppError::InvalidInput(
            "Category name must be 1-30 characters".into(),
        ));
    }
    Ok(())
}
