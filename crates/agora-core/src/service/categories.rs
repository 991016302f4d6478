use std::sync::Arc;

use chrono::Utc;

use crate::access::{Requester, ensure};
use crate::domain::{Category, NewCategory};
use crate::error::DomainError;
use crate::ports::CategoryRepository;

const MAX_NAME_LEN: usize = 100;

/// Category listing and creation.
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    pub async fn list(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.list_all().await?)
    }

    /// Only privileged users and administrators may add categories.
    pub async fn create(
        &self,
        requester: &Requester,
        name: &str,
        description: Option<String>,
    ) -> Result<Category, DomainError> {
        ensure(requester.role.is_privileged())?;

        let category = NewCategory::new(name, description);
        if category.name.is_empty() || category.name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::Validation(format!(
                "category name must be 1 to {MAX_NAME_LEN} characters"
            )));
        }
        if category.slug.is_empty() {
            return Err(DomainError::Validation(
                "category name must contain letters or digits".to_string(),
            ));
        }
        if self.categories.find_by_slug(&category.slug).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "category '{}' already exists",
                category.slug
            )));
        }

        let created = self.categories.insert(category, Utc::now()).await?;
        tracing::info!(category_id = created.id, slug = %created.slug, "Category created");
        Ok(created)
    }
}
