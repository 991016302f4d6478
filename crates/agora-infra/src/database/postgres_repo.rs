//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use agora_core::access::Visibility;
use agora_core::domain::{Category, NewCategory, Post, PostDraft, PostPatch, User};
use agora_core::error::RepoError;
use agora_core::ports::{CategoryRepository, PostQuery, PostRepository, UserRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let masked_local = match local.chars().next() {
            Some(first) if local.len() > 1 => format!("{first}***"),
            _ => "***".to_string(),
        };
        format!("{}{}", masked_local, domain)
    } else {
        "***".to_string()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let active: user::ActiveModel = user.into();
        let model = active.insert(&self.db).await.map_err(repo_err)?;

        Ok(model.into())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, draft: PostDraft, now: DateTime<Utc>) -> Result<Post, RepoError> {
        let active = post::ActiveModel {
            id: NotSet,
            title: Set(draft.title),
            slug: Set(draft.slug),
            content: Set(draft.content),
            author_id: Set(draft.author_id),
            category_id: Set(draft.category_id),
            attachment: Set(draft.attachment),
            is_published: Set(draft.is_published),
            is_pinned: Set(draft.is_pinned),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            published_at: Set(draft.published_at.map(Into::into)),
        };
        let model = active.insert(&self.db).await.map_err(repo_err)?;

        Ok(model.into())
    }

    async fn list(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(?query, "Listing posts");

        let mut select = PostEntity::find();
        if let Visibility::PublishedOrAuthoredBy(user_id) = query.visibility {
            select = select.filter(
                Condition::any()
                    .add(post::Column::IsPublished.eq(true))
                    .add(post::Column::AuthorId.eq(user_id)),
            );
        }
        if let Some(category_id) = query.category_id {
            select = select.filter(post::Column::CategoryId.eq(category_id));
        }

        let result = select
            .order_by_desc(post::Column::IsPinned)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(query.limit)
            .offset(query.offset)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, patch: PostPatch, now: DateTime<Utc>) -> Result<Post, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active = model.into_active_model();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        if let Some(category_id) = patch.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(is_published) = patch.is_published {
            active.is_published = Set(is_published);
        }
        if let Some(is_pinned) = patch.is_pinned {
            active.is_pinned = Set(is_pinned);
        }
        if let Some(published_at) = patch.published_at {
            active.published_at = Set(Some(published_at.into()));
        }
        active.updated_at = Set(now.into());

        let updated = active.update(&self.db).await.map_err(repo_err)?;

        Ok(updated.into())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn insert(&self, category: NewCategory, now: DateTime<Utc>) -> Result<Category, RepoError> {
        let active = category::ActiveModel {
            id: NotSet,
            name: Set(category.name),
            slug: Set(category.slug),
            description: Set(category.description),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let model = active.insert(&self.db).await.map_err(repo_err)?;

        Ok(model.into())
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
