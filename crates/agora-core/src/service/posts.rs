use std::sync::Arc;

use chrono::Utc;

use crate::access::{AccessPolicy, Requester, ensure};
use crate::domain::{Post, PostDraft, PostPatch};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, CategoryRepository, PostQuery, PostRepository};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Listing parameters supplied by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostFilter {
    pub category_id: Option<i64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct NewPostInput {
    pub title: String,
    pub content: String,
    pub category_id: Option<i64>,
    pub attachment: Option<String>,
    pub is_published: bool,
    pub is_pinned: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PostUpdateInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<Option<i64>>,
    pub is_published: Option<bool>,
    pub is_pinned: Option<bool>,
}

/// Post use cases. Every method expects an authenticated requester.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    policy: AccessPolicy,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        policy: AccessPolicy,
    ) -> Self {
        Self {
            posts,
            categories,
            policy,
        }
    }

    pub async fn list(&self, requester: &Requester, filter: PostFilter) -> Result<Vec<Post>, DomainError> {
        let query = PostQuery {
            visibility: self.policy.visibility(requester),
            category_id: filter.category_id,
            limit: filter.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            offset: filter.offset.unwrap_or(0),
        };
        Ok(self.posts.list(&query).await?)
    }

    /// Missing and hidden posts both come back as `NotFound`.
    pub async fn get(&self, requester: &Requester, id: i64) -> Result<Post, DomainError> {
        let visibility = self.policy.visibility(requester);
        self.posts
            .find_by_id(id)
            .await?
            .filter(|post| visibility.admits(post))
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    pub async fn create(&self, requester: &Requester, input: NewPostInput) -> Result<Post, DomainError> {
        if !self.policy.can_create(requester) {
            tracing::debug!(user_id = %requester.id, role = %requester.role, "Post creation denied");
            return Err(DomainError::Forbidden);
        }
        ensure(
            self.policy
                .can_create_with_flags(requester, input.is_published, input.is_pinned),
        )?;

        let now = Utc::now();
        let mut draft = PostDraft::new(requester.id, &input.title, &input.content)?;
        if let Some(category_id) = input.category_id {
            self.require_category(category_id).await?;
        }
        draft.category_id = input.category_id;
        draft.attachment = input.attachment.filter(|a| !a.trim().is_empty());
        draft.is_published = input.is_published;
        draft.is_pinned = input.is_pinned;
        draft.published_at = input.is_published.then_some(now);

        let post = self.posts.insert(draft, now).await?;
        tracing::info!(post_id = post.id, author_id = %post.author_id, "Post created");
        Ok(post)
    }

    pub async fn update(
        &self,
        requester: &Requester,
        id: i64,
        input: PostUpdateInput,
    ) -> Result<Post, DomainError> {
        let post = self.get(requester, id).await?;

        if !self.policy.can_edit(requester, &post) {
            tracing::debug!(post_id = id, user_id = %requester.id, "Edit denied");
            return Err(DomainError::Forbidden);
        }
        if let Some(requested) = input.is_published {
            ensure(self.policy.can_change_publish_state(requester, &post, requested))?;
        }
        if let Some(requested) = input.is_pinned {
            ensure(self.policy.can_change_pin_state(requester, &post, requested))?;
        }

        let now = Utc::now();
        let mut patch = PostPatch {
            title: input.title,
            content: input.content,
            category_id: input.category_id,
            // A flag equal to the stored value is not written back.
            is_published: input.is_published.filter(|v| *v != post.is_published),
            is_pinned: input.is_pinned.filter(|v| *v != post.is_pinned),
            published_at: input
                .is_published
                .and_then(|requested| post.publication_stamp(requested, now)),
        };
        patch.validate()?;
        if let Some(Some(category_id)) = patch.category_id {
            self.require_category(category_id).await?;
        }
        if patch.is_empty() {
            return Ok(post);
        }

        match self.posts.update(id, patch, now).await {
            Ok(updated) => Ok(updated),
            Err(RepoError::NotFound) => Err(DomainError::not_found("Post", id)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, requester: &Requester, id: i64) -> Result<(), DomainError> {
        let post = self.get(requester, id).await?;

        if !self.policy.can_delete(requester, &post) {
            tracing::debug!(post_id = id, user_id = %requester.id, "Delete denied");
            return Err(DomainError::Forbidden);
        }
        if !self.posts.delete(id).await? {
            return Err(DomainError::not_found("Post", id));
        }

        tracing::info!(post_id = id, deleted_by = %requester.id, "Post deleted");
        Ok(())
    }

    async fn require_category(&self, category_id: i64) -> Result<(), DomainError> {
        match self.categories.find_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::Validation(format!(
                "category {category_id} does not exist"
            ))),
        }
    }
}
