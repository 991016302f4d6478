use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::access::Visibility;
use crate::domain::{Category, NewCategory, Post, PostDraft, PostPatch, User};
use crate::error::RepoError;

/// Generic repository trait defining the lookups every entity supports.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Returns `false` if nothing was deleted.
    async fn delete(&self, id: ID) -> Result<bool, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn insert(&self, user: User) -> Result<User, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Filter, order and page of a post listing.
///
/// Results are always ordered pinned first, then newest, then by id descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    pub visibility: Visibility,
    pub category_id: Option<i64>,
    pub limit: u64,
    pub offset: u64,
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Store a draft; the repository assigns the id and timestamps.
    async fn insert(&self, draft: PostDraft, now: DateTime<Utc>) -> Result<Post, RepoError>;

    async fn list(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;

    /// Apply a patch. Fails with `RepoError::NotFound` if the post is gone.
    async fn update(&self, id: i64, patch: PostPatch, now: DateTime<Utc>) -> Result<Post, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, i64> {
    async fn insert(&self, category: NewCategory, now: DateTime<Utc>) -> Result<Category, RepoError>;

    /// All categories ordered by name.
    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
}
