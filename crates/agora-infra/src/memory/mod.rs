//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Data is lost on process restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use agora_core::domain::{Category, NewCategory, Post, PostDraft, PostPatch, User, listing_order};
use agora_core::error::RepoError;
use agora_core::ports::{BaseRepository, CategoryRepository, PostQuery, PostRepository, UserRepository};


/// Rows plus the next identifier, guarded together so ids are never reused.
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// In-memory user store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.id == user.id || u.username == user.username)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

/// In-memory post store with monotonically increasing ids.
#[derive(Default)]
pub struct InMemoryPostRepository {
    table: RwLock<Table<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, draft: PostDraft, now: DateTime<Utc>) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        let id = table.allocate_id();
        let post = Post {
            id,
            title: draft.title,
            slug: draft.slug,
            content: draft.content,
            author_id: draft.author_id,
            category_id: draft.category_id,
            attachment: draft.attachment,
            is_published: draft.is_published,
            is_pinned: draft.is_pinned,
            created_at: now,
            updated_at: now,
            published_at: draft.published_at,
        };
        table.rows.insert(id, post.clone());
        Ok(post)
    }

    async fn list(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let table = self.table.read().await;
        let mut posts: Vec<Post> = table
            .rows
            .values()
            .filter(|p| query.visibility.admits(p))
            .filter(|p| query.category_id.is_none() || p.category_id == query.category_id)
            .cloned()
            .collect();
        posts.sort_by(listing_order);

        Ok(posts
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn update(&self, id: i64, patch: PostPatch, now: DateTime<Utc>) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        let post = table.rows.get_mut(&id).ok_or(RepoError::NotFound)?;

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(category_id) = patch.category_id {
            post.category_id = category_id;
        }
        if let Some(is_published) = patch.is_published {
            post.is_published = is_published;
        }
        if let Some(is_pinned) = patch.is_pinned {
            post.is_pinned = is_pinned;
        }
        if let Some(published_at) = patch.published_at {
            post.published_at = Some(published_at);
        }
        post.updated_at = now;

        Ok(post.clone())
    }
}

/// In-memory category store.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    table: RwLock<Table<Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Category, i64> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn insert(&self, category: NewCategory, now: DateTime<Utc>) -> Result<Category, RepoError> {
        let mut table = self.table.write().await;
        if table
            .rows
            .values()
            .any(|c| c.name == category.name || c.slug == category.slug)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        let id = table.allocate_id();
        let category = Category {
            id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, category.clone());
        Ok(category)
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let table = self.table.read().await;
        let mut categories: Vec<Category> = table.rows.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|c| c.slug == slug).cloned())
    }
}
