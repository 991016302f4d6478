use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slugify;
use crate::error::DomainError;

pub const MAX_TITLE_LEN: usize = 200;

/// Anything with a single owning user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// Anything the attachment locator can build a URL for.
pub trait Attachable {
    /// `None` until the record has been persisted.
    fn post_id(&self) -> Option<i64>;

    /// Stored attachment location, if a real file exists.
    fn attachment(&self) -> Option<&str>;
}

/// Post entity - a piece of content written by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub author_id: Uuid,
    pub category_id: Option<i64>,
    pub attachment: Option<String>,
    pub is_published: bool,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Timestamp to record if `requested` becomes the new publish state.
    ///
    /// Only the first false -> true transition stamps the post.
    pub fn publication_stamp(&self, requested: bool, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if requested && !self.is_published && self.published_at.is_none() {
            Some(now)
        } else {
            None
        }
    }
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Attachable for Post {
    fn post_id(&self) -> Option<i64> {
        Some(self.id)
    }

    fn attachment(&self) -> Option<&str> {
        self.attachment.as_deref()
    }
}

/// A post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub author_id: Uuid,
    pub category_id: Option<i64>,
    pub attachment: Option<String>,
    pub is_published: bool,
    pub is_pinned: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl PostDraft {
    /// Create an unpublished, unpinned draft. Fails on an empty or overlong title
    /// or an empty body.
    pub fn new(author_id: Uuid, title: &str, content: &str) -> Result<Self, DomainError> {
        let title = validate_title(title)?;
        let content = validate_content(content)?;
        Ok(Self {
            slug: slugify(&title),
            title,
            content,
            author_id,
            category_id: None,
            attachment: None,
            is_published: false,
            is_pinned: false,
            published_at: None,
        })
    }
}

impl Owned for PostDraft {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Attachable for PostDraft {
    fn post_id(&self) -> Option<i64> {
        None
    }

    fn attachment(&self) -> Option<&str> {
        self.attachment.as_deref()
    }
}

/// Partial update of a stored post. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    /// `Some(None)` clears the category.
    pub category_id: Option<Option<i64>>,
    pub is_published: Option<bool>,
    pub is_pinned: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
}

impl PostPatch {
    /// Normalise and validate the text fields in place.
    pub fn validate(&mut self) -> Result<(), DomainError> {
        if let Some(title) = self.title.take() {
            self.title = Some(validate_title(&title)?);
        }
        if let Some(content) = self.content.take() {
            self.content = Some(validate_content(&content)?);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn validate_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_content(content: &str) -> Result<String, DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::Validation("content is required".to_string()));
    }
    Ok(content.to_string())
}

/// Listing order: pinned first, then newest, then highest id.
pub fn listing_order(a: &Post, b: &Post) -> Ordering {
    b.is_pinned
        .cmp(&a.is_pinned)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn post(id: i64, pinned: bool, created_at: DateTime<Utc>) -> Post {
        Post {
            id,
            title: format!("Post {id}"),
            slug: format!("post-{id}"),
            content: "body".to_string(),
            author_id: Uuid::new_v4(),
            category_id: None,
            attachment: None,
            is_published: true,
            is_pinned: pinned,
            created_at,
            updated_at: created_at,
            published_at: None,
        }
    }

    #[test]
    fn test_listing_order_pins_then_newest() {
        let t1 = Utc::now();
        let t2 = t1 + TimeDelta::seconds(1);
        let t3 = t2 + TimeDelta::seconds(1);
        let mut posts = vec![post(1, false, t1), post(2, true, t2), post(3, false, t3)];

        posts.sort_by(listing_order);

        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_listing_order_breaks_timestamp_ties_by_id() {
        let t = Utc::now();
        let mut posts = vec![post(4, false, t), post(9, false, t), post(6, false, t)];

        posts.sort_by(listing_order);

        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![9, 6, 4]);
    }

    #[test]
    fn test_draft_validation() {
        let author = Uuid::new_v4();
        let draft = PostDraft::new(author, "  Exam Schedule ", "See attached").unwrap();
        assert_eq!(draft.title, "Exam Schedule");
        assert_eq!(draft.slug, "exam-schedule");
        assert!(!draft.is_published);
        assert_eq!(draft.owner_id(), author);

        assert!(matches!(
            PostDraft::new(author, "   ", "body"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            PostDraft::new(author, "title", "\n"),
            Err(DomainError::Validation(_))
        ));
        let long_title = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(PostDraft::new(author, &long_title, "body").is_err());
    }

    #[test]
    fn test_publication_stamp_only_on_first_publish() {
        let now = Utc::now();
        let mut p = post(1, false, now);
        p.is_published = false;

        assert_eq!(p.publication_stamp(true, now), Some(now));
        assert_eq!(p.publication_stamp(false, now), None);

        p.published_at = Some(now - TimeDelta::days(1));
        assert_eq!(p.publication_stamp(true, now), None);

        p.is_published = true;
        p.published_at = None;
        assert_eq!(p.publication_stamp(true, now), None);
    }

    #[test]
    fn test_patch_validation() {
        let mut patch = PostPatch {
            title: Some("  New title ".to_string()),
            ..Default::default()
        };
        patch.validate().unwrap();
        assert_eq!(patch.title.as_deref(), Some("New title"));

        let mut bad = PostPatch {
            content: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        assert!(PostPatch::default().is_empty());
    }
}
