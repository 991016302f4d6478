//! Role-gated post access.
//!
//! Pure decisions about what a requester may see and change. Nothing here
//! touches storage; the services combine these checks with repository lookups.

use std::str::FromStr;

use uuid::Uuid;

use crate::domain::{Owned, Post, Role};
use crate::error::DomainError;

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: Uuid,
    pub role: Role,
}

impl Requester {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn owns(&self, entity: &impl Owned) -> bool {
        entity.owner_id() == self.id
    }
}

/// Who may create posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreatePolicy {
    #[default]
    Everyone,
    PrivilegedOnly,
}

impl FromStr for CreatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "everyone" | "any" => Ok(CreatePolicy::Everyone),
            "privileged" | "privileged_only" => Ok(CreatePolicy::PrivilegedOnly),
            other => Err(format!("unknown post create policy: {other}")),
        }
    }
}

/// Visibility predicate over posts for one requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Everything,
    PublishedOrAuthoredBy(Uuid),
}

impl Visibility {
    pub fn admits(&self, post: &Post) -> bool {
        match self {
            Visibility::Everything => true,
            Visibility::PublishedOrAuthoredBy(user_id) => {
                post.is_published || post.author_id == *user_id
            }
        }
    }
}

/// Access rules for posts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy {
    create: CreatePolicy,
}

impl AccessPolicy {
    pub fn new(create: CreatePolicy) -> Self {
        Self { create }
    }

    /// Students see published posts plus their own; everyone else sees all.
    pub fn visibility(&self, requester: &Requester) -> Visibility {
        if requester.role.is_privileged() {
            Visibility::Everything
        } else {
            Visibility::PublishedOrAuthoredBy(requester.id)
        }
    }

    pub fn can_create(&self, requester: &Requester) -> bool {
        match self.create {
            CreatePolicy::Everyone => true,
            CreatePolicy::PrivilegedOnly => requester.role.is_privileged(),
        }
    }

    /// Drafts start unpublished and unpinned, so asking for either flag at
    /// creation counts as a state change.
    pub fn can_create_with_flags(&self, requester: &Requester, is_published: bool, is_pinned: bool) -> bool {
        requester.role.is_privileged() || (!is_published && !is_pinned)
    }

    /// A student may only "change" the publish flag to the value it already has,
    /// and only on a post they own.
    pub fn can_change_publish_state(
        &self,
        requester: &Requester,
        post: &Post,
        requested: bool,
    ) -> bool {
        requester.role.is_privileged() || (requested == post.is_published && requester.owns(post))
    }

    /// Same rule as publishing, applied to the pin flag.
    pub fn can_change_pin_state(&self, requester: &Requester, post: &Post, requested: bool) -> bool {
        requester.role.is_privileged() || (requested == post.is_pinned && requester.owns(post))
    }

    pub fn can_edit(&self, requester: &Requester, post: &impl Owned) -> bool {
        requester.role.is_privileged() || requester.owns(post)
    }

    pub fn can_delete(&self, requester: &Requester, _post: &Post) -> bool {
        requester.role.is_privileged()
    }
}

/// Turn a denied check into `Forbidden`.
pub fn ensure(allowed: bool) -> Result<(), DomainError> {
    if allowed {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post_by(author_id: Uuid, is_published: bool) -> Post {
        let now = Utc::now();
        Post {
            id: 1,
            title: "t".into(),
            slug: "t".into(),
            content: "c".into(),
            author_id,
            category_id: None,
            attachment: None,
            is_published,
            is_pinned: false,
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    fn requester(role: Role) -> Requester {
        Requester::new(Uuid::new_v4(), role)
    }

    #[test]
    fn test_student_sees_published_or_own() {
        let policy = AccessPolicy::default();
        let student = requester(Role::Student);
        let other = Uuid::new_v4();
        let visibility = policy.visibility(&student);

        assert!(visibility.admits(&post_by(other, true)));
        assert!(!visibility.admits(&post_by(other, false)));
        assert!(visibility.admits(&post_by(student.id, false)));
        assert!(visibility.admits(&post_by(student.id, true)));
    }

    #[test]
    fn test_privileged_roles_see_everything() {
        let policy = AccessPolicy::default();
        for role in [Role::Privileged, Role::Administrator] {
            let visibility = policy.visibility(&requester(role));
            assert_eq!(visibility, Visibility::Everything);
            assert!(visibility.admits(&post_by(Uuid::new_v4(), false)));
        }
    }

    #[test]
    fn test_create_policy() {
        let open = AccessPolicy::new(CreatePolicy::Everyone);
        let closed = AccessPolicy::new(CreatePolicy::PrivilegedOnly);

        assert!(open.can_create(&requester(Role::Student)));
        assert!(!closed.can_create(&requester(Role::Student)));
        assert!(closed.can_create(&requester(Role::Privileged)));
        assert!(closed.can_create(&requester(Role::Administrator)));
    }

    #[test]
    fn test_student_cannot_flip_publish_state() {
        let policy = AccessPolicy::default();
        let student = requester(Role::Student);
        let own = post_by(student.id, false);

        assert!(!policy.can_change_publish_state(&student, &own, true));
        assert!(policy.can_change_publish_state(&student, &own, false));

        let foreign = post_by(Uuid::new_v4(), true);
        assert!(!policy.can_change_publish_state(&student, &foreign, true));
    }

    #[test]
    fn test_privileged_can_flip_publish_and_pin_state() {
        let policy = AccessPolicy::default();
        let admin = requester(Role::Administrator);
        let p = post_by(Uuid::new_v4(), false);

        assert!(policy.can_change_publish_state(&admin, &p, true));
        assert!(policy.can_change_pin_state(&admin, &p, true));
        assert!(!policy.can_change_pin_state(&requester(Role::Student), &p, true));
    }

    #[test]
    fn test_edit_and_delete_rules() {
        let policy = AccessPolicy::default();
        let student = requester(Role::Student);
        let own = post_by(student.id, true);
        let foreign = post_by(Uuid::new_v4(), true);

        assert!(policy.can_edit(&student, &own));
        assert!(!policy.can_edit(&student, &foreign));
        assert!(policy.can_edit(&requester(Role::Privileged), &foreign));

        assert!(!policy.can_delete(&student, &own));
        assert!(policy.can_delete(&requester(Role::Privileged), &own));
        assert!(policy.can_delete(&requester(Role::Administrator), &foreign));
    }

    #[test]
    fn test_initial_flags_on_create() {
        let policy = AccessPolicy::default();
        let student = requester(Role::Student);

        assert!(policy.can_create_with_flags(&student, false, false));
        assert!(!policy.can_create_with_flags(&student, true, false));
        assert!(!policy.can_create_with_flags(&student, false, true));
        assert!(policy.can_create_with_flags(&requester(Role::Privileged), true, true));
    }

    #[test]
    fn test_ensure_maps_denial_to_forbidden() {
        assert!(ensure(true).is_ok());
        assert!(matches!(ensure(false), Err(DomainError::Forbidden)));
    }

    #[test]
    fn test_create_policy_parsing() {
        assert_eq!("privileged".parse::<CreatePolicy>().unwrap(), CreatePolicy::PrivilegedOnly);
        assert_eq!("Everyone".parse::<CreatePolicy>().unwrap(), CreatePolicy::Everyone);
        assert!("nobody".parse::<CreatePolicy>().is_err());
    }
}
