//! Startup seeding: the administrator account and optional demo content.
//!
//! Every step is idempotent, so the server can run it on each start.

use agora_core::access::Requester;
use agora_core::domain::{Role, User};
use agora_core::ports::{PasswordService, UserRepository};
use agora_core::service::{NewPostInput, PostFilter};

use crate::config::{AdminAccount, SeedConfig};
use crate::handlers::auth::MIN_PASSWORD_LEN;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

struct DemoUser {
    username: &'static str,
    email: &'static str,
    role: Role,
    bio: &'static str,
}

const DEMO_USERS: [DemoUser; 3] = [
    DemoUser {
        username: "sarah_tech",
        email: "sarah@example.com",
        role: Role::Privileged,
        bio: "Software engineer and course moderator.",
    },
    DemoUser {
        username: "john_doe",
        email: "john@example.com",
        role: Role::Student,
        bio: "Second-year student.",
    },
    DemoUser {
        username: "jane_smith",
        email: "jane@example.com",
        role: Role::Student,
        bio: "Writes about web development.",
    },
];

const DEMO_CATEGORIES: [(&str, &str); 3] = [
    ("Announcements", "Official notices from staff."),
    ("Academics", "Courses, exams and study material."),
    ("Campus Life", "Events, clubs and everyday life."),
];

struct DemoPost {
    title: &'static str,
    content: &'static str,
    author: &'static str,
    category: &'static str,
    is_published: bool,
    is_pinned: bool,
}

const DEMO_POSTS: [DemoPost; 4] = [
    DemoPost {
        title: "Welcome to Agora",
        content: "Read the posting rules before writing your first post.",
        author: "admin",
        category: "Announcements",
        is_published: true,
        is_pinned: true,
    },
    DemoPost {
        title: "Exam timetable published",
        content: "The winter exam timetable is attached to this post.",
        author: "sarah_tech",
        category: "Academics",
        is_published: true,
        is_pinned: false,
    },
    DemoPost {
        title: "Study group for algorithms",
        content: "Looking for people to meet on Thursdays in the library.",
        author: "john_doe",
        category: "Campus Life",
        is_published: false,
        is_pinned: false,
    },
    DemoPost {
        title: "Moderation guidelines (draft)",
        content: "Work in progress, not visible to students yet.",
        author: "sarah_tech",
        category: "Announcements",
        is_published: false,
        is_pinned: false,
    },
];

/// What a seeding run created. Rows that already existed are not counted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub categories: usize,
    pub posts: usize,
}

/// Apply `config`: create the administrator, then demo content if asked for.
pub async fn run(
    state: &AppState,
    passwords: &dyn PasswordService,
    config: &SeedConfig,
) -> AppResult<()> {
    let Some(account) = &config.admin else {
        if config.demo_password.is_some() {
            tracing::warn!("SEED_DEMO_PASSWORD requires ADMIN_USERNAME and ADMIN_PASSWORD; skipping demo data");
        }
        return Ok(());
    };

    let admin = ensure_admin(state.users.as_ref(), passwords, account).await?;

    if let Some(password) = &config.demo_password {
        let report = seed_demo(state, passwords, &admin, password).await?;
        tracing::info!(
            users = report.users,
            categories = report.categories,
            posts = report.posts,
            "Demo data seeded"
        );
    }
    Ok(())
}

/// Return the administrator named in `account`, creating it if missing.
///
/// An existing user with that name but a lower role is left untouched and
/// reported as a conflict.
pub async fn ensure_admin(
    users: &dyn UserRepository,
    passwords: &dyn PasswordService,
    account: &AdminAccount,
) -> AppResult<User> {
    if let Some(existing) = users.find_by_username(&account.username).await? {
        if existing.role != Role::Administrator {
            return Err(AppError::Conflict(format!(
                "user '{}' exists with role {}",
                existing.username, existing.role
            )));
        }
        tracing::debug!(user_id = %existing.id, "Administrator already present");
        return Ok(existing);
    }

    if account.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "ADMIN_PASSWORD must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let hash = passwords
        .hash(&account.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let admin = users
        .insert(
            User::new(account.username.clone(), account.email.clone(), hash)
                .with_role(Role::Administrator),
        )
        .await?;

    tracing::info!(user_id = %admin.id, username = %admin.username, "Administrator created");
    Ok(admin)
}

/// Create demo users, categories and posts that do not exist yet.
pub async fn seed_demo(
    state: &AppState,
    passwords: &dyn PasswordService,
    admin: &User,
    password: &str,
) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();
    let admin_requester = Requester::new(admin.id, admin.role);

    let mut authors = vec![(admin.username.clone(), admin_requester)];
    for demo in &DEMO_USERS {
        let user = match state.users.find_by_username(demo.username).await? {
            Some(user) => user,
            None => {
                let hash = passwords
                    .hash(password)
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                let mut user = User::new(demo.username.to_string(), demo.email.to_string(), hash)
                    .with_role(demo.role);
                user.bio = Some(demo.bio.to_string());
                report.users += 1;
                state.users.insert(user).await?
            }
        };
        authors.push((user.username.clone(), Requester::new(user.id, user.role)));
    }

    let mut categories = state.categories.list().await?;
    for (name, description) in DEMO_CATEGORIES {
        if categories.iter().any(|c| c.name == name) {
            continue;
        }
        let created = state
            .categories
            .create(&admin_requester, name, Some(description.to_string()))
            .await?;
        categories.push(created);
        report.categories += 1;
    }

    let existing: Vec<String> = state
        .posts
        .list(
            &admin_requester,
            PostFilter {
                limit: Some(agora_core::service::MAX_PAGE_SIZE),
                ..Default::default()
            },
        )
        .await?
        .into_iter()
        .map(|p| p.title)
        .collect();

    for demo in &DEMO_POSTS {
        if existing.iter().any(|title| title == demo.title) {
            continue;
        }
        // The admin account may be named anything; "admin" stands for it.
        let author = if demo.author == "admin" {
            Some(&admin_requester)
        } else {
            authors
                .iter()
                .find(|(name, _)| name == demo.author)
                .map(|(_, requester)| requester)
        };
        let Some(author) = author else {
            tracing::warn!(author = demo.author, "Demo author missing; skipping post");
            continue;
        };

        state
            .posts
            .create(
                author,
                NewPostInput {
                    title: demo.title.to_string(),
                    content: demo.content.to_string(),
                    category_id: categories
                        .iter()
                        .find(|c| c.name == demo.category)
                        .map(|c| c.id),
                    attachment: None,
                    is_published: demo.is_published,
                    is_pinned: demo.is_pinned,
                },
            )
            .await?;
        report.posts += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_infra::auth::Argon2PasswordService;

    use crate::config::AppConfig;

    fn account(password: &str) -> AdminAccount {
        AdminAccount {
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_admin_is_created_once() {
        let state = AppState::in_memory(&AppConfig::default());
        let passwords = Argon2PasswordService::new();

        let first = ensure_admin(state.users.as_ref(), &passwords, &account("s3cret-pass"))
            .await
            .unwrap();
        assert_eq!(first.role, Role::Administrator);
        assert!(passwords.verify("s3cret-pass", &first.password_hash).unwrap());

        let second = ensure_admin(state.users.as_ref(), &passwords, &account("s3cret-pass"))
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
    }

    #[actix_rt::test]
    async fn test_admin_rejects_short_password_and_existing_student() {
        let state = AppState::in_memory(&AppConfig::default());
        let passwords = Argon2PasswordService::new();

        let err = ensure_admin(state.users.as_ref(), &passwords, &account("short"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        state
            .users
            .insert(User::new("root".into(), "root@example.com".into(), "x".into()))
            .await
            .unwrap();
        let err = ensure_admin(state.users.as_ref(), &passwords, &account("s3cret-pass"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[actix_rt::test]
    async fn test_demo_seed_is_idempotent_and_role_gated() {
        let state = AppState::in_memory(&AppConfig::default());
        let passwords = Argon2PasswordService::new();
        let config = SeedConfig {
            admin: Some(account("s3cret-pass")),
            demo_password: Some("demo-password".to_string()),
        };

        run(&state, &passwords, &config).await.unwrap();

        let moderator = state.users.find_by_username("sarah_tech").await.unwrap().unwrap();
        assert_eq!(moderator.role, Role::Privileged);
        let student = state.users.find_by_username("john_doe").await.unwrap().unwrap();
        assert_eq!(student.role, Role::Student);
        assert_eq!(state.categories.list().await.unwrap().len(), 3);

        let admin = state.users.find_by_username("root").await.unwrap().unwrap();
        let all = state
            .posts
            .list(&Requester::new(admin.id, admin.role), PostFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), DEMO_POSTS.len());
        assert_eq!(all[0].title, "Welcome to Agora");
        assert!(all[0].is_pinned);

        // Another student sees the published posts only.
        let outsider = state.users.find_by_username("jane_smith").await.unwrap().unwrap();
        let visible = state
            .posts
            .list(&Requester::new(outsider.id, outsider.role), PostFilter::default())
            .await
            .unwrap();
        assert_eq!(visible.len(), 2);

        let report = seed_demo(&state, &passwords, &admin, "demo-password").await.unwrap();
        assert_eq!(report, SeedReport::default());
    }

    #[actix_rt::test]
    async fn test_demo_seed_without_admin_does_nothing() {
        let state = AppState::in_memory(&AppConfig::default());
        let config = SeedConfig {
            admin: None,
            demo_password: Some("demo-password".to_string()),
        };

        run(&state, &Argon2PasswordService::new(), &config).await.unwrap();

        assert!(state.users.find_by_username("sarah_tech").await.unwrap().is_none());
        assert!(state.categories.list().await.unwrap().is_empty());
    }
}
