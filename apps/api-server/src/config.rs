//! Application configuration loaded from environment variables.

use std::env;

use agora_core::access::CreatePolicy;
use agora_core::locator::DEFAULT_ORIGIN;
use agora_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub create_policy: CreatePolicy,
    /// Origin used for placeholder attachment links.
    pub attachment_origin: String,
    /// Origin that serves stored attachment files.
    pub media_origin: String,
    pub seed: SeedConfig,
}

/// Administrator created at startup when it does not exist yet.
#[derive(Clone)]
pub struct AdminAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Startup seeding of the administrator account and optional demo content.
#[derive(Debug, Clone, Default)]
pub struct SeedConfig {
    /// `ADMIN_USERNAME` / `ADMIN_EMAIL` / `ADMIN_PASSWORD`.
    pub admin: Option<AdminAccount>,
    /// `SEED_DEMO_PASSWORD`: when set, demo users, categories and posts are
    /// created with this password.
    pub demo_password: Option<String>,
}

impl SeedConfig {
    fn from_env() -> Self {
        let admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(AdminAccount {
                email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| format!("{username}@localhost")),
                username,
                password,
            }),
            (Ok(_), Err(_)) => {
                tracing::warn!("ADMIN_USERNAME set without ADMIN_PASSWORD; no administrator will be created");
                None
            }
            _ => None,
        };

        Self {
            admin,
            demo_password: env::var("SEED_DEMO_PASSWORD").ok().filter(|p| !p.is_empty()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: None,
            create_policy: CreatePolicy::default(),
            attachment_origin: DEFAULT_ORIGIN.to_string(),
            media_origin: DEFAULT_ORIGIN.to_string(),
            seed: SeedConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        let create_policy = match env::var("POST_CREATE_POLICY") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; falling back to 'everyone'", e);
                CreatePolicy::Everyone
            }),
            Err(_) => defaults.create_policy,
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
            database,
            create_policy,
            attachment_origin: env::var("ATTACHMENT_ORIGIN").unwrap_or(defaults.attachment_origin),
            media_origin: env::var("MEDIA_ORIGIN").unwrap_or(defaults.media_origin),
            seed: SeedConfig::from_env(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
