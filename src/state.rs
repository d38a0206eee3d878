use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::auth::repo::User;
use crate::auth::services::hash_password;
use crate::auth::Role;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = connect(&config.database_url).await?;
        Ok(Self { db, config })
    }

    /// One-time bootstrap: make sure at least one admin credential exists.
    /// Credentials come from ADMIN_EMAIL / ADMIN_PASSWORD; nothing is hardcoded.
    pub async fn seed_admin(&self) -> anyhow::Result<()> {
        let admins: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
                .fetch_one(&self.db)
                .await?;
        if admins > 0 {
            return Ok(());
        }

        match (&self.config.admin.email, &self.config.admin.password) {
            (Some(email), Some(password)) => {
                let hash = hash_password(password)?;
                let user = User::create(&self.db, email, &hash, Role::Admin).await?;
                info!(user_id = %user.id, email = %user.email, "seeded initial admin credential");
            }
            _ => {
                warn!(
                    "no admin credential exists and ADMIN_EMAIL/ADMIN_PASSWORD are not set; \
                     login is impossible until one is created"
                );
            }
        }
        Ok(())
    }
}

async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    // sqlite creates the file but not its directory.
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        if let Some(dir) = std::path::Path::new(path).parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("create database directory {}", dir.display()))?;
            }
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)
        .context("parse DATABASE_URL")?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let db = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(db)
}

/// A single-connection in-memory database. One connection is mandatory:
/// every `sqlite::memory:` connection is its own database.
#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool")
}

/// In-memory database with the full schema applied.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = memory_pool().await;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

#[cfg(test)]
impl AppState {
    pub(crate) async fn for_tests() -> Self {
        Self {
            db: test_pool().await,
            config: Arc::new(AppConfig::test_defaults()),
        }
    }
}
