use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_seconds: i64,
}

/// Credentials for the one-time admin bootstrap. Only consulted when the
/// users table holds no admin row.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/portfolio.db".into());
        let secret = std::env::var("JWT_SECRET")
            .context("JWT_SECRET is not set; refusing to start without a token signing secret")?;
        if secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET is empty; refusing to start without a token signing secret");
        }
        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "portfolio".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "portfolio-admin".into()),
            ttl_seconds: std::env::var("JWT_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(3600),
        };
        let admin = AdminConfig {
            email: std::env::var("ADMIN_EMAIL").ok(),
            password: std::env::var("ADMIN_PASSWORD").ok(),
        };
        Ok(Self {
            database_url,
            jwt,
            admin,
        })
    }
}

#[cfg(test)]
impl AppConfig {
    pub(crate) fn test_defaults() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_seconds: 3600,
            },
            admin: AdminConfig {
                email: None,
                password: None,
            },
        }
    }
}
