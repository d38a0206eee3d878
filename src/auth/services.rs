use std::time::Duration;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error, warn};

use crate::auth::dto::{AuthResponse, Claims, Role};
use crate::auth::repo::User;
use crate::config::JwtConfig;
use crate::error::ApiError;
use crate::state::AppState;
use sqlx::SqlitePool;

/// Role requirement for every mutating route; consumed by [`authorize`].
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs(cfg.ttl_seconds.max(0) as u64),
        }
    }

    /// Issue a token embedding the credential's id, email and role.
    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, role = ?user.role, "jwt signed");
        Ok(token)
    }

    /// Verify signature and expiry. Any decode failure, including a payload
    /// with missing claims, maps to `Unauthenticated`.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthenticated)
    }

    pub fn expires_in(&self) -> i64 {
        self.ttl.as_secs() as i64
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

/// Set-membership check. An empty requirement authorizes any valid token;
/// there is no role hierarchy.
pub fn authorize(claims: &Claims, required: &[Role]) -> Result<(), ApiError> {
    if required.is_empty() || required.contains(&claims.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Validate a login attempt and issue a session token.
///
/// Unknown email and wrong password fail with the same `InvalidCredentials`
/// error. No constant-time lookup avoidance is attempted; see DESIGN.md.
pub async fn authenticate(
    db: &SqlitePool,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<AuthResponse, ApiError> {
    let user = match User::find_by_email(db, email).await? {
        Some(user) => user,
        None => {
            warn!("login attempt for unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(password, &user.password_hash).unwrap_or(false) {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let access_token = keys.sign(&user).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::Internal(e.to_string())
    })?;

    Ok(AuthResponse {
        access_token,
        token_type: "Bearer".into(),
        expires_in: keys.expires_in(),
    })
}

/// Extracts and validates the bearer token from the Authorization header.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated)?;
        let claims = keys.verify(token).map_err(|e| {
            warn!("invalid or expired token");
            e
        })?;
        Ok(AuthUser(claims))
    }
}

/// A valid token whose role satisfies [`ADMIN_ONLY`]. 401 without a valid
/// token, 403 with a valid token of the wrong role.
pub struct AdminUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        authorize(&claims, ADMIN_ONLY)?;
        Ok(AdminUser(claims))
    }
}

#[cfg(test)]
mod password_tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}

#[cfg(test)]
mod jwt_tests {
    use super::*;
    use crate::config::AppConfig;
    use uuid::Uuid;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_config(&AppConfig::test_defaults().jwt)
    }

    fn make_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "owner@example.com".into(),
            password_hash: String::new(),
            role,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn sign_and_verify_carries_subject_email_and_role() {
        let keys = make_keys();
        let user = make_user(Role::Admin);
        let token = keys.sign(&user).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[test]
    fn verify_rejects_a_tampered_secret() {
        let keys = make_keys();
        let mut cfg = AppConfig::test_defaults().jwt;
        cfg.secret = "other-secret".into();
        let other = JwtKeys::from_config(&cfg);
        let token = keys.sign(&make_user(Role::Admin)).expect("sign");
        assert!(matches!(
            other.verify(&token),
            Err(ApiError::Unauthenticated)
        ));
    }

    #[test]
    fn verify_rejects_an_expired_token() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "owner@example.com".into(),
            role: Role::Admin,
            iat: (now - 7200) as usize,
            exp: (now - 10) as usize,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(matches!(keys.verify(&token), Err(ApiError::Unauthenticated)));
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = make_keys();
        assert!(matches!(
            keys.verify("not.a.token"),
            Err(ApiError::Unauthenticated)
        ));
    }

    #[test]
    fn authorize_is_plain_set_membership() {
        let keys = make_keys();
        let admin = keys
            .verify(&keys.sign(&make_user(Role::Admin)).unwrap())
            .unwrap();
        let user = keys
            .verify(&keys.sign(&make_user(Role::User)).unwrap())
            .unwrap();

        assert!(authorize(&admin, ADMIN_ONLY).is_ok());
        assert!(matches!(
            authorize(&user, ADMIN_ONLY),
            Err(ApiError::Forbidden)
        ));
        // No hierarchy: admin does not satisfy a user-only requirement.
        assert!(matches!(
            authorize(&admin, &[Role::User]),
            Err(ApiError::Forbidden)
        ));
        // An empty requirement admits any valid token.
        assert!(authorize(&admin, &[]).is_ok());
        assert!(authorize(&user, &[]).is_ok());
    }
}

#[cfg(test)]
mod authenticate_tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::state::test_pool;

    async fn seeded(db: &SqlitePool, email: &str, password: &str, role: Role) -> User {
        let hash = hash_password(password).expect("hash");
        User::create(db, email, &hash, role).await.expect("create user")
    }

    #[tokio::test]
    async fn correct_credentials_return_a_matching_token() {
        let db = test_pool().await;
        let keys = JwtKeys::from_config(&AppConfig::test_defaults().jwt);
        let user = seeded(&db, "admin@example.com", "hunter2-but-long", Role::Admin).await;

        let resp = authenticate(&db, &keys, "admin@example.com", "hunter2-but-long")
            .await
            .expect("login");
        assert_eq!(resp.token_type, "Bearer");
        assert_eq!(resp.expires_in, 3600);

        let claims = keys.verify(&resp.access_token).expect("verify");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Admin);
        // Round-trip: the issued token authorizes any guard with no role
        // requirement until expiry.
        assert!(authorize(&claims, &[]).is_ok());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_identically() {
        let db = test_pool().await;
        let keys = JwtKeys::from_config(&AppConfig::test_defaults().jwt);
        seeded(&db, "admin@example.com", "hunter2-but-long", Role::Admin).await;

        let wrong_password = authenticate(&db, &keys, "admin@example.com", "nope")
            .await
            .unwrap_err();
        let unknown_email = authenticate(&db, &keys, "ghost@example.com", "hunter2-but-long")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, ApiError::InvalidCredentials));
        assert!(matches!(unknown_email, ApiError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn email_lookup_is_exact_match() {
        let db = test_pool().await;
        let keys = JwtKeys::from_config(&AppConfig::test_defaults().jwt);
        seeded(&db, "Admin@Example.com", "hunter2-but-long", Role::Admin).await;

        let err = authenticate(&db, &keys, "admin@example.com", "hunter2-but-long")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }
}
