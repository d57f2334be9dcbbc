use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::auth::{
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::{CreateUserError, UserStore},
    repo_types::User,
};
use crate::error::AppError;

const USER_EXISTS: &str = "User already exists";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Creates the account and issues its first token.
pub async fn register_user(
    users: &dyn UserStore,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<(User, String), AppError> {
    if !is_valid_email(email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }
    if password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }

    // Friendly early exit; the UNIQUE constraint still catches concurrent inserts.
    if users.find_by_email(email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::validation(USER_EXISTS));
    }

    let hash = hash_password(password)?;
    let user = match users.create(email, &hash).await {
        Ok(u) => u,
        Err(CreateUserError::EmailTaken) => {
            warn!(email = %email, "email registered concurrently");
            return Err(AppError::validation(USER_EXISTS));
        }
        Err(CreateUserError::Storage(e)) => return Err(AppError::Storage(e)),
    };

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((user, token))
}

/// Checks credentials; unknown email and wrong password are indistinguishable.
pub async fn login_user(
    users: &dyn UserStore,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<(User, String), AppError> {
    let Some(user) = users.find_by_email(email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::validation(INVALID_CREDENTIALS));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::validation(INVALID_CREDENTIALS));
    }

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((user, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::mem::MemUserStore;
    use crate::config::JwtConfig;
    use async_trait::async_trait;

    /// Sees no user on lookup but hits the unique constraint on insert,
    /// as when a concurrent registration commits in between.
    struct RacingUserStore;

    #[async_trait]
    impl UserStore for RacingUserStore {
        async fn find_by_email(&self, _email: &str) -> anyhow::Result<Option<User>> {
            Ok(None)
        }

        async fn create(&self, _email: &str, _hash: &str) -> Result<User, CreateUserError> {
            Err(CreateUserError::EmailTaken)
        }
    }

    fn keys() -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: "test".into(),
            issuer: "test".into(),
            audience: "test".into(),
            ttl_minutes: 60,
        })
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@localhost"));
        assert!(!is_valid_email("al ice@example.com"));
    }

    #[tokio::test]
    async fn register_then_login() {
        let store = MemUserStore::default();
        let keys = keys();
        let (user, token) = register_user(&store, &keys, "alice@example.com", "pw123")
            .await
            .unwrap();
        assert_eq!(keys.verify(&token).unwrap().email, "alice@example.com");

        let (again, _) = login_user(&store, &keys, "alice@example.com", "pw123")
            .await
            .unwrap();
        assert_eq!(again.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_rejected_without_second_record() {
        let store = MemUserStore::default();
        let keys = keys();
        register_user(&store, &keys, "bob@example.com", "one").await.unwrap();
        let err = register_user(&store, &keys, "bob@example.com", "two")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == USER_EXISTS));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn lost_insert_race_reports_user_exists() {
        let err = register_user(&RacingUserStore, &keys(), "race@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == USER_EXISTS));
    }

    #[tokio::test]
    async fn email_is_case_sensitive() {
        let store = MemUserStore::default();
        let keys = keys();
        register_user(&store, &keys, "Carol@example.com", "pw").await.unwrap();
        let err = login_user(&store, &keys, "carol@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn bad_credentials_share_one_message() {
        let store = MemUserStore::default();
        let keys = keys();
        register_user(&store, &keys, "dave@example.com", "right").await.unwrap();

        let wrong_pw = login_user(&store, &keys, "dave@example.com", "wrong")
            .await
            .unwrap_err();
        let unknown = login_user(&store, &keys, "nobody@example.com", "right")
            .await
            .unwrap_err();
        assert_eq!(wrong_pw.to_string(), INVALID_CREDENTIALS);
        assert_eq!(unknown.to_string(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn register_rejects_bad_input() {
        let store = MemUserStore::default();
        let keys = keys();
        assert!(register_user(&store, &keys, "not-an-email", "pw").await.is_err());
        assert!(register_user(&store, &keys, "e@example.com", "").await.is_err());
        assert_eq!(store.len().await, 0);
    }
}
