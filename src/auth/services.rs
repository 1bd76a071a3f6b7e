use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        jwt::JwtKeys,
        password::{check_password_rules, hash_password, verify_dummy, verify_password},
        repo_types::User,
    },
    db::{Store, StoreError},
    error::AppError,
};

pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validated_email(raw: &str) -> Result<String, AppError> {
    let email = normalize_email(raw);
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email"));
    }
    Ok(email)
}

pub async fn register(store: &dyn Store, email: &str, password: &str) -> Result<User, AppError> {
    let email = validated_email(email)?;
    check_password_rules(password)?;

    if store.find_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(password)?;
    // a concurrent registration can still win the race; the unique index catches it
    let user = store.create_user(&email, &hash).await.map_err(|e| match e {
        StoreError::Conflict => AppError::Conflict("Email already registered".into()),
        other => other.into(),
    })?;

    info!(user_id = %user.id, "user registered");
    Ok(user)
}

pub async fn login(
    store: &dyn Store,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<(User, String), AppError> {
    let email = normalize_email(email);

    let Some(user) = store.find_user_by_email(&email).await? else {
        verify_dummy(password);
        warn!(email = %email, "login with unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok((user, token))
}

/// Overwrites the stored hash without checking the old password. Unknown
/// emails are not reported to the caller.
pub async fn reset_password(
    store: &dyn Store,
    email: &str,
    new_password: &str,
) -> Result<(), AppError> {
    let email = validated_email(email)?;
    check_password_rules(new_password)?;

    let hash = hash_password(new_password)?;
    if store.set_password_hash(&email, &hash).await? {
        info!(email = %email, "password reset");
    } else {
        warn!(email = %email, "password reset for unknown email");
    }
    Ok(())
}

pub async fn current_user(store: &dyn Store, user_id: Uuid) -> Result<User, AppError> {
    match store.find_user_by_id(user_id).await? {
        Some(user) => Ok(user),
        None => {
            warn!(user_id = %user_id, "token for a user that no longer exists");
            Err(AppError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::memory::MemoryStore;

    fn keys() -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: "test-secret".into(),
            issuer: "test".into(),
            audience: "test".into(),
            ttl_minutes: 60,
        })
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email(""));
        assert_eq!(normalize_email("  Foo@Example.COM "), "foo@example.com");
    }

    #[tokio::test]
    async fn register_twice_conflicts() {
        let store = MemoryStore::default();
        register(&store, "cook@example.com", "password123").await.unwrap();

        let err = register(&store, " COOK@example.com", "different-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let store = MemoryStore::default();
        assert!(matches!(
            register(&store, "not-an-email", "password123").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            register(&store, "cook@example.com", "short").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn login_issues_token_for_the_right_user() {
        let store = MemoryStore::default();
        let keys = keys();
        let alice = register(&store, "alice@example.com", "alice-pass").await.unwrap();
        let bob = register(&store, "bob@example.com", "bob-passwd").await.unwrap();

        let (user, token) = login(&store, &keys, "alice@example.com", "alice-pass")
            .await
            .unwrap();
        assert_eq!(user.id, alice.id);
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, alice.id);
        assert_ne!(claims.sub, bob.id);
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials_uniformly() {
        let store = MemoryStore::default();
        let keys = keys();
        register(&store, "alice@example.com", "alice-pass").await.unwrap();

        let wrong_pw = login(&store, &keys, "alice@example.com", "nope-nope").await;
        let unknown = login(&store, &keys, "eve@example.com", "alice-pass").await;
        assert!(matches!(wrong_pw, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn reset_overwrites_password() {
        let store = MemoryStore::default();
        let keys = keys();
        register(&store, "alice@example.com", "old-password").await.unwrap();

        reset_password(&store, "alice@example.com", "new-password").await.unwrap();
        assert!(login(&store, &keys, "alice@example.com", "old-password").await.is_err());
        assert!(login(&store, &keys, "alice@example.com", "new-password").await.is_ok());

        // unknown email looks the same to the caller
        reset_password(&store, "ghost@example.com", "new-password").await.unwrap();
    }

    #[tokio::test]
    async fn current_user_requires_existing_row() {
        let store = MemoryStore::default();
        let alice = register(&store, "alice@example.com", "alice-pass").await.unwrap();
        assert_eq!(current_user(&store, alice.id).await.unwrap().email, "alice@example.com");
        assert!(matches!(
            current_user(&store, Uuid::new_v4()).await,
            Err(AppError::Unauthorized)
        ));
    }
}
