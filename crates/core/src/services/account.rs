//! Staff account service: signup, signin and token authentication.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use institute_common::{AppError, AppResult, IdGenerator};
use institute_db::entities::user;
use institute_db::repositories::UserRepository;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a staff account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountInput {
    #[validate(length(min = 3, max = 32), custom(function = "validate_username"))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 128))]
    pub display_name: Option<String>,
}

fn validate_username(username: &str) -> Result<(), validator::ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(validator::ValidationError::new("username_charset"))
    }
}

/// Staff account management.
#[derive(Clone)]
pub struct AccountService {
    users: UserRepository,
    id_gen: IdGenerator,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(users: UserRepository) -> Self {
        Self {
            users,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a staff account and issue its first token.
    ///
    /// The very first account becomes the admin; later accounts are
    /// regular staff.
    pub async fn signup(&self, input: CreateAccountInput) -> AppResult<user::Model> {
        input.validate()?;

        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "username {} is already taken",
                input.username
            )));
        }

        let is_first_account = self.users.count().await? == 0;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            password_hash: Set(hash_password(&input.password)?),
            token: Set(Some(self.id_gen.generate_token())),
            display_name: Set(input.display_name),
            is_admin: Set(is_first_account),
            created_at: Set(Utc::now().fixed_offset()),
            updated_at: Set(None),
        };
        self.users.create(model).await
    }

    /// Verify credentials and rotate the account token.
    ///
    /// Missing user and wrong password produce the same error.
    pub async fn signin(&self, username: &str, password: &str) -> AppResult<user::Model> {
        let Some(user) = self.users.find_by_username(username).await? else {
            // Same rejection for a missing user and a wrong password.
            return Err(AppError::Unauthorized);
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        self.users
            .set_token(&user.id, &self.id_gen.generate_token())
            .await
    }

    /// Resolve a bearer token to its account.
    pub async fn authenticate(&self, token: &str) -> AppResult<user::Model> {
        self.users
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_user(id: &str, username: &str, password: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            password_hash: hash_password(password).unwrap(),
            token: Some("token1".to_string()),
            display_name: None,
            is_admin: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hash.len() > 50);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("test_password_123").unwrap();

        assert!(verify_password("test_password_123", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_signup_rejects_short_password() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = AccountService::new(UserRepository::new(db));

        let result = service
            .signup(CreateAccountInput {
                username: "admin".to_string(),
                password: "short".to_string(),
                display_name: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_signup_rejects_bad_username_charset() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = AccountService::new(UserRepository::new(db));

        let result = service
            .signup(CreateAccountInput {
                username: "no spaces!".to_string(),
                password: "long_enough_pw".to_string(),
                display_name: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_signup_duplicate_username_conflicts() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("u1", "admin", "long_enough_pw")]])
                .into_connection(),
        );
        let service = AccountService::new(UserRepository::new(db));

        let result = service
            .signup(CreateAccountInput {
                username: "admin".to_string(),
                password: "long_enough_pw".to_string(),
                display_name: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_signin_wrong_password_unauthorized() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("u1", "clerk", "correct_password")]])
                .into_connection(),
        );
        let service = AccountService::new(UserRepository::new(db));

        let result = service.signin("clerk", "wrong_password").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_signin_unknown_user_unauthorized() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let service = AccountService::new(UserRepository::new(db));

        let result = service.signin("ghost", "whatever_password").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token_unauthorized() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let service = AccountService::new(UserRepository::new(db));

        let result = service.authenticate("bogus").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
