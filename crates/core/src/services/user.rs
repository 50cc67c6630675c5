//! User service: accounts, credentials, sessions, profiles.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sea_orm::Set;
use serde::Deserialize;
use tanvan_common::{AppError, AppResult, IdGenerator};
use tanvan_db::{
    entities::{editor_profile, user},
    repositories::{EditorProfileRepository, UserRepository},
};
use validator::Validate;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    editor_repo: EditorProfileRepository,
    id_gen: IdGenerator,
}

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 64, message = "must be between 1 and 64 characters"))]
    pub username: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    pub password: String,

    /// Confirmation field; must match `password`.
    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub password2: String,
}

/// Input for editing a profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 64, message = "must be between 1 and 64 characters"))]
    pub username: Option<String>,

    #[validate(length(max = 140, message = "must be at most 140 characters"))]
    pub about_me: Option<String>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository, editor_repo: EditorProfileRepository) -> Self {
        Self {
            user_repo,
            editor_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new local user.
    ///
    /// The username/email pre-checks produce friendly field errors; the
    /// storage-level unique indexes remain the invariant that decides
    /// concurrent registrations (the repository maps those conflicts back
    /// to a validation failure).
    pub async fn register(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Validation(
                "please choose a different username".to_string(),
            ));
        }

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Validation(
                "please choose a different email address".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(password_hash),
            role: Set(user::Role::Reader),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        self.user_repo.create(model).await
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_username(username).await
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_username(username).await
    }

    /// Authenticate a user by username and password, issuing a session token.
    ///
    /// Unknown usernames and wrong passwords produce the same generic
    /// failure, so the login form cannot be used to enumerate accounts.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(user::Model, String)> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        self.rotate_token(user).await
    }

    /// Authenticate a user by session token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Invalidate a user's current session by rotating the token.
    pub async fn logout(&self, user_id: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;
        self.rotate_token(user).await?;
        Ok(())
    }

    async fn rotate_token(&self, user: user::Model) -> AppResult<(user::Model, String)> {
        let new_token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(new_token.clone()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let user = self.user_repo.update(active).await?;
        Ok((user, new_token))
    }

    /// Update a user's profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;

        // Renaming needs the advisory pre-check; keeping the same name does not.
        if let Some(ref username) = input.username
            && username != &user.username
            && self.user_repo.find_by_username(username).await?.is_some()
        {
            return Err(AppError::Validation(
                "please choose a different username".to_string(),
            ));
        }

        let mut active: user::ActiveModel = user.into();
        if let Some(username) = input.username {
            active.username = Set(username);
        }
        if let Some(about_me) = input.about_me {
            active.about_me = Set(Some(about_me));
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Re-hash and store a new password for a user.
    pub async fn set_password(&self, user_id: &str, password: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let password_hash = hash_password(password)?;

        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await?;
        Ok(())
    }

    /// Check a password against a user's stored hash.
    pub fn check_password(&self, user: &user::Model, password: &str) -> AppResult<bool> {
        verify_password(password, &user.password_hash)
    }

    /// Record request activity for a user.
    pub async fn touch_last_seen(&self, user_id: &str) -> AppResult<()> {
        self.user_repo.touch_last_seen(user_id).await
    }

    /// Grant the editor role to a user.
    pub async fn grant_editor(&self, user_id: &str, editor_right: i32) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        if self.editor_repo.find_by_user_id(user_id).await?.is_none() {
            let profile = editor_profile::ActiveModel {
                user_id: Set(user_id.to_string()),
                editor_right: Set(editor_right),
                created_at: Set(chrono::Utc::now().into()),
            };
            self.editor_repo.create(profile).await?;
        }

        let mut active: user::ActiveModel = user.into();
        active.role = Set(user::Role::Editor);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Count all users.
    pub async fn count(&self) -> AppResult<u64> {
        self.user_repo.count().await
    }
}

/// Derive the Gravatar avatar URL for an email address.
///
/// Deterministic digest of the lower-cased address; no network call is made
/// here, the avatar service resolves the image at render time.
#[must_use]
pub fn avatar_url(email: &str, size: u32) -> String {
    let digest = md5::compute(email.trim().to_lowercase().as_bytes());
    format!("https://www.gravatar.com/avatar/{digest:x}?d=identicon&s={size}")
}

/// Hash a password using Argon2.
pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
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
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str, email: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password("correct horse battery").unwrap(),
            about_me: None,
            role: user::Role::Reader,
            token: Some("test_token".to_string()),
            last_seen: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_service(
        user_db: Arc<sea_orm::DatabaseConnection>,
        editor_db: Arc<sea_orm::DatabaseConnection>,
    ) -> UserService {
        UserService::new(
            UserRepository::new(user_db),
            EditorProfileRepository::new(editor_db),
        )
    }

    // Unit tests for password functions

    #[test]
    fn test_hash_password() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hash.len() > 50);
    }

    #[test]
    fn test_verify_password_round_trip() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let result = verify_password("test", "invalid_hash");
        assert!(result.is_err());
    }

    #[test]
    fn test_hash_password_different_each_time() {
        let password = "same_password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        // Different salts should produce different hashes
        assert_ne!(hash1, hash2);

        // But both should verify correctly
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    // Avatar derivation

    #[test]
    fn test_avatar_url_is_deterministic_and_case_insensitive() {
        let a = avatar_url("MyEmailAddress@example.com", 128);
        let b = avatar_url("myemailaddress@example.com", 128);

        assert_eq!(a, b);
        // Known MD5 digest for this address (Gravatar's documented example).
        assert_eq!(
            a,
            "https://www.gravatar.com/avatar/0bc83cb571cd1c50ba6f3e8a78ef1346?d=identicon&s=128"
        );
    }

    #[test]
    fn test_avatar_url_varies_by_size() {
        let small = avatar_url("someone@example.com", 36);
        let large = avatar_url("someone@example.com", 256);

        assert_ne!(small, large);
        assert!(small.ends_with("s=36"));
        assert!(large.ends_with("s=256"));
    }

    // Input validation

    #[test]
    fn test_register_input_validation() {
        // Password confirmation mismatch
        let input = CreateUserInput {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
            password2: "password124".to_string(),
        };
        assert!(input.validate().is_err());

        // Malformed email
        let input = CreateUserInput {
            username: "alice".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            password2: "password123".to_string(),
        };
        assert!(input.validate().is_err());

        // Password too short
        let input = CreateUserInput {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "short".to_string(),
            password2: "short".to_string(),
        };
        assert!(input.validate().is_err());

        // Valid input
        let input = CreateUserInput {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
            password2: "password123".to_string(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_update_profile_input_validation() {
        let input = UpdateProfileInput {
            username: None,
            about_me: Some("a".repeat(200)),
        };
        assert!(input.validate().is_err());

        let input = UpdateProfileInput {
            username: Some("alice".to_string()),
            about_me: Some("a short bio".to_string()),
        };
        assert!(input.validate().is_ok());
    }

    // Service tests

    #[tokio::test]
    async fn test_register_duplicate_username_is_validation_failure() {
        let existing = create_test_user("u1", "alice", "alice@example.com");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let editor_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, editor_db);
        let result = service
            .register(CreateUserInput {
                username: "alice".to_string(),
                email: "new@example.com".to_string(),
                password: "password123".to_string(),
                password2: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_username_is_generic_unauthorized() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let editor_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, editor_db);
        let result = service.login("ghost", "whatever123").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_generic_unauthorized() {
        let user = create_test_user("u1", "alice", "alice@example.com");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let editor_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, editor_db);
        let result = service.login("alice", "wrong password").await;

        // Same outcome as an unknown username: no account enumeration.
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_by_token_not_found() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let editor_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, editor_db);
        let result = service.authenticate_by_token("invalid").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_check_password_matches_stored_hash() {
        let user = create_test_user("u1", "alice", "alice@example.com");

        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let editor_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(user_db, editor_db);

        assert!(service
            .check_password(&user, "correct horse battery")
            .unwrap());
        assert!(!service.check_password(&user, "incorrect").unwrap());
    }
}
