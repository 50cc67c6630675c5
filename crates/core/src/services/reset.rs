//! Password reset service: signed, time-limited reset tokens.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tanvan_common::{AppError, AppResult};
use tanvan_db::{entities::user, repositories::UserRepository};
use validator::Validate;

use crate::services::email::EmailService;
use crate::services::user::hash_password;

/// Claims carried by a password-reset token.
#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    /// ID of the user allowed to reset their password.
    reset_password: String,
    /// Expiry, seconds since the Unix epoch.
    exp: u64,
}

/// Input for performing a password reset.
#[derive(Debug, Deserialize, Validate)]
pub struct PerformResetInput {
    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    pub password: String,

    /// Confirmation field; must match `password`.
    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub password2: String,
}

/// Password reset service.
#[derive(Clone)]
pub struct ResetService {
    user_repo: UserRepository,
    email_service: EmailService,
    secret_key: String,
    ttl_secs: u64,
    server_url: String,
}

impl ResetService {
    /// Create a new password reset service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        email_service: EmailService,
        secret_key: String,
        ttl_secs: u64,
        server_url: String,
    ) -> Self {
        Self {
            user_repo,
            email_service,
            secret_key,
            ttl_secs,
            server_url,
        }
    }

    /// Issue a signed reset token for a user, valid for the configured TTL.
    pub fn issue_token(&self, user: &user::Model) -> AppResult<String> {
        self.issue_token_with_ttl(user, self.ttl_secs)
    }

    /// Issue a signed reset token with an explicit TTL in seconds.
    pub fn issue_token_with_ttl(&self, user: &user::Model, ttl_secs: u64) -> AppResult<String> {
        let now = u64::try_from(chrono::Utc::now().timestamp())
            .map_err(|_| AppError::Internal("system clock before epoch".to_string()))?;
        let claims = ResetClaims {
            reset_password: user.id.clone(),
            exp: now + ttl_secs,
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_key.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign reset token: {e}")))
    }

    /// Resolve a reset token back to its user.
    ///
    /// Bad signature, malformed payload, expiry and unknown subject all
    /// collapse into the single [`AppError::InvalidToken`] outcome; the
    /// caller cannot tell the causes apart.
    pub async fn verify_token(&self, token: &str) -> AppResult<user::Model> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<ResetClaims>(
            token,
            &DecodingKey::from_secret(self.secret_key.as_bytes()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(&data.claims.reset_password)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    /// Handle a password-reset request for an email address.
    ///
    /// Always succeeds from the caller's perspective: whether an account
    /// exists for the address is never revealed. Mail delivery is
    /// fire-and-forget.
    pub async fn request_reset(&self, email: &str) -> AppResult<()> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            tracing::debug!("Password reset requested for unknown email address");
            return Ok(());
        };

        let token = self.issue_token(&user)?;
        let reset_url = format!("{}/reset_password/{}", self.server_url, token);

        if let Err(e) = self
            .email_service
            .send_password_reset(&user.email, &user.username, &reset_url)
            .await
        {
            tracing::warn!(error = %e, "Failed to send password reset email");
        }

        Ok(())
    }

    /// Perform a password reset with a previously issued token.
    pub async fn perform_reset(&self, token: &str, input: PerformResetInput) -> AppResult<()> {
        input.validate()?;

        let user = self.verify_token(token).await?;
        let password_hash = hash_password(&input.password)?;

        let mut active: user::ActiveModel = user.into();
        active.password_hash = sea_orm::Set(password_hash);
        active.updated_at = sea_orm::Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    const SECRET: &str = "test-secret-key";

    fn create_test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
            about_me: None,
            role: user::Role::Reader,
            token: None,
            last_seen: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_service(db: Arc<sea_orm::DatabaseConnection>) -> ResetService {
        ResetService::new(
            UserRepository::new(db),
            EmailService::disabled(),
            SECRET.to_string(),
            600,
            "https://example.com".to_string(),
        )
    }

    #[tokio::test]
    async fn test_fresh_token_verifies_to_the_right_user() {
        let user = create_test_user("u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let service = create_test_service(db);
        let token = service.issue_token(&user).unwrap();
        let resolved = service.verify_token(&token).await.unwrap();

        assert_eq!(resolved.id, "u1");
    }

    #[tokio::test]
    async fn test_expired_token_fails_verification() {
        let user = create_test_user("u1");
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(db);

        // Sign a token whose expiry is already in the past.
        let claims = ResetClaims {
            reset_password: user.id,
            exp: u64::try_from(Utc::now().timestamp()).unwrap() - 3600,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = service.verify_token(&token).await;
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_tampered_token_fails_verification() {
        let user = create_test_user("u1");
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(db);

        let token = service.issue_token(&user).unwrap();

        // Signed with a different key: the signature no longer matches.
        let forged = jsonwebtoken::encode(
            &Header::default(),
            &ResetClaims {
                reset_password: "u1".to_string(),
                exp: u64::try_from(Utc::now().timestamp()).unwrap() + 600,
            },
            &EncodingKey::from_secret(b"some-other-key"),
        )
        .unwrap();

        assert!(matches!(
            service.verify_token(&forged).await,
            Err(AppError::InvalidToken)
        ));

        // Flipping part of a valid token breaks it the same way.
        let mut tampered = token;
        tampered.pop();
        tampered.push('A');
        assert!(matches!(
            service.verify_token(&tampered).await,
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_malformed_token_fails_verification() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = create_test_service(db);

        let result = service.verify_token("not-a-jwt-at-all").await;
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_unknown_subject_fails_verification() {
        let user = create_test_user("u-gone");

        // The token is valid, but no row exists for its subject.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(db);
        let token = service.issue_token(&user).unwrap();

        let result = service.verify_token(&token).await;
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_request_reset_for_unknown_email_succeeds_silently() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(db);
        let result = service.request_reset("ghost@example.com").await;

        assert!(result.is_ok());
    }

    #[test]
    fn test_perform_reset_input_validation() {
        let input = PerformResetInput {
            password: "password123".to_string(),
            password2: "different123".to_string(),
        };
        assert!(input.validate().is_err());

        let input = PerformResetInput {
            password: "password123".to_string(),
            password2: "password123".to_string(),
        };
        assert!(input.validate().is_ok());
    }
}
