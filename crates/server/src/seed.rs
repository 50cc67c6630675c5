//! First-start account seeding.

use tanvan_common::{config::SeedConfig, AppResult};
use tanvan_core::{CreateUserInput, UserService};
use tracing::info;

/// Create the configured seed accounts when the user table is empty.
///
/// Passwords go through the normal registration path, so seed accounts are
/// indistinguishable from registered ones.
pub async fn seed_users(user_service: &UserService, seed: &SeedConfig) -> AppResult<()> {
    if seed.users.is_empty() {
        return Ok(());
    }

    if user_service.count().await? > 0 {
        return Ok(());
    }

    for account in &seed.users {
        let user = user_service
            .register(CreateUserInput {
                username: account.username.clone(),
                email: account.email.clone(),
                password: account.password.clone(),
                password2: account.password.clone(),
            })
            .await?;

        if account.editor {
            user_service.grant_editor(&user.id, 1).await?;
        }

        info!(username = %user.username, editor = account.editor, "Created seed account");
    }

    Ok(())
}
