use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::auth::password;
use crate::auth::repo::{CredentialRepository, UserRepository};
use crate::clock::Clock;
use crate::config::AuthConfig;
use crate::error::{ResetCompleteError, ResetRequestError};
use crate::token;

/// Pending reset token and its expiry, returned for external delivery.
/// Emailing the token to the user is a collaborator's job.
#[derive(Debug, Clone)]
pub struct IssuedReset {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

/// Two-step password reset. Per user the state is either no pending token or
/// exactly one; issuing again replaces whatever was pending.
pub struct PasswordResetService<U, C> {
    users: Arc<U>,
    credentials: Arc<C>,
    clock: Arc<dyn Clock>,
    config: AuthConfig,
}

impl<U: UserRepository, C: CredentialRepository> PasswordResetService<U, C> {
    pub fn new(
        users: Arc<U>,
        credentials: Arc<C>,
        clock: Arc<dyn Clock>,
        config: AuthConfig,
    ) -> Self {
        Self {
            users,
            credentials,
            clock,
            config,
        }
    }

    /// Issues a reset token for the account owning `email`, valid for one
    /// hour. Unknown emails are reported as such; callers wanting a uniform
    /// "if this email exists, a link was sent" response collapse
    /// [`ResetRequestError::UnknownEmail`] themselves.
    #[instrument(skip(self))]
    pub async fn request_reset(&self, email: &str) -> Result<IssuedReset, ResetRequestError> {
        let Some(user) = self.users.find_active_by_email(email).await? else {
            warn!(email = %email, "password reset requested for unknown email");
            return Err(ResetRequestError::UnknownEmail);
        };

        let token = token::reset_token();
        let expires_at = self.clock.now() + self.config.reset_token_ttl();

        // Overwrites any pending token; concurrent requests race and the
        // later write wins, silently invalidating the earlier token.
        self.credentials
            .set_reset_token(user.id, &token, expires_at)
            .await?;

        info!(user_id = %user.id, "password reset token issued");
        Ok(IssuedReset { token, expires_at })
    }

    /// Redeems a reset token and installs the new password. The store-side
    /// conditional update is what makes the token single-use and leaves the
    /// old hash untouched when the token is unknown or expired.
    pub async fn complete_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), ResetCompleteError> {
        let new_hash = password::hash_password_async(new_password.to_owned())
            .await
            .map_err(|e| {
                error!(error = %e, "password hashing failed");
                ResetCompleteError::Internal(e.to_string())
            })?;

        match self
            .credentials
            .consume_reset_token(token, &new_hash, self.clock.now())
            .await?
        {
            Some(user_id) => {
                info!(user_id = %user_id, "password reset completed");
                Ok(())
            }
            None => {
                warn!("password reset with invalid or expired token");
                Err(ResetCompleteError::InvalidOrExpiredToken)
            }
        }
    }
}
