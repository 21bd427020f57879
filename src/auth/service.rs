use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::auth::password;
use crate::auth::repo::{CredentialRepository, UserRepository};
use crate::auth::repo_types::{NewUser, Role, User};
use crate::clock::Clock;
use crate::error::{LoginError, RegisterError};

/// Registration and password authentication, orchestrating the hasher and
/// the user/credential repositories. Stateless between calls; the store is
/// the synchronization point.
pub struct AuthService<U, C> {
    users: Arc<U>,
    credentials: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<U: UserRepository, C: CredentialRepository> AuthService<U, C> {
    pub fn new(users: Arc<U>, credentials: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            credentials,
            clock,
        }
    }

    /// Registers a new account. Email format and password strength are the
    /// caller's preconditions; only active-email uniqueness is decided here.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<User, RegisterError> {
        // Fast path only; the insert below is the authority under races.
        if self.users.find_active_by_email(email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(RegisterError::DuplicateEmail);
        }

        let password_hash = password::hash_password_async(password.to_owned())
            .await
            .map_err(|e| {
                error!(error = %e, "password hashing failed");
                RegisterError::Internal(e.to_string())
            })?;

        let user = self
            .users
            .create(NewUser {
                email: email.to_owned(),
                name: name.to_owned(),
                role,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Verifies a password login. Unknown email and wrong password produce
    /// the identical error so callers cannot probe which emails exist.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, LoginError> {
        let Some(user) = self.users.find_active_by_email(email).await? else {
            warn!(email = %email, "login for unknown email");
            return Err(LoginError::InvalidCredentials);
        };

        let Some(credential) = self.credentials.find_by_user_id(user.id).await? else {
            // A user without a credential row should not exist; surface it as
            // a failed match, not an anomaly the caller can observe.
            error!(user_id = %user.id, "user has no credential row");
            return Err(LoginError::InvalidCredentials);
        };

        let ok = password::verify_password_async(password.to_owned(), credential.password_hash)
            .await
            .unwrap_or_else(|e| {
                error!(user_id = %user.id, error = %e, "stored digest rejected by verifier");
                false
            });

        if !ok {
            warn!(user_id = %user.id, "login with invalid password");
            return Err(LoginError::InvalidCredentials);
        }

        // Non-critical bookkeeping; a store hiccup must not fail the login.
        if let Err(e) = self
            .credentials
            .touch_last_login(user.id, self.clock.now())
            .await
        {
            warn!(user_id = %user.id, error = %e, "failed to record last login");
        }

        info!(user_id = %user.id, "user logged in");
        Ok(user)
    }
}
