use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::auth::repo::UserRepository;
use crate::auth::repo_types::User;
use crate::clock::Clock;
use crate::config::AuthConfig;
use crate::error::SessionError;
use crate::session::repo::SessionRepository;
use crate::session::repo_types::{IssuedSession, Session};
use crate::token;

/// Issues, resolves and revokes sessions. Expiry is enforced lazily at
/// resolve time; nothing in this crate sweeps expired rows.
pub struct SessionService<S, U> {
    sessions: Arc<S>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
    config: AuthConfig,
}

impl<S: SessionRepository, U: UserRepository> SessionService<S, U> {
    pub fn new(
        sessions: Arc<S>,
        users: Arc<U>,
        clock: Arc<dyn Clock>,
        config: AuthConfig,
    ) -> Self {
        Self {
            sessions,
            users,
            clock,
            config,
        }
    }

    /// Mints a session for `user_id`, valid for 7 days, or 30 with
    /// `remember_me`. The returned token and expiry are the transport
    /// adapter's to place into a cookie.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        user_id: Uuid,
        remember_me: bool,
    ) -> Result<IssuedSession, SessionError> {
        let now = self.clock.now();
        let expires_at = now + self.config.session_ttl(remember_me);
        let session = Session {
            token: token::session_token(),
            user_id,
            expires_at,
            created_at: now,
        };
        let issued = IssuedSession {
            token: session.token.clone(),
            expires_at,
        };

        self.sessions.create(session).await?;
        debug!(user_id = %user_id, remember_me, "session created");
        Ok(issued)
    }

    /// Resolves a session token to its owning user. `None` for unknown
    /// tokens, expired sessions and soft-deleted owners alike.
    pub async fn resolve(&self, token: &str) -> Result<Option<User>, SessionError> {
        let Some(session) = self.sessions.find_by_token(token).await? else {
            return Ok(None);
        };

        if session.expires_at <= self.clock.now() {
            debug!(user_id = %session.user_id, "session expired");
            return Ok(None);
        }

        let user = self.users.find_by_id(session.user_id).await?;
        Ok(user.filter(|u| !u.is_deleted()))
    }

    /// Deletes the session if present. Idempotent: revoking a token that is
    /// already gone succeeds.
    pub async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        self.sessions.delete_by_token(token).await?;
        Ok(())
    }
}
