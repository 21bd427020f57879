use thiserror::Error;

/// Failure surfaced by a repository implementation.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The store rejected a write because a unique constraint matched.
    /// Carries the constraint/index name when the store reports one.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// The store could not be reached or the call itself failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Outcome of [`crate::AuthService::register`].
#[derive(Debug, Error)]
pub enum RegisterError {
    /// An active (non-deleted) user already owns this email.
    #[error("email already registered")]
    DuplicateEmail,

    #[error("persistence unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for RegisterError {
    fn from(err: RepoError) -> Self {
        match err {
            // The store's unique index is the authority on duplicates, so a
            // violation raced past the pre-check still means "taken".
            RepoError::UniqueViolation(_) => Self::DuplicateEmail,
            RepoError::Unavailable(msg) => Self::Unavailable(msg),
        }
    }
}

/// Outcome of [`crate::AuthService::authenticate`].
#[derive(Debug, Error)]
pub enum LoginError {
    /// Covers both "no such email" and "wrong password"; callers get no
    /// signal which one it was.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("persistence unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for LoginError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::UniqueViolation(c) => {
                Self::Unavailable(format!("unexpected unique violation: {c}"))
            }
            RepoError::Unavailable(msg) => Self::Unavailable(msg),
        }
    }
}

/// Outcome of the session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("persistence unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for SessionError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::UniqueViolation(c) => {
                Self::Unavailable(format!("unexpected unique violation: {c}"))
            }
            RepoError::Unavailable(msg) => Self::Unavailable(msg),
        }
    }
}

/// Outcome of [`crate::PasswordResetService::request_reset`].
#[derive(Debug, Error)]
pub enum ResetRequestError {
    /// No active user owns this email. Surfaced distinctly, matching the
    /// behavior callers already depend on; see DESIGN.md for the trade-off.
    #[error("no account registered for that email")]
    UnknownEmail,

    #[error("persistence unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for ResetRequestError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::UniqueViolation(c) => {
                Self::Unavailable(format!("unexpected unique violation: {c}"))
            }
            RepoError::Unavailable(msg) => Self::Unavailable(msg),
        }
    }
}

/// Outcome of [`crate::PasswordResetService::complete_reset`].
#[derive(Debug, Error)]
pub enum ResetCompleteError {
    /// The token is unknown, past its expiry, or was already consumed.
    #[error("invalid or expired reset token")]
    InvalidOrExpiredToken,

    #[error("persistence unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for ResetCompleteError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::UniqueViolation(c) => {
                Self::Unavailable(format!("unexpected unique violation: {c}"))
            }
            RepoError::Unavailable(msg) => Self::Unavailable(msg),
        }
    }
}
