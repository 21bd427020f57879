//! Credential and session-lifecycle core for a marketplace backend.
//!
//! Covers registration, password authentication, session
//! issuance/resolution/revocation and the password-reset token lifecycle.
//! Persistence goes through narrow repository traits, backed by Postgres in
//! production and by in-memory fakes in tests. Transport, email delivery and
//! syntactic input validation are external collaborators: this crate produces
//! tokens and expiries, it never touches cookies or SMTP.

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod pg;
pub mod reset;
pub mod session;
pub mod token;

pub use auth::{AuthService, Credential, NewUser, Role, User};
pub use clock::{Clock, SystemClock};
pub use config::AuthConfig;
pub use error::{
    LoginError, RegisterError, RepoError, RepoResult, ResetCompleteError, ResetRequestError,
    SessionError,
};
pub use reset::{IssuedReset, PasswordResetService};
pub use session::{IssuedSession, Session, SessionService};
