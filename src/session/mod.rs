pub mod repo;
pub mod repo_types;
pub mod service;

pub use repo::{PgSessionRepository, SessionRepository};
pub use repo_types::{IssuedSession, Session};
pub use service::SessionService;
