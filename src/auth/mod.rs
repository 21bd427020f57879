pub mod password;
pub mod repo;
pub mod repo_types;
pub mod service;

pub use repo::{CredentialRepository, PgCredentialRepository, PgUserRepository, UserRepository};
pub use repo_types::{Credential, NewUser, Role, User};
pub use service::AuthService;
