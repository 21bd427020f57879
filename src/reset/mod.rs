pub mod service;

pub use service::{IssuedReset, PasswordResetService};
