//! Random token generation for sessions and password resets.
//!
//! Both namespaces draw 32 bytes from the OS CSPRNG and hex-encode them;
//! nothing about a token is derived from time, counters or user ids. The
//! two namespaces are kept apart by where they are stored (sessions table
//! vs. the credential's reset column), never by shape.

use rand::{rngs::OsRng, RngCore};

const TOKEN_BYTES: usize = 32;

fn random_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Opaque token identifying a logged-in session.
pub fn session_token() -> String {
    random_token()
}

/// Opaque single-use token authorizing exactly one password change.
pub fn reset_token() -> String {
    random_token()
}
