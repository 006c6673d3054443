//! Credential protection for connection strings.
//!
//! - `credentials`: credential container with automatic memory zeroing
//! - redaction helpers for anything that may end up in a log line or report
//!
//! Passwords are only ever displayed as `****`.

mod credentials;

pub use credentials::Credentials;
pub use crate::error::redact_connection_string;

/// Replaces every occurrence of `secret` in `message` with `****`.
///
/// Driver error messages sometimes echo parts of the connection string back.
/// Empty secrets leave the message untouched.
pub fn scrub_secret(message: &str, secret: &str) -> String {
    if secret.is_empty() {
        return message.to_string();
    }
    message.replace(secret, "****")
}
