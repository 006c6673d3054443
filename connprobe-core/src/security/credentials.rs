//! Credential container with automatic memory zeroing.
//!
//! Username and password are kept exactly as they appear in the connection
//! string (percent-encoded sequences are not decoded) so diagnostics can see
//! the original encoding.

use zeroize::Zeroizing;

/// Credential pair taken from the userinfo part of a connection string.
///
/// Both values live in `Zeroizing` containers and are cleared on drop. The
/// `Debug` output never shows the password.
///
/// # Example
///
/// ```rust
/// use connprobe_core::security::Credentials;
///
/// let creds = Credentials::new("alice".to_string(), Some("p%40ss".to_string()));
/// assert_eq!(creds.username(), "alice");
/// assert!(creds.has_password());
/// assert!(!format!("{creds:?}").contains("p%40ss"));
/// ```
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    username: Zeroizing<String>,
    password: Zeroizing<Option<String>>,
}

impl Credentials {
    /// Creates new credentials with automatic memory zeroing.
    pub fn new(username: String, password: Option<String>) -> Self {
        Self {
            username: Zeroizing::new(username),
            password: Zeroizing::new(password),
        }
    }

    /// Gets the username as written in the connection string.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Gets the password as written in the connection string.
    ///
    /// Returns an empty string when no password separator was present.
    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }

    /// Checks if a password separator (`:`) was present.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Checks whether both username and password are empty.
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password().is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username())
            .field("password", &self.has_password().then_some("****"))
            .finish()
    }
}
