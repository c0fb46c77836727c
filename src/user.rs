//! User identity records

use serde::Serialize;

/// A registered mail account.
///
/// Both `login` and `email` are unique across all live users. Login
/// comparisons are case-sensitive; email comparisons are
/// case-insensitive. A user is immutable once created -- accounts are
/// replaced, not edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Login name, the key for authentication and folder ownership.
    pub login: String,
    /// Email address. Matched case-insensitively on lookup.
    pub email: String,
    /// Stored password. `None` for accounts auto-provisioned while
    /// authentication is disabled.
    pub password: Option<String>,
}

impl User {
    pub(crate) fn new(
        email: impl Into<String>,
        login: impl Into<String>,
        password: Option<&str>,
    ) -> Self {
        Self {
            login: login.into(),
            email: email.into(),
            password: password.map(str::to_string),
        }
    }

    /// Whether this user's email matches `email`, ignoring ASCII case.
    #[must_use]
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }
}
