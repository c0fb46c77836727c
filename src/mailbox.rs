//! Mailbox names
//!
//! Provides a strongly-typed name for mail folders instead of raw
//! strings. The mandatory INBOX and other well-known folders have
//! dedicated variants. User-defined folders use the `Custom` variant.

use std::fmt;

/// The canonical name of the mandatory default folder.
pub(crate) const INBOX: &str = "INBOX";

/// The name of a mail folder within one user's hierarchy.
///
/// INBOX is special: every live user has exactly one, and the name is
/// matched case-insensitively (RFC 3501). All other names are matched
/// verbatim. For user-created folders, use [`MailboxName::custom`].
///
/// # Examples
///
/// ```
/// use stubmail::MailboxName;
///
/// let inbox = MailboxName::from("inbox");
/// assert_eq!(inbox, MailboxName::Inbox);
/// assert_eq!(inbox.as_str(), "INBOX");
///
/// let custom = MailboxName::custom("work/reports");
/// assert_eq!(custom.as_str(), "work/reports");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MailboxName {
    /// The INBOX folder (mandatory, case-insensitive).
    Inbox,
    /// Sent messages.
    Sent,
    /// Draft messages.
    Drafts,
    /// Deleted messages.
    Trash,
    /// A user-defined folder.
    Custom(String),
}

impl MailboxName {
    /// Create a name for a user-defined folder.
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// The canonical folder name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Inbox => INBOX,
            Self::Sent => "Sent",
            Self::Drafts => "Drafts",
            Self::Trash => "Trash",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for MailboxName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for MailboxName {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case(INBOX) {
            Self::Inbox
        } else {
            match s {
                "Sent" => Self::Sent,
                "Drafts" => Self::Drafts,
                "Trash" => Self::Trash,
                other => Self::Custom(other.to_string()),
            }
        }
    }
}

impl From<String> for MailboxName {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbox_name() {
        assert_eq!(MailboxName::Inbox.as_str(), "INBOX");
    }

    #[test]
    fn custom_name() {
        let name = MailboxName::custom("Work");
        assert_eq!(name.as_str(), "Work");
    }

    #[test]
    fn from_str_inbox_case_insensitive() {
        assert_eq!(MailboxName::from("inbox"), MailboxName::Inbox);
        assert_eq!(MailboxName::from("INBOX"), MailboxName::Inbox);
        assert_eq!(MailboxName::from("Inbox"), MailboxName::Inbox);
    }

    #[test]
    fn from_str_known_folders() {
        assert_eq!(MailboxName::from("Sent"), MailboxName::Sent);
        assert_eq!(MailboxName::from("Drafts"), MailboxName::Drafts);
        assert_eq!(MailboxName::from("Trash"), MailboxName::Trash);
    }

    #[test]
    fn from_str_unknown_becomes_custom() {
        assert_eq!(
            MailboxName::from("My Stuff"),
            MailboxName::Custom("My Stuff".to_string())
        );
        // Only INBOX is case-insensitive.
        assert_eq!(
            MailboxName::from("sent"),
            MailboxName::Custom("sent".to_string())
        );
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", MailboxName::Inbox), "INBOX");
        assert_eq!(format!("{}", MailboxName::custom("Notes")), "Notes");
    }
}
