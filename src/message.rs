//! Stored messages and their flags
//!
//! A stored message is an opaque blob from this crate's point of view:
//! the content is never inspected, only kept, counted, and handed back.
//! Flags use a strongly-typed enum instead of raw strings; standard
//! system flags have dedicated variants, arbitrary keyword flags use
//! the `Keyword` variant.

use chrono::{DateTime, Utc};
use std::fmt;

/// A message flag.
///
/// System flags (prefixed with `\` on the wire) have dedicated
/// variants. User-defined keyword flags use [`Flag::Keyword`].
///
/// # Examples
///
/// ```
/// use stubmail::Flag;
///
/// let seen = Flag::Seen;
/// assert_eq!(seen.as_imap_str(), "\\Seen");
///
/// let kw = Flag::Keyword("$Important".to_string());
/// assert_eq!(kw.as_imap_str(), "$Important");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Message has been read (`\Seen`).
    Seen,
    /// Message has been answered (`\Answered`).
    Answered,
    /// Message is flagged for attention (`\Flagged`).
    Flagged,
    /// Message is marked for deletion (`\Deleted`).
    Deleted,
    /// Message is a draft (`\Draft`).
    Draft,
    /// A user-defined keyword flag (no `\` prefix).
    Keyword(String),
}

impl Flag {
    /// The IMAP wire representation of this flag.
    ///
    /// System flags include the leading backslash (e.g. `\Seen`).
    /// Keyword flags are returned as-is.
    #[must_use]
    pub fn as_imap_str(&self) -> &str {
        match self {
            Self::Seen => "\\Seen",
            Self::Answered => "\\Answered",
            Self::Flagged => "\\Flagged",
            Self::Deleted => "\\Deleted",
            Self::Draft => "\\Draft",
            Self::Keyword(kw) => kw,
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_imap_str())
    }
}

/// A message held in a folder.
///
/// - `uid`: unique within the owning folder, allocated at append time,
///   strictly increasing, never reused for the folder's lifetime.
/// - `raw`: the complete message (headers + body) as bytes. Opaque to
///   this crate.
/// - `received_at`: when the message was appended.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub uid: u32,
    pub raw: Vec<u8>,
    pub flags: Vec<Flag>,
    pub received_at: DateTime<Utc>,
}

impl StoredMessage {
    pub(crate) fn new(uid: u32, raw: Vec<u8>) -> Self {
        Self {
            uid,
            raw,
            flags: Vec::new(),
            received_at: Utc::now(),
        }
    }

    /// Whether `flag` is set on this message.
    #[must_use]
    pub fn has_flag(&self, flag: &Flag) -> bool {
        self.flags.contains(flag)
    }

    pub(crate) fn set_flag(&mut self, flag: Flag) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }
}
