//! Error types for stubmail

use thiserror::Error;

/// Errors returned by the directory, host, and store.
///
/// Every error is surfaced to the immediate caller (the protocol
/// layer), which translates it into a protocol-specific response.
/// This crate never logs or retries on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A user with the same login or email is already registered.
    #[error("duplicate user: {0}")]
    DuplicateUser(String),

    /// No user is registered under the given login.
    #[error("no such user: {0}")]
    UserNotFound(String),

    /// The owner already has a mailbox under this name.
    #[error("mailbox already exists: {owner}/{name}")]
    MailboxExists { owner: String, name: String },

    /// The owner has no mailbox under this name.
    #[error("no such mailbox: {owner}/{name}")]
    MailboxNotFound { owner: String, name: String },

    /// The INBOX of a live user cannot be deleted individually.
    #[error("cannot delete INBOX of {0}")]
    InboxProtected(String),

    /// Malformed environment configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
