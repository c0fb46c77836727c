//! In-memory mail store and user directory for mail-server test doubles
//!
//! This crate is the stateful core of a simulated mail server: it owns
//! user accounts, per-user folder hierarchies, and the messages stored
//! in them, entirely in memory. Protocol front ends (SMTP, IMAP, POP3)
//! authenticate against the [`UserDirectory`], then read and write mail
//! through the [`MailboxHost`] and the [`MailFolder`] handles it hands
//! out.
//!
//! All components are safe to drive from many threads or async tasks at
//! once; every account and folder operation is internally synchronized.
//!
//! ```
//! use std::sync::Arc;
//! use stubmail::{MailboxHost, Store, UserDirectory};
//!
//! let host = Arc::new(MailboxHost::new(Arc::new(Store::new())));
//! let directory = UserDirectory::new(Arc::clone(&host));
//!
//! let user = directory.create_user("foo@bar.com", "foo", Some("pwd")).unwrap();
//! let inbox = host.get_inbox(&user).unwrap();
//! inbox.store(b"Subject: hi\r\n\r\nhello".to_vec());
//! assert_eq!(inbox.message_count(), 1);
//! ```

mod config;
mod directory;
mod error;
mod host;
mod mailbox;
mod message;
mod store;
mod user;

pub use config::{Config, UserSpec};
pub use directory::UserDirectory;
pub use error::{Error, Result};
pub use host::MailboxHost;
pub use mailbox::MailboxName;
pub use message::{Flag, StoredMessage};
pub use store::{MailFolder, Store};
pub use user::User;
