//! Per-user mailbox topology
//!
//! [`MailboxHost`] is a stateless façade over the [`Store`] that
//! enforces per-user rules: every live user has exactly one INBOX, and
//! deleting an account tears down every folder the account owned. It
//! holds no data of its own beyond the store it manages.

use crate::error::{Error, Result};
use crate::mailbox::MailboxName;
use crate::message::StoredMessage;
use crate::store::{MailFolder, Store};
use crate::user::User;
use std::sync::Arc;
use tracing::debug;

/// Per-user mailbox manager.
///
/// Protocol sessions resolve folders through this type rather than the
/// raw store; lookups return `None` (not an error) when a folder is
/// absent, which the protocol layer translates into its "no such
/// mailbox" response.
#[derive(Debug)]
pub struct MailboxHost {
    store: Arc<Store>,
}

impl MailboxHost {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Create a folder for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MailboxExists`] if the user already has a
    /// folder under that name, including an explicit request for
    /// `INBOX` on an already-provisioned account.
    pub fn create_mailbox(&self, user: &User, name: impl Into<MailboxName>) -> Result<MailFolder> {
        self.store.create_folder(&user.login, name.into())
    }

    /// Ensure `user` has an INBOX, creating it if necessary.
    ///
    /// Idempotent: called during account creation, where an existing
    /// INBOX is not an error. This is the provisioning half of the
    /// mailbox lifecycle the [`UserDirectory`](crate::UserDirectory)
    /// drives.
    ///
    /// # Errors
    ///
    /// Propagates store failures other than the INBOX already
    /// existing.
    pub fn provision_default_mailbox(&self, user: &User) -> Result<MailFolder> {
        match self.store.create_folder(&user.login, MailboxName::Inbox) {
            Err(Error::MailboxExists { .. }) => self
                .get_inbox(user)
                .ok_or_else(|| Error::MailboxNotFound {
                    owner: user.login.clone(),
                    name: MailboxName::Inbox.as_str().to_string(),
                }),
            other => other,
        }
    }

    /// Look up a folder of `user`. Returns `None` when absent.
    #[must_use]
    pub fn get_folder(&self, user: &User, name: impl Into<MailboxName>) -> Option<MailFolder> {
        self.store.get_folder(&user.login, &name.into())
    }

    /// The user's INBOX, or `None` if the account has been deleted.
    #[must_use]
    pub fn get_inbox(&self, user: &User) -> Option<MailFolder> {
        self.store.get_folder(&user.login, &MailboxName::Inbox)
    }

    /// All folders of `user`, in no particular order.
    #[must_use]
    pub fn list_mailboxes(&self, user: &User) -> Vec<MailFolder> {
        self.store.folders_of(&user.login)
    }

    /// Delete one folder of `user` and its messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InboxProtected`] for `INBOX` (it must exist for
    /// every live user; use account deletion instead) and
    /// [`Error::MailboxNotFound`] if the folder does not exist.
    pub fn delete_mailbox(&self, user: &User, name: impl Into<MailboxName>) -> Result<()> {
        let name = name.into();
        if name == MailboxName::Inbox {
            return Err(Error::InboxProtected(user.login.clone()));
        }
        self.store.delete_folder(&user.login, &name)
    }

    /// Remove every folder of `user`, INBOX included.
    ///
    /// The deprovisioning half of the mailbox lifecycle, used during
    /// account deletion. Atomic with respect to concurrent folder
    /// creation for the same user.
    pub fn delete_all_folders_for_user(&self, user: &User) {
        debug!("Removing all folders of {}", user.login);
        self.store.delete_folders_of(&user.login);
    }

    /// Snapshot of every message across all users and folders.
    #[must_use]
    pub fn get_all_messages(&self) -> Vec<StoredMessage> {
        self.store.list_all_messages()
    }

    /// Empty every folder of every user without deleting any folder.
    pub fn purge_all_mailboxes(&self) {
        self.store.purge_all_messages();
    }
}
