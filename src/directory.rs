//! The user directory
//!
//! [`UserDirectory`] is the sole entry point for account lifecycle: it
//! owns the login/email registry, enforces the authentication policy,
//! and keeps identity and mailbox state in lockstep by driving the
//! [`MailboxHost`] whenever an account is created or destroyed.
//!
//! One mutex guards both identity maps and the auth flag. It is held
//! across the provisioning/deprovisioning call into the mailbox host,
//! so account creation and deletion appear as single steps to
//! concurrent callers. Lock order is directory before store, never the
//! reverse.

use crate::error::{Error, Result};
use crate::host::MailboxHost;
use crate::user::User;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

#[derive(Debug, Default)]
struct DirectoryInner {
    /// Login (case-sensitive) to user record.
    users: HashMap<String, User>,
    /// Lowercased email to login, for case-insensitive email lookup.
    logins_by_email: HashMap<String, String>,
    auth_required: bool,
}

impl DirectoryInner {
    fn lookup(&self, identifier: &str) -> Option<&User> {
        self.users.get(identifier).or_else(|| {
            self.logins_by_email
                .get(&identifier.to_ascii_lowercase())
                .and_then(|login| self.users.get(login))
        })
    }
}

/// Registry of mail accounts and gatekeeper of authentication policy.
///
/// Accounts move through exactly two states: nonexistent and active.
/// Deletion is terminal. A live account always has its folders
/// reachable through the mailbox host, and a deleted account leaves no
/// folder behind.
#[derive(Debug)]
pub struct UserDirectory {
    host: Arc<MailboxHost>,
    inner: Mutex<DirectoryInner>,
}

impl UserDirectory {
    /// Create an empty directory managing mailboxes through `host`.
    ///
    /// Authentication is required by default; see
    /// [`set_auth_required`](Self::set_auth_required).
    #[must_use]
    pub fn new(host: Arc<MailboxHost>) -> Self {
        Self {
            host,
            inner: Mutex::new(DirectoryInner {
                auth_required: true,
                ..DirectoryInner::default()
            }),
        }
    }

    /// Register a new account and provision its INBOX.
    ///
    /// All-or-nothing: if INBOX provisioning fails, no user record
    /// remains registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateUser`] if the login (case-sensitive)
    /// or email (case-insensitive) is already taken, or the
    /// provisioning error from the mailbox host.
    pub fn create_user(&self, email: &str, login: &str, password: Option<&str>) -> Result<User> {
        let mut inner = self.lock();
        let user = self.register(&mut inner, email, login, password)?;
        info!("Created user {}", user.login);
        Ok(user)
    }

    /// Delete an account and every folder it owns.
    ///
    /// Identity removal and folder teardown happen under one lock
    /// acquisition, so no concurrent reader observes a user without
    /// folders or folders without their user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if `user` is not registered.
    pub fn delete_user(&self, user: &User) -> Result<()> {
        let mut inner = self.lock();
        let Some(removed) = inner.users.remove(&user.login) else {
            return Err(Error::UserNotFound(user.login.clone()));
        };
        inner
            .logins_by_email
            .remove(&removed.email.to_ascii_lowercase());
        self.host.delete_all_folders_for_user(&removed);
        info!("Deleted user {}", removed.login);
        Ok(())
    }

    /// Look up a user by login. Case-sensitive; no side effects.
    #[must_use]
    pub fn get_user(&self, login: &str) -> Option<User> {
        self.lock().users.get(login).cloned()
    }

    /// Look up a user by email, ignoring ASCII case.
    #[must_use]
    pub fn get_user_by_email(&self, email: &str) -> Option<User> {
        let inner = self.lock();
        inner
            .logins_by_email
            .get(&email.to_ascii_lowercase())
            .and_then(|login| inner.users.get(login))
            .cloned()
    }

    /// Snapshot of all active users, in no particular order.
    #[must_use]
    pub fn list_users(&self) -> Vec<User> {
        self.lock().users.values().cloned().collect()
    }

    /// Users matching `predicate`, taken from one consistent snapshot.
    #[must_use]
    pub fn find_users(&self, predicate: impl Fn(&User) -> bool) -> Vec<User> {
        self.lock()
            .users
            .values()
            .filter(|u| predicate(u))
            .cloned()
            .collect()
    }

    /// Toggle the directory-wide authentication policy.
    pub fn set_auth_required(&self, required: bool) {
        self.lock().auth_required = required;
    }

    /// Whether authentication is currently required.
    #[must_use]
    pub fn is_auth_required(&self) -> bool {
        self.lock().auth_required
    }

    /// Check credentials, or provision an account in open-auth mode.
    ///
    /// With authentication required, returns true only when a user
    /// matches `identifier` by login or email and the stored password
    /// equals `password` exactly. Nothing is created.
    ///
    /// With authentication disabled, an existing user passes without a
    /// password check -- and an unknown identifier **creates an
    /// account** as a side effect (email and login both set to
    /// `identifier`, password as supplied, INBOX provisioned) before
    /// returning true. Anonymous-mode test setups rely on this
    /// auto-provisioning.
    pub fn authenticate(&self, identifier: &str, password: Option<&str>) -> bool {
        let mut inner = self.lock();
        if inner.auth_required {
            return inner
                .lookup(identifier)
                .is_some_and(|user| user.password.as_deref() == password);
        }
        if inner.lookup(identifier).is_some() {
            return true;
        }
        match self.register(&mut inner, identifier, identifier, password) {
            Ok(user) => {
                info!("Auto-provisioned user {}", user.login);
                true
            }
            Err(_) => false,
        }
    }

    /// Register a user record and provision its INBOX, unwinding the
    /// record if provisioning fails. Caller holds the directory lock.
    fn register(
        &self,
        inner: &mut DirectoryInner,
        email: &str,
        login: &str,
        password: Option<&str>,
    ) -> Result<User> {
        let email_key = email.to_ascii_lowercase();
        if inner.users.contains_key(login) {
            return Err(Error::DuplicateUser(login.to_string()));
        }
        if inner.logins_by_email.contains_key(&email_key) {
            return Err(Error::DuplicateUser(email.to_string()));
        }

        let user = User::new(email, login, password);
        inner.users.insert(login.to_string(), user.clone());
        inner.logins_by_email.insert(email_key, login.to_string());

        if let Err(e) = self.host.provision_default_mailbox(&user) {
            inner.users.remove(login);
            inner
                .logins_by_email
                .remove(&user.email.to_ascii_lowercase());
            return Err(e);
        }
        Ok(user)
    }

    fn lock(&self) -> MutexGuard<'_, DirectoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
