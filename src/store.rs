//! The in-memory message store
//!
//! The [`Store`] owns every folder in the system, keyed by
//! `(owner login, mailbox name)`. It is the only component that
//! allocates or destroys folders. [`MailFolder`] values handed out by
//! the store are shared handles: clones refer to the same underlying
//! message list, and a handle kept across the folder's deletion
//! observes an empty folder rather than stale messages.
//!
//! Lock discipline: the store's folder map and each folder's message
//! list are guarded independently. The store lock is always acquired
//! before any folder lock, never the other way around.

use crate::error::{Error, Result};
use crate::mailbox::MailboxName;
use crate::message::{Flag, StoredMessage};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FolderKey {
    owner: String,
    name: MailboxName,
}

#[derive(Debug)]
struct FolderInner {
    messages: Vec<StoredMessage>,
    next_uid: u32,
}

/// A shared handle to one folder's ordered message list.
///
/// Cheap to clone; all clones see the same messages. Message content is
/// opaque -- the folder stores, counts, and returns raw bytes without
/// interpreting them.
#[derive(Debug, Clone)]
pub struct MailFolder {
    owner: String,
    name: MailboxName,
    inner: Arc<RwLock<FolderInner>>,
}

impl MailFolder {
    fn new(owner: &str, name: MailboxName) -> Self {
        Self {
            owner: owner.to_string(),
            name,
            inner: Arc::new(RwLock::new(FolderInner {
                messages: Vec::new(),
                next_uid: 1,
            })),
        }
    }

    /// Login of the user owning this folder.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Name of this folder.
    #[must_use]
    pub const fn name(&self) -> &MailboxName {
        &self.name
    }

    /// Append a message, returning its folder-unique uid.
    ///
    /// Uids are strictly increasing and never reused for the lifetime
    /// of the folder.
    pub fn store(&self, raw: Vec<u8>) -> u32 {
        let mut inner = self.write();
        let uid = inner.next_uid;
        inner.next_uid += 1;
        inner.messages.push(StoredMessage::new(uid, raw));
        debug!("Stored message {} in {}/{}", uid, self.owner, self.name);
        uid
    }

    /// Number of messages currently in the folder.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.read().messages.len()
    }

    /// The message at `index` (0-based, in append order), if any.
    #[must_use]
    pub fn message_at(&self, index: usize) -> Option<StoredMessage> {
        self.read().messages.get(index).cloned()
    }

    /// Snapshot of all messages in append order.
    #[must_use]
    pub fn messages(&self) -> Vec<StoredMessage> {
        self.read().messages.clone()
    }

    /// Remove and return the message at `index`, shifting later
    /// messages down. Returns `None` if out of range.
    pub fn remove_at(&self, index: usize) -> Option<StoredMessage> {
        let mut inner = self.write();
        if index < inner.messages.len() {
            Some(inner.messages.remove(index))
        } else {
            None
        }
    }

    /// Remove every message, keeping the folder itself.
    pub fn delete_all_messages(&self) {
        self.write().messages.clear();
    }

    /// Set a flag on the message with the given uid.
    ///
    /// Returns false if no such message exists.
    pub fn set_flag(&self, uid: u32, flag: Flag) -> bool {
        let mut inner = self.write();
        match inner.messages.iter_mut().find(|m| m.uid == uid) {
            Some(msg) => {
                msg.set_flag(flag);
                true
            }
            None => false,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, FolderInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FolderInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The authoritative map from `(owner, name)` to folder.
///
/// All mutations of the folder topology go through here; a single
/// internal lock makes each operation atomic with respect to
/// concurrent callers.
#[derive(Debug, Default)]
pub struct Store {
    folders: RwLock<HashMap<FolderKey, MailFolder>>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate and register a new empty folder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MailboxExists`] if `owner` already has a folder
    /// under `name`.
    pub fn create_folder(&self, owner: &str, name: MailboxName) -> Result<MailFolder> {
        let mut folders = self.write();
        let key = FolderKey {
            owner: owner.to_string(),
            name: name.clone(),
        };
        if folders.contains_key(&key) {
            return Err(Error::MailboxExists {
                owner: owner.to_string(),
                name: name.as_str().to_string(),
            });
        }
        let folder = MailFolder::new(owner, name);
        debug!("Created folder {}/{}", folder.owner(), folder.name());
        folders.insert(key, folder.clone());
        Ok(folder)
    }

    /// Look up a folder. No side effects.
    #[must_use]
    pub fn get_folder(&self, owner: &str, name: &MailboxName) -> Option<MailFolder> {
        let key = FolderKey {
            owner: owner.to_string(),
            name: name.clone(),
        };
        self.read().get(&key).cloned()
    }

    /// Unregister a folder and discard its messages.
    ///
    /// Handles to the folder held elsewhere observe it as empty
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MailboxNotFound`] if `owner` has no folder
    /// under `name`.
    pub fn delete_folder(&self, owner: &str, name: &MailboxName) -> Result<()> {
        let mut folders = self.write();
        let key = FolderKey {
            owner: owner.to_string(),
            name: name.clone(),
        };
        match folders.remove(&key) {
            Some(folder) => {
                folder.delete_all_messages();
                debug!("Deleted folder {}/{}", owner, name);
                Ok(())
            }
            None => Err(Error::MailboxNotFound {
                owner: owner.to_string(),
                name: name.as_str().to_string(),
            }),
        }
    }

    /// Unregister every folder of one owner, discarding all messages.
    ///
    /// Runs under a single acquisition of the store lock, so no folder
    /// created concurrently for the same owner can survive
    /// half-deleted. A no-op for an owner with no folders.
    pub fn delete_folders_of(&self, owner: &str) {
        let mut folders = self.write();
        let keys: Vec<FolderKey> = folders
            .keys()
            .filter(|k| k.owner == owner)
            .cloned()
            .collect();
        for key in keys {
            if let Some(folder) = folders.remove(&key) {
                folder.delete_all_messages();
            }
        }
        debug!("Deleted all folders of {}", owner);
    }

    /// All folders belonging to `owner`, in no particular order.
    #[must_use]
    pub fn folders_of(&self, owner: &str) -> Vec<MailFolder> {
        self.read()
            .iter()
            .filter(|(k, _)| k.owner == owner)
            .map(|(_, f)| f.clone())
            .collect()
    }

    /// Snapshot of every message in every folder, system-wide.
    ///
    /// Reflects the store at call time; not a live view.
    #[must_use]
    pub fn list_all_messages(&self) -> Vec<StoredMessage> {
        self.read()
            .values()
            .flat_map(MailFolder::messages)
            .collect()
    }

    /// Empty every folder without touching the folder topology.
    pub fn purge_all_messages(&self) {
        let folders = self.read();
        for folder in folders.values() {
            folder.delete_all_messages();
        }
        debug!("Purged all messages");
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<FolderKey, MailFolder>> {
        self.folders.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<FolderKey, MailFolder>> {
        self.folders.write().unwrap_or_else(PoisonError::into_inner)
    }
}
