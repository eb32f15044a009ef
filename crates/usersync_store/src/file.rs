//! File-based store for persistent storage.

use crate::error::{StoreError, StoreResult};
use crate::records::Records;
use crate::store::LocalStore;
use parking_lot::RwLock;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use usersync_model::{decode_users, encode_users, FavoriteUpdate, User, UserId};

/// A file-based local store.
///
/// All records are kept in memory and written back to disk as a JSON array
/// after every mutation. Records survive process restarts.
///
/// # Durability
///
/// - Every mutation writes a sibling temporary file, syncs it, then renames
///   it over the store file, so a crash leaves either the old or the new
///   snapshot
/// - A failed write leaves both the file and the in-memory image unchanged
///
/// # Thread Safety
///
/// Writers hold the record lock across the disk write, so concurrent
/// mutations are applied one after another.
///
/// # Example
///
/// ```no_run
/// use usersync_store::{FileStore, LocalStore};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("users.json")).unwrap();
/// println!("{} users cached", store.count().unwrap());
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    records: RwLock<Records>,
}

impl FileStore {
    /// Opens the store at `path`.
    ///
    /// A missing file is treated as an empty store; it is created on the
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a user
    /// list.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let records = if path.exists() {
            let bytes = fs::read(path)?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                Records::default()
            } else {
                let users = decode_users(&bytes).map_err(|e| StoreError::Corrupted {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Records::from_users(users)
            }
        } else {
            Records::default()
        };

        tracing::debug!(path = %path.display(), count = records.len(), "opened file store");

        Ok(Self {
            path: path.to_path_buf(),
            records: RwLock::new(records),
        })
    }

    /// Opens the store, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot
    /// be read.
    pub fn open_with_create_dirs(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the records, persists the copy, then
    /// swaps it in.
    fn mutate<R>(&self, change: impl FnOnce(&mut Records) -> R) -> StoreResult<R> {
        let mut records = self.records.write();
        let mut next = records.clone();
        let result = change(&mut next);
        self.persist(&next)?;
        *records = next;
        Ok(result)
    }

    fn persist(&self, records: &Records) -> StoreResult<()> {
        let bytes = encode_users(&records.sorted())?;
        let tmp_path = self.path.with_extension("json.tmp");

        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }
}

impl LocalStore for FileStore {
    fn get_all(&self) -> StoreResult<Vec<User>> {
        Ok(self.records.read().sorted())
    }

    fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.records.read().get(id))
    }

    fn upsert_all(&self, users: &[User]) -> StoreResult<()> {
        self.mutate(|records| records.upsert_all(users))
    }

    fn update_flags(
        &self,
        id: UserId,
        is_favorite: bool,
        pending_sync: bool,
    ) -> StoreResult<bool> {
        if self.records.read().get(id).is_none() {
            return Ok(false);
        }
        self.mutate(|records| records.update_flags(id, is_favorite, pending_sync))
    }

    fn get_pending(&self) -> StoreResult<Vec<User>> {
        Ok(self.records.read().pending())
    }

    fn clear_all_pending(&self) -> StoreResult<usize> {
        self.mutate(Records::clear_all_pending)
    }

    fn acknowledge(&self, updates: &[FavoriteUpdate]) -> StoreResult<usize> {
        self.mutate(|records| records.acknowledge(updates))
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.records.read().len())
    }
}
