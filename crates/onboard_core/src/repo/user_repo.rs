//! Account and current-user repository.

use crate::model::account::{SessionUser, StoredUser};
use crate::repo::RepoResult;
use crate::store::kv_store::{KeyValueStore, CURRENT_USER_KEY, USERS_KEY};
use log::warn;
use serde::de::DeserializeOwned;

pub trait UserRepository {
    /// Registered accounts; malformed state loads as empty.
    fn load_users(&self) -> Vec<StoredUser>;
    fn save_users(&self, users: &[StoredUser]) -> RepoResult<()>;
    /// Logged-in user; malformed state loads as nobody.
    fn current_user(&self) -> Option<SessionUser>;
    fn set_current_user(&self, user: &SessionUser) -> RepoResult<()>;
    fn clear_current_user(&self) -> RepoResult<()>;
}

pub struct KvUserRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvUserRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(
                    "event=kv_read module=repo status=recovered key={} reason=store_error error={}",
                    key, err
                );
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(
                    "event=kv_read module=repo status=recovered key={} reason=malformed bytes={}",
                    key,
                    raw.len()
                );
                None
            }
        }
    }
}

impl<S: KeyValueStore> UserRepository for KvUserRepository<S> {
    fn load_users(&self) -> Vec<StoredUser> {
        self.read(USERS_KEY).unwrap_or_default()
    }

    fn save_users(&self, users: &[StoredUser]) -> RepoResult<()> {
        let encoded = serde_json::to_string(users)?;
        self.store.set(USERS_KEY, &encoded)?;
        Ok(())
    }

    fn current_user(&self) -> Option<SessionUser> {
        self.read(CURRENT_USER_KEY)
    }

    fn set_current_user(&self, user: &SessionUser) -> RepoResult<()> {
        let encoded = serde_json::to_string(user)?;
        self.store.set(CURRENT_USER_KEY, &encoded)?;
        Ok(())
    }

    fn clear_current_user(&self) -> RepoResult<()> {
        self.store.remove(CURRENT_USER_KEY)?;
        Ok(())
    }
}
