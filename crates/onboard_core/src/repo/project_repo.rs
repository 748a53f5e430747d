//! Project collection repository.
//!
//! The whole collection lives as one JSON array under `projects`. Every
//! save is a full overwrite, so two writers racing on the same store lose
//! updates (last writer wins). There is no version check.
//!
//! Records are decoded one by one. A record that does not decode is left
//! out of the loaded list but kept verbatim in the stored array on save.

use crate::model::project::Project;
use crate::repo::{RepoError, RepoResult};
use crate::store::kv_store::{KeyValueStore, PROJECTS_KEY};
use log::{debug, warn};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Load/save contract for the project collection.
pub trait ProjectRepository {
    /// Reads every project for read-modify-write.
    ///
    /// Store failures are errors. Malformed content loads as empty.
    fn try_load_all(&self) -> RepoResult<Vec<Project>>;

    /// Persists the given collection, replacing what was stored.
    fn save_all(&self, projects: &[Project]) -> RepoResult<()>;

    /// Reads every project for display. Any failure loads as empty.
    fn load_all(&self) -> Vec<Project> {
        self.try_load_all().unwrap_or_else(|err| {
            let reason = match &err {
                RepoError::Db(db) if db.is_locked() => "store_locked",
                _ => "store_error",
            };
            warn!(
                "event=projects_load module=repo status=recovered reason={} error={}",
                reason, err
            );
            Vec::new()
        })
    }
}

/// Project repository backed by any `KeyValueStore`.
pub struct KvProjectRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvProjectRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read_stored(&self) -> RepoResult<StoredProjects> {
        let Some(raw) = self.store.get(PROJECTS_KEY)? else {
            return Ok(StoredProjects::default());
        };

        match StoredProjects::decode(&raw) {
            Ok(stored) => Ok(stored),
            Err(err) => {
                warn!(
                    "event=projects_load module=repo status=recovered reason=malformed bytes={} line={} column={}",
                    raw.len(),
                    err.line(),
                    err.column()
                );
                Ok(StoredProjects::default())
            }
        }
    }
}

impl<S: KeyValueStore> ProjectRepository for KvProjectRepository<S> {
    fn try_load_all(&self) -> RepoResult<Vec<Project>> {
        let stored = self.read_stored()?;
        if stored.unreadable.is_empty() {
            debug!(
                "event=projects_load module=repo status=ok count={}",
                stored.projects.len()
            );
        } else {
            warn!(
                "event=projects_load module=repo status=recovered reason=bad_records count={} skipped={}",
                stored.projects.len(),
                stored.unreadable.len()
            );
        }
        Ok(stored.projects)
    }

    fn save_all(&self, projects: &[Project]) -> RepoResult<()> {
        let unreadable = self.read_stored()?.unreadable;
        let encoded = serde_json::to_string(&StoredCollection {
            projects,
            unreadable: &unreadable,
        })?;
        self.store.set(PROJECTS_KEY, &encoded)?;
        debug!(
            "event=projects_save module=repo status=ok count={} kept_unreadable={}",
            projects.len(),
            unreadable.len()
        );
        Ok(())
    }
}

#[derive(Default)]
struct StoredProjects {
    projects: Vec<Project>,
    unreadable: Vec<Value>,
}

impl StoredProjects {
    fn decode(raw: &str) -> serde_json::Result<Self> {
        let records: Vec<Value> = serde_json::from_str(raw)?;
        let mut stored = Self::default();
        for record in records {
            match Project::deserialize(&record) {
                Ok(project) => stored.projects.push(project),
                Err(_) => stored.unreadable.push(record),
            }
        }
        Ok(stored)
    }
}

/// Saved array: the given projects, then records that never decoded.
struct StoredCollection<'a> {
    projects: &'a [Project],
    unreadable: &'a [Value],
}

impl Serialize for StoredCollection<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.projects.len() + self.unreadable.len();
        let mut seq = serializer.serialize_seq(Some(len))?;
        for project in self.projects {
            seq.serialize_element(project)?;
        }
        for record in self.unreadable {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}
