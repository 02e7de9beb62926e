//! Local key-value policy store.
//!
//! Records live in memory keyed by an auto-assigned id. When opened with a path the
//! whole record set is written back as a JSON array after every mutation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::{OvertimePolicyApplication, UpdateOvertimePolicy};

#[derive(Debug, Default)]
struct LocalState {
    next_id: i32,
    records: BTreeMap<i32, OvertimePolicyApplication>,
}

/// In-process store, cheap to clone and share with background tasks.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    state: Arc<RwLock<LocalState>>,
    path: Option<PathBuf>,
}

impl LocalStore {
    /// Store without a backing file.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store, loading existing records if the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
            return Err(AppError::config(format!("Local store path {:?} is a directory", path)));
        }
        let records = load_snapshot(&path).await?;
        let next_id = records.keys().next_back().copied().unwrap_or(0);

        info!("Local store {:?}: {} policies", path, records.len());

        Ok(Self {
            state: Arc::new(RwLock::new(LocalState { next_id, records })),
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All records ordered by id.
    pub async fn list_all(&self) -> Vec<OvertimePolicyApplication> {
        self.state.read().await.records.values().cloned().collect()
    }

    pub async fn get(&self, id: i32) -> Option<OvertimePolicyApplication> {
        self.state.read().await.records.get(&id).cloned()
    }

    /// Insert a record under a fresh id and return the stored copy.
    pub async fn insert(&self, mut record: OvertimePolicyApplication) -> Result<OvertimePolicyApplication> {
        let mut state = self.state.write().await;
        let id = state.next_id + 1;
        record.id = Some(id);

        let mut records = state.records.clone();
        records.insert(id, record.clone());
        self.persist(&records).await?;

        state.next_id = id;
        state.records = records;
        debug!("Inserted policy {id}");
        Ok(record)
    }

    /// Merge changes into the record with `id`. Returns `None` if there is no such record.
    pub async fn update(&self, id: i32, changes: UpdateOvertimePolicy) -> Result<Option<OvertimePolicyApplication>> {
        let mut state = self.state.write().await;
        let Some(current) = state.records.get(&id) else {
            return Ok(None);
        };
        let mut updated = current.clone();
        changes.apply_to(&mut updated);

        let mut records = state.records.clone();
        records.insert(id, updated.clone());
        self.persist(&records).await?;

        state.records = records;
        debug!("Updated policy {id}");
        Ok(Some(updated))
    }

    /// Remove the record with `id`, returning whether it existed.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let mut state = self.state.write().await;
        if !state.records.contains_key(&id) {
            return Ok(false);
        }

        let mut records = state.records.clone();
        records.remove(&id);
        self.persist(&records).await?;

        state.records = records;
        debug!("Deleted policy {id}");
        Ok(true)
    }

    /// Write `records` to the backing file. Memory is only updated once this succeeds.
    async fn persist(&self, records: &BTreeMap<i32, OvertimePolicyApplication>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let records: Vec<&OvertimePolicyApplication> = records.values().collect();
        let content = serde_json::to_vec_pretty(&records)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

async fn load_snapshot(path: &Path) -> Result<BTreeMap<i32, OvertimePolicyApplication>> {
    if !tokio::fs::try_exists(path).await? {
        return Ok(BTreeMap::new());
    }

    let content = tokio::fs::read(path).await?;
    let records: Vec<OvertimePolicyApplication> = serde_json::from_slice(&content)?;

    // Snapshots are written by this store, so every record carries an id.
    Ok(records
        .into_iter()
        .filter_map(|record| record.id.map(|id| (id, record)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(code: &str) -> OvertimePolicyApplication {
        let mut record = OvertimePolicyApplication::for_tenant("ORG1", "TEN1");
        record.ot_policy.ot_policy_code = code.to_string();
        record
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("ot-policy-store-{}", std::process::id()))
            .join(name)
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = LocalStore::in_memory();
        let first = store.insert(policy("OT1")).await.unwrap();
        let second = store.insert(policy("OT2")).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(store.list_all().await.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_ignores_incoming_id() {
        let store = LocalStore::in_memory();
        let mut record = policy("OT1");
        record.id = Some(42);

        let stored = store.insert(record).await.unwrap();
        assert_eq!(stored.id, Some(1));
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = LocalStore::in_memory();
        store.insert(policy("OT1")).await.unwrap();
        let second = store.insert(policy("OT2")).await.unwrap();
        assert!(store.delete(second.id.unwrap()).await.unwrap());

        let third = store.insert(policy("OT3")).await.unwrap();
        assert_eq!(third.id, Some(3));
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = LocalStore::in_memory();
        let result = store.update(9, UpdateOvertimePolicy::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let store = LocalStore::in_memory();
        assert!(!store.delete(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_open_directory_is_config_error() {
        let err = LocalStore::open(std::env::temp_dir()).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let path = temp_path("reopen.json");
        tokio::fs::remove_file(&path).await.ok();

        let store = LocalStore::open(&path).await.unwrap();
        store.insert(policy("OT1")).await.unwrap();
        store.insert(policy("OT2")).await.unwrap();
        store.delete(1).await.unwrap();

        let reopened = LocalStore::open(&path).await.unwrap();
        let records = reopened.list_all().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(2));
        assert_eq!(records[0].ot_policy.ot_policy_code, "OT2");

        let next = reopened.insert(policy("OT3")).await.unwrap();
        assert_eq!(next.id, Some(3));

        tokio::fs::remove_file(&path).await.ok();
    }

    /// A store whose file sits under a regular file, so every write fails.
    async fn unwritable_store(name: &str) -> (LocalStore, PathBuf) {
        let blocker = temp_path(name);
        tokio::fs::create_dir_all(blocker.parent().unwrap()).await.unwrap();
        tokio::fs::write(&blocker, b"not a directory").await.unwrap();

        let store = LocalStore {
            state: Arc::default(),
            path: Some(blocker.join("policies.json")),
        };
        (store, blocker)
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_store_unchanged() {
        let (mut store, blocker) = unwritable_store("blocker-insert").await;

        assert!(store.insert(policy("OT1")).await.is_err());
        assert!(store.list_all().await.is_empty());

        // The id was not consumed either.
        store.path = None;
        let stored = store.insert(policy("OT1")).await.unwrap();
        assert_eq!(stored.id, Some(1));

        tokio::fs::remove_file(&blocker).await.ok();
    }

    #[tokio::test]
    async fn test_failed_update_and_delete_leave_store_unchanged() {
        let (mut store, blocker) = unwritable_store("blocker-update").await;
        let path = store.path.take();
        store.insert(policy("OT1")).await.unwrap();
        store.path = path;

        let changes = UpdateOvertimePolicy {
            ot_policy: Some(policy("OT9").ot_policy),
            ..Default::default()
        };
        assert!(store.update(1, changes).await.is_err());
        assert!(store.delete(1).await.is_err());

        let records = store.list_all().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ot_policy.ot_policy_code, "OT1");

        tokio::fs::remove_file(&blocker).await.ok();
    }

    #[tokio::test]
    async fn test_extreme_values_survive_reopen() {
        let path = temp_path("extreme.json");
        tokio::fs::remove_file(&path).await.ok();

        let mut record = policy("OT1");
        record.ot_policy.holiday_multiplier = 1.0e15;
        record.ot_policy.max_ot_hours_per_day = -1.0e9;
        record.ot_policy.min_fixed_minutes = 0.125;

        let store = LocalStore::open(&path).await.unwrap();
        store.insert(record.clone()).await.unwrap();

        let reopened = LocalStore::open(&path).await.unwrap();
        let stored = reopened.get(1).await.unwrap();
        assert_eq!(stored.ot_policy, record.ot_policy);

        tokio::fs::remove_file(&path).await.ok();
    }
}
