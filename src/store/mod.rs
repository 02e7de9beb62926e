//! Policy persistence over the local store or PostgreSQL.

pub mod local;

pub use local::LocalStore;

use sea_orm::DatabaseConnection;
use tracing::{debug, info};

use crate::config::{AppConfig, StoreBackend};
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{OvertimePolicyApplication, UpdateOvertimePolicy};

/// Where policies are kept. Both backends behave the same.
#[derive(Debug, Clone)]
pub enum PolicyStore {
    Local(LocalStore),
    Database(DatabaseConnection),
}

impl PolicyStore {
    /// Open the backend selected in config. `force_local` overrides the config choice.
    pub async fn open(config: &AppConfig, force_local: bool) -> Result<Self> {
        if force_local || config.store.backend == StoreBackend::Local {
            let store = LocalStore::open(config.local_store_path()).await?;
            debug!("Local store file: {:?}", store.path());
            return Ok(Self::Local(store));
        }

        let conn = db::connect(&config.database).await?;
        db::test_connection(&conn).await?;
        db::ensure_schema(&conn).await?;

        if let Ok(version) = db::get_version(&conn).await {
            info!("PostgreSQL: {}", version);
        }
        if let Ok(count) = db::count_policies(&conn).await {
            info!("Tables: {} overtime policies", count);
        }

        Ok(Self::Database(conn))
    }

    /// Short backend label for the status bar.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Local(_) => "Local",
            Self::Database(_) => "PostgreSQL",
        }
    }

    /// Insert a new record, or merge an existing one by id.
    ///
    /// For an existing record the id is stripped and the remaining fields are written
    /// over the stored ones. Fails with `NotFound` if the id is not stored.
    pub async fn save(&self, record: OvertimePolicyApplication) -> Result<()> {
        let code = record.ot_policy.ot_policy_code.clone();

        match record.id {
            Some(id) => {
                let changes = UpdateOvertimePolicy::from(record);
                let updated = match self {
                    Self::Local(store) => store.update(id, changes).await?,
                    Self::Database(conn) => db::ot_policy::update(conn, id, changes).await?,
                };
                if updated.is_none() {
                    return Err(AppError::not_found(format!("Overtime policy {id}")));
                }
                info!("Updated overtime policy {} ({})", id, code);
            }
            None => {
                let created = match self {
                    Self::Local(store) => store.insert(record).await?,
                    Self::Database(conn) => db::ot_policy::create(conn, record).await?,
                };
                info!("Created overtime policy {:?} ({})", created.id, code);
            }
        }
        Ok(())
    }

    /// Remove one record, returning whether it existed.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let removed = match self {
            Self::Local(store) => store.delete(id).await?,
            Self::Database(conn) => db::ot_policy::delete(conn, id).await?,
        };
        info!("Delete overtime policy {}: removed={}", id, removed);
        Ok(removed)
    }

    /// Every record in id order.
    pub async fn list_all(&self) -> Result<Vec<OvertimePolicyApplication>> {
        let records = match self {
            Self::Local(store) => store.list_all().await,
            Self::Database(conn) => db::ot_policy::list_all(conn).await?,
        };
        debug!("Loaded {} overtime policies", records.len());
        Ok(records)
    }

    pub async fn get(&self, id: i32) -> Result<Option<OvertimePolicyApplication>> {
        match self {
            Self::Local(store) => Ok(store.get(id).await),
            Self::Database(conn) => db::ot_policy::get_by_id(conn, id).await,
        }
    }
}
