use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsnVal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::AppInMemoryDbCfg;
use crate::error::{AppError, AppErrorCode};

// table label -> document key -> document body. Documents are JSON values
// because this store mirrors an embedded-document data model, a whole user
// profile (with its cart and order history) is one row.
pub type AppInMemTableContent = HashMap<String, JsnVal>;
type InnerStoreContent = HashMap<String, AppInMemTableContent>;

/// proof that the caller still holds the store-wide lock taken by
/// `fetch_acquire`, consumed by `save_release` to finish an atomic
/// read-modify-write on one document
pub struct AppInMemDstoreLock {
    guard: OwnedMutexGuard<InnerStoreContent>,
}

#[async_trait]
pub trait AbstInMemoryDStore: Send + Sync {
    fn new(cfg: &AppInMemoryDbCfg) -> Self
    where
        Self: Sized;

    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError>;

    /// whole-document upsert
    async fn save(&self, table: &str, key: String, doc: JsnVal) -> DefaultResult<(), AppError>;

    async fn fetch_one(&self, table: &str, key: &str)
        -> DefaultResult<Option<JsnVal>, AppError>;

    async fn fetch_all(&self, table: &str) -> DefaultResult<Vec<(String, JsnVal)>, AppError>;

    async fn delete(&self, table: &str, key: &str) -> DefaultResult<usize, AppError>;

    /// take the store lock and read one document, the returned lock MUST
    /// be passed back through `save_release`, concurrent operations on the
    /// same store wait until then. This pair is what gives the in-memory
    /// backend the same single-document atomicity the real document store
    /// provides with its update operators.
    async fn fetch_acquire(
        &self,
        table: &str,
        key: &str,
    ) -> DefaultResult<(Option<JsnVal>, AppInMemDstoreLock), AppError>;

    fn save_release(
        &self,
        table: &str,
        key: String,
        doc: JsnVal,
        lock: AppInMemDstoreLock,
    ) -> DefaultResult<(), AppError>;
}

pub struct AppInMemoryDStore {
    max_items_per_table: u32,
    rows: Arc<Mutex<InnerStoreContent>>,
}

impl AppInMemoryDStore {
    fn check_table<'a>(
        content: &'a InnerStoreContent,
        label: &str,
    ) -> DefaultResult<&'a AppInMemTableContent, AppError> {
        content.get(label).ok_or(AppError {
            code: AppErrorCode::DataTableNotExist,
            detail: Some(label.to_string()),
        })
    }

    fn write_row(
        content: &mut InnerStoreContent,
        table: &str,
        key: String,
        doc: JsnVal,
        max_items: u32,
    ) -> DefaultResult<(), AppError> {
        let t = content.get_mut(table).ok_or(AppError {
            code: AppErrorCode::DataTableNotExist,
            detail: Some(table.to_string()),
        })?;
        if !t.contains_key(key.as_str()) && t.len() >= max_items as usize {
            return Err(AppError {
                code: AppErrorCode::ExceedingMaxLimit,
                detail: Some(format!("table:{}, limit:{}", table, max_items)),
            });
        }
        let _old = t.insert(key, doc);
        Ok(())
    }
}

#[async_trait]
impl AbstInMemoryDStore for AppInMemoryDStore {
    fn new(cfg: &AppInMemoryDbCfg) -> Self {
        Self {
            max_items_per_table: cfg.max_items,
            rows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError> {
        let mut guard = self.rows.lock().await;
        if !guard.contains_key(label) {
            let _ = guard.insert(label.to_string(), HashMap::new());
        }
        Ok(())
    }

    async fn save(&self, table: &str, key: String, doc: JsnVal) -> DefaultResult<(), AppError> {
        let mut guard = self.rows.lock().await;
        Self::write_row(&mut guard, table, key, doc, self.max_items_per_table)
    }

    async fn fetch_one(
        &self,
        table: &str,
        key: &str,
    ) -> DefaultResult<Option<JsnVal>, AppError> {
        let guard = self.rows.lock().await;
        let t = Self::check_table(&guard, table)?;
        Ok(t.get(key).cloned())
    }

    async fn fetch_all(&self, table: &str) -> DefaultResult<Vec<(String, JsnVal)>, AppError> {
        let guard = self.rows.lock().await;
        let t = Self::check_table(&guard, table)?;
        let out = t
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<Vec<_>>();
        Ok(out)
    }

    async fn delete(&self, table: &str, key: &str) -> DefaultResult<usize, AppError> {
        let mut guard = self.rows.lock().await;
        let t = guard.get_mut(table).ok_or(AppError {
            code: AppErrorCode::DataTableNotExist,
            detail: Some(table.to_string()),
        })?;
        let num = if t.remove(key).is_some() { 1 } else { 0 };
        Ok(num)
    }

    async fn fetch_acquire(
        &self,
        table: &str,
        key: &str,
    ) -> DefaultResult<(Option<JsnVal>, AppInMemDstoreLock), AppError> {
        let guard = self.rows.clone().lock_owned().await;
        let t = Self::check_table(&guard, table)?;
        let found = t.get(key).cloned();
        Ok((found, AppInMemDstoreLock { guard }))
    }

    fn save_release(
        &self,
        table: &str,
        key: String,
        doc: JsnVal,
        lock: AppInMemDstoreLock,
    ) -> DefaultResult<(), AppError> {
        let mut lock = lock;
        Self::write_row(
            &mut lock.guard,
            table,
            key,
            doc,
            self.max_items_per_table,
        )
        // lock dropped at end of scope, other operations may resume
    }
} // end of impl AppInMemoryDStore
