pub(super) mod cart;
pub(super) mod order;
pub(super) mod pricing;
pub(super) mod product;
pub(super) mod profile;

use std::result::Result as DefaultResult;
use std::sync::Arc;

use crate::adapter::datastore::AppDocDbStore;
use crate::error::{AppError, AppErrorCode};

pub(super) fn pick_store(
    dbs: &Vec<Arc<AppDocDbStore>>,
) -> DefaultResult<Arc<AppDocDbStore>, AppError> {
    // multi-shard routing is not supported yet, always the first server
    dbs.first().cloned().ok_or(AppError {
        code: AppErrorCode::MissingDataStore,
        detail: Some("doc-db".to_string()),
    })
}
