use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, to_document};

use crate::adapter::datastore::{run_with_deadline, AppDocDbStore};
use crate::constant::hard_limit;
use crate::error::{AppError, AppErrorCode};
use crate::model::CartLineModel;
use crate::repository::{validate_user_id, AbsCartRepo};

use super::pick_store;

pub(crate) struct CartDocDbRepo {
    _db: Arc<AppDocDbStore>,
}

// a rejected cart write keeps its own error kind so callers can tell it
// apart from a reachability problem, deadline expiry is NOT rewritten
fn as_cart_update_failure(e: AppError) -> AppError {
    if matches!(e.code, AppErrorCode::DatabaseTimeout) {
        e
    } else {
        AppError {
            code: AppErrorCode::CartUpdateFailure,
            detail: e.detail,
        }
    }
}

impl CartDocDbRepo {
    pub(crate) fn new(dbs: Vec<Arc<AppDocDbStore>>) -> DefaultResult<Self, AppError> {
        let _db = pick_store(&dbs)?;
        Ok(Self { _db })
    }

    async fn run_cart_update(
        &self,
        key: String,
        update: mongodb::bson::Document,
        op_label: &str,
    ) -> DefaultResult<(), AppError> {
        let col = self._db.users();
        let filter = doc! {"_id": key.as_str()};
        let result = run_with_deadline(hard_limit::SECONDS_MUTATE_OP, op_label, async move {
            let r = col.update_one(filter, update).await?;
            Ok(r)
        })
        .await
        .map_err(as_cart_update_failure)?;
        if result.matched_count == 0 {
            Err(AppError {
                code: AppErrorCode::UserNotExist,
                detail: Some(key),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AbsCartRepo for CartDocDbRepo {
    async fn append_line(&self, owner: &str, line: CartLineModel) -> DefaultResult<(), AppError> {
        let key = validate_user_id(owner)?;
        let line_doc = to_document(&line).map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(e.to_string()),
        })?;
        // one atomic array append on one document, the store serialises
        // concurrent pushes for the same user, none is silently dropped
        let update = doc! {"$push": {"cart": line_doc}};
        self.run_cart_update(key, update, "cart-append-line").await
    }

    async fn remove_lines(&self, owner: &str, product_id: &str) -> DefaultResult<(), AppError> {
        let key = validate_user_id(owner)?;
        // array pull drops every matching copy, re-running against a cart
        // without matches is a no-op success
        let update = doc! {"$pull": {"cart": {"product_id": product_id}}};
        self.run_cart_update(key, update, "cart-remove-lines").await
    }

    async fn fetch_cart(&self, owner: &str) -> DefaultResult<Vec<CartLineModel>, AppError> {
        let key = validate_user_id(owner)?;
        let col = self._db.users();
        let filter = doc! {"_id": key.as_str()};
        let result = run_with_deadline(hard_limit::SECONDS_READ_OP, "cart-fetch", async move {
            let found = col.find_one(filter).await?;
            Ok(found)
        })
        .await?;
        match result {
            Some(usr) => Ok(usr.cart),
            None => Err(AppError {
                code: AppErrorCode::UserNotExist,
                detail: Some(key),
            }),
        }
    }

    async fn num_lines(&self, owner: &str) -> DefaultResult<usize, AppError> {
        let lines = self.fetch_cart(owner).await?;
        Ok(lines.len())
    }
} // end of impl CartDocDbRepo
