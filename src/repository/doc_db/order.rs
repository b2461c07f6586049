use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, to_document, Document};
use mongodb::error::{ErrorKind, WriteFailure};

use crate::adapter::datastore::{run_with_deadline, AppDocDbStore};
use crate::constant::hard_limit;
use crate::error::{AppError, AppErrorCode};
use crate::model::OrderModel;
use crate::repository::{validate_user_id, AbsOrderRepo};

use super::pick_store;

pub(crate) struct OrderDocDbRepo {
    _db: Arc<AppDocDbStore>,
}

// a write-concern failure means the server may have applied the update
// without confirming durability, the order is possibly recorded while the
// caller cannot know, which is the one partial-completion state left after
// the checkout became a single atomic update
fn map_checkout_error(e: mongodb::error::Error) -> AppError {
    let unconfirmed = matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteConcernError(_))
    );
    let code = if unconfirmed {
        AppErrorCode::CheckoutPartialDone
    } else {
        AppErrorCode::CheckoutFailure
    };
    AppError {
        code,
        detail: Some(e.to_string()),
    }
}

impl OrderDocDbRepo {
    pub(crate) fn new(dbs: Vec<Arc<AppDocDbStore>>) -> DefaultResult<Self, AppError> {
        let _db = pick_store(&dbs)?;
        Ok(Self { _db })
    }

    fn order_to_document(order: &OrderModel) -> DefaultResult<Document, AppError> {
        to_document(order).map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(e.to_string()),
        })
    }
}

#[async_trait]
impl AbsOrderRepo for OrderDocDbRepo {
    async fn checkout_cart(&self, owner: &str, order: OrderModel) -> DefaultResult<(), AppError> {
        let key = validate_user_id(owner)?;
        let order_doc = Self::order_to_document(&order)?;
        // append the fully-formed order and clear the cart in ONE document
        // update, there is no window in which the order exists while the
        // cart still holds its lines
        let filter = doc! {"_id": key.as_str()};
        let update = doc! {
            "$push": {"orders": order_doc},
            "$set": {"cart": []},
        };
        let col = self._db.users();
        let result = run_with_deadline(hard_limit::SECONDS_MUTATE_OP, "order-checkout", async move {
            col.update_one(filter, update)
                .await
                .map_err(map_checkout_error)
        })
        .await?;
        if result.matched_count == 0 {
            Err(AppError {
                code: AppErrorCode::UserNotExist,
                detail: Some(key),
            })
        } else {
            Ok(())
        }
    } // end of fn checkout_cart

    async fn append_order(&self, owner: &str, order: OrderModel) -> DefaultResult<(), AppError> {
        let key = validate_user_id(owner)?;
        let order_doc = Self::order_to_document(&order)?;
        let filter = doc! {"_id": key.as_str()};
        let update = doc! {"$push": {"orders": order_doc}};
        let col = self._db.users();
        let result =
            run_with_deadline(hard_limit::SECONDS_MUTATE_OP, "order-instant-buy", async move {
                col.update_one(filter, update).await.map_err(|e| AppError {
                    code: AppErrorCode::CheckoutFailure,
                    detail: Some(e.to_string()),
                })
            })
            .await?;
        if result.matched_count == 0 {
            Err(AppError {
                code: AppErrorCode::UserNotExist,
                detail: Some(key),
            })
        } else {
            Ok(())
        }
    }

    async fn fetch_orders(&self, owner: &str) -> DefaultResult<Vec<OrderModel>, AppError> {
        let key = validate_user_id(owner)?;
        let col = self._db.users();
        let filter = doc! {"_id": key.as_str()};
        let result = run_with_deadline(hard_limit::SECONDS_READ_OP, "order-history", async move {
            let found = col.find_one(filter).await?;
            Ok(found)
        })
        .await?;
        match result {
            Some(usr) => Ok(usr.orders),
            None => Err(AppError {
                code: AppErrorCode::UserNotExist,
                detail: Some(key),
            }),
        }
    }
} // end of impl OrderDocDbRepo
