use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::adapter::datastore::AbstInMemoryDStore;
use crate::constant::datastore::USER_COLLECTION;
use crate::error::AppError;
use crate::model::OrderModel;
use crate::repository::{validate_user_id, AbsOrderRepo};

use super::{dump_user, load_user};

pub struct OrderInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl OrderInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(USER_COLLECTION).await?;
        Ok(Self { datastore: m })
    }
}

#[async_trait]
impl AbsOrderRepo for OrderInMemRepo {
    async fn checkout_cart(&self, owner: &str, order: OrderModel) -> DefaultResult<(), AppError> {
        let key = validate_user_id(owner)?;
        let (raw, lock) = self
            .datastore
            .fetch_acquire(USER_COLLECTION, key.as_str())
            .await?;
        let mut usr = load_user(raw, key.as_str())?;
        // append then clear under one lock, the same all-or-nothing window
        // a single multi-field document update gives on the real store
        usr.apply_checkout(order);
        let doc = dump_user(&usr)?;
        self.datastore.save_release(USER_COLLECTION, key, doc, lock)
    }

    async fn append_order(&self, owner: &str, order: OrderModel) -> DefaultResult<(), AppError> {
        let key = validate_user_id(owner)?;
        let (raw, lock) = self
            .datastore
            .fetch_acquire(USER_COLLECTION, key.as_str())
            .await?;
        let mut usr = load_user(raw, key.as_str())?;
        usr.append_order(order);
        let doc = dump_user(&usr)?;
        self.datastore.save_release(USER_COLLECTION, key, doc, lock)
    }

    async fn fetch_orders(&self, owner: &str) -> DefaultResult<Vec<OrderModel>, AppError> {
        let key = validate_user_id(owner)?;
        let raw = self
            .datastore
            .fetch_one(USER_COLLECTION, key.as_str())
            .await?;
        let usr = load_user(raw, key.as_str())?;
        Ok(usr.orders)
    }
} // end of impl OrderInMemRepo
