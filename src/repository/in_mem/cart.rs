use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::adapter::datastore::AbstInMemoryDStore;
use crate::constant::datastore::USER_COLLECTION;
use crate::error::AppError;
use crate::model::CartLineModel;
use crate::repository::{validate_user_id, AbsCartRepo};

use super::{dump_user, load_user};

pub struct CartInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl CartInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(USER_COLLECTION).await?;
        Ok(Self { datastore: m })
    }
}

#[async_trait]
impl AbsCartRepo for CartInMemRepo {
    async fn append_line(&self, owner: &str, line: CartLineModel) -> DefaultResult<(), AppError> {
        let key = validate_user_id(owner)?;
        // the row lock is held from read to write-back, a concurrent append
        // for the same user waits instead of overwriting this one
        let (raw, lock) = self
            .datastore
            .fetch_acquire(USER_COLLECTION, key.as_str())
            .await?;
        let mut usr = load_user(raw, key.as_str())?;
        usr.append_cart_line(line);
        let doc = dump_user(&usr)?;
        self.datastore.save_release(USER_COLLECTION, key, doc, lock)
    }

    async fn remove_lines(&self, owner: &str, product_id: &str) -> DefaultResult<(), AppError> {
        let key = validate_user_id(owner)?;
        let (raw, lock) = self
            .datastore
            .fetch_acquire(USER_COLLECTION, key.as_str())
            .await?;
        let mut usr = load_user(raw, key.as_str())?;
        let _num_removed = usr.remove_cart_lines(product_id);
        let doc = dump_user(&usr)?;
        self.datastore.save_release(USER_COLLECTION, key, doc, lock)
    }

    async fn fetch_cart(&self, owner: &str) -> DefaultResult<Vec<CartLineModel>, AppError> {
        let key = validate_user_id(owner)?;
        let raw = self
            .datastore
            .fetch_one(USER_COLLECTION, key.as_str())
            .await?;
        let usr = load_user(raw, key.as_str())?;
        Ok(usr.cart)
    }

    async fn num_lines(&self, owner: &str) -> DefaultResult<usize, AppError> {
        let lines = self.fetch_cart(owner).await?;
        Ok(lines.len())
    }
} // end of impl CartInMemRepo
