use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::adapter::datastore::AbstInMemoryDStore;
use crate::constant::datastore::USER_COLLECTION;
use crate::error::AppError;
use crate::model::CartModel;
use crate::repository::{validate_user_id, AbsPricingRepo};

use super::load_user;

// the real document store groups and sums server side, this backend folds
// over the embedded lines with the identical arithmetic
pub struct PricingInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl PricingInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(USER_COLLECTION).await?;
        Ok(Self { datastore: m })
    }
}

#[async_trait]
impl AbsPricingRepo for PricingInMemRepo {
    async fn cart_total(&self, owner: &str) -> DefaultResult<u64, AppError> {
        let key = validate_user_id(owner)?;
        let raw = self
            .datastore
            .fetch_one(USER_COLLECTION, key.as_str())
            .await?;
        // an empty cart (or an unmatched user) totals to zero, same as the
        // empty aggregate result set on the server-side pipeline
        let total = match raw {
            Some(d) => {
                let usr = load_user(Some(d), key.as_str())?;
                CartModel::fold_total(&usr.cart)
            }
            None => 0u64,
        };
        Ok(total)
    }
}
