use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, Bson};

use crate::adapter::datastore::{run_with_deadline, AppDocDbStore};
use crate::constant::hard_limit;
use crate::error::{AppError, AppErrorCode};
use crate::repository::{validate_user_id, AbsPricingRepo};

use super::pick_store;

pub(crate) struct PricingDocDbRepo {
    _db: Arc<AppDocDbStore>,
}

fn as_aggregation_failure(e: AppError) -> AppError {
    if matches!(e.code, AppErrorCode::DatabaseTimeout) {
        e
    } else {
        AppError {
            code: AppErrorCode::AggregationFailure,
            detail: e.detail,
        }
    }
}

impl PricingDocDbRepo {
    pub(crate) fn new(dbs: Vec<Arc<AppDocDbStore>>) -> DefaultResult<Self, AppError> {
        let _db = pick_store(&dbs)?;
        Ok(Self { _db })
    }
}

#[async_trait]
impl AbsPricingRepo for PricingDocDbRepo {
    async fn cart_total(&self, owner: &str) -> DefaultResult<u64, AppError> {
        let key = validate_user_id(owner)?;
        // match one user, unwind the embedded lines, group-sum the money,
        // only the grouped row travels back, never the cart itself
        let pipeline = vec![
            doc! {"$match": {"_id": key.as_str()}},
            doc! {"$unwind": {"path": "$cart"}},
            doc! {"$group": {
                "_id": "$_id",
                "total": {"$sum": {"$multiply": ["$cart.price", "$cart.quantity"]}},
            }},
        ];
        let col = self._db.users();
        let rows = run_with_deadline(hard_limit::SECONDS_READ_OP, "pricing-cart-total", async move {
            let mut cursor = col.aggregate(pipeline).await?;
            let mut rows = Vec::new();
            while cursor.advance().await? {
                let d = cursor.deserialize_current()?;
                rows.push(d);
            }
            Ok(rows)
        })
        .await
        .map_err(as_aggregation_failure)?;
        // grouping over zero unwound lines yields no row at all, that is
        // a total of zero, not an error
        let total = match rows.first() {
            Some(d) => match d.get("total") {
                Some(Bson::Int32(v)) => (*v).max(0) as u64,
                Some(Bson::Int64(v)) => (*v).max(0) as u64,
                Some(Bson::Double(v)) => v.max(0f64) as u64,
                _others => {
                    return Err(AppError {
                        code: AppErrorCode::AggregationFailure,
                        detail: Some("total-field-decode".to_string()),
                    })
                }
            },
            None => 0u64,
        };
        Ok(total)
    } // end of fn cart_total
} // end of impl PricingDocDbRepo
