use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::doc;

use crate::adapter::datastore::{run_with_deadline, AppDocDbStore};
use crate::constant::hard_limit;
use crate::error::{AppError, AppErrorCode};
use crate::model::ProductModel;
use crate::repository::{validate_product_id, AbsProductRepo};

use super::pick_store;

pub(crate) struct ProductDocDbRepo {
    _db: Arc<AppDocDbStore>,
}

impl ProductDocDbRepo {
    pub(crate) fn new(dbs: Vec<Arc<AppDocDbStore>>) -> DefaultResult<Self, AppError> {
        let _db = pick_store(&dbs)?;
        Ok(Self { _db })
    }

    async fn find_many(
        &self,
        filter: mongodb::bson::Document,
        op_label: &str,
    ) -> DefaultResult<Vec<ProductModel>, AppError> {
        let col = self._db.products();
        run_with_deadline(hard_limit::SECONDS_READ_OP, op_label, async move {
            let mut cursor = col.find(filter).await?;
            let mut out = Vec::new();
            while cursor.advance().await? {
                let item = cursor.deserialize_current()?;
                out.push(item);
            }
            Ok(out)
        })
        .await
    }
}

#[async_trait]
impl AbsProductRepo for ProductDocDbRepo {
    async fn create(&self, item: ProductModel) -> DefaultResult<(), AppError> {
        let col = self._db.products();
        run_with_deadline(hard_limit::SECONDS_MUTATE_OP, "product-create", async move {
            let _r = col.insert_one(&item).await?;
            Ok(())
        })
        .await
    }

    async fn fetch_one(&self, id_: &str) -> DefaultResult<ProductModel, AppError> {
        let key = validate_product_id(id_)?;
        let col = self._db.products();
        let filter = doc! {"_id": key.as_str()};
        let result = run_with_deadline(hard_limit::SECONDS_READ_OP, "product-fetch-one", async move {
            let found = col.find_one(filter).await?;
            Ok(found)
        })
        .await?;
        result.ok_or(AppError {
            code: AppErrorCode::ProductNotExist,
            detail: Some(key),
        })
    }

    async fn fetch_all(&self) -> DefaultResult<Vec<ProductModel>, AppError> {
        self.find_many(doc! {}, "product-fetch-all").await
    }

    async fn search(&self, keyword: &str) -> DefaultResult<Vec<ProductModel>, AppError> {
        // substring semantics, every regex metacharacter in user input is
        // neutralised before it reaches the store
        let pattern = regex::escape(keyword);
        let filter = doc! {"name": {"$regex": pattern, "$options": "i"}};
        self.find_many(filter, "product-search").await
    }
} // end of impl ProductDocDbRepo
