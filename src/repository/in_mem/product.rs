use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::adapter::datastore::AbstInMemoryDStore;
use crate::constant::datastore::PRODUCT_COLLECTION;
use crate::error::{AppError, AppErrorCode};
use crate::model::ProductModel;
use crate::repository::{validate_product_id, AbsProductRepo};

pub struct ProductInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl ProductInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(PRODUCT_COLLECTION).await?;
        Ok(Self { datastore: m })
    }

    fn decode(raw: serde_json::Value) -> DefaultResult<ProductModel, AppError> {
        serde_json::from_value::<ProductModel>(raw).map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(format!("product-doc, {}", e)),
        })
    }
}

#[async_trait]
impl AbsProductRepo for ProductInMemRepo {
    async fn create(&self, item: ProductModel) -> DefaultResult<(), AppError> {
        let key = item.id_.clone();
        let doc = serde_json::to_value(&item).map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(e.to_string()),
        })?;
        self.datastore.save(PRODUCT_COLLECTION, key, doc).await
    }

    async fn fetch_one(&self, id_: &str) -> DefaultResult<ProductModel, AppError> {
        let key = validate_product_id(id_)?;
        let result = self
            .datastore
            .fetch_one(PRODUCT_COLLECTION, key.as_str())
            .await?;
        match result {
            Some(raw) => Self::decode(raw),
            None => Err(AppError {
                code: AppErrorCode::ProductNotExist,
                detail: Some(key),
            }),
        }
    }

    async fn fetch_all(&self) -> DefaultResult<Vec<ProductModel>, AppError> {
        let rows = self.datastore.fetch_all(PRODUCT_COLLECTION).await?;
        let mut out = rows
            .into_iter()
            .map(|(_k, raw)| Self::decode(raw))
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        // hash-map iteration order is not stable, keep the listing
        // deterministic for callers
        out.sort_by(|a, b| a.id_.cmp(&b.id_));
        Ok(out)
    }

    async fn search(&self, keyword: &str) -> DefaultResult<Vec<ProductModel>, AppError> {
        let all = self.fetch_all().await?;
        let filtered = all
            .into_iter()
            .filter(|p| p.name_matches(keyword))
            .collect::<Vec<_>>();
        Ok(filtered)
    }
} // end of impl ProductInMemRepo
