use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::{AppError, AppErrorCode};
use crate::model::{
    AddressModel, AddressSlot, CartLineModel, OrderModel, ProductModel, UserProfileModel,
};
use crate::AppDataStoreContext;

mod doc_db;
mod in_mem;

// make in-memory repos visible for testing purpose
pub use in_mem::cart::CartInMemRepo;
pub use in_mem::order::OrderInMemRepo;
pub use in_mem::pricing::PricingInMemRepo;
pub use in_mem::product::ProductInMemRepo;
pub use in_mem::profile::UserProfileInMemRepo;

use doc_db::cart::CartDocDbRepo;
use doc_db::order::OrderDocDbRepo;
use doc_db::pricing::PricingDocDbRepo;
use doc_db::product::ProductDocDbRepo;
use doc_db::profile::UserProfileDocDbRepo;

// the repository instance may be used across an await, the future created
// by app callers has to be able to pass to different threads, it is the
// reason to add `Send` and `Sync` as super-traits

#[async_trait]
pub trait AbsProductRepo: Sync + Send {
    async fn create(&self, item: ProductModel) -> DefaultResult<(), AppError>;

    async fn fetch_one(&self, id_: &str) -> DefaultResult<ProductModel, AppError>;

    async fn fetch_all(&self) -> DefaultResult<Vec<ProductModel>, AppError>;

    /// case-insensitive substring match on the product name, an empty
    /// result set is a valid outcome, never an error
    async fn search(&self, keyword: &str) -> DefaultResult<Vec<ProductModel>, AppError>;
}

#[async_trait]
pub trait AbsCartRepo: Sync + Send {
    /// single atomic append onto the cart array of exactly one user
    /// document, two concurrent calls for the same user must both survive
    async fn append_line(&self, owner: &str, line: CartLineModel) -> DefaultResult<(), AppError>;

    /// remove EVERY line whose product id matches, succeeds as a no-op
    /// when nothing matches
    async fn remove_lines(&self, owner: &str, product_id: &str) -> DefaultResult<(), AppError>;

    async fn fetch_cart(&self, owner: &str) -> DefaultResult<Vec<CartLineModel>, AppError>;

    async fn num_lines(&self, owner: &str) -> DefaultResult<usize, AppError>;
}

/// monetary total of one user's cart, computed store-side through a
/// grouping pipeline so large embedded arrays are never transferred just
/// to be summed
#[async_trait]
pub trait AbsPricingRepo: Sync + Send {
    async fn cart_total(&self, owner: &str) -> DefaultResult<u64, AppError>;
}

#[async_trait]
pub trait AbsOrderRepo: Sync + Send {
    /// terminal step of a bulk checkout, one multi-field atomic update
    /// appending the fully-formed order and resetting the cart to empty
    async fn checkout_cart(&self, owner: &str, order: OrderModel) -> DefaultResult<(), AppError>;

    /// instant buy, append one order without reading or touching the cart
    async fn append_order(&self, owner: &str, order: OrderModel) -> DefaultResult<(), AppError>;

    async fn fetch_orders(&self, owner: &str) -> DefaultResult<Vec<OrderModel>, AppError>;
}

#[async_trait]
pub trait AbsUserProfileRepo: Sync + Send {
    async fn create(&self, profile: UserProfileModel) -> DefaultResult<(), AppError>;

    async fn num_with_email(&self, email: &str) -> DefaultResult<usize, AppError>;

    async fn num_with_phone(&self, phone: &str) -> DefaultResult<usize, AppError>;

    async fn fetch_by_email(&self, email: &str) -> DefaultResult<UserProfileModel, AppError>;

    async fn update_tokens(
        &self,
        owner: &str,
        token: &str,
        refresh: &str,
    ) -> DefaultResult<(), AppError>;

    /// append while fewer than the maximum slots are filled, `false`
    /// reports a full address book
    async fn add_address(&self, owner: &str, addr: AddressModel) -> DefaultResult<bool, AppError>;

    /// rewrite one existing slot in place, `false` reports the slot has
    /// not been filled yet
    async fn edit_address(
        &self,
        owner: &str,
        slot: AddressSlot,
        addr: AddressModel,
    ) -> DefaultResult<bool, AppError>;

    async fn clear_addresses(&self, owner: &str) -> DefaultResult<(), AppError>;
}

// ---- identifier conversion ----
// callers hand over identifiers as strings taken from the auth claim or
// the query string, repositories convert them to the store's identifier
// format before use

pub(crate) fn validate_user_id(owner: &str) -> DefaultResult<String, AppError> {
    match ObjectId::parse_str(owner) {
        Ok(oid) => Ok(oid.to_hex()),
        Err(_e) => Err(AppError {
            code: AppErrorCode::InvalidUserId,
            detail: Some(format!("malformed-user-id:{}", owner)),
        }),
    }
}

pub(crate) fn validate_product_id(id_: &str) -> DefaultResult<String, AppError> {
    match ObjectId::parse_str(id_) {
        Ok(oid) => Ok(oid.to_hex()),
        Err(_e) => Err(AppError {
            code: AppErrorCode::InvalidInput,
            detail: Some(format!("malformed-product-id:{}", id_)),
        }),
    }
}

pub fn generate_object_id() -> String {
    ObjectId::new().to_hex()
}

// ---- factories ----
// a repository is constructed per unit of work on top of the process-wide
// datastore context, no repository holds ambient global state

macro_rules! missing_dstore {
    () => {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("unknown-type".to_string()),
        })
    };
}

pub async fn app_repo_product(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsProductRepo>, AppError> {
    if let Some(dbs) = ds.doc_dbs.as_ref() {
        let obj = ProductDocDbRepo::new(dbs.clone())?;
        Ok(Box::new(obj))
    } else if let Some(m) = &ds.in_mem {
        let obj = ProductInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        missing_dstore!()
    }
}

pub async fn app_repo_cart(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsCartRepo>, AppError> {
    if let Some(dbs) = ds.doc_dbs.as_ref() {
        let obj = CartDocDbRepo::new(dbs.clone())?;
        Ok(Box::new(obj))
    } else if let Some(m) = &ds.in_mem {
        let obj = CartInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        missing_dstore!()
    }
}

pub async fn app_repo_pricing(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsPricingRepo>, AppError> {
    if let Some(dbs) = ds.doc_dbs.as_ref() {
        let obj = PricingDocDbRepo::new(dbs.clone())?;
        Ok(Box::new(obj))
    } else if let Some(m) = &ds.in_mem {
        let obj = PricingInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        missing_dstore!()
    }
}

pub async fn app_repo_order(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsOrderRepo>, AppError> {
    if let Some(dbs) = ds.doc_dbs.as_ref() {
        let obj = OrderDocDbRepo::new(dbs.clone())?;
        Ok(Box::new(obj))
    } else if let Some(m) = &ds.in_mem {
        let obj = OrderInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        missing_dstore!()
    }
}

pub async fn app_repo_user_profile(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsUserProfileRepo>, AppError> {
    if let Some(dbs) = ds.doc_dbs.as_ref() {
        let obj = UserProfileDocDbRepo::new(dbs.clone())?;
        Ok(Box::new(obj))
    } else if let Some(m) = &ds.in_mem {
        let obj = UserProfileInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        missing_dstore!()
    }
}
