use std::boxed::Box;
use std::result::Result as DefaultResult;

use crate::api::web::dto::{CartDto, CartQuotaErrorDto};
use crate::auth::AppAuthedClaim;
use crate::constant::hard_limit;
use crate::error::{AppError, AppErrorCode};
use crate::model::{CartLineModel, CartModel};
use crate::repository::{AbsCartRepo, AbsPricingRepo, AbsProductRepo};

pub struct AddCartLineUseCase {
    pub repo_product: Box<dyn AbsProductRepo>,
    pub repo_cart: Box<dyn AbsCartRepo>,
    pub authed_usr: AppAuthedClaim,
}

pub struct RemoveCartLinesUseCase {
    pub repo_cart: Box<dyn AbsCartRepo>,
    pub authed_usr: AppAuthedClaim,
}

pub struct RetrieveCartUseCase {
    pub repo_cart: Box<dyn AbsCartRepo>,
    pub repo_pricing: Box<dyn AbsPricingRepo>,
    pub authed_usr: AppAuthedClaim,
}

pub enum AddCartLineUcResult {
    Success,
    ProductNotFound,
    UserNotFound,
    InvalidUser,
    QuotaExceed(CartQuotaErrorDto),
    ServerError(AppError),
}

pub enum RemoveCartLinesUcResult {
    Success,
    UserNotFound,
    InvalidUser,
    ServerError(AppError),
}

pub enum RetrieveCartUcResult {
    Success(CartDto),
    UserNotFound,
    InvalidUser,
    ServerError(AppError),
}

impl AddCartLineUseCase {
    pub async fn execute(self, product_id: String) -> AddCartLineUcResult {
        match self.add_line(product_id).await {
            Ok(v) => match v {
                Some(e) => AddCartLineUcResult::QuotaExceed(e),
                None => AddCartLineUcResult::Success,
            },
            Err(e) => match e.code {
                // a malformed product id trivially matches nothing
                AppErrorCode::ProductNotExist | AppErrorCode::InvalidInput => {
                    AddCartLineUcResult::ProductNotFound
                }
                AppErrorCode::UserNotExist => AddCartLineUcResult::UserNotFound,
                AppErrorCode::InvalidUserId => AddCartLineUcResult::InvalidUser,
                ref _others => AddCartLineUcResult::ServerError(e),
            },
        }
    }

    async fn add_line(
        &self,
        product_id: String,
    ) -> DefaultResult<Option<CartQuotaErrorDto>, AppError> {
        // snapshot at add time, the copied price stays frozen even when
        // the catalog entry changes later
        let product = self.repo_product.fetch_one(product_id.as_str()).await?;
        let owner = self.authed_usr.profile.as_str();
        let num_saved = self.repo_cart.num_lines(owner).await?;
        if num_saved >= hard_limit::MAX_LINES_PER_CART {
            let e = CartQuotaErrorDto {
                given: num_saved + 1,
                max_: hard_limit::MAX_LINES_PER_CART,
            };
            return Ok(Some(e));
        }
        let line = CartLineModel::from((&product, 1u32));
        self.repo_cart.append_line(owner, line).await?;
        Ok(None)
    }
} // end of impl AddCartLineUseCase

impl RemoveCartLinesUseCase {
    pub async fn execute(self, product_id: String) -> RemoveCartLinesUcResult {
        let owner = self.authed_usr.profile.as_str();
        match self
            .repo_cart
            .remove_lines(owner, product_id.as_str())
            .await
        {
            // removing zero matching lines is still a success, the call
            // is idempotent by contract
            Ok(()) => RemoveCartLinesUcResult::Success,
            Err(e) => match e.code {
                AppErrorCode::UserNotExist => RemoveCartLinesUcResult::UserNotFound,
                AppErrorCode::InvalidUserId => RemoveCartLinesUcResult::InvalidUser,
                ref _others => RemoveCartLinesUcResult::ServerError(e),
            },
        }
    }
}

impl RetrieveCartUseCase {
    pub async fn execute(self) -> RetrieveCartUcResult {
        match self.fetch().await {
            Ok(dto) => RetrieveCartUcResult::Success(dto),
            Err(e) => match e.code {
                AppErrorCode::UserNotExist => RetrieveCartUcResult::UserNotFound,
                AppErrorCode::InvalidUserId => RetrieveCartUcResult::InvalidUser,
                ref _others => RetrieveCartUcResult::ServerError(e),
            },
        }
    }

    async fn fetch(&self) -> DefaultResult<CartDto, AppError> {
        let owner = self.authed_usr.profile.as_str();
        let saved_lines = self.repo_cart.fetch_cart(owner).await?;
        let total_price = self.repo_pricing.cart_total(owner).await?;
        let obj = CartModel {
            owner: owner.to_string(),
            saved_lines,
            total_price,
        };
        Ok(obj.into())
    }
} // end of impl RetrieveCartUseCase
