use std::boxed::Box;
use std::result::Result as DefaultResult;

use crate::api::web::dto::{CheckoutRespDto, OrderDto};
use crate::auth::AppAuthedClaim;
use crate::error::{AppError, AppErrorCode};
use crate::model::{CartLineModel, OrderModel};
use crate::repository::{AbsCartRepo, AbsOrderRepo, AbsPricingRepo, AbsProductRepo};

pub struct CheckoutCartUseCase {
    pub repo_cart: Box<dyn AbsCartRepo>,
    pub repo_pricing: Box<dyn AbsPricingRepo>,
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub authed_usr: AppAuthedClaim,
}

pub struct InstantBuyUseCase {
    pub repo_product: Box<dyn AbsProductRepo>,
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub authed_usr: AppAuthedClaim,
}

pub struct ListOrdersUseCase {
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub authed_usr: AppAuthedClaim,
}

pub enum CheckoutUcResult {
    Success(CheckoutRespDto),
    EmptyCart,
    UserNotFound,
    InvalidUser,
    // an order may have been recorded without durable confirmation,
    // callers retry with care instead of blindly re-submitting
    PartialCompletion(AppError),
    ServerError(AppError),
}

pub enum InstantBuyUcResult {
    Success(CheckoutRespDto),
    ProductNotFound,
    UserNotFound,
    InvalidUser,
    ServerError(AppError),
}

pub enum ListOrdersUcResult {
    Success(Vec<OrderDto>),
    UserNotFound,
    InvalidUser,
    ServerError(AppError),
}

impl CheckoutCartUseCase {
    pub async fn execute(self) -> CheckoutUcResult {
        match self.run().await {
            Ok(resp) => CheckoutUcResult::Success(resp),
            Err(e) => match e.code {
                AppErrorCode::EmptyCart => CheckoutUcResult::EmptyCart,
                AppErrorCode::UserNotExist => CheckoutUcResult::UserNotFound,
                AppErrorCode::InvalidUserId => CheckoutUcResult::InvalidUser,
                AppErrorCode::CheckoutPartialDone => CheckoutUcResult::PartialCompletion(e),
                ref _others => CheckoutUcResult::ServerError(e),
            },
        }
    }

    async fn run(&self) -> DefaultResult<CheckoutRespDto, AppError> {
        let owner = self.authed_usr.profile.as_str();
        let lines = self.repo_cart.fetch_cart(owner).await?;
        if lines.is_empty() {
            // decided policy, an empty cart never turns into a zero-value
            // order, re-running a finished checkout cannot double-charge
            return Err(AppError {
                code: AppErrorCode::EmptyCart,
                detail: None,
            });
        }
        let total = self.repo_pricing.cart_total(owner).await?;
        // the order is fully formed before anything is persisted, the
        // store then applies it together with the cart reset as one
        // atomic document update
        let order = OrderModel::through_checkout(lines, total);
        let resp = CheckoutRespDto {
            order_id: order.order_id.clone(),
            price: order.price,
        };
        self.repo_order.checkout_cart(owner, order).await?;
        Ok(resp)
    }
} // end of impl CheckoutCartUseCase

impl InstantBuyUseCase {
    pub async fn execute(self, product_id: String) -> InstantBuyUcResult {
        match self.run(product_id).await {
            Ok(resp) => InstantBuyUcResult::Success(resp),
            Err(e) => match e.code {
                AppErrorCode::ProductNotExist | AppErrorCode::InvalidInput => {
                    InstantBuyUcResult::ProductNotFound
                }
                AppErrorCode::UserNotExist => InstantBuyUcResult::UserNotFound,
                AppErrorCode::InvalidUserId => InstantBuyUcResult::InvalidUser,
                ref _others => InstantBuyUcResult::ServerError(e),
            },
        }
    }

    async fn run(&self, product_id: String) -> DefaultResult<CheckoutRespDto, AppError> {
        let owner = self.authed_usr.profile.as_str();
        let product = self.repo_product.fetch_one(product_id.as_str()).await?;
        let line = CartLineModel::from((&product, 1u32));
        let order = OrderModel::through_instant_buy(line);
        let resp = CheckoutRespDto {
            order_id: order.order_id.clone(),
            price: order.price,
        };
        // one append onto the order history, the cart stays untouched
        self.repo_order.append_order(owner, order).await?;
        Ok(resp)
    }
} // end of impl InstantBuyUseCase

impl ListOrdersUseCase {
    pub async fn execute(self) -> ListOrdersUcResult {
        let owner = self.authed_usr.profile.as_str();
        match self.repo_order.fetch_orders(owner).await {
            Ok(ms) => {
                let out = ms.into_iter().map(OrderModel::into).collect::<Vec<_>>();
                ListOrdersUcResult::Success(out)
            }
            Err(e) => match e.code {
                AppErrorCode::UserNotExist => ListOrdersUcResult::UserNotFound,
                AppErrorCode::InvalidUserId => ListOrdersUcResult::InvalidUser,
                ref _others => ListOrdersUcResult::ServerError(e),
            },
        }
    }
}
