use serde::{Deserialize, Serialize};

use crate::model::PaymentMethod;

// ---- account ----

#[derive(Deserialize, Serialize)]
pub struct SignupReqDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Deserialize, Serialize)]
pub struct SignupRespDto {
    pub user_id: String,
}

#[derive(Deserialize, Serialize)]
pub struct LoginReqDto {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Serialize)]
pub struct LoginRespDto {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Deserialize, Serialize)]
pub struct AddressDto {
    pub house: String,
    pub street: String,
    pub city: String,
    pub post_code: String,
}

// ---- catalog ----

#[derive(Deserialize, Serialize)]
pub struct ProductCreateReqDto {
    pub name: String,
    pub price: u32,
    pub image: String,
    pub rating: u8,
}

#[derive(Deserialize, Serialize)]
pub struct ProductCreateRespDto {
    pub product_id: String,
}

#[derive(Deserialize, Serialize)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub price: u32,
    pub image: String,
    pub rating: u8,
}

#[derive(Deserialize)]
pub struct ProductSearchQryDto {
    pub keyword: String,
}

// product identifier carried in query string, the original client keeps
// it out of the request body
#[derive(Deserialize)]
pub struct ProductIdQryDto {
    pub product_id: String,
}

// ---- cart / checkout ----

#[derive(Deserialize, Serialize)]
pub struct CartLineDto {
    pub product_id: String,
    pub name: String,
    pub price: u32,
    pub image: String,
    pub rating: u8,
    pub quantity: u32,
}

#[derive(Deserialize, Serialize)]
pub struct CartDto {
    pub lines: Vec<CartLineDto>,
    pub total_price: u64,
}

#[derive(Deserialize, Serialize)]
pub struct OrderDto {
    pub order_id: String,
    pub ordered_at: String,
    pub price: u64,
    #[serde(flatten)]
    pub payment: PaymentMethod,
    pub lines: Vec<CartLineDto>,
}

#[derive(Deserialize, Serialize)]
pub struct CheckoutRespDto {
    pub order_id: String,
    pub price: u64,
}

#[derive(Deserialize, Serialize)]
pub struct CartQuotaErrorDto {
    pub given: usize,
    pub max_: usize,
}
