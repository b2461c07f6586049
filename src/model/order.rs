use chrono::{DateTime, FixedOffset, Local as LocalTime};
use serde::{Deserialize, Serialize};

use crate::api::web::dto::OrderDto;
use crate::constant::app_meta;
use crate::generate_custom_uid;

use super::{CartLineModel, CartModel};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    // the only method currently populated, collecting cash at delivery
    // time, no payment-processor integration exists in this service
    CashOnDelivery,
}

/// immutable record of one checkout event, appended to the owning user
/// document and never rewritten afterwards. `price` is frozen at creation
/// time and must equal the sum of `lines[i].price * lines[i].quantity`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderModel {
    pub order_id: String,
    pub ordered_at: DateTime<FixedOffset>,
    pub price: u64,
    pub payment: PaymentMethod,
    pub discount: Option<u32>,
    pub lines: Vec<CartLineModel>,
}

impl OrderModel {
    // bulk checkout, the whole current cart becomes one order. Callers
    // reject the empty cart before reaching this constructor.
    pub fn through_checkout(lines: Vec<CartLineModel>, total: u64) -> Self {
        Self {
            order_id: Self::generate_id(),
            ordered_at: LocalTime::now().fixed_offset(),
            price: total,
            payment: PaymentMethod::CashOnDelivery,
            discount: None,
            lines,
        }
    }

    // instant buy, a single catalog product ordered without touching
    // the cart
    pub fn through_instant_buy(line: CartLineModel) -> Self {
        let total = CartModel::fold_total(std::slice::from_ref(&line));
        Self {
            order_id: Self::generate_id(),
            ordered_at: LocalTime::now().fixed_offset(),
            price: total,
            payment: PaymentMethod::CashOnDelivery,
            discount: None,
            lines: vec![line],
        }
    }

    fn generate_id() -> String {
        let oid = generate_custom_uid(app_meta::MACHINE_CODE);
        let mut out = String::new();
        oid.as_bytes()
            .iter()
            .map(|b| {
                out += format!("{:02x}", b).as_str();
            })
            .count();
        out
    }
}

impl Into<OrderDto> for OrderModel {
    fn into(self) -> OrderDto {
        OrderDto {
            order_id: self.order_id,
            ordered_at: self.ordered_at.to_rfc3339(),
            price: self.price,
            payment: self.payment,
            lines: self
                .lines
                .into_iter()
                .map(CartLineModel::into)
                .collect::<Vec<_>>(),
        }
    }
}
