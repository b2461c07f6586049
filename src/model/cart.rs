use serde::{Deserialize, Serialize};

use crate::api::web::dto::{CartDto, CartLineDto};

use super::ProductModel;

// a catalog-product snapshot frozen at add-time, a later price change in
// the catalog never propagates into lines already saved in a cart or in
// recorded order history
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CartLineModel {
    pub product_id: String,
    pub name: String,
    pub price: u32,
    pub image: String,
    pub rating: u8,
    pub quantity: u32,
}

pub struct CartModel {
    pub owner: String,
    pub saved_lines: Vec<CartLineModel>,
    pub total_price: u64,
}

impl From<(&ProductModel, u32)> for CartLineModel {
    fn from(value: (&ProductModel, u32)) -> Self {
        let (p, quantity) = value;
        Self {
            product_id: p.id_.clone(),
            name: p.name.clone(),
            price: p.price,
            image: p.image.clone(),
            rating: p.rating,
            quantity,
        }
    }
}

impl Into<CartLineDto> for CartLineModel {
    fn into(self) -> CartLineDto {
        CartLineDto {
            product_id: self.product_id,
            name: self.name,
            price: self.price,
            image: self.image,
            rating: self.rating,
            quantity: self.quantity,
        }
    }
}

impl Into<CartDto> for CartModel {
    fn into(self) -> CartDto {
        CartDto {
            total_price: self.total_price,
            lines: self
                .saved_lines
                .into_iter()
                .map(CartLineModel::into)
                .collect::<Vec<_>>(),
        }
    }
}

impl CartModel {
    // the same arithmetic the store-side grouping pipeline performs, the
    // in-memory backend and unit tests rely on this fold
    pub fn fold_total(lines: &[CartLineModel]) -> u64 {
        lines
            .iter()
            .map(|l| (l.price as u64) * (l.quantity as u64))
            .sum()
    }
}
