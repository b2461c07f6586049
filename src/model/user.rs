use chrono::{DateTime, FixedOffset, Local as LocalTime};
use serde::{Deserialize, Serialize};

use crate::api::web::dto::AddressDto;
use crate::constant::hard_limit;

use super::{CartLineModel, OrderModel};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AddressModel {
    pub house: String,
    pub street: String,
    pub city: String,
    pub post_code: String,
}

// a user keeps at most 2 address slots, slot 0 is the home address and
// slot 1 the work address
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AddressSlot {
    Home,
    Work,
}

impl AddressSlot {
    pub fn index(&self) -> usize {
        match self {
            Self::Home => 0,
            Self::Work => 1,
        }
    }
}

impl From<AddressDto> for AddressModel {
    fn from(value: AddressDto) -> Self {
        Self {
            house: value.house,
            street: value.street,
            city: value.city,
            post_code: value.post_code,
        }
    }
}

impl Into<AddressDto> for AddressModel {
    fn into(self) -> AddressDto {
        AddressDto {
            house: self.house,
            street: self.street,
            city: self.city,
            post_code: self.post_code,
        }
    }
}

/// one document per registered user, the cart and the order history are
/// embedded so a single-document atomic update covers every mutation this
/// service performs on them
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserProfileModel {
    #[serde(rename = "_id")]
    pub id_: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub passwd_hashed: String,
    pub token: String,
    pub refresh_token: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub addresses: Vec<AddressModel>,
    pub cart: Vec<CartLineModel>,
    pub orders: Vec<OrderModel>,
}

impl UserProfileModel {
    #[allow(clippy::too_many_arguments)]
    pub fn through_signup(
        id_: String,
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
        passwd_hashed: String,
        token: String,
        refresh_token: String,
    ) -> Self {
        let now = LocalTime::now().fixed_offset();
        Self {
            id_,
            first_name,
            last_name,
            email,
            phone,
            passwd_hashed,
            token,
            refresh_token,
            created_at: now,
            updated_at: now,
            addresses: Vec::new(),
            cart: Vec::new(),
            orders: Vec::new(),
        }
    }

    // ---- cart / checkout mutations ----
    // these mirror exactly what the document-store operators do server
    // side, the in-memory backend applies them under its row lock

    pub fn append_cart_line(&mut self, line: CartLineModel) {
        self.cart.push(line);
    }

    /// remove every copy sharing the product id, return how many lines
    /// were dropped, zero is a valid no-op outcome
    pub fn remove_cart_lines(&mut self, product_id: &str) -> usize {
        let before = self.cart.len();
        self.cart.retain(|l| l.product_id != product_id);
        before - self.cart.len()
    }

    /// the single atomic step of a bulk checkout, append the fully-formed
    /// order then reset the cart to empty
    pub fn apply_checkout(&mut self, order: OrderModel) {
        self.orders.push(order);
        self.cart.clear();
    }

    pub fn append_order(&mut self, order: OrderModel) {
        self.orders.push(order);
    }

    pub fn try_add_address(&mut self, addr: AddressModel) -> bool {
        if self.addresses.len() < hard_limit::MAX_NUM_ADDRESSES_PER_USER {
            self.addresses.push(addr);
            true
        } else {
            false
        }
    }

    pub fn edit_address(&mut self, slot: AddressSlot, addr: AddressModel) -> bool {
        match self.addresses.get_mut(slot.index()) {
            Some(curr) => {
                *curr = addr;
                true
            }
            None => false,
        }
    }

    pub fn clear_addresses(&mut self) {
        self.addresses.clear();
    }
}
