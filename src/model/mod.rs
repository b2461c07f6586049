mod cart;
mod order;
mod product;
mod user;

pub use cart::{CartLineModel, CartModel};
pub use order::{OrderModel, PaymentMethod};
pub use product::ProductModel;
pub use user::{AddressModel, AddressSlot, UserProfileModel};
