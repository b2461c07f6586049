mod checkout;
mod manage_cart;
mod manage_product;
mod manage_profile;

pub use checkout::{
    CheckoutCartUseCase, CheckoutUcResult, InstantBuyUseCase, InstantBuyUcResult,
    ListOrdersUseCase, ListOrdersUcResult,
};
pub use manage_cart::{
    AddCartLineUcResult, AddCartLineUseCase, RemoveCartLinesUcResult, RemoveCartLinesUseCase,
    RetrieveCartUcResult, RetrieveCartUseCase,
};
pub use manage_product::{
    AddProductUcResult, AddProductUseCase, ListProductsUcResult, ListProductsUseCase,
    SearchProductsUcResult, SearchProductsUseCase,
};
pub use manage_profile::{
    AddAddressUcResult, AddAddressUseCase, DeleteAddressesUcResult, DeleteAddressesUseCase,
    EditAddressUcResult, EditAddressUseCase, LoginUcResult, LoginUseCase, SignupUcResult,
    SignupUseCase,
};
