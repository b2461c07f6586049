use storefront::model::{
    AddressModel, AddressSlot, CartLineModel, CartModel, OrderModel, PaymentMethod, ProductModel,
    UserProfileModel,
};

use crate::UT_USR_ID;

pub(crate) fn ut_gen_product(value: (&str, &str, u32)) -> ProductModel {
    ProductModel {
        id_: value.0.to_string(),
        name: value.1.to_string(),
        price: value.2,
        image: format!("https://img.example.com/{}.jpg", value.0),
        rating: 4,
    }
}

pub(crate) fn ut_gen_cart_line(value: (&str, u32, u32)) -> CartLineModel {
    CartLineModel {
        product_id: value.0.to_string(),
        name: format!("item-{}", value.0),
        price: value.1,
        image: format!("https://img.example.com/{}.jpg", value.0),
        rating: 3,
        quantity: value.2,
    }
}

pub(crate) fn ut_gen_profile(usr_id: &str, email: &str, phone: &str) -> UserProfileModel {
    UserProfileModel::through_signup(
        usr_id.to_string(),
        "Jo".to_string(),
        "Doe".to_string(),
        email.to_string(),
        phone.to_string(),
        "$argon2id$fake-hash".to_string(),
        "tok-0".to_string(),
        "refresh-0".to_string(),
    )
}

#[test]
fn cart_total_fold() {
    assert_eq!(CartModel::fold_total(&[]), 0u64);
    let lines = [
        ut_gen_cart_line(("p1", 100, 1)),
        ut_gen_cart_line(("p2", 250, 1)),
        ut_gen_cart_line(("p3", 50, 1)),
    ];
    assert_eq!(CartModel::fold_total(&lines), 400u64);
    let lines = [
        ut_gen_cart_line(("p1", 100, 3)),
        ut_gen_cart_line(("p2", 250, 2)),
    ];
    assert_eq!(CartModel::fold_total(&lines), 800u64);
}

#[test]
fn cart_line_snapshots_product() {
    let product = ut_gen_product(("p-801", "mech keyboard", 2390));
    let line = CartLineModel::from((&product, 1u32));
    assert_eq!(line.product_id.as_str(), "p-801");
    assert_eq!(line.price, 2390);
    assert_eq!(line.quantity, 1);
    // mutating the catalog entry afterwards must not reach the snapshot
    let mut product = product;
    product.price = 9999;
    assert_eq!(product.price, 9999);
    assert_eq!(line.price, 2390);
}

#[test]
fn order_from_bulk_checkout() {
    let lines = vec![
        ut_gen_cart_line(("p1", 300, 1)),
        ut_gen_cart_line(("p2", 150, 1)),
    ];
    let order = OrderModel::through_checkout(lines.clone(), 450);
    assert!(!order.order_id.is_empty());
    assert_eq!(order.price, 450u64);
    assert_eq!(order.lines, lines);
    assert!(matches!(order.payment, PaymentMethod::CashOnDelivery));
    assert!(order.discount.is_none());
    let another = OrderModel::through_checkout(Vec::new(), 0);
    assert_ne!(order.order_id, another.order_id);
}

#[test]
fn order_from_instant_buy() {
    let line = ut_gen_cart_line(("p9", 780, 1));
    let order = OrderModel::through_instant_buy(line.clone());
    assert_eq!(order.price, 780u64);
    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.lines[0], line);
}

#[test]
fn profile_remove_cart_lines_all_copies() {
    let mut usr = ut_gen_profile(UT_USR_ID, "jo@example.com", "+886911222333");
    usr.append_cart_line(ut_gen_cart_line(("p1", 300, 1)));
    usr.append_cart_line(ut_gen_cart_line(("p1", 300, 1)));
    usr.append_cart_line(ut_gen_cart_line(("p2", 150, 1)));
    let num = usr.remove_cart_lines("p1");
    assert_eq!(num, 2);
    assert_eq!(usr.cart.len(), 1);
    assert_eq!(usr.cart[0].product_id.as_str(), "p2");
    assert_eq!(usr.cart[0].price, 150);
    // repeating the removal is a no-op, remaining lines untouched
    let num = usr.remove_cart_lines("p1");
    assert_eq!(num, 0);
    assert_eq!(usr.cart.len(), 1);
}

#[test]
fn profile_checkout_clears_cart() {
    let mut usr = ut_gen_profile(UT_USR_ID, "jo@example.com", "+886911222333");
    usr.append_cart_line(ut_gen_cart_line(("p1", 300, 1)));
    usr.append_cart_line(ut_gen_cart_line(("p2", 150, 1)));
    let order = OrderModel::through_checkout(usr.cart.clone(), 450);
    usr.apply_checkout(order);
    assert!(usr.cart.is_empty());
    assert_eq!(usr.orders.len(), 1);
    assert_eq!(usr.orders[0].price, 450u64);
}

#[test]
fn profile_instant_order_keeps_cart() {
    let mut usr = ut_gen_profile(UT_USR_ID, "jo@example.com", "+886911222333");
    usr.append_cart_line(ut_gen_cart_line(("p1", 300, 1)));
    let order = OrderModel::through_instant_buy(ut_gen_cart_line(("p7", 90, 1)));
    usr.append_order(order);
    assert_eq!(usr.cart.len(), 1);
    assert_eq!(usr.orders.len(), 1);
}

#[test]
fn profile_address_slots() {
    let mut usr = ut_gen_profile(UT_USR_ID, "jo@example.com", "+886911222333");
    let addr0 = AddressModel {
        house: "12".to_string(),
        street: "Elm st.".to_string(),
        city: "Springfield".to_string(),
        post_code: "49007".to_string(),
    };
    let mut addr1 = addr0.clone();
    addr1.street = "Oak ave.".to_string();
    assert!(usr.try_add_address(addr0.clone()));
    assert!(usr.try_add_address(addr1));
    // the third slot does not exist
    assert!(!usr.try_add_address(addr0.clone()));
    assert_eq!(usr.addresses.len(), 2);

    let mut edited = addr0.clone();
    edited.city = "Shelbyville".to_string();
    assert!(usr.edit_address(AddressSlot::Work, edited.clone()));
    assert_eq!(usr.addresses[1].city.as_str(), "Shelbyville");
    assert_eq!(usr.addresses[0].city.as_str(), "Springfield");

    usr.clear_addresses();
    assert!(usr.addresses.is_empty());
    assert!(!usr.edit_address(AddressSlot::Home, edited));
}
