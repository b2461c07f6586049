use http::StatusCode;
use serde_json::Value as JsnVal;

use storefront::api::web::dto::{
    CartDto, CheckoutRespDto, LoginRespDto, OrderDto, ProductCreateReqDto, ProductCreateRespDto,
    ProductDto, SignupReqDto, SignupRespDto,
};
use storefront::network::WebServiceRoute;
use storefront::AppAuthedClaim;

use crate::common::{
    itest_req_builder, setup_mock_authed_claim, test_setup_shr_state, TestWebServer,
    ITEST_API_VER,
};

fn itest_clone_authed_claim(src: &AppAuthedClaim) -> AppAuthedClaim {
    AppAuthedClaim {
        profile: src.profile.clone(),
        email: src.email.clone(),
        iat: src.iat,
        exp: src.exp,
        aud: src.aud.clone(),
    }
}

fn itest_signup_body(email: &str, phone: &str) -> String {
    let req = SignupReqDto {
        first_name: "Ada".to_string(),
        last_name: "Chen".to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        password: "strong-enough-passwd".to_string(),
    };
    serde_json::to_string(&req).unwrap()
}

async fn itest_signup_ok(srv: &WebServiceRoute, email: &str, phone: &str) -> String {
    let uri = format!("/{}/usr/signup", ITEST_API_VER);
    let req = itest_req_builder(uri, "POST", Some(itest_signup_body(email, phone)), None);
    let resp = TestWebServer::consume(srv, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = TestWebServer::to_custom_type::<SignupRespDto>(resp).await;
    assert_eq!(body.user_id.len(), 24);
    body.user_id
}

async fn itest_add_product_ok(
    srv: &WebServiceRoute,
    authed_claim: AppAuthedClaim,
    name: &str,
    price: u32,
) -> String {
    let uri = format!("/{}/admin/products", ITEST_API_VER);
    let req_body = ProductCreateReqDto {
        name: name.to_string(),
        price,
        image: format!("https://img.example.com/{}.jpg", price),
        rating: 4,
    };
    let req = itest_req_builder(
        uri,
        "POST",
        Some(serde_json::to_string(&req_body).unwrap()),
        Some(authed_claim),
    );
    let resp = TestWebServer::consume(srv, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = TestWebServer::to_custom_type::<ProductCreateRespDto>(resp).await;
    body.product_id
}

async fn itest_add_to_cart(
    srv: &WebServiceRoute,
    authed_claim: AppAuthedClaim,
    product_id: &str,
    expect_status: StatusCode,
) {
    let uri = format!("/{}/cart/item?product_id={}", ITEST_API_VER, product_id);
    let req = itest_req_builder(uri, "POST", None, Some(authed_claim));
    let resp = TestWebServer::consume(srv, req).await;
    assert_eq!(resp.status(), expect_status);
}

async fn itest_fetch_cart(srv: &WebServiceRoute, authed_claim: AppAuthedClaim) -> CartDto {
    let uri = format!("/{}/cart", ITEST_API_VER);
    let req = itest_req_builder(uri, "GET", None, Some(authed_claim));
    let resp = TestWebServer::consume(srv, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    TestWebServer::to_custom_type::<CartDto>(resp).await
}

async fn itest_fetch_orders(srv: &WebServiceRoute, authed_claim: AppAuthedClaim) -> Vec<OrderDto> {
    let uri = format!("/{}/orders", ITEST_API_VER);
    let req = itest_req_builder(uri, "GET", None, Some(authed_claim));
    let resp = TestWebServer::consume(srv, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    TestWebServer::to_custom_type::<Vec<OrderDto>>(resp).await
}

#[tokio::test]
async fn itest_cart_checkout_entire_flow() {
    let shr_state = test_setup_shr_state().unwrap();
    let srv = TestWebServer::setup(shr_state);
    let usr_id = itest_signup_ok(&srv, "ada1@example.com", "+886900111222").await;
    let authed_claim = setup_mock_authed_claim(usr_id.as_str());

    let pid_beans = itest_add_product_ok(
        &srv,
        itest_clone_authed_claim(&authed_claim),
        "espresso beans",
        300,
    )
    .await;
    let pid_kettle = itest_add_product_ok(
        &srv,
        itest_clone_authed_claim(&authed_claim),
        "drip kettle",
        150,
    )
    .await;

    // two copies of the first product plus one of the second
    for pid in [&pid_beans, &pid_beans, &pid_kettle] {
        itest_add_to_cart(
            &srv,
            itest_clone_authed_claim(&authed_claim),
            pid.as_str(),
            StatusCode::OK,
        )
        .await;
    }
    let cart = itest_fetch_cart(&srv, itest_clone_authed_claim(&authed_claim)).await;
    assert_eq!(cart.lines.len(), 3);
    assert_eq!(cart.total_price, 750u64);

    // bulk removal drops every copy of the first product
    let uri = format!(
        "/{}/cart/item?product_id={}",
        ITEST_API_VER,
        pid_beans.as_str()
    );
    let req = itest_req_builder(uri, "DELETE", None, Some(itest_clone_authed_claim(&authed_claim)));
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let cart = itest_fetch_cart(&srv, itest_clone_authed_claim(&authed_claim)).await;
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].product_id, pid_kettle);
    assert_eq!(cart.total_price, 150u64);

    // bulk checkout converts the remaining cart into one order
    let uri = format!("/{}/cart/checkout", ITEST_API_VER);
    let req = itest_req_builder(uri, "POST", None, Some(itest_clone_authed_claim(&authed_claim)));
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let placed = TestWebServer::to_custom_type::<CheckoutRespDto>(resp).await;
    assert_eq!(placed.price, 150u64);

    let cart = itest_fetch_cart(&srv, itest_clone_authed_claim(&authed_claim)).await;
    assert!(cart.lines.is_empty());
    assert_eq!(cart.total_price, 0u64);
    let history = itest_fetch_orders(&srv, itest_clone_authed_claim(&authed_claim)).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].order_id, placed.order_id);
    assert_eq!(history[0].price, 150u64);
    assert_eq!(history[0].lines.len(), 1);
    assert_eq!(history[0].lines[0].product_id, pid_kettle);

    // re-running a finished checkout finds the cart empty and refuses
    let uri = format!("/{}/cart/checkout", ITEST_API_VER);
    let req = itest_req_builder(uri, "POST", None, Some(itest_clone_authed_claim(&authed_claim)));
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let history = itest_fetch_orders(&srv, authed_claim).await;
    assert_eq!(history.len(), 1);
} // end of itest_cart_checkout_entire_flow

#[tokio::test]
async fn itest_instant_buy_keeps_cart() {
    let shr_state = test_setup_shr_state().unwrap();
    let srv = TestWebServer::setup(shr_state);
    let usr_id = itest_signup_ok(&srv, "ada2@example.com", "+886900111333").await;
    let authed_claim = setup_mock_authed_claim(usr_id.as_str());
    let pid_beans = itest_add_product_ok(
        &srv,
        itest_clone_authed_claim(&authed_claim),
        "espresso beans",
        300,
    )
    .await;
    let pid_kettle = itest_add_product_ok(
        &srv,
        itest_clone_authed_claim(&authed_claim),
        "drip kettle",
        150,
    )
    .await;
    itest_add_to_cart(
        &srv,
        itest_clone_authed_claim(&authed_claim),
        pid_beans.as_str(),
        StatusCode::OK,
    )
    .await;

    let uri = format!(
        "/{}/checkout/instant?product_id={}",
        ITEST_API_VER,
        pid_kettle.as_str()
    );
    let req = itest_req_builder(uri, "POST", None, Some(itest_clone_authed_claim(&authed_claim)));
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let placed = TestWebServer::to_custom_type::<CheckoutRespDto>(resp).await;
    assert_eq!(placed.price, 150u64);

    // the cart was neither read nor mutated by the instant purchase
    let cart = itest_fetch_cart(&srv, itest_clone_authed_claim(&authed_claim)).await;
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].product_id, pid_beans);
    let history = itest_fetch_orders(&srv, authed_claim).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].lines[0].product_id, pid_kettle);
}

#[tokio::test]
async fn itest_add_to_cart_error_paths() {
    let shr_state = test_setup_shr_state().unwrap();
    let srv = TestWebServer::setup(shr_state);
    let usr_id = itest_signup_ok(&srv, "ada3@example.com", "+886900111444").await;
    let authed_claim = setup_mock_authed_claim(usr_id.as_str());
    // well-formed id, no such catalog entry
    itest_add_to_cart(
        &srv,
        itest_clone_authed_claim(&authed_claim),
        "0123456789abcdef01234567",
        StatusCode::NOT_FOUND,
    )
    .await;
    // authenticated user vanished from the store
    let ghost_claim = setup_mock_authed_claim("0123456789abcdef01234568");
    let pid = itest_add_product_ok(&srv, itest_clone_authed_claim(&authed_claim), "mug", 90).await;
    itest_add_to_cart(&srv, ghost_claim, pid.as_str(), StatusCode::NOT_FOUND).await;
    // a request with no verified identity never reaches the handler
    let uri = format!("/{}/cart", ITEST_API_VER);
    let req = itest_req_builder(uri, "GET", None, None);
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn itest_login_and_bearer_auth() {
    let shr_state = test_setup_shr_state().unwrap();
    let srv = TestWebServer::setup(shr_state);
    let _usr_id = itest_signup_ok(&srv, "ada4@example.com", "+886900111555").await;

    let uri = format!("/{}/usr/login", ITEST_API_VER);
    let creds = r#"{"email":"ada4@example.com","password":"strong-enough-passwd"}"#;
    let req = itest_req_builder(uri, "POST", Some(creds.to_string()), None);
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = TestWebServer::to_custom_type::<LoginRespDto>(resp).await;
    assert!(!body.token.is_empty());

    // the issued token authenticates follow-up calls through the header
    let uri = format!("/{}/cart", ITEST_API_VER);
    let mut req = itest_req_builder(uri, "GET", None, None);
    let hval = format!("Bearer {}", body.token);
    req.headers_mut()
        .insert("authorization", hval.parse().unwrap());
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // wrong password is refused without disclosing which half failed
    let uri = format!("/{}/usr/login", ITEST_API_VER);
    let creds = r#"{"email":"ada4@example.com","password":"wrong-guess-twice"}"#;
    let req = itest_req_builder(uri, "POST", Some(creds.to_string()), None);
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn itest_signup_duplicate_rejected() {
    let shr_state = test_setup_shr_state().unwrap();
    let srv = TestWebServer::setup(shr_state);
    let _usr_id = itest_signup_ok(&srv, "ada5@example.com", "+886900111666").await;
    let uri = format!("/{}/usr/signup", ITEST_API_VER);
    let req = itest_req_builder(
        uri,
        "POST",
        Some(itest_signup_body("ada5@example.com", "+886900999888")),
        None,
    );
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn itest_catalog_listing_and_search() {
    let shr_state = test_setup_shr_state().unwrap();
    let srv = TestWebServer::setup(shr_state);
    let usr_id = itest_signup_ok(&srv, "ada6@example.com", "+886900111777").await;
    let authed_claim = setup_mock_authed_claim(usr_id.as_str());
    let names = ["Ceramic Pour-Over Dripper", "electric drip kettle", "burr grinder"];
    for (idx, name) in names.iter().enumerate() {
        let _pid = itest_add_product_ok(
            &srv,
            itest_clone_authed_claim(&authed_claim),
            name,
            500 + idx as u32,
        )
        .await;
    }
    let uri = format!("/{}/products", ITEST_API_VER);
    let req = itest_req_builder(uri, "GET", None, None);
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listing = TestWebServer::to_custom_type::<Vec<ProductDto>>(resp).await;
    assert_eq!(listing.len(), 3);

    let uri = format!("/{}/products/search?keyword=DRIP", ITEST_API_VER);
    let req = itest_req_builder(uri, "GET", None, None);
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let found = TestWebServer::to_custom_type::<Vec<ProductDto>>(resp).await;
    assert_eq!(found.len(), 2);

    // blank keyword is a client error, not a full listing
    let uri = format!("/{}/products/search?keyword=%20", ITEST_API_VER);
    let req = itest_req_builder(uri, "GET", None, None);
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn itest_address_book_lifecycle() {
    let shr_state = test_setup_shr_state().unwrap();
    let srv = TestWebServer::setup(shr_state);
    let usr_id = itest_signup_ok(&srv, "ada7@example.com", "+886900111888").await;
    let authed_claim = setup_mock_authed_claim(usr_id.as_str());
    let addr_body = |city: &str| -> String {
        format!(
            r#"{{"house":"5-1","street":"Maple rd.","city":"{}","post_code":"10617"}}"#,
            city
        )
    };
    let uri_addr = format!("/{}/addresses", ITEST_API_VER);
    for city in ["Taipei", "Kaohsiung"] {
        let req = itest_req_builder(
            uri_addr.clone(),
            "POST",
            Some(addr_body(city)),
            Some(itest_clone_authed_claim(&authed_claim)),
        );
        let resp = TestWebServer::consume(&srv, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    // both slots taken now
    let req = itest_req_builder(
        uri_addr.clone(),
        "POST",
        Some(addr_body("Tainan")),
        Some(itest_clone_authed_claim(&authed_claim)),
    );
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let raw = TestWebServer::to_custom_type::<JsnVal>(resp).await;
    assert_eq!(
        raw.get("reason").unwrap().as_str().unwrap(),
        "address-slots-full"
    );

    let uri = format!("/{}/addresses/home", ITEST_API_VER);
    let req = itest_req_builder(
        uri,
        "PATCH",
        Some(addr_body("Hsinchu")),
        Some(itest_clone_authed_claim(&authed_claim)),
    );
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = itest_req_builder(
        uri_addr.clone(),
        "DELETE",
        None,
        Some(itest_clone_authed_claim(&authed_claim)),
    );
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // editing right after the wipe reports the slot is gone
    let uri = format!("/{}/addresses/work", ITEST_API_VER);
    let req = itest_req_builder(uri, "PATCH", Some(addr_body("Taichung")), Some(authed_claim));
    let resp = TestWebServer::consume(&srv, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
