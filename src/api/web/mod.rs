use std::collections::HashMap;

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::routing::{delete, get, patch, post, MethodRouter};

use crate::constant::api::web as WebConst;
use crate::constant::HTTP_CONTENT_TYPE_JSON;
use crate::error::{AppError, AppErrorCode};
use crate::{AppSharedState, WebApiHdlrLabel};

mod cart;
mod checkout;
pub mod dto;
mod product;
mod profile;

pub type ApiRouteType = MethodRouter<AppSharedState>;
pub type ApiRouteTableType = HashMap<WebApiHdlrLabel, ApiRouteType>;

// handler labels decouple the route paths in the config file from the
// code, the same handler may be linked to several paths
pub fn route_table() -> ApiRouteTableType {
    let mut out: ApiRouteTableType = HashMap::new();
    out.insert(WebConst::SIGNUP, post(profile::signup_handler));
    out.insert(WebConst::LOGIN, post(profile::login_handler));
    out.insert(WebConst::LIST_PRODUCTS, get(product::list_handler));
    out.insert(WebConst::SEARCH_PRODUCTS, get(product::search_handler));
    out.insert(WebConst::ADMIN_ADD_PRODUCT, post(product::create_handler));
    out.insert(WebConst::RETRIEVE_CART, get(cart::retrieve));
    out.insert(WebConst::ADD_CART_LINE, post(cart::add_line));
    out.insert(WebConst::REMOVE_CART_LINES, delete(cart::remove_lines));
    out.insert(WebConst::CHECKOUT_CART, post(checkout::checkout_cart));
    out.insert(WebConst::INSTANT_BUY, post(checkout::instant_buy));
    out.insert(WebConst::LIST_ORDERS, get(checkout::list_orders));
    out.insert(WebConst::ADD_ADDRESS, post(profile::add_address));
    out.insert(
        WebConst::EDIT_HOME_ADDRESS,
        patch(profile::edit_home_address),
    );
    out.insert(
        WebConst::EDIT_WORK_ADDRESS,
        patch(profile::edit_work_address),
    );
    out.insert(WebConst::DELETE_ADDRESSES, delete(profile::delete_addresses));
    out
}

pub(super) fn resp_json_header() -> HeaderMap {
    let ctype = HeaderValue::from_str(HTTP_CONTENT_TYPE_JSON).unwrap();
    let mut hdr_map = HeaderMap::new();
    hdr_map.insert(header::CONTENT_TYPE, ctype);
    hdr_map
}

// a deadline expiry is worth retrying on a healthy cluster, every other
// wrapped server-side failure is not, the status codes reflect that
pub(super) fn server_error_status(e: &AppError) -> StatusCode {
    if matches!(e.code, AppErrorCode::DatabaseTimeout) {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
