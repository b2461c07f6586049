use axum::debug_handler;
use axum::extract::{Query as ExtractQuery, State as ExtractState};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::auth::AppAuthedClaim;
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::{app_repo_cart, app_repo_order, app_repo_pricing, app_repo_product};
use crate::usecase::{
    CheckoutCartUseCase, CheckoutUcResult, InstantBuyUcResult, InstantBuyUseCase,
    ListOrdersUcResult, ListOrdersUseCase,
};
use crate::AppSharedState;

use super::dto::ProductIdQryDto;
use super::{resp_json_header, server_error_status};

const PARTIAL_COMPLETION_BODY: &str = r#"{"condition":"partial-completion"}"#;

#[debug_handler(state = AppSharedState)]
pub(super) async fn checkout_cart(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let ds = appstate.datastore();
    let repos = match (
        app_repo_cart(ds.clone()).await,
        app_repo_pricing(ds.clone()).await,
        app_repo_order(ds).await,
    ) {
        (Ok(c), Ok(p), Ok(o)) => (c, p, o),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = CheckoutCartUseCase {
        repo_cart: repos.0,
        repo_pricing: repos.1,
        repo_order: repos.2,
        authed_usr,
    };
    let (status, resp_body) = match uc.execute().await {
        CheckoutUcResult::Success(v) => {
            (StatusCode::CREATED, serde_json::to_string(&v).unwrap())
        }
        CheckoutUcResult::EmptyCart => (StatusCode::CONFLICT, default_body),
        CheckoutUcResult::UserNotFound => (StatusCode::NOT_FOUND, default_body),
        CheckoutUcResult::InvalidUser => (StatusCode::BAD_REQUEST, default_body),
        CheckoutUcResult::PartialCompletion(e) => {
            // an order may exist without durable confirmation, distinct
            // body so callers do not lump it with total failure
            app_log_event!(logctx, AppLogLevel::ERROR, "partial-completion, {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                PARTIAL_COMPLETION_BODY.to_string(),
            )
        }
        CheckoutUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (server_error_status(&e), default_body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn checkout_cart

#[debug_handler(state = AppSharedState)]
pub(super) async fn instant_buy(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractQuery(params): ExtractQuery<ProductIdQryDto>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let ds = appstate.datastore();
    let repos = match (
        app_repo_product(ds.clone()).await,
        app_repo_order(ds).await,
    ) {
        (Ok(p), Ok(o)) => (p, o),
        (Err(e), _) | (_, Err(e)) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = InstantBuyUseCase {
        repo_product: repos.0,
        repo_order: repos.1,
        authed_usr,
    };
    let (status, resp_body) = match uc.execute(params.product_id).await {
        InstantBuyUcResult::Success(v) => {
            (StatusCode::CREATED, serde_json::to_string(&v).unwrap())
        }
        InstantBuyUcResult::ProductNotFound => (StatusCode::NOT_FOUND, default_body),
        InstantBuyUcResult::UserNotFound => (StatusCode::NOT_FOUND, default_body),
        InstantBuyUcResult::InvalidUser => (StatusCode::BAD_REQUEST, default_body),
        InstantBuyUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (server_error_status(&e), default_body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn instant_buy

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_orders(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let repo_order = match app_repo_order(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = ListOrdersUseCase {
        repo_order,
        authed_usr,
    };
    let (status, resp_body) = match uc.execute().await {
        ListOrdersUcResult::Success(v) => {
            (StatusCode::OK, serde_json::to_string(&v).unwrap())
        }
        ListOrdersUcResult::UserNotFound => (StatusCode::NOT_FOUND, default_body),
        ListOrdersUcResult::InvalidUser => (StatusCode::BAD_REQUEST, default_body),
        ListOrdersUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (server_error_status(&e), default_body)
        }
    };
    (status, hdr_map, resp_body)
}
