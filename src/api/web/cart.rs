use axum::debug_handler;
use axum::extract::{Query as ExtractQuery, State as ExtractState};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::auth::AppAuthedClaim;
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::{app_repo_cart, app_repo_pricing, app_repo_product};
use crate::usecase::{
    AddCartLineUcResult, AddCartLineUseCase, RemoveCartLinesUcResult, RemoveCartLinesUseCase,
    RetrieveCartUcResult, RetrieveCartUseCase,
};
use crate::AppSharedState;

use super::dto::ProductIdQryDto;
use super::{resp_json_header, server_error_status};

#[debug_handler(state = AppSharedState)]
pub(super) async fn add_line(
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
        app_repo_cart(ds).await,
    ) {
        (Ok(p), Ok(c)) => (p, c),
        (Err(e), _) | (_, Err(e)) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = AddCartLineUseCase {
        repo_product: repos.0,
        repo_cart: repos.1,
        authed_usr,
    };
    let (status, resp_body) = match uc.execute(params.product_id).await {
        AddCartLineUcResult::Success => (StatusCode::OK, default_body),
        AddCartLineUcResult::ProductNotFound => (StatusCode::NOT_FOUND, default_body),
        AddCartLineUcResult::UserNotFound => (StatusCode::NOT_FOUND, default_body),
        AddCartLineUcResult::InvalidUser => (StatusCode::BAD_REQUEST, default_body),
        AddCartLineUcResult::QuotaExceed(e) => {
            (StatusCode::BAD_REQUEST, serde_json::to_string(&e).unwrap())
        }
        AddCartLineUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (server_error_status(&e), default_body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn add_line

#[debug_handler(state = AppSharedState)]
pub(super) async fn remove_lines(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractQuery(params): ExtractQuery<ProductIdQryDto>,
) -> impl IntoResponse {
    let logctx = appstate.log_context().clone();
    let repo_cart = match app_repo_cart(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };
    let uc = RemoveCartLinesUseCase {
        repo_cart,
        authed_usr,
    };
    match uc.execute(params.product_id).await {
        // also a success when no line matched, removal is idempotent
        RemoveCartLinesUcResult::Success => StatusCode::NO_CONTENT,
        RemoveCartLinesUcResult::UserNotFound => StatusCode::NOT_FOUND,
        RemoveCartLinesUcResult::InvalidUser => StatusCode::BAD_REQUEST,
        RemoveCartLinesUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            server_error_status(&e)
        }
    }
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn retrieve(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let ds = appstate.datastore();
    let repos = match (
        app_repo_cart(ds.clone()).await,
        app_repo_pricing(ds).await,
    ) {
        (Ok(c), Ok(p)) => (c, p),
        (Err(e), _) | (_, Err(e)) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = RetrieveCartUseCase {
        repo_cart: repos.0,
        repo_pricing: repos.1,
        authed_usr,
    };
    let (status, resp_body) = match uc.execute().await {
        RetrieveCartUcResult::Success(v) => {
            (StatusCode::OK, serde_json::to_string(&v).unwrap())
        }
        RetrieveCartUcResult::UserNotFound => (StatusCode::NOT_FOUND, default_body),
        RetrieveCartUcResult::InvalidUser => (StatusCode::BAD_REQUEST, default_body),
        RetrieveCartUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (server_error_status(&e), default_body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn retrieve
