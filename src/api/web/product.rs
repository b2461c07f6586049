use axum::debug_handler;
use axum::extract::{Json as ExtractJson, Query as ExtractQuery, State as ExtractState};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::auth::AppAuthedClaim;
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::app_repo_product;
use crate::usecase::{
    AddProductUcResult, AddProductUseCase, ListProductsUcResult, ListProductsUseCase,
    SearchProductsUcResult, SearchProductsUseCase,
};
use crate::AppSharedState;

use super::dto::{ProductCreateReqDto, ProductSearchQryDto};
use super::{resp_json_header, server_error_status};

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_handler(
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_product(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = ListProductsUseCase { repo };
    let (status, resp_body) = match uc.execute().await {
        ListProductsUcResult::Success(v) => {
            (StatusCode::OK, serde_json::to_string(&v).unwrap())
        }
        ListProductsUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (server_error_status(&e), default_body)
        }
    };
    (status, hdr_map, resp_body)
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn search_handler(
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractQuery(params): ExtractQuery<ProductSearchQryDto>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_product(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = SearchProductsUseCase { repo };
    let (status, resp_body) = match uc.execute(params.keyword).await {
        SearchProductsUcResult::Success(v) => {
            (StatusCode::OK, serde_json::to_string(&v).unwrap())
        }
        SearchProductsUcResult::EmptyKeyword => (StatusCode::BAD_REQUEST, default_body),
        SearchProductsUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (server_error_status(&e), default_body)
        }
    };
    (status, hdr_map, resp_body)
}

// token-authenticated catalog maintenance, fine-grained permission and
// role checks belong to the user-management peer, not this service
#[debug_handler(state = AppSharedState)]
pub(super) async fn create_handler(
    _authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<ProductCreateReqDto>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_product(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = AddProductUseCase { repo };
    let (status, resp_body) = match uc.execute(req_body).await {
        AddProductUcResult::Success(v) => {
            (StatusCode::CREATED, serde_json::to_string(&v).unwrap())
        }
        AddProductUcResult::InvalidName => (StatusCode::BAD_REQUEST, default_body),
        AddProductUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (server_error_status(&e), default_body)
        }
    };
    (status, hdr_map, resp_body)
}
