use axum::debug_handler;
use axum::extract::{Json as ExtractJson, State as ExtractState};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::auth::AppAuthedClaim;
use crate::logging::{app_log_event, AppLogLevel};
use crate::model::AddressSlot;
use crate::repository::app_repo_user_profile;
use crate::usecase::{
    AddAddressUcResult, AddAddressUseCase, DeleteAddressesUcResult, DeleteAddressesUseCase,
    EditAddressUcResult, EditAddressUseCase, LoginUcResult, LoginUseCase, SignupUcResult,
    SignupUseCase,
};
use crate::AppSharedState;

use super::dto::{AddressDto, LoginReqDto, SignupReqDto};
use super::{resp_json_header, server_error_status};

// a login failure never discloses whether the email or the password was
// the wrong half
const LOGIN_REJECT_BODY: &str = r#"{"reason":"login or password is incorrect"}"#;

#[debug_handler(state = AppSharedState)]
pub(super) async fn signup_handler(
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<SignupReqDto>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_user_profile(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = SignupUseCase {
        repo,
        keystore: appstate.auth_keystore(),
    };
    let (status, resp_body) = match uc.execute(req_body).await {
        SignupUcResult::Success(v) => {
            (StatusCode::CREATED, serde_json::to_string(&v).unwrap())
        }
        SignupUcResult::InvalidInput(reason) => (
            StatusCode::BAD_REQUEST,
            format!(r#"{{"reason":"{}"}}"#, reason),
        ),
        SignupUcResult::DuplicateIdentity => (StatusCode::CONFLICT, default_body),
        SignupUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (server_error_status(&e), default_body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn signup_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn login_handler(
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<LoginReqDto>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_user_profile(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = LoginUseCase {
        repo,
        keystore: appstate.auth_keystore(),
    };
    let (status, resp_body) = match uc.execute(req_body).await {
        LoginUcResult::Success(v) => (StatusCode::OK, serde_json::to_string(&v).unwrap()),
        LoginUcResult::NotFound | LoginUcResult::PasswordMismatch => {
            (StatusCode::UNAUTHORIZED, LOGIN_REJECT_BODY.to_string())
        }
        LoginUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (server_error_status(&e), default_body)
        }
    };
    (status, hdr_map, resp_body)
} // end of fn login_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn add_address(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<AddressDto>,
) -> impl IntoResponse {
    let hdr_map = resp_json_header();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_user_profile(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = AddAddressUseCase { repo, authed_usr };
    let (status, resp_body) = match uc.execute(req_body).await {
        AddAddressUcResult::Success => (StatusCode::OK, default_body),
        AddAddressUcResult::SlotsFull => (
            StatusCode::BAD_REQUEST,
            r#"{"reason":"address-slots-full"}"#.to_string(),
        ),
        AddAddressUcResult::UserNotFound => (StatusCode::NOT_FOUND, default_body),
        AddAddressUcResult::InvalidUser => (StatusCode::BAD_REQUEST, default_body),
        AddAddressUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (server_error_status(&e), default_body)
        }
    };
    (status, hdr_map, resp_body)
}

async fn edit_address_common(
    authed_usr: AppAuthedClaim,
    appstate: AppSharedState,
    slot: AddressSlot,
    req_body: AddressDto,
) -> (StatusCode, axum::http::HeaderMap, String) {
    let hdr_map = resp_json_header();
    let default_body = "{}".to_string();
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_user_profile(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, hdr_map, default_body);
        }
    };
    let uc = EditAddressUseCase { repo, authed_usr };
    let (status, resp_body) = match uc.execute(slot, req_body).await {
        EditAddressUcResult::Success => (StatusCode::OK, default_body),
        EditAddressUcResult::SlotEmpty => (StatusCode::NOT_FOUND, default_body),
        EditAddressUcResult::UserNotFound => (StatusCode::NOT_FOUND, default_body),
        EditAddressUcResult::InvalidUser => (StatusCode::BAD_REQUEST, default_body),
        EditAddressUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            (server_error_status(&e), default_body)
        }
    };
    (status, hdr_map, resp_body)
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn edit_home_address(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<AddressDto>,
) -> impl IntoResponse {
    edit_address_common(authed_usr, appstate, AddressSlot::Home, req_body).await
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn edit_work_address(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<AddressDto>,
) -> impl IntoResponse {
    edit_address_common(authed_usr, appstate, AddressSlot::Work, req_body).await
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn delete_addresses(
    authed_usr: AppAuthedClaim,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_user_profile(appstate.datastore()).await {
        Ok(v) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };
    let uc = DeleteAddressesUseCase { repo, authed_usr };
    match uc.execute().await {
        DeleteAddressesUcResult::Success => StatusCode::NO_CONTENT,
        DeleteAddressesUcResult::UserNotFound => StatusCode::NOT_FOUND,
        DeleteAddressesUcResult::InvalidUser => StatusCode::BAD_REQUEST,
        DeleteAddressesUcResult::ServerError(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
            server_error_status(&e)
        }
    }
}
