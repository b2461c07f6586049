pub(super) mod cart;
pub(super) mod order;
pub(super) mod pricing;
pub(super) mod product;
pub(super) mod profile;

use std::result::Result as DefaultResult;

use serde_json::Value as JsnVal;

use crate::error::{AppError, AppErrorCode};
use crate::model::UserProfileModel;

// rows of the in-memory user table hold whole profile documents, every
// repo in this backend shares the decode / encode pair below

pub(super) fn load_user(
    doc: Option<JsnVal>,
    owner: &str,
) -> DefaultResult<UserProfileModel, AppError> {
    match doc {
        Some(d) => serde_json::from_value::<UserProfileModel>(d).map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(format!("user-doc, owner:{}, {}", owner, e)),
        }),
        None => Err(AppError {
            code: AppErrorCode::UserNotExist,
            detail: Some(owner.to_string()),
        }),
    }
}

pub(super) fn dump_user(model: &UserProfileModel) -> DefaultResult<JsnVal, AppError> {
    serde_json::to_value(model).map_err(|e| AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("user-doc, owner:{}, {}", model.id_, e)),
    })
}
