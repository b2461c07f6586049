use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use regex::Regex;

use crate::api::web::dto::{AddressDto, LoginReqDto, LoginRespDto, SignupReqDto, SignupRespDto};
use crate::auth::{AbstractAuthKeystore, AppAuthedClaim};
use crate::constant::REGEX_EMAIL_RFC5322;
use crate::error::{AppError, AppErrorCode};
use crate::model::{AddressModel, AddressSlot, UserProfileModel};
use crate::repository::{generate_object_id, AbsUserProfileRepo};

const MIN_PASSWD_LENGTH: usize = 8;

pub struct SignupUseCase {
    pub repo: Box<dyn AbsUserProfileRepo>,
    pub keystore: Arc<Box<dyn AbstractAuthKeystore>>,
}

pub struct LoginUseCase {
    pub repo: Box<dyn AbsUserProfileRepo>,
    pub keystore: Arc<Box<dyn AbstractAuthKeystore>>,
}

pub struct AddAddressUseCase {
    pub repo: Box<dyn AbsUserProfileRepo>,
    pub authed_usr: AppAuthedClaim,
}

pub struct EditAddressUseCase {
    pub repo: Box<dyn AbsUserProfileRepo>,
    pub authed_usr: AppAuthedClaim,
}

pub struct DeleteAddressesUseCase {
    pub repo: Box<dyn AbsUserProfileRepo>,
    pub authed_usr: AppAuthedClaim,
}

pub enum SignupUcResult {
    Success(SignupRespDto),
    InvalidInput(String),
    DuplicateIdentity,
    ServerError(AppError),
}

pub enum LoginUcResult {
    Success(LoginRespDto),
    // both collapse into one generic response at the web layer so the
    // endpoint does not disclose which part was wrong
    NotFound,
    PasswordMismatch,
    ServerError(AppError),
}

pub enum AddAddressUcResult {
    Success,
    SlotsFull,
    UserNotFound,
    InvalidUser,
    ServerError(AppError),
}

pub enum EditAddressUcResult {
    Success,
    SlotEmpty,
    UserNotFound,
    InvalidUser,
    ServerError(AppError),
}

pub enum DeleteAddressesUcResult {
    Success,
    UserNotFound,
    InvalidUser,
    ServerError(AppError),
}

fn hash_password(password: &str) -> DefaultResult<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hasher = Argon2::default();
    hasher
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError {
            code: AppErrorCode::CryptoFailure,
            detail: Some(e.to_string()),
        })
}

fn verify_password(password: &str, hashed: &str) -> DefaultResult<bool, AppError> {
    let parsed = PasswordHash::new(hashed).map_err(|e| AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(e.to_string()),
    })?;
    let valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok();
    Ok(valid)
}

impl SignupUseCase {
    pub async fn execute(self, data: SignupReqDto) -> SignupUcResult {
        if let Some(reason) = Self::validate(&data) {
            return SignupUcResult::InvalidInput(reason);
        }
        match self.run(data).await {
            Ok(resp) => SignupUcResult::Success(resp),
            Err(e) => match e.code {
                AppErrorCode::DuplicateIdentity => SignupUcResult::DuplicateIdentity,
                ref _others => SignupUcResult::ServerError(e),
            },
        }
    }

    fn validate(data: &SignupReqDto) -> Option<String> {
        let email_re = Regex::new(REGEX_EMAIL_RFC5322).unwrap();
        if data.first_name.trim().is_empty() || data.last_name.trim().is_empty() {
            Some("name-empty".to_string())
        } else if !email_re.is_match(data.email.to_lowercase().as_str()) {
            Some("email-malformed".to_string())
        } else if data.phone.trim().is_empty() {
            Some("phone-empty".to_string())
        } else if data.password.len() < MIN_PASSWD_LENGTH {
            Some(format!("password-too-short, min:{}", MIN_PASSWD_LENGTH))
        } else {
            None
        }
    }

    async fn run(&self, data: SignupReqDto) -> DefaultResult<SignupRespDto, AppError> {
        // uniqueness checks on both contact identifiers, same rule the
        // original storefront enforced at signup
        if self.repo.num_with_email(data.email.as_str()).await? > 0 {
            return Err(AppError {
                code: AppErrorCode::DuplicateIdentity,
                detail: Some("email".to_string()),
            });
        }
        if self.repo.num_with_phone(data.phone.as_str()).await? > 0 {
            return Err(AppError {
                code: AppErrorCode::DuplicateIdentity,
                detail: Some("phone".to_string()),
            });
        }
        let passwd_hashed = hash_password(data.password.as_str())?;
        let user_id = generate_object_id();
        let pair = self
            .keystore
            .issue_token_pair(user_id.as_str(), data.email.as_str())?;
        let profile = UserProfileModel::through_signup(
            user_id.clone(),
            data.first_name,
            data.last_name,
            data.email,
            data.phone,
            passwd_hashed,
            pair.token,
            pair.refresh_token,
        );
        self.repo.create(profile).await?;
        Ok(SignupRespDto { user_id })
    }
} // end of impl SignupUseCase

impl LoginUseCase {
    pub async fn execute(self, data: LoginReqDto) -> LoginUcResult {
        match self.run(data).await {
            Ok(resp) => LoginUcResult::Success(resp),
            Err(e) => match e.code {
                AppErrorCode::UserNotExist => LoginUcResult::NotFound,
                AppErrorCode::PasswordMismatch => LoginUcResult::PasswordMismatch,
                ref _others => LoginUcResult::ServerError(e),
            },
        }
    }

    async fn run(&self, data: LoginReqDto) -> DefaultResult<LoginRespDto, AppError> {
        let usr = self.repo.fetch_by_email(data.email.as_str()).await?;
        let valid = verify_password(data.password.as_str(), usr.passwd_hashed.as_str())?;
        if !valid {
            return Err(AppError {
                code: AppErrorCode::PasswordMismatch,
                detail: None,
            });
        }
        let pair = self
            .keystore
            .issue_token_pair(usr.id_.as_str(), usr.email.as_str())?;
        // a fresh pair replaces whatever was stored before, old access
        // tokens keep working until their own expiry
        self.repo
            .update_tokens(
                usr.id_.as_str(),
                pair.token.as_str(),
                pair.refresh_token.as_str(),
            )
            .await?;
        Ok(LoginRespDto {
            user_id: usr.id_,
            first_name: usr.first_name,
            last_name: usr.last_name,
            email: usr.email,
            token: pair.token,
            refresh_token: pair.refresh_token,
        })
    }
} // end of impl LoginUseCase

impl AddAddressUseCase {
    pub async fn execute(self, data: AddressDto) -> AddAddressUcResult {
        let owner = self.authed_usr.profile.as_str();
        let addr = AddressModel::from(data);
        match self.repo.add_address(owner, addr).await {
            Ok(true) => AddAddressUcResult::Success,
            Ok(false) => AddAddressUcResult::SlotsFull,
            Err(e) => match e.code {
                AppErrorCode::UserNotExist => AddAddressUcResult::UserNotFound,
                AppErrorCode::InvalidUserId => AddAddressUcResult::InvalidUser,
                ref _others => AddAddressUcResult::ServerError(e),
            },
        }
    }
}

impl EditAddressUseCase {
    pub async fn execute(self, slot: AddressSlot, data: AddressDto) -> EditAddressUcResult {
        let owner = self.authed_usr.profile.as_str();
        let addr = AddressModel::from(data);
        match self.repo.edit_address(owner, slot, addr).await {
            Ok(true) => EditAddressUcResult::Success,
            Ok(false) => EditAddressUcResult::SlotEmpty,
            Err(e) => match e.code {
                AppErrorCode::UserNotExist => EditAddressUcResult::UserNotFound,
                AppErrorCode::InvalidUserId => EditAddressUcResult::InvalidUser,
                ref _others => EditAddressUcResult::ServerError(e),
            },
        }
    }
}

impl DeleteAddressesUseCase {
    pub async fn execute(self) -> DeleteAddressesUcResult {
        let owner = self.authed_usr.profile.as_str();
        match self.repo.clear_addresses(owner).await {
            Ok(()) => DeleteAddressesUcResult::Success,
            Err(e) => match e.code {
                AppErrorCode::UserNotExist => DeleteAddressesUcResult::UserNotFound,
                AppErrorCode::InvalidUserId => DeleteAddressesUcResult::InvalidUser,
                ref _others => DeleteAddressesUcResult::ServerError(e),
            },
        }
    }
}
