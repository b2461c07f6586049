use std::fmt::Display;
use std::io::ErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum AppErrorCode {
    Unknown,
    NotImplemented,
    MissingSysBasePath,
    MissingAppBasePath,
    MissingConfigPath,
    MissingDataStore,
    InvalidJsonFormat,
    InvalidVersion,
    InvalidRouteConfig,
    MissingAliasLogHdlerCfg,
    MissingAliasLoggerCfg,
    NoRouteApiServerCfg,
    NoLogHandlerCfg,
    NoLoggerCfg,
    NoHandlerInLoggerCfg,
    InvalidHandlerLoggerCfg,
    EmptyInputData, // for internal server error, do NOT dump detail to http response
    InvalidInput,   // for frontend client error
    CryptoFailure,
    NoConfidentialityCfg,
    NoDatabaseCfg,
    RemoteDbServerFailure,
    DatabaseTimeout,
    ExceedingMaxLimit,
    AcquireLockFailure,
    DataTableNotExist,
    DataCorruption,
    // ---- domain error kinds ----
    ProductNotExist,
    UserNotExist,
    InvalidUserId,
    CartUpdateFailure,
    CheckoutFailure,
    CheckoutPartialDone,
    AggregationFailure,
    EmptyCart,
    DuplicateIdentity,
    PasswordMismatch,
    AuthTokenFailure,
    AuthTokenExpired,
    AddressSlotsFull,
    IOerror(ErrorKind),
} // end of AppErrorCode

#[derive(Debug, Clone)]
pub struct AppError {
    pub code: AppErrorCode,
    pub detail: Option<String>,
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let default_detail = "none";
        let dp = if let Some(s) = &self.detail {
            s.as_str()
        } else {
            default_detail
        };
        write!(f, "code:{:?}, detail:{}", self.code, dp)
    }
}

impl From<(AppErrorCode, String)> for AppError {
    fn from(value: (AppErrorCode, String)) -> Self {
        AppError {
            code: value.0,
            detail: Some(value.1),
        }
    }
}

// every driver error is wrapped at the datastore / repository boundary,
// callers above that layer only ever see `AppError`
impl From<mongodb::error::Error> for AppError {
    fn from(value: mongodb::error::Error) -> Self {
        let code = match value.kind.as_ref() {
            mongodb::error::ErrorKind::ServerSelection { .. } => {
                AppErrorCode::RemoteDbServerFailure
            }
            mongodb::error::ErrorKind::Authentication { .. } => AppErrorCode::CryptoFailure,
            mongodb::error::ErrorKind::InvalidArgument { .. } => AppErrorCode::InvalidInput,
            mongodb::error::ErrorKind::BsonDeserialization(_)
            | mongodb::error::ErrorKind::BsonSerialization(_) => AppErrorCode::DataCorruption,
            mongodb::error::ErrorKind::Io(_) => AppErrorCode::IOerror(ErrorKind::Other),
            _others => AppErrorCode::RemoteDbServerFailure,
        };
        AppError {
            code,
            detail: Some(value.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError {
            code: AppErrorCode::InvalidJsonFormat,
            detail: Some(value.to_string()),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        let code = match value.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppErrorCode::AuthTokenExpired,
            _others => AppErrorCode::AuthTokenFailure,
        };
        AppError {
            code,
            detail: Some(value.to_string()),
        }
    }
}
