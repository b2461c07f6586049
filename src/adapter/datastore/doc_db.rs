use std::future::Future;
use std::result::Result as DefaultResult;
use std::sync::Arc;
use std::time::Duration;

use mongodb::options::{ClientOptions, Credential, ServerAddress};
use mongodb::{Client, Collection, Database};
use serde::Deserialize;

use crate::confidentiality::AbstractConfidentiality;
use crate::config::AppDocDbServerCfg;
use crate::constant::datastore as DStoreConst;
use crate::error::{AppError, AppErrorCode};
use crate::model::{ProductModel, UserProfileModel};

#[allow(non_snake_case)]
#[derive(Deserialize)]
struct DbSecret {
    HOST: String,
    PORT: u16,
    USER: String,
    PASSWORD: String,
}

pub struct AppDocDbStore {
    pub alias: String,
    db: Database,
}

impl AppDocDbStore {
    pub fn try_build(
        cfg: &AppDocDbServerCfg,
        confidential: Arc<Box<dyn AbstractConfidentiality>>,
    ) -> DefaultResult<Self, AppError> {
        let serial = confidential.try_get_payload(cfg.confidentiality_path.as_str())?;
        let secret = match serde_json::from_str::<DbSecret>(serial.as_str()) {
            Ok(s) => s,
            Err(e) => {
                let detail = e.to_string() + ", secret-parsing-error, source: AppDocDbStore";
                return Err(AppError {
                    code: AppErrorCode::InvalidJsonFormat,
                    detail: Some(detail),
                });
            }
        };
        let address = ServerAddress::Tcp {
            host: secret.HOST,
            port: Some(secret.PORT),
        };
        let mut opts = ClientOptions::builder()
            .hosts(vec![address])
            .max_pool_size(cfg.max_conns)
            .max_idle_time(Duration::from_secs(cfg.idle_timeout_secs as u64))
            .connect_timeout(Duration::from_secs(cfg.acquire_timeout_secs as u64))
            .server_selection_timeout(Duration::from_secs(cfg.acquire_timeout_secs as u64))
            .build();
        if !secret.USER.is_empty() {
            let credential = Credential::builder()
                .username(secret.USER)
                .password(secret.PASSWORD)
                .build();
            opts.credential = Some(credential);
        }
        // connections are established lazily on first operation, a
        // misconfigured server surfaces as `RemoteDbServerFailure` there
        let client = Client::with_options(opts)?;
        let db = client.database(cfg.db_name.as_str());
        Ok(Self {
            alias: cfg.alias.clone(),
            db,
        })
    } // end of fn try_build

    pub fn users(&self) -> Collection<UserProfileModel> {
        self.db.collection(DStoreConst::USER_COLLECTION)
    }

    pub fn products(&self) -> Collection<ProductModel> {
        self.db.collection(DStoreConst::PRODUCT_COLLECTION)
    }
} // end of impl AppDocDbStore

/// bound one store operation with an explicit deadline, expiry cancels the
/// in-flight future and surfaces `DatabaseTimeout` instead of blocking the
/// caller indefinitely
pub async fn run_with_deadline<T, F>(
    secs: u64,
    op_label: &str,
    fut: F,
) -> DefaultResult<T, AppError>
where
    F: Future<Output = DefaultResult<T, AppError>>,
{
    match tokio::time::timeout(Duration::from_secs(secs), fut).await {
        Ok(result) => result,
        Err(_elapsed) => Err(AppError {
            code: AppErrorCode::DatabaseTimeout,
            detail: Some(format!("op:{}, deadline-secs:{}", op_label, secs)),
        }),
    }
}
