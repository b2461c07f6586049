use std::result::Result as DefaultResult;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use uuid::{Builder, NoContext, Timestamp, Uuid};

pub mod api;
pub mod constant;
pub mod error;
pub mod logging;
pub mod model;
pub mod network;
pub mod repository;
pub mod usecase;

pub mod confidentiality;

mod config;
pub use config::{
    ApiServerCfg, AppAuthCfg, AppBasepathCfg, AppConfidentialCfg, AppConfig, AppDataStoreCfg,
    AppDocDbServerCfg, AppInMemoryDbCfg, AppLogHandlerCfg, AppLoggerCfg, AppLoggingCfg,
    WebApiListenCfg, WebApiRouteCfg,
};

mod auth;
pub use auth::{
    AbstractAuthKeystore, AppAuthKeystore, AppAuthedClaim, AppTokenPair,
};

mod adapter;
pub use adapter::datastore;

use confidentiality::AbstractConfidentiality;
use error::AppError;
use logging::AppLogContext;

type WebApiPath = String;
type WebApiHdlrLabel = &'static str;
type AppLogAlias = Arc<String>;

pub struct AppDataStoreContext {
    pub in_mem: Option<Arc<Box<dyn datastore::AbstInMemoryDStore>>>,
    pub doc_dbs: Option<Vec<Arc<datastore::AppDocDbStore>>>,
}

// global state shared by all threads
pub struct AppSharedState {
    _cfg: Arc<AppConfig>,
    _log: Arc<AppLogContext>,
    dstore: Arc<AppDataStoreContext>,
    _auth_keys: Arc<Box<dyn AbstractAuthKeystore>>,
    _shutdown: Arc<AtomicBool>,
}

impl AppSharedState {
    pub fn new(
        cfg: AppConfig,
        log: AppLogContext,
        confidential: Box<dyn AbstractConfidentiality>,
    ) -> DefaultResult<Self, AppError> {
        let auth_keys = AppAuthKeystore::try_build(&cfg.api_server.auth, &confidential)?;
        let confidential = Arc::new(confidential);
        let log = Arc::new(log);
        let (in_mem, doc_dbs) =
            datastore::build_context(log.clone(), &cfg.api_server.data_store, confidential);
        let in_mem = in_mem.map(Arc::new);
        let doc_dbs =
            doc_dbs.map(|lst| lst.into_iter().map(Arc::new).collect::<Vec<_>>());
        let ds_ctx = Arc::new(AppDataStoreContext { in_mem, doc_dbs });
        Ok(Self {
            _cfg: Arc::new(cfg),
            _log: log,
            dstore: ds_ctx,
            _auth_keys: Arc::new(Box::new(auth_keys)),
            _shutdown: Arc::new(AtomicBool::new(false)),
        })
    } // end of fn new

    pub fn config(&self) -> &Arc<AppConfig> {
        &self._cfg
    }

    pub fn log_context(&self) -> &Arc<AppLogContext> {
        &self._log
    }

    pub fn datastore(&self) -> Arc<AppDataStoreContext> {
        self.dstore.clone()
    }

    pub fn auth_keystore(&self) -> Arc<Box<dyn AbstractAuthKeystore>> {
        self._auth_keys.clone()
    }

    pub fn shutdown(&self) -> Arc<AtomicBool> {
        self._shutdown.clone()
    }
} // end of impl AppSharedState

impl Clone for AppSharedState {
    fn clone(&self) -> Self {
        Self {
            _cfg: self._cfg.clone(),
            _log: self._log.clone(),
            dstore: self.dstore.clone(),
            _auth_keys: self._auth_keys.clone(),
            _shutdown: self._shutdown.clone(),
        }
    }
}

pub(crate) fn generate_custom_uid(machine_code: u8) -> Uuid {
    // UUIDv7 is for single-node application. This app needs to consider
    // scalability of multi-node environment, UUIDv8 can be utilized cuz it
    // allows custom ID layout, so few bits of the ID can be assigned to
    // represent each machine/node ID,  rest of that should be timestamp with
    // random byte sequence
    let ts_ctx = NoContext;
    let (secs, nano) = Timestamp::now(ts_ctx).to_unix();
    let millis = (secs * 1000).saturating_add((nano as u64) / 1_000_000);
    let mut node_id = rand::random::<[u8; 10]>();
    node_id[0] = machine_code;
    let builder = Builder::from_unix_timestamp_millis(millis, &node_id);
    builder.into_uuid()
}
