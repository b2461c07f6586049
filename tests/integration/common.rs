use std::boxed::Box;
use std::env::temp_dir;
use std::fs;
use std::result::Result as DefaultResult;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::body::Body as AxumBody;
use chrono::Local as LocalTime;
use http::{Request, Response};
use http_body_util::BodyExt;
use serde::Deserialize;
use tower::ServiceExt;

use storefront::api::web::route_table;
use storefront::confidentiality::AbstractConfidentiality;
use storefront::constant::app_meta;
use storefront::error::AppError;
use storefront::logging::AppLogContext;
use storefront::network::{app_web_service, WebServiceRoute};
use storefront::{AppAuthedClaim, AppBasepathCfg, AppConfig, AppSharedState};

// every handler label this service exposes is routed here, the suite
// drives the assembled router directly without opening a socket
const ITEST_CONFIG: &str = r#"{
    "logging": {
        "handlers": [
            {"alias": "errlog", "min_level": "ERROR", "destination": "console", "path": null}
        ],
        "loggers": [
            {"alias": "storefront", "handlers": ["errlog"], "level": "INFO"}
        ]
    },
    "listen": {
        "api_version": "1.0.2",
        "host": "localhost",
        "port": 8010,
        "max_connections": 127,
        "cors": "common/data/cors.json",
        "routes": [
            {"path": "/usr/signup", "handler": "signup"},
            {"path": "/usr/login", "handler": "login"},
            {"path": "/products", "handler": "list_products"},
            {"path": "/products/search", "handler": "search_products"},
            {"path": "/admin/products", "handler": "admin_add_product"},
            {"path": "/cart", "handler": "retrieve_cart"},
            {"path": "/cart/item", "handler": "add_cart_line"},
            {"path": "/cart/item", "handler": "remove_cart_lines"},
            {"path": "/cart/checkout", "handler": "checkout_cart"},
            {"path": "/checkout/instant", "handler": "instant_buy"},
            {"path": "/orders", "handler": "list_orders"},
            {"path": "/addresses", "handler": "add_address"},
            {"path": "/addresses", "handler": "delete_addresses"},
            {"path": "/addresses/home", "handler": "edit_home_address"},
            {"path": "/addresses/work", "handler": "edit_work_address"}
        ]
    },
    "limit_req_body_in_bytes": 131072,
    "num_workers": 2,
    "stack_sz_kb": 256,
    "data_store": [
        {"_type": "InMemory", "alias": "itest", "max_items": 256}
    ],
    "auth": {"secret_path": "backend/jwt_secret"},
    "confidentiality": {"source": "UserSpace", "sys_path": "common/data/secrets.json"}
}"#;

pub(crate) const ITEST_API_VER: &str = "1.0.2";

static NUM_STATES_BUILT: AtomicU32 = AtomicU32::new(0);

struct ITestConfidential {}

impl AbstractConfidentiality for ITestConfidential {
    fn try_get_payload(&self, _id: &str) -> DefaultResult<String, AppError> {
        Ok("itest-signing-secret-445566778899".to_string())
    }
}

// a fresh shared state (and a fresh in-memory store) per test case, the
// cases stay order-independent
pub(crate) fn test_setup_shr_state() -> DefaultResult<AppSharedState, AppError> {
    let seq = NUM_STATES_BUILT.fetch_add(1, Ordering::Relaxed);
    let cfg_path = temp_dir().join(format!(
        "storefront-itest-{}-{}.json",
        std::process::id(),
        seq
    ));
    fs::write(&cfg_path, ITEST_CONFIG).unwrap();
    let api_server = AppConfig::parse_from_file(cfg_path.to_string_lossy().to_string())?;
    let top_lvl_cfg = AppConfig {
        api_server,
        basepath: AppBasepathCfg {
            system: temp_dir().to_string_lossy().to_string(),
            service: temp_dir().to_string_lossy().to_string(),
        },
    };
    let log_ctx = AppLogContext::new(&top_lvl_cfg.basepath, &top_lvl_cfg.api_server.logging);
    let cfdntl: Box<dyn AbstractConfidentiality> = Box::new(ITestConfidential {});
    AppSharedState::new(top_lvl_cfg, log_ctx, cfdntl)
}

pub(crate) fn setup_mock_authed_claim(usr_id: &str) -> AppAuthedClaim {
    let now = LocalTime::now().fixed_offset();
    let ts = now.timestamp();
    AppAuthedClaim {
        profile: usr_id.to_string(),
        email: format!("itest@example.com"),
        iat: ts - 54,
        exp: ts + 150,
        aud: vec![app_meta::LABEL.to_string()],
    }
}

pub(crate) struct TestWebServer {}

impl TestWebServer {
    pub fn setup(shr_state: AppSharedState) -> WebServiceRoute {
        let rtable = route_table();
        let top_lvl_cfg = shr_state.config().clone();
        let listener = &top_lvl_cfg.api_server.listen;
        let (srv, num_applied) = app_web_service(listener, rtable, shr_state);
        assert!(num_applied > 0);
        srv
    }

    pub async fn consume(
        srv: &WebServiceRoute,
        req: Request<AxumBody>,
    ) -> Response<axum::body::Body> {
        let cpy = srv.clone();
        let result = cpy.oneshot(req).await;
        result.unwrap()
    }

    pub async fn to_custom_type<T: for<'a> Deserialize<'a>>(
        resp: Response<axum::body::Body>,
    ) -> T {
        let raw = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice::<T>(&raw).unwrap()
    }
} // end of impl TestWebServer

pub(crate) fn itest_req_builder(
    uri: String,
    method: &str,
    body: Option<String>,
    authed: Option<AppAuthedClaim>,
) -> Request<AxumBody> {
    let rawbody = match body {
        Some(b) => AxumBody::from(b),
        None => AxumBody::empty(),
    };
    let mut req = Request::builder()
        .uri(uri)
        .method(method)
        .header("content-type", "application/json")
        .header("accept", "application/json")
        .body(rawbody)
        .unwrap();
    if let Some(claim) = authed {
        let _ = req.extensions_mut().insert(claim);
    }
    req
}
