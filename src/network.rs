use std::io::ErrorKind;
use std::net::ToSocketAddrs;
use std::result::Result as DefaultResult;

use axum::Router;
use tokio::net::TcpListener;

use crate::api::web::{ApiRouteTableType, ApiRouteType};
use crate::error::{AppError, AppErrorCode};
use crate::{AppSharedState, WebApiListenCfg, WebApiRouteCfg};

pub type WebServiceRoute = Router<()>;

pub fn app_web_service(
    cfg: &WebApiListenCfg,
    rtable: ApiRouteTableType,
    shr_state: AppSharedState,
) -> (WebServiceRoute, u16) {
    // the config file decides which handlers are reachable and under
    // which paths, a label without a route entry simply stays disabled
    let mut router: Router<AppSharedState> = Router::new();
    let iterator = cfg.routes.iter();
    let filt_fn = |&item: &&WebApiRouteCfg| -> bool {
        let hdlr_label = item.handler.as_str();
        rtable.contains_key(hdlr_label)
    };
    let filtered = iterator.filter(filt_fn);
    let mut num_applied: u16 = 0;
    for item in filtered {
        let hdlr_label = item.handler.as_str();
        if let Some(route) = rtable.get(hdlr_label) {
            let route_cpy: ApiRouteType = route.clone();
            router = router.route(item.path.as_str(), route_cpy);
            num_applied += 1u16;
        } // 2 different paths might be linked to the same handler
    }
    let router = if num_applied > 0 {
        let api_ver_path = String::from("/") + &cfg.api_version;
        Router::new().nest(api_ver_path.as_str(), router)
    } else {
        router
    };
    let router = router.with_state(shr_state);
    (router, num_applied)
} // end of fn app_web_service

pub mod middleware {
    use std::fs::File;
    use std::str::FromStr;
    use std::time::Duration;

    use axum::http;
    use serde::Deserialize;
    use tower::limit::RateLimitLayer;
    use tower_http::cors::CorsLayer;
    use tower_http::limit::RequestBodyLimitLayer;

    use super::{AppError, AppErrorCode, DefaultResult};

    #[derive(Deserialize)]
    struct CorsAllowedOrigin {
        storefront: String,
    }

    #[allow(non_snake_case)]
    #[derive(Deserialize)]
    struct CorsConfig {
        ALLOWED_ORIGIN: CorsAllowedOrigin,
        ALLOWED_METHODS: Vec<String>,
        ALLOWED_HEADERS: Vec<String>,
        ALLOW_CREDENTIALS: bool,
        PREFLIGHT_MAX_AGE: u64,
    }

    pub fn rate_limit(max_conn: u32) -> RateLimitLayer {
        let num = max_conn as u64;
        let period = Duration::from_secs(1);
        RateLimitLayer::new(num, period)
    }

    pub fn cors(cfg_path: String) -> DefaultResult<CorsLayer, AppError> {
        let f = File::open(cfg_path).map_err(|e| AppError {
            detail: Some(e.to_string()),
            code: AppErrorCode::IOerror(e.kind()),
        })?;

        let val = serde_json::from_reader::<File, CorsConfig>(f).map_err(|e| AppError {
            detail: Some(e.to_string()),
            code: AppErrorCode::InvalidJsonFormat,
        })?;

        let methods = val
            .ALLOWED_METHODS
            .iter()
            .filter_map(|m| match http::Method::from_bytes(m.as_bytes()) {
                Ok(ms) => Some(ms),
                Err(_e) => None,
            })
            .collect::<Vec<http::Method>>();
        if val.ALLOWED_METHODS.len() > methods.len() {
            return Err(AppError {
                detail: Some("invalid-allowed-method".to_string()),
                code: AppErrorCode::InvalidInput,
            });
        }
        let headers = val
            .ALLOWED_HEADERS
            .iter()
            .filter_map(|h| match http::HeaderName::from_str(h.as_str()) {
                Ok(hs) => Some(hs),
                Err(_e) => None,
            })
            .collect::<Vec<http::HeaderName>>();
        if !headers.contains(&http::header::AUTHORIZATION)
            || !headers.contains(&http::header::CONTENT_TYPE)
            || !headers.contains(&http::header::ACCEPT)
        {
            return Err(AppError {
                detail: Some("invalid-allowed-header".to_string()),
                code: AppErrorCode::InvalidInput,
            });
        }
        let origin = val
            .ALLOWED_ORIGIN
            .storefront
            .parse::<http::HeaderValue>()
            .map_err(|e| AppError {
                detail: Some(format!("invalid-origin-header: {}", e)),
                code: AppErrorCode::InvalidInput,
            })?;
        let co = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(val.ALLOW_CREDENTIALS)
            .max_age(Duration::from_secs(val.PREFLIGHT_MAX_AGE));
        Ok(co)
    } // end of fn cors

    pub fn req_body_limit(limit: usize) -> RequestBodyLimitLayer {
        RequestBodyLimitLayer::new(limit)
    }
} // end of inner-module middleware

pub async fn net_listener(
    mut domain_host: String,
    port: u16,
) -> DefaultResult<TcpListener, AppError> {
    if !domain_host.contains(':') {
        domain_host += &":0";
    }
    let mut iterator = domain_host.to_socket_addrs().map_err(
        // IP not found after domain name resolution
        |e| AppError {
            detail: Some(e.to_string() + ", domain_host:" + &domain_host),
            code: AppErrorCode::IOerror(ErrorKind::AddrNotAvailable),
        },
    )?;
    loop {
        let mut addr = iterator.next().ok_or(AppError {
            detail: Some("failed to bound with all IPs".to_string()),
            code: AppErrorCode::IOerror(ErrorKind::AddrInUse),
        })?;
        addr.set_port(port);
        if let Ok(b) = TcpListener::bind(addr).await {
            break Ok(b);
        }
    } // end of loop
} // end of fn net_listener
