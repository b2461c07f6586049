use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::BoxError;
use tokio::runtime::Builder as RuntimeBuilder;
use tower::buffer::BufferLayer;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use storefront::api::web::route_table;
use storefront::confidentiality::{self, AbstractConfidentiality};
use storefront::constant::EXPECTED_ENV_VAR_LABELS;
use storefront::logging::{app_log_event, AppLogContext, AppLogLevel};
use storefront::network::{app_web_service, middleware, net_listener};
use storefront::{AppConfig, AppSharedState};

async fn shutdown_signal(flag: Arc<AtomicBool>) {
    // cooperative shutdown, in-flight requests drain before the process
    // leaves the serve loop
    let _ = tokio::signal::ctrl_c().await;
    flag.store(true, Ordering::Relaxed);
}

async fn start_server(shr_state: AppSharedState) {
    let log_ctx_p = shr_state.log_context().clone();
    let cfg = shr_state.config().clone();
    let routes = route_table();
    let listener_cfg = &cfg.api_server.listen;
    let (service, num_applied) = app_web_service(listener_cfg, routes, shr_state.clone());
    if num_applied == 0 {
        app_log_event!(
            log_ctx_p,
            AppLogLevel::ERROR,
            "no route created, web API server failed to start"
        );
        return;
    }
    let result = net_listener(listener_cfg.host.clone(), listener_cfg.port).await;
    match result {
        Ok(b) => {
            let reqlm = middleware::req_body_limit(cfg.api_server.limit_req_body_in_bytes);
            let co = match middleware::cors(
                cfg.basepath.system.clone() + "/" + listener_cfg.cors.as_str(),
            ) {
                Ok(v) => v,
                Err(e) => {
                    app_log_event!(
                        log_ctx_p,
                        AppLogLevel::ERROR,
                        "cors layer init error, detail: {:?}",
                        e
                    );
                    CorsLayer::new()
                }
            };
            // the rate limiter is neither `Clone` nor infallible, the
            // buffer in front restores both properties for the router
            let ratelm = ServiceBuilder::new()
                .layer(HandleErrorLayer::new(|_e: BoxError| async {
                    StatusCode::SERVICE_UNAVAILABLE
                }))
                .layer(BufferLayer::new(1024))
                .layer(middleware::rate_limit(listener_cfg.max_connections));
            let service = service
                .layer(ratelm)
                .layer(ServiceBuilder::new().layer(reqlm).layer(co));
            let sr = axum::serve(b, service.into_make_service())
                .with_graceful_shutdown(shutdown_signal(shr_state.shutdown()));
            let _ = sr.await;
            app_log_event!(log_ctx_p, AppLogLevel::WARNING, "API server terminating ");
        }
        Err(e) => {
            app_log_event!(
                log_ctx_p,
                AppLogLevel::ERROR,
                "API server failed to start, {} ",
                e
            );
        }
    }
} // end of fn start_server

fn start_async_runtime(cfg: AppConfig, confidential: Box<dyn AbstractConfidentiality>) {
    let log_ctx = AppLogContext::new(&cfg.basepath, &cfg.api_server.logging);
    let shr_state = match AppSharedState::new(cfg, log_ctx, confidential) {
        Ok(s) => s,
        Err(e) => {
            println!("app shared state failed to build, error: {} ", e);
            return;
        }
    };
    let cfg = shr_state.config();
    let log_ctx = shr_state.log_context().clone();
    let log_ctx2 = log_ctx.clone();
    let stack_nbytes: usize = (cfg.api_server.stack_sz_kb as usize) << 10;
    let result = RuntimeBuilder::new_multi_thread()
        .worker_threads(cfg.api_server.num_workers as usize)
        .on_thread_start(move || {
            // this closure will be invoked several times by new thread,
            // depending on number of work threads in the application, all
            // variables moved into this closure have to be clonable.
            let log_cpy = log_ctx.clone();
            app_log_event!(log_cpy, AppLogLevel::INFO, "[API server] worker started");
        })
        .on_thread_stop(move || {
            let log_cpy = log_ctx2.clone();
            app_log_event!(log_cpy, AppLogLevel::INFO, "[API server] worker terminating");
        })
        .thread_stack_size(stack_nbytes)
        .thread_name("web-api-worker")
        // manage low-level I/O drivers used by network types
        .enable_io()
        // rate limiter in crate `tower` requires the timer in the runtime builder
        .enable_time()
        .build();
    match result {
        Ok(rt) => {
            // new worker threads spawned
            rt.block_on(async move {
                start_server(shr_state).await;
            }); // runtime started
        }
        Err(e) => {
            let log_ctx_p = shr_state.log_context();
            app_log_event!(
                log_ctx_p,
                AppLogLevel::ERROR,
                "async runtime failed to build, {} ",
                e
            );
        }
    };
} // end of fn start_async_runtime

fn main() {
    let iter = env::vars().filter(|(k, _v)| EXPECTED_ENV_VAR_LABELS.contains(&k.as_str()));
    let arg_map: HashMap<String, String, RandomState> = HashMap::from_iter(iter);
    match AppConfig::new(arg_map) {
        Ok(cfg) => match confidentiality::build_context(&cfg) {
            Ok(confidential) => start_async_runtime(cfg, confidential),
            Err(e) => {
                println!("app failed to init confidentiality handler, error code: {} ", e);
            }
        },
        Err(e) => {
            println!("app failed to configure, error code: {} ", e);
        }
    };
} // end of main
