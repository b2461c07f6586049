use std::env::temp_dir;
use std::fs;

use storefront::error::AppErrorCode;
use storefront::{AppConfig, AppDataStoreCfg};

const CFG_OK: &str = r#"{
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
        "port": 8012,
        "max_connections": 127,
        "cors": "common/data/cors.json",
        "routes": [
            {"path": "/cart", "handler": "retrieve_cart"},
            {"path": "/cart/checkout", "handler": "checkout_cart"}
        ]
    },
    "limit_req_body_in_bytes": 131072,
    "num_workers": 2,
    "stack_sz_kb": 256,
    "data_store": [
        {"_type": "InMemory", "alias": "utest", "max_items": 64}
    ],
    "auth": {"secret_path": "backend/jwt_secret"},
    "confidentiality": {"source": "UserSpace", "sys_path": "common/data/secrets.json"}
}"#;

const CFG_NO_ROUTE: &str = r#"{
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
        "port": 8012,
        "max_connections": 127,
        "cors": "common/data/cors.json",
        "routes": []
    },
    "limit_req_body_in_bytes": 131072,
    "num_workers": 2,
    "stack_sz_kb": 256,
    "data_store": [
        {"_type": "InMemory", "alias": "utest", "max_items": 64}
    ],
    "auth": {"secret_path": "backend/jwt_secret"},
    "confidentiality": {"source": "UserSpace", "sys_path": "common/data/secrets.json"}
}"#;

const CFG_BAD_VERSION: &str = r#"{
    "logging": {
        "handlers": [
            {"alias": "errlog", "min_level": "ERROR", "destination": "console", "path": null}
        ],
        "loggers": [
            {"alias": "storefront", "handlers": ["errlog"], "level": "INFO"}
        ]
    },
    "listen": {
        "api_version": "v2.beta",
        "host": "localhost",
        "port": 8012,
        "max_connections": 127,
        "cors": "common/data/cors.json",
        "routes": [
            {"path": "/cart", "handler": "retrieve_cart"}
        ]
    },
    "limit_req_body_in_bytes": 131072,
    "num_workers": 2,
    "stack_sz_kb": 256,
    "data_store": [
        {"_type": "InMemory", "alias": "utest", "max_items": 64}
    ],
    "auth": {"secret_path": "backend/jwt_secret"},
    "confidentiality": {"source": "UserSpace", "sys_path": "common/data/secrets.json"}
}"#;

const CFG_UNKNOWN_LOG_HANDLER: &str = r#"{
    "logging": {
        "handlers": [
            {"alias": "errlog", "min_level": "ERROR", "destination": "console", "path": null}
        ],
        "loggers": [
            {"alias": "storefront", "handlers": ["not-declared"], "level": "INFO"}
        ]
    },
    "listen": {
        "api_version": "1.0.2",
        "host": "localhost",
        "port": 8012,
        "max_connections": 127,
        "cors": "common/data/cors.json",
        "routes": [
            {"path": "/cart", "handler": "retrieve_cart"}
        ]
    },
    "limit_req_body_in_bytes": 131072,
    "num_workers": 2,
    "stack_sz_kb": 256,
    "data_store": [
        {"_type": "InMemory", "alias": "utest", "max_items": 64}
    ],
    "auth": {"secret_path": "backend/jwt_secret"},
    "confidentiality": {"source": "UserSpace", "sys_path": "common/data/secrets.json"}
}"#;

const CFG_INMEM_OVER_LIMIT: &str = r#"{
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
        "port": 8012,
        "max_connections": 127,
        "cors": "common/data/cors.json",
        "routes": [
            {"path": "/cart", "handler": "retrieve_cart"}
        ]
    },
    "limit_req_body_in_bytes": 131072,
    "num_workers": 2,
    "stack_sz_kb": 256,
    "data_store": [
        {"_type": "InMemory", "alias": "utest", "max_items": 999999}
    ],
    "auth": {"secret_path": "backend/jwt_secret"},
    "confidentiality": {"source": "UserSpace", "sys_path": "common/data/secrets.json"}
}"#;

pub(crate) fn ut_write_cfg_file(name: &str, content: &str) -> String {
    let p = temp_dir().join(format!(
        "storefront-ut-{}-{}.json",
        std::process::id(),
        name
    ));
    fs::write(&p, content).unwrap();
    p.to_string_lossy().to_string()
}

#[test]
fn parse_ok() {
    let path = ut_write_cfg_file("cfg-ok", CFG_OK);
    let parsed = AppConfig::parse_from_file(path).unwrap();
    assert_eq!(parsed.listen.api_version.as_str(), "1.0.2");
    assert_eq!(parsed.listen.port, 8012u16);
    assert_eq!(parsed.listen.routes.len(), 2);
    assert_eq!(parsed.listen.routes[1].handler.as_str(), "checkout_cart");
    assert_eq!(parsed.num_workers, 2u8);
    assert_eq!(parsed.data_store.len(), 1);
    match &parsed.data_store[0] {
        AppDataStoreCfg::InMemory(c) => {
            assert_eq!(c.max_items, 64u32);
        }
        _others => {
            panic!("expect in-memory data store");
        }
    }
    assert_eq!(parsed.auth.secret_path.as_str(), "backend/jwt_secret");
}

#[test]
fn parse_missing_file() {
    let path = temp_dir()
        .join("storefront-ut-nonexistent.json")
        .to_string_lossy()
        .to_string();
    let result = AppConfig::parse_from_file(path);
    assert!(matches!(
        result.unwrap_err().code,
        AppErrorCode::IOerror(_)
    ));
}

#[test]
fn reject_empty_route_table() {
    let path = ut_write_cfg_file("cfg-no-route", CFG_NO_ROUTE);
    let result = AppConfig::parse_from_file(path);
    assert_eq!(result.unwrap_err().code, AppErrorCode::NoRouteApiServerCfg);
}

#[test]
fn reject_non_numeric_version() {
    let path = ut_write_cfg_file("cfg-bad-version", CFG_BAD_VERSION);
    let result = AppConfig::parse_from_file(path);
    assert_eq!(result.unwrap_err().code, AppErrorCode::InvalidVersion);
}

#[test]
fn reject_unknown_log_handler_alias() {
    let path = ut_write_cfg_file("cfg-bad-logger", CFG_UNKNOWN_LOG_HANDLER);
    let result = AppConfig::parse_from_file(path);
    assert_eq!(
        result.unwrap_err().code,
        AppErrorCode::InvalidHandlerLoggerCfg
    );
}

#[test]
fn reject_oversized_inmem_store() {
    let path = ut_write_cfg_file("cfg-inmem-limit", CFG_INMEM_OVER_LIMIT);
    let result = AppConfig::parse_from_file(path);
    assert_eq!(result.unwrap_err().code, AppErrorCode::ExceedingMaxLimit);
}
