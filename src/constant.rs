use crate::WebApiHdlrLabel;

pub mod app_meta {
    pub const LABEL: &'static str = "storefront";
    pub const MACHINE_CODE: u8 = 1;
    // TODO, machine code to the order-ID generator should be configurable
}

pub const ENV_VAR_SYS_BASE_PATH: &'static str = "SYS_BASE_PATH";
pub const ENV_VAR_SERVICE_BASE_PATH: &'static str = "SERVICE_BASE_PATH";
pub const ENV_VAR_CONFIG_FILE_PATH: &'static str = "CONFIG_FILE_PATH";

pub const EXPECTED_ENV_VAR_LABELS: [&'static str; 3] = [
    ENV_VAR_SYS_BASE_PATH,
    ENV_VAR_SERVICE_BASE_PATH,
    ENV_VAR_CONFIG_FILE_PATH,
];

pub mod hard_limit {
    // the cart and the address book are embedded arrays inside one user
    // document, they must not grow without bound
    pub const MAX_LINES_PER_CART: usize = 200;
    pub const MAX_NUM_ADDRESSES_PER_USER: usize = 2;

    pub const MAX_ITEMS_STORED_PER_MODEL: u32 = 2200u32;
    pub const MAX_DB_CONNECTIONS: u32 = 10000u32;
    pub const MAX_SECONDS_DB_IDLE: u16 = 600u16;

    // deadline on every store operation, mutations are short, read and
    // aggregation paths are allowed to run far longer
    pub const SECONDS_MUTATE_OP: u64 = 5;
    pub const SECONDS_READ_OP: u64 = 100;
}

pub mod auth {
    pub const TOKEN_VALID_HOURS: i64 = 24;
    pub const REFRESH_TOKEN_VALID_HOURS: i64 = 168;
}

pub(crate) mod api {
    use super::WebApiHdlrLabel;

    #[allow(non_camel_case_types)]
    pub(crate) struct web {}

    impl web {
        pub(crate) const SIGNUP: WebApiHdlrLabel = "signup";
        pub(crate) const LOGIN: WebApiHdlrLabel = "login";
        pub(crate) const LIST_PRODUCTS: WebApiHdlrLabel = "list_products";
        pub(crate) const SEARCH_PRODUCTS: WebApiHdlrLabel = "search_products";
        pub(crate) const ADMIN_ADD_PRODUCT: WebApiHdlrLabel = "admin_add_product";
        pub(crate) const RETRIEVE_CART: WebApiHdlrLabel = "retrieve_cart";
        pub(crate) const ADD_CART_LINE: WebApiHdlrLabel = "add_cart_line";
        pub(crate) const REMOVE_CART_LINES: WebApiHdlrLabel = "remove_cart_lines";
        pub(crate) const CHECKOUT_CART: WebApiHdlrLabel = "checkout_cart";
        pub(crate) const INSTANT_BUY: WebApiHdlrLabel = "instant_buy";
        pub(crate) const LIST_ORDERS: WebApiHdlrLabel = "list_orders";
        pub(crate) const ADD_ADDRESS: WebApiHdlrLabel = "add_address";
        pub(crate) const EDIT_HOME_ADDRESS: WebApiHdlrLabel = "edit_home_address";
        pub(crate) const EDIT_WORK_ADDRESS: WebApiHdlrLabel = "edit_work_address";
        pub(crate) const DELETE_ADDRESSES: WebApiHdlrLabel = "delete_addresses";
    }
}

pub(crate) const HTTP_CONTENT_TYPE_JSON: &str = "application/json";

pub(crate) mod datastore {
    pub(crate) const USER_COLLECTION: &str = "user_profile";
    pub(crate) const PRODUCT_COLLECTION: &str = "product";
}

pub(crate) const REGEX_EMAIL_RFC5322: &'static str = r#"(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9]))\.){3}(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9])|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])"#;

pub(crate) mod logging {
    use serde::Deserialize;

    #[derive(Deserialize, Clone, Copy, Debug)]
    pub enum Level {
        TRACE,
        DEBUG,
        INFO,
        WARNING,
        ERROR,
        FATAL,
    }

    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "lowercase")]
    pub enum Destination {
        CONSOLE,
        LOCALFS,
    }
}
