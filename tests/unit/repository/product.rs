use storefront::error::AppErrorCode;
use storefront::repository::{app_repo_product, generate_object_id};

use crate::model::ut_gen_product;
use crate::UT_MALFORMED_ID;

use super::dstore_ctx_setup;

#[tokio::test]
async fn create_fetch_list() {
    let ds = dstore_ctx_setup();
    let repo = app_repo_product(ds).await.unwrap();
    let ids = (0..3).map(|_| generate_object_id()).collect::<Vec<_>>();
    let data = [
        (ids[0].as_str(), "Alphanumeric Keyboard", 2390u32),
        (ids[1].as_str(), "USB-C dock", 1850u32),
        (ids[2].as_str(), "walnut desk mat", 990u32),
    ];
    for item in data {
        repo.create(ut_gen_product(item)).await.unwrap();
    }
    let found = repo.fetch_one(ids[1].as_str()).await.unwrap();
    assert_eq!(found.name.as_str(), "USB-C dock");
    assert_eq!(found.price, 1850u32);
    let listing = repo.fetch_all().await.unwrap();
    assert_eq!(listing.len(), 3);
}

#[tokio::test]
async fn fetch_one_error_paths() {
    let ds = dstore_ctx_setup();
    let repo = app_repo_product(ds).await.unwrap();
    let unknown = generate_object_id();
    let result = repo.fetch_one(unknown.as_str()).await;
    assert_eq!(result.unwrap_err().code, AppErrorCode::ProductNotExist);
    let result = repo.fetch_one(UT_MALFORMED_ID).await;
    assert_eq!(result.unwrap_err().code, AppErrorCode::InvalidInput);
}

#[tokio::test]
async fn search_substring_case_insensitive() {
    let ds = dstore_ctx_setup();
    let repo = app_repo_product(ds).await.unwrap();
    let data = [
        (generate_object_id(), "Ceramic Pour-Over Dripper"),
        (generate_object_id(), "electric drip kettle"),
        (generate_object_id(), "burr grinder"),
    ];
    for (id_, name) in data.iter() {
        repo.create(ut_gen_product((id_.as_str(), name, 500)))
            .await
            .unwrap();
    }
    let found = repo.search("DRIP").await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.name.to_lowercase().contains("drip")));
    // no match means an empty listing, not an error
    let found = repo.search("typewriter").await.unwrap();
    assert!(found.is_empty());
}
