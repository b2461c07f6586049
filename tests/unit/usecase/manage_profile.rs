use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordVerifier};
use argon2::Argon2;
use tokio::sync::Mutex as AsyncMutex;

use storefront::api::web::dto::{LoginReqDto, SignupReqDto};
use storefront::usecase::{LoginUcResult, LoginUseCase, SignupUcResult, SignupUseCase};

use super::{MockAuthKeystore, MockProfileRepo, SharedCreatedProfile, SharedTokenUpdate};

fn ut_signup_req(email: &str, phone: &str) -> SignupReqDto {
    SignupReqDto {
        first_name: "Jordan".to_string(),
        last_name: "Lee".to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        password: "correct-horse-battery".to_string(),
    }
}

fn ut_shared_handles() -> (SharedCreatedProfile, SharedTokenUpdate) {
    (
        Arc::new(AsyncMutex::new(None)),
        Arc::new(AsyncMutex::new(None)),
    )
}

#[tokio::test]
async fn signup_ok() {
    let (created, tok_upd) = ut_shared_handles();
    let uc = SignupUseCase {
        repo: MockProfileRepo::build(Vec::new(), created.clone(), tok_upd),
        keystore: MockAuthKeystore::build(),
    };
    let result = uc.execute(ut_signup_req("jordan@example.com", "+14155550132")).await;
    let resp = if let SignupUcResult::Success(v) = result {
        v
    } else {
        panic!("expect success outcome");
    };
    assert_eq!(resp.user_id.len(), 24);
    let g = created.lock().await;
    let profile = g.as_ref().unwrap();
    assert_eq!(profile.id_, resp.user_id);
    assert_eq!(profile.email.as_str(), "jordan@example.com");
    assert!(profile.cart.is_empty());
    assert!(profile.orders.is_empty());
    assert!(profile.addresses.is_empty());
    assert_eq!(profile.token, format!("tok-{}", resp.user_id));
    // never the raw password, and the hash verifies only the original
    assert_ne!(profile.passwd_hashed.as_str(), "correct-horse-battery");
    let parsed = PasswordHash::new(profile.passwd_hashed.as_str()).unwrap();
    let verifier = Argon2::default();
    assert!(verifier
        .verify_password(b"correct-horse-battery", &parsed)
        .is_ok());
    assert!(verifier.verify_password(b"wrong-guess", &parsed).is_err());
}

#[tokio::test]
async fn signup_rejects_bad_input() {
    let cases = [
        {
            let mut d = ut_signup_req("jordan@example.com", "+14155550132");
            d.first_name = " ".to_string();
            d
        },
        ut_signup_req("not-an-email", "+14155550132"),
        {
            let mut d = ut_signup_req("jordan@example.com", "+14155550132");
            d.password = "short".to_string();
            d
        },
    ];
    for data in cases {
        let (created, tok_upd) = ut_shared_handles();
        let uc = SignupUseCase {
            repo: MockProfileRepo::build(Vec::new(), created.clone(), tok_upd),
            keystore: MockAuthKeystore::build(),
        };
        let result = uc.execute(data).await;
        assert!(matches!(result, SignupUcResult::InvalidInput(_)));
        assert!(created.lock().await.is_none());
    }
}

#[tokio::test]
async fn signup_rejects_duplicates() {
    let existing = vec![crate::model::ut_gen_profile(
        crate::UT_USR_ID,
        "jordan@example.com",
        "+14155550132",
    )];
    // same email
    let (created, tok_upd) = ut_shared_handles();
    let uc = SignupUseCase {
        repo: MockProfileRepo::build(existing.clone(), created.clone(), tok_upd),
        keystore: MockAuthKeystore::build(),
    };
    let result = uc.execute(ut_signup_req("jordan@example.com", "+14155550199")).await;
    assert!(matches!(result, SignupUcResult::DuplicateIdentity));
    assert!(created.lock().await.is_none());
    // same phone
    let (created, tok_upd) = ut_shared_handles();
    let uc = SignupUseCase {
        repo: MockProfileRepo::build(existing, created.clone(), tok_upd),
        keystore: MockAuthKeystore::build(),
    };
    let result = uc.execute(ut_signup_req("other@example.com", "+14155550132")).await;
    assert!(matches!(result, SignupUcResult::DuplicateIdentity));
    assert!(created.lock().await.is_none());
}

#[tokio::test]
async fn login_ok_rotates_tokens() {
    // seed through the signup use-case so the stored hash is genuine
    let (created, tok_upd) = ut_shared_handles();
    let uc = SignupUseCase {
        repo: MockProfileRepo::build(Vec::new(), created.clone(), tok_upd),
        keystore: MockAuthKeystore::build(),
    };
    let _ = uc.execute(ut_signup_req("jordan@example.com", "+14155550132")).await;
    let registered = created.lock().await.clone().unwrap();

    let (created2, tok_upd2) = ut_shared_handles();
    let uc = LoginUseCase {
        repo: MockProfileRepo::build(vec![registered.clone()], created2, tok_upd2.clone()),
        keystore: MockAuthKeystore::build(),
    };
    let data = LoginReqDto {
        email: "jordan@example.com".to_string(),
        password: "correct-horse-battery".to_string(),
    };
    let result = uc.execute(data).await;
    let resp = if let LoginUcResult::Success(v) = result {
        v
    } else {
        panic!("expect success outcome");
    };
    assert_eq!(resp.user_id, registered.id_);
    assert_eq!(resp.email.as_str(), "jordan@example.com");
    assert!(!resp.token.is_empty());
    let g = tok_upd2.lock().await;
    let (owner, token, refresh) = g.as_ref().unwrap();
    assert_eq!(owner.as_str(), registered.id_.as_str());
    assert_eq!(token.as_str(), resp.token.as_str());
    assert_eq!(refresh.as_str(), resp.refresh_token.as_str());
}

#[tokio::test]
async fn login_failure_paths() {
    let (created, tok_upd) = ut_shared_handles();
    let uc = SignupUseCase {
        repo: MockProfileRepo::build(Vec::new(), created.clone(), tok_upd),
        keystore: MockAuthKeystore::build(),
    };
    let _ = uc.execute(ut_signup_req("jordan@example.com", "+14155550132")).await;
    let registered = created.lock().await.clone().unwrap();

    // wrong password
    let (created2, tok_upd2) = ut_shared_handles();
    let uc = LoginUseCase {
        repo: MockProfileRepo::build(vec![registered], created2, tok_upd2.clone()),
        keystore: MockAuthKeystore::build(),
    };
    let data = LoginReqDto {
        email: "jordan@example.com".to_string(),
        password: "wrong-guess".to_string(),
    };
    let result = uc.execute(data).await;
    assert!(matches!(result, LoginUcResult::PasswordMismatch));
    assert!(tok_upd2.lock().await.is_none());

    // unknown email
    let (created3, tok_upd3) = ut_shared_handles();
    let uc = LoginUseCase {
        repo: MockProfileRepo::build(Vec::new(), created3, tok_upd3),
        keystore: MockAuthKeystore::build(),
    };
    let data = LoginReqDto {
        email: "nobody@example.com".to_string(),
        password: "correct-horse-battery".to_string(),
    };
    let result = uc.execute(data).await;
    assert!(matches!(result, LoginUcResult::NotFound));
}
