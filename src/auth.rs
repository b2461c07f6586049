use std::boxed::Box;
use std::result::Result as DefaultResult;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use chrono::{Duration, Local as LocalTime};
use jsonwebtoken::{
    decode as jwt_decode, encode as jwt_encode, Algorithm, DecodingKey, EncodingKey,
    Header as JwtHeader, Validation as JwtValidation,
};
use serde::{Deserialize, Serialize};

use crate::confidentiality::AbstractConfidentiality;
use crate::constant::{app_meta, auth as AuthConst};
use crate::error::{AppError, AppErrorCode};
use crate::AppAuthCfg;
use crate::AppSharedState;

/// identity carried by a verified access token. Handlers take the user
/// identifier exclusively from here, requests never name a user id
/// themselves.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct AppAuthedClaim {
    pub profile: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub aud: Vec<String>,
}

// refresh tokens are only issued and stored by this service, a peer
// user-management system redeems them, no decode path exists here
#[derive(Serialize)]
struct AppRefreshClaim<'a> {
    profile: &'a str,
    iat: i64,
    exp: i64,
}

pub struct AppTokenPair {
    pub token: String,
    pub refresh_token: String,
}

pub trait AbstractAuthKeystore: Send + Sync {
    fn issue_token_pair(&self, profile: &str, email: &str)
        -> DefaultResult<AppTokenPair, AppError>;

    fn verify(&self, encoded: &str) -> DefaultResult<AppAuthedClaim, AppError>;
}

pub struct AppAuthKeystore {
    encode_key: EncodingKey,
    decode_key: DecodingKey,
}

impl AppAuthKeystore {
    pub fn try_build(
        cfg: &AppAuthCfg,
        confidential: &Box<dyn AbstractConfidentiality>,
    ) -> DefaultResult<Self, AppError> {
        let secret = confidential.try_get_payload(cfg.secret_path.as_str())?;
        if secret.is_empty() {
            return Err(AppError {
                code: AppErrorCode::CryptoFailure,
                detail: Some("empty-signing-secret".to_string()),
            });
        }
        Ok(Self {
            encode_key: EncodingKey::from_secret(secret.as_bytes()),
            decode_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }
}

impl AbstractAuthKeystore for AppAuthKeystore {
    fn issue_token_pair(
        &self,
        profile: &str,
        email: &str,
    ) -> DefaultResult<AppTokenPair, AppError> {
        let now = LocalTime::now().fixed_offset();
        let claim = AppAuthedClaim {
            profile: profile.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(AuthConst::TOKEN_VALID_HOURS)).timestamp(),
            aud: vec![app_meta::LABEL.to_string()],
        };
        let refresh_claim = AppRefreshClaim {
            profile,
            iat: now.timestamp(),
            exp: (now + Duration::hours(AuthConst::REFRESH_TOKEN_VALID_HOURS)).timestamp(),
        };
        let hdr = JwtHeader::new(Algorithm::HS256);
        let token = jwt_encode(&hdr, &claim, &self.encode_key)?;
        let refresh_token = jwt_encode(&hdr, &refresh_claim, &self.encode_key)?;
        Ok(AppTokenPair {
            token,
            refresh_token,
        })
    }

    fn verify(&self, encoded: &str) -> DefaultResult<AppAuthedClaim, AppError> {
        let validator = {
            let aud = [app_meta::LABEL];
            let required_claims = ["profile", "email", "aud", "exp", "iat"];
            let mut v = JwtValidation::new(Algorithm::HS256);
            v.set_audience(&aud);
            v.set_required_spec_claims(&required_claims);
            v
        };
        let decoded = jwt_decode::<AppAuthedClaim>(encoded, &self.decode_key, &validator)?;
        Ok(decoded.claims)
    }
} // end of impl AppAuthKeystore

#[async_trait]
impl FromRequestParts<AppSharedState> for AppAuthedClaim {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppSharedState,
    ) -> DefaultResult<Self, Self::Rejection> {
        // an upstream layer (or the test harness) may already have placed
        // a verified claim into the request extensions
        if let Some(claim) = parts.extensions.get::<AppAuthedClaim>() {
            return Ok(claim.clone());
        }
        let rawhdr = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(StatusCode::UNAUTHORIZED)?;
        let rawstr = rawhdr.to_str().map_err(|_e| StatusCode::UNAUTHORIZED)?;
        let encoded = rawstr
            .strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?;
        match state.auth_keystore().verify(encoded) {
            Ok(claim) => Ok(claim),
            Err(e) => match e.code {
                AppErrorCode::AuthTokenExpired | AppErrorCode::AuthTokenFailure => {
                    Err(StatusCode::UNAUTHORIZED)
                }
                _others => Err(StatusCode::INTERNAL_SERVER_ERROR),
            },
        }
    }
} // end of impl FromRequestParts for AppAuthedClaim
