//! Offline token exchange against Red Hat SSO.
//!
//! See https://access.redhat.com/articles/3626371 for how offline tokens are
//! issued. The exchange is a plain OAuth2 `refresh_token` grant.

use serde::Deserialize;
use tracing::debug;

use super::BearerToken;
use crate::http::{decode_json, request_error};
use crate::{Error, Result};

/// OAuth2 client id registered for portal API access.
pub const CLIENT_ID: &str = "rhsm-api";

/// Token endpoint response (only the field we care about).
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Exchange an offline token for a short-lived bearer token.
///
/// Any non-success status, non-JSON body, or missing `access_token` is an
/// error. There is no retry.
pub fn exchange_offline_token(
    agent: &ureq::Agent,
    token_url: &str,
    offline_token: &str,
) -> Result<BearerToken> {
    debug!(url = token_url, "requesting portal access token");

    let resp = agent
        .post(token_url)
        .set("Accept", "application/json")
        .send_form(&[
            ("grant_type", "refresh_token"),
            ("client_id", CLIENT_ID),
            ("refresh_token", offline_token),
        ])
        .map_err(|e| request_error("token exchange", e))?;

    let body: TokenResponse = decode_json("token exchange", resp)?;
    match body.access_token {
        Some(token) if !token.is_empty() => Ok(BearerToken::new(token)),
        _ => Err(Error::Auth(
            "token endpoint response has no access_token".to_string(),
        )),
    }
}
