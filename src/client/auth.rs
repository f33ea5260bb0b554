//! HMAC request signing for the Veracode API
//!
//! Every request carries an `Authorization` header of the form
//! `VERACODE-HMAC-SHA-256 id=..,ts=..,nonce=..,sig=..`. The signing key is
//! derived from the hex API secret through a nonce → timestamp → version chain.

use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::Sha256;

use crate::config::Credentials;
use crate::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

/// Authorization scheme name
pub const AUTH_SCHEME: &str = "VERACODE-HMAC-SHA-256";

const REQUEST_VERSION: &[u8] = b"vcode_request_version_1";

/// Build the authorization header value for one request.
pub fn authorization_header(
    credentials: &Credentials,
    url: &Url,
    method: &reqwest::Method,
) -> Result<String, ApiError> {
    let nonce = *uuid::Uuid::new_v4().as_bytes();
    let timestamp = Utc::now().timestamp_millis().to_string();

    sign(credentials, url, method.as_str(), &nonce, &timestamp)
}

/// Compute the header with an explicit nonce and timestamp.
pub fn sign(
    credentials: &Credentials,
    url: &Url,
    method: &str,
    nonce: &[u8],
    timestamp: &str,
) -> Result<String, ApiError> {
    let secret = hex::decode(credentials.key.trim()).map_err(|e| {
        ApiError::InvalidCredentials(format!("API key secret is not valid hex: {}", e))
    })?;

    let host = url.host_str().unwrap_or_default();
    let path = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };
    let data = format!(
        "id={}&host={}&url={}&method={}",
        credentials.id, host, path, method
    );

    let key_nonce = hmac(&secret, nonce)?;
    let key_date = hmac(&key_nonce, timestamp.as_bytes())?;
    let key_signature = hmac(&key_date, REQUEST_VERSION)?;
    let signature = hmac(&key_signature, data.as_bytes())?;

    Ok(format!(
        "{} id={},ts={},nonce={},sig={}",
        AUTH_SCHEME,
        credentials.id,
        timestamp,
        hex::encode(nonce),
        hex::encode(signature)
    ))
}

fn hmac(key: &[u8], message: &[u8]) -> Result<Vec<u8>, ApiError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| ApiError::InvalidCredentials(e.to_string()))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}
