//! v2 request signature.
//!
//! ```text
//! canonical_query = k1=v1&k2=v2&...        (keys sorted, '_' → '.', values raw)
//! string_to_sign  = METHOD + host + path + "?" + canonical_query
//! Signature       = Base64(HMAC-SHA1|HMAC-SHA256(secret_key, string_to_sign))
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

use crate::error::{ApiError, Result};
use crate::params::NormalizedParams;
use crate::types::{Credentials, HttpMethod, SignatureMethod};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Name of the parameter carrying the signature.
pub const SIGNATURE_PARAM: &str = "Signature";

/// Output of [`sign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Sorted `key=value&...` string the signature was computed over.
    pub canonical_query: String,
    /// Full string that went into the HMAC.
    pub string_to_sign: String,
    /// Base64-encoded digest.
    pub signature: String,
}

/// Build the canonical query string.
///
/// Keys are ordered by their original name; only the rendered key has `_`
/// replaced by `.`. Values are not URL-encoded here.
pub fn canonical_query(params: &NormalizedParams) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={v}", k.replace('_', ".")))
        .collect::<Vec<_>>()
        .join("&")
}

/// `METHOD + host + path + "?" + canonical_query`
pub fn string_to_sign(method: HttpMethod, host: &str, path: &str, canonical_query: &str) -> String {
    format!("{}{host}{path}?{canonical_query}", method.as_str())
}

/// Base64 HMAC of `message` keyed with `key`.
pub fn hmac_base64(algorithm: SignatureMethod, key: &[u8], message: &[u8]) -> Result<String> {
    let digest = match algorithm {
        SignatureMethod::HmacSha1 => {
            let mut mac = HmacSha1::new_from_slice(key).map_err(|e| ApiError::Signing {
                detail: e.to_string(),
            })?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        SignatureMethod::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(key).map_err(|e| ApiError::Signing {
                detail: e.to_string(),
            })?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
    };
    Ok(STANDARD.encode(digest))
}

/// Sign normalized parameters.
///
/// `params` must already contain every common parameter (`SecretId`,
/// `SignatureMethod`, ...) and must not contain `Signature`.
pub fn sign(
    params: &NormalizedParams,
    method: HttpMethod,
    host: &str,
    path: &str,
    algorithm: SignatureMethod,
    credentials: &Credentials,
) -> Result<Signature> {
    if credentials.secret_id.is_empty() {
        return Err(ApiError::Signing {
            detail: "secret_id is empty".to_string(),
        });
    }
    if credentials.secret_key.is_empty() {
        return Err(ApiError::Signing {
            detail: "secret_key is empty".to_string(),
        });
    }

    let canonical_query = canonical_query(params);
    let string_to_sign = string_to_sign(method, host, path, &canonical_query);
    log::debug!(
        "Signing {} parameters for {host}{path} with {algorithm}",
        params.len()
    );

    let signature = hmac_base64(
        algorithm,
        credentials.secret_key.as_bytes(),
        string_to_sign.as_bytes(),
    )?;

    Ok(Signature {
        canonical_query,
        string_to_sign,
        signature,
    })
}
