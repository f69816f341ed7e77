//! Public data types shared across the request pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::utils::log_sanitizer::mask_secret;

// ============ Credentials ============

/// Environment variable holding the secret id.
pub const ENV_SECRET_ID: &str = "TENCENTCLOUD_SECRETID";
/// Environment variable holding the secret key.
pub const ENV_SECRET_KEY: &str = "TENCENTCLOUD_SECRETKEY";
/// Environment variable holding the temporary session token.
pub const ENV_SESSION_TOKEN: &str = "TENCENTCLOUD_SESSIONTOKEN";

/// API credentials.
///
/// Owned by one [`ApiClient`](crate::ApiClient) and shared read-only between
/// concurrent requests. `Debug` masks the secret key and the session token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Secret id (`AKID...`).
    pub secret_id: String,
    /// Secret key used as the HMAC key.
    pub secret_key: String,
    /// Temporary session token (STS credentials only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    /// Attach a temporary session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Load credentials from `TENCENTCLOUD_SECRETID` / `TENCENTCLOUD_SECRETKEY`
    /// (and the optional `TENCENTCLOUD_SESSIONTOKEN`).
    ///
    /// Returns `None` when either mandatory variable is missing or empty.
    pub fn from_env() -> Option<Self> {
        let secret_id = std::env::var(ENV_SECRET_ID).ok().filter(|v| !v.is_empty())?;
        let secret_key = std::env::var(ENV_SECRET_KEY).ok().filter(|v| !v.is_empty())?;
        let session_token = std::env::var(ENV_SESSION_TOKEN)
            .ok()
            .filter(|v| !v.is_empty());
        Some(Self {
            secret_id,
            secret_key,
            session_token,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &mask_secret(&self.secret_key))
            .field(
                "session_token",
                &self.session_token.as_deref().map(mask_secret),
            )
            .finish()
    }
}

// ============ HTTP method ============

/// HTTP method used to carry the signed parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// Signed parameters in the query string.
    #[default]
    Get,
    /// Signed parameters in an `application/x-www-form-urlencoded` body.
    Post,
}

impl HttpMethod {
    /// Upper-case method name, as it appears in the string-to-sign.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            _ => Err(ApiError::invalid_parameter(
                "method",
                format!("unsupported HTTP method: {s} (expected get or post)"),
            )),
        }
    }
}

// ============ Signature method ============

/// Keyed-hash algorithm used for the request signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureMethod {
    /// HMAC-SHA1 (default).
    #[default]
    #[serde(rename = "sha1", alias = "HmacSHA1")]
    HmacSha1,
    /// HMAC-SHA256.
    #[serde(rename = "sha256", alias = "HmacSHA256")]
    HmacSha256,
}

impl SignatureMethod {
    /// Value written into the `SignatureMethod` request parameter.
    pub fn param_value(self) -> &'static str {
        match self {
            Self::HmacSha1 => "HmacSHA1",
            Self::HmacSha256 => "HmacSHA256",
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_value())
    }
}

impl FromStr for SignatureMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" | "hmacsha1" => Ok(Self::HmacSha1),
            "sha256" | "hmacsha256" => Ok(Self::HmacSha256),
            _ => Err(ApiError::invalid_parameter(
                "signatureMethod",
                format!("only sha1 and sha256 are supported, got: {s}"),
            )),
        }
    }
}

// ============ Request options ============

/// Per-call options for [`ApiClient::request`](crate::ApiClient::request).
///
/// Every field falls back to the client's [`ClientConfig`](crate::ClientConfig) when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    /// Target service, e.g. `cvm` → `cvm.api.qcloud.com`.
    pub service_type: Option<String>,
    /// GET or POST.
    pub method: Option<HttpMethod>,
    /// HMAC algorithm.
    pub signature_method: Option<SignatureMethod>,
    /// Region used when the parameters don't carry one.
    pub region: Option<String>,
    /// Request path (default `/v2/index.php`).
    pub path: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn service_type(mut self, service: impl Into<String>) -> Self {
        self.service_type = Some(service.into());
        self
    }

    #[must_use]
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn signature_method(mut self, signature_method: SignatureMethod) -> Self {
        self.signature_method = Some(signature_method);
        self
    }

    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

// ============ API response ============

/// Uniform outcome of a dispatched request.
///
/// The v2 API answers `{"code": 0, "message": "", "codeDesc": "Success", ...}`.
/// Everything except `code`, `message` and `codeDesc` lands in [`data`](Self::data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// `0` on success.
    pub code: i64,
    /// Human readable message (often empty on success).
    #[serde(default)]
    pub message: String,
    /// Symbolic description of the code.
    #[serde(rename = "codeDesc", default, skip_serializing_if = "Option::is_none")]
    pub code_desc: Option<String>,
    /// Remaining response fields.
    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl ApiResponse {
    /// Success code.
    pub const CODE_SUCCESS: i64 = 0;
    /// Invalid region or service routing.
    pub const CODE_INVALID_ROUTING: i64 = 4000;
    /// Parameter payload exceeds what the server accepts.
    pub const CODE_PAYLOAD_TOO_LARGE: i64 = 4100;

    /// Build a response locally, without a server round trip.
    pub(crate) fn local(code: i64, message: impl Into<String>, code_desc: &str) -> Self {
        Self {
            code,
            message: message.into(),
            code_desc: Some(code_desc.to_string()),
            data: serde_json::Map::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Self::CODE_SUCCESS
    }

    /// Look up a top-level response field.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Turn a non-zero code into [`ApiError::Service`].
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Service {
                code: self.code,
                message: self.message,
                code_desc: self.code_desc,
            })
        }
    }
}
