//! 客户端配置

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::types::{HttpMethod, SignatureMethod};

/// 默认连接超时（秒）
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// 单次请求允许的最大参数个数（含公共参数与签名）
pub const DEFAULT_MAX_KEYS: usize = 1000;
/// Default upper bound on the url-encoded parameter payload (1 MiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Client-wide defaults, overridable per call through
/// [`RequestOptions`](crate::RequestOptions).
///
/// Deserializes from a TOML table (the CLI's `[client]` table); every field is optional:
///
/// ```toml
/// protocol = "https"
/// base_host = "api.qcloud.com"
/// default_region = "gz"
/// signature_method = "sha256"
/// extra_regions = ["ap-example-1"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// `https` or `http`.
    pub protocol: String,
    /// Host suffix; requests go to `{service}.{base_host}`.
    pub base_host: String,
    /// Request path.
    pub path: String,
    /// Region used when neither the parameters nor the options carry one.
    pub default_region: Option<String>,
    /// Service used when the options don't name one.
    pub default_service_type: Option<String>,
    pub default_method: HttpMethod,
    pub signature_method: SignatureMethod,
    /// Upper bound on the number of signed parameters.
    pub max_keys: usize,
    /// Upper bound on the url-encoded size of the signed parameters.
    pub max_payload_bytes: usize,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Regions accepted in addition to the built-in table.
    pub extra_regions: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            protocol: "https".to_string(),
            base_host: "api.qcloud.com".to_string(),
            path: "/v2/index.php".to_string(),
            default_region: None,
            default_service_type: None,
            default_method: HttpMethod::Get,
            signature_method: SignatureMethod::HmacSha1,
            max_keys: DEFAULT_MAX_KEYS,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            extra_regions: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Reject values that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.protocol.as_str(), "http" | "https") {
            return Err(ApiError::Config {
                detail: format!("protocol must be http or https, got: {}", self.protocol),
            });
        }
        if self.base_host.is_empty() {
            return Err(ApiError::Config {
                detail: "base_host is empty".to_string(),
            });
        }
        if !self.path.starts_with('/') {
            return Err(ApiError::Config {
                detail: format!("path must start with '/', got: {}", self.path),
            });
        }
        if self.max_keys == 0 {
            return Err(ApiError::Config {
                detail: "max_keys must be greater than 0".to_string(),
            });
        }
        if self.max_payload_bytes == 0 {
            return Err(ApiError::Config {
                detail: "max_payload_bytes must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
