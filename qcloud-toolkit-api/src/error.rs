use serde::{Deserialize, Serialize};

/// Unified error type for the signed request pipeline.
///
/// Normalization and signing failures are raised before any I/O happens.
/// Transport-level failures ([`Network`](Self::Network), [`Timeout`](Self::Timeout),
/// [`HttpStatus`](Self::HttpStatus)) come out of the dispatcher. Service-level
/// failures are *not* errors at dispatch time: they arrive as an
/// [`ApiResponse`](crate::ApiResponse) with a non-zero code and only become
/// [`Service`](Self::Service) through [`ApiResponse::into_result`](crate::ApiResponse::into_result).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ApiError {
    /// A request parameter is malformed (numeric or empty key, missing action, ...).
    InvalidParameter {
        /// Name of the offending parameter (flattened path when nested).
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// Credentials are missing or unusable for signing.
    Signing {
        /// Error details.
        detail: String,
    },

    /// A network-level error occurred (DNS resolution failure, connection reset, ...).
    Network {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The server answered with a non-2xx status and a body that is not an API envelope.
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body (truncated for display).
        body: String,
    },

    /// A well-formed response carried a non-zero code.
    Service {
        /// Service code (`4000`, `4100`, ...).
        code: i64,
        /// Message returned by the service.
        message: String,
        /// Symbolic code description, if present.
        code_desc: Option<String>,
    },

    /// Failed to parse the response body.
    Parse {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize request parameters.
    Serialization {
        /// Details about the serialization failure.
        detail: String,
    },

    /// Client configuration is unusable (bad protocol, unbuildable HTTP client, ...).
    Config {
        /// Error details.
        detail: String,
    },
}

impl ApiError {
    /// 是否为传输层错误（网络、超时、非 API 格式的 HTTP 错误）。
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::HttpStatus { .. }
        )
    }

    /// 是否为预期行为（调用方输入问题、服务端业务错误），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. } | Self::Signing { .. } | Self::Service { .. }
        )
    }

    pub(crate) fn invalid_parameter(param: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameter { param, detail } => {
                write!(f, "Invalid parameter '{param}': {detail}")
            }
            Self::Signing { detail } => write!(f, "Signing error: {detail}"),
            Self::Network { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::HttpStatus { status, body } => {
                write!(
                    f,
                    "HTTP {status}: {}",
                    crate::utils::log_sanitizer::truncate_for_log(body)
                )
            }
            Self::Service {
                code,
                message,
                code_desc,
            } => {
                if let Some(desc) = code_desc {
                    write!(f, "Service error {code} ({desc}): {message}")
                } else {
                    write!(f, "Service error {code}: {message}")
                }
            }
            Self::Parse { detail } => write!(f, "Parse error: {detail}"),
            Self::Serialization { detail } => write!(f, "Serialization error: {detail}"),
            Self::Config { detail } => write!(f, "Configuration error: {detail}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Convenience type alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;
