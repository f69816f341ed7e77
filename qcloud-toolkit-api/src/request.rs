use crate::params::NormalizedParams;
use crate::sign::SIGNATURE_PARAM;
use crate::types::{HttpMethod, SignatureMethod};
use crate::utils::log_sanitizer::{is_sensitive_param, mask_secret};

/// A fully signed request, ready to hand to a [`Transport`](crate::Transport).
///
/// Built by [`ApiClient::prepare`](crate::ApiClient::prepare) and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    method: HttpMethod,
    url: String,
    host: String,
    path: String,
    service: String,
    region: Option<String>,
    signature_method: SignatureMethod,
    string_to_sign: String,
    params: NormalizedParams,
}

impl SignedRequest {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        method: HttpMethod,
        protocol: &str,
        host: String,
        path: String,
        service: String,
        region: Option<String>,
        signature_method: SignatureMethod,
        string_to_sign: String,
        params: NormalizedParams,
    ) -> Self {
        Self {
            method,
            url: format!("{protocol}://{host}{path}"),
            host,
            path,
            service,
            region,
            signature_method,
            string_to_sign,
            params,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// `protocol://host/path`, without a query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn signature_method(&self) -> SignatureMethod {
        self.signature_method
    }

    pub fn string_to_sign(&self) -> &str {
        &self.string_to_sign
    }

    /// Signed parameters, `Signature` included.
    pub fn params(&self) -> &NormalizedParams {
        &self.params
    }

    pub fn action(&self) -> &str {
        self.params.get("Action").unwrap_or_default()
    }

    pub fn signature(&self) -> &str {
        self.params.get(SIGNATURE_PARAM).unwrap_or_default()
    }

    /// Percent-encoded `key=value&...` (query string for GET, form body for POST).
    pub fn encoded_params(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `key=value&...` with `Signature`, `Token` and friends masked, for logs.
    pub fn redacted_params(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| {
                if is_sensitive_param(k) {
                    format!("{k}={}", mask_secret(v))
                } else {
                    format!("{k}={v}")
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Full URL including the signed query string.
    pub fn url_with_query(&self) -> String {
        format!("{}?{}", self.url, self.encoded_params())
    }
}
