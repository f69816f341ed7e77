//! # qcloud-toolkit-api
//!
//! Signed request pipeline for the Tencent Cloud (qcloud) v2 API.
//!
//! ```text
//! RequestParams ─▶ normalize ─▶ sign ─▶ Dispatcher ─▶ Transport ─▶ ApiResponse
//!  (nested)        (flat,        (HMAC,   (routing and   (reqwest)
//!                   sorted)       base64)  size checks)
//! ```
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation and Android targets.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use qcloud_toolkit_api::{ApiClient, Credentials, RequestOptions, RequestParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::from_env().ok_or("TENCENTCLOUD_SECRETID/SECRETKEY not set")?;
//!     let client = ApiClient::new(credentials)?;
//!
//!     let params = RequestParams::new().with("Region", "gz").with("allList", 1);
//!     let options = RequestOptions::new().service_type("account");
//!
//!     let response = client.request("DescribeProject", params, &options).await?;
//!     if response.is_success() {
//!         println!("{:?}", response.get("data"));
//!     } else {
//!         eprintln!("{} {}", response.code, response.message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! [`ApiClient::request`] resolves to `Ok(ApiResponse)` for every well-formed
//! answer, including service errors (`code != 0`) and the locally produced
//! `4000` (unknown region or service) and `4100` (too many parameters or
//! an oversized payload)
//! responses. `Err(ApiError)` is reserved for:
//!
//! - [`ApiError::InvalidParameter`] / [`ApiError::Signing`] — rejected before any I/O
//! - [`ApiError::Network`] / [`ApiError::Timeout`] / [`ApiError::HttpStatus`] — transport failures
//! - [`ApiError::Parse`] — the body is not an API envelope
//!
//! [`ApiResponse::into_result`] converts a non-zero code into [`ApiError::Service`].

mod client;
mod config;
mod dispatch;
mod error;
mod params;
mod region;
mod request;
mod sign;
mod traits;
mod transport;
mod types;
mod utils;

pub mod resource;

pub use client::{ApiClient, ApiClientBuilder, REQUEST_CLIENT};
pub use config::{
    ClientConfig, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_KEYS, DEFAULT_MAX_PAYLOAD_BYTES,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use dispatch::{DispatchState, Dispatcher};
pub use error::{ApiError, Result};
pub use params::{NormalizedParams, ParamValue, RequestParams, normalize};
pub use region::{is_known_region, is_valid_service_label, long_region_name};
pub use request::SignedRequest;
pub use resource::ResourceDescriptor;
pub use sign::{SIGNATURE_PARAM, Signature, canonical_query, hmac_base64, sign, string_to_sign};
pub use traits::{Transport, TransportResponse};
pub use transport::ReqwestTransport;
pub use types::{
    ApiResponse, Credentials, ENV_SECRET_ID, ENV_SECRET_KEY, ENV_SESSION_TOKEN, HttpMethod,
    RequestOptions, SignatureMethod,
};

// Re-export utils module
pub use utils::log_sanitizer;
