//! Request dispatcher.
//!
//! One signed request in, one uniform outcome out:
//!
//! ```text
//! Pending ──precheck fails──────────────▶ Failed     (local 4000 / 4100 response)
//!    │
//!    └─▶ Sent ──JSON body with `code`───▶ Succeeded  (ApiResponse, any code)
//!          └───transport / parse error──▶ Failed     (Err)
//! ```
//!
//! No retries: the first response is terminal.

use std::fmt;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::region::{is_known_region, is_valid_service_label};
use crate::request::SignedRequest;
use crate::traits::{Transport, TransportResponse};
use crate::types::ApiResponse;
use crate::utils::log_sanitizer::truncate_for_log;

/// Lifecycle of one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Pending,
    Sent,
    Succeeded,
    Failed,
}

impl DispatchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Sends signed requests through a [`Transport`] and maps every outcome
/// into `Result<ApiResponse, ApiError>`.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    max_keys: usize,
    max_payload_bytes: usize,
    extra_regions: Arc<[String]>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("max_keys", &self.max_keys)
            .field("max_payload_bytes", &self.max_payload_bytes)
            .field("extra_regions", &self.extra_regions)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            transport,
            max_keys: config.max_keys,
            max_payload_bytes: config.max_payload_bytes,
            extra_regions: config.extra_regions.clone().into(),
        }
    }

    /// Local checks that resolve without touching the network.
    ///
    /// Returns the local response (`4000` for bad routing, `4100` for too many
    /// parameters or an oversized encoded payload) when the request must not be sent.
    pub fn precheck(&self, request: &SignedRequest) -> Option<ApiResponse> {
        if !is_valid_service_label(request.service()) {
            return Some(ApiResponse::local(
                ApiResponse::CODE_INVALID_ROUTING,
                format!("invalid service type: {}", request.service()),
                "InvalidServiceType",
            ));
        }
        if let Some(region) = request.region()
            && !is_known_region(region, &self.extra_regions)
        {
            return Some(ApiResponse::local(
                ApiResponse::CODE_INVALID_ROUTING,
                format!("unknown region: {region}"),
                "InvalidRegion",
            ));
        }
        let count = request.params().len();
        if count > self.max_keys {
            return Some(ApiResponse::local(
                ApiResponse::CODE_PAYLOAD_TOO_LARGE,
                format!(
                    "too many parameters: {count} (limit {})",
                    self.max_keys
                ),
                "PayloadTooLarge",
            ));
        }
        let size = request.encoded_params().len();
        if size > self.max_payload_bytes {
            return Some(ApiResponse::local(
                ApiResponse::CODE_PAYLOAD_TOO_LARGE,
                format!(
                    "payload too large: {size} bytes (limit {})",
                    self.max_payload_bytes
                ),
                "PayloadTooLarge",
            ));
        }
        None
    }

    /// Dispatch one request. Exactly one transport call unless [`precheck`](Self::precheck) fires.
    pub async fn dispatch(&self, request: &SignedRequest) -> Result<ApiResponse> {
        let service = request.service();
        let action = request.action();
        let mut state = DispatchState::Pending;
        log::trace!("[{service}] {action} {state}");

        if let Some(local) = self.precheck(request) {
            state = DispatchState::Failed;
            log::warn!(
                "[{service}] {action} rejected locally ({state}): {} {}",
                local.code,
                local.message
            );
            return Ok(local);
        }

        state = DispatchState::Sent;
        log::debug!("[{service}] {action} {state}");

        let result = self
            .transport
            .send(request)
            .await
            .and_then(|resp| parse_response(service, resp));

        state = if result.is_ok() {
            DispatchState::Succeeded
        } else {
            DispatchState::Failed
        };
        match &result {
            Ok(resp) => log::debug!("[{service}] {action} {state}: code={}", resp.code),
            Err(e) if e.is_expected() => log::warn!("[{service}] {action} {state}: {e}"),
            Err(e) => log::error!("[{service}] {action} {state}: {e}"),
        }
        result
    }
}

/// Map a raw HTTP response to the uniform result.
///
/// A JSON object with a numeric `code` is an API envelope whatever the status.
fn parse_response(service: &str, resp: TransportResponse) -> Result<ApiResponse> {
    let json = serde_json::from_str::<serde_json::Value>(&resp.body);

    let envelope = match json {
        Ok(serde_json::Value::Object(map))
            if map.get("code").is_some_and(serde_json::Value::is_i64) =>
        {
            serde_json::Value::Object(map)
        }
        _ if !resp.is_success() => {
            return Err(ApiError::HttpStatus {
                status: resp.status,
                body: resp.body,
            });
        }
        Ok(_) => {
            log::error!(
                "[{service}] Response without code: {}",
                truncate_for_log(&resp.body)
            );
            return Err(ApiError::Parse {
                detail: "response body has no numeric `code` field".to_string(),
            });
        }
        Err(e) => {
            log::error!("[{service}] JSON parse failed: {e}");
            log::error!("[{service}] Raw response: {}", truncate_for_log(&resp.body));
            return Err(ApiError::Parse {
                detail: e.to_string(),
            });
        }
    };

    serde_json::from_value(envelope).map_err(|e| ApiError::Parse {
        detail: e.to_string(),
    })
}
