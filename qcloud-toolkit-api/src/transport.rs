//! reqwest-backed [`Transport`].
//!
//! GET carries the signed parameters in the query string, POST in an
//! `application/x-www-form-urlencoded` body. Status codes are not interpreted
//! here; that's the dispatcher's job.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::request::SignedRequest;
use crate::traits::{Transport, TransportResponse};
use crate::types::HttpMethod;
use crate::utils::log_sanitizer::truncate_for_log;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Default [`Transport`] over a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// 创建带超时配置的 HTTP Client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Config {
                detail: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    /// Reuse an existing client (shared connection pool, custom proxy, ...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &SignedRequest) -> Result<TransportResponse> {
        let service = request.service();
        log::debug!(
            "[{service}] {} {} ({})",
            request.method(),
            request.url(),
            request.action()
        );
        log::trace!("[{service}] Params: {}", request.redacted_params());

        let builder = match request.method() {
            HttpMethod::Get => self.client.get(request.url_with_query()),
            HttpMethod::Post => self
                .client
                .post(request.url())
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(request.encoded_params()),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                ApiError::Network {
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("[{service}] Response Status: {status}");

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                ApiError::Network {
                    detail: format!("Failed to read response body: {e}"),
                }
            }
        })?;

        log::debug!("[{service}] Response Body: {}", truncate_for_log(&body));

        Ok(TransportResponse { status, body })
    }
}
