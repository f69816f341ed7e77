//! Client facade: normalize → sign → dispatch.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::dispatch::Dispatcher;
use crate::error::{ApiError, Result};
use crate::params::{RequestParams, normalize};
use crate::request::SignedRequest;
use crate::resource::ResourceDescriptor;
use crate::sign::{SIGNATURE_PARAM, sign};
use crate::traits::Transport;
use crate::transport::ReqwestTransport;
use crate::types::{ApiResponse, Credentials, RequestOptions};
use crate::utils::log_sanitizer::mask_secret;

/// Value of the `RequestClient` common parameter.
pub const REQUEST_CLIENT: &str = concat!("qcloud-toolkit/", env!("CARGO_PKG_VERSION"));

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    credentials: Credentials,
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ApiClientBuilder {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            config: ClientConfig::default(),
            transport: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default reqwest transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        self.config.validate()?;
        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };
        log::debug!(
            "Building ApiClient (secret_id={}, base_host={})",
            mask_secret(&self.credentials.secret_id),
            self.config.base_host
        );
        Ok(ApiClient {
            dispatcher: Dispatcher::new(transport, &self.config),
            credentials: Arc::new(self.credentials),
            config: Arc::new(self.config),
        })
    }
}

/// Signed API client.
///
/// Cheap to clone; clones share credentials, configuration and transport.
#[derive(Debug, Clone)]
pub struct ApiClient {
    credentials: Arc<Credentials>,
    config: Arc<ClientConfig>,
    dispatcher: Dispatcher,
}

impl ApiClient {
    /// Client with default configuration and the reqwest transport.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: Credentials) -> ApiClientBuilder {
        ApiClientBuilder::new(credentials)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Normalize and sign without sending anything.
    ///
    /// `action` may be empty when `params` carries an `Action` string.
    pub fn prepare(
        &self,
        action: &str,
        mut params: RequestParams,
        options: &RequestOptions,
    ) -> Result<SignedRequest> {
        let action = if action.is_empty() {
            params
                .get_str("Action")
                .map(str::to_string)
                .ok_or_else(|| ApiError::invalid_parameter("Action", "action is required"))?
        } else {
            action.to_string()
        };

        let service = options
            .service_type
            .as_deref()
            .or(self.config.default_service_type.as_deref())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ApiError::invalid_parameter("serviceType", "no service type given and no default configured")
            })?
            .to_string();

        let method = options.method.unwrap_or(self.config.default_method);
        let algorithm = options
            .signature_method
            .unwrap_or(self.config.signature_method);
        let path = options.path.as_deref().unwrap_or(&self.config.path).to_string();

        let region = self.resolve_region(&params, options);

        params.remove(SIGNATURE_PARAM);
        params.set("Action", action);
        params.set("SecretId", self.credentials.secret_id.as_str());
        params.set_default("Timestamp", chrono::Utc::now().timestamp());
        params.set_default("Nonce", rand::random_range(1..=65535_u32));
        params.set_default("RequestClient", REQUEST_CLIENT);
        params.set("SignatureMethod", algorithm.param_value());
        if let Some(region) = &region {
            params.set("Region", region.as_str());
        }
        if let Some(token) = &self.credentials.session_token {
            params.set("Token", token.as_str());
        }

        let mut normalized = normalize(&params)?;
        let host = format!("{service}.{}", self.config.base_host);
        let signature = sign(
            &normalized,
            method,
            &host,
            &path,
            algorithm,
            &self.credentials,
        )?;
        normalized.insert(SIGNATURE_PARAM, signature.signature);

        Ok(SignedRequest::new(
            method,
            &self.config.protocol,
            host,
            path,
            service,
            region,
            algorithm,
            signature.string_to_sign,
            normalized,
        ))
    }

    /// Normalize, sign and dispatch one request.
    ///
    /// Service-level failures (including the local `4000` routing and `4100`
    /// payload checks) come back as `Ok(ApiResponse)` with a non-zero code;
    /// use [`ApiResponse::into_result`] to turn them into errors.
    pub async fn request(
        &self,
        action: &str,
        params: RequestParams,
        options: &RequestOptions,
    ) -> Result<ApiResponse> {
        let request = self.prepare(action, params, options)?;
        self.dispatcher.dispatch(&request).await
    }

    /// Callback flavour of [`request`](Self::request).
    ///
    /// The call runs on a spawned Tokio task; `callback` is invoked exactly
    /// once, never before this method returns. Must be called from within a
    /// Tokio runtime.
    pub fn request_with_callback<F>(
        &self,
        action: impl Into<String>,
        params: RequestParams,
        options: RequestOptions,
        callback: F,
    ) -> tokio::task::JoinHandle<()>
    where
        F: FnOnce(Result<ApiResponse>) + Send + 'static,
    {
        let client = self.clone();
        let action = action.into();
        tokio::spawn(async move {
            let result = client.request(&action, params, &options).await;
            callback(result);
        })
    }

    /// Region used for routing.
    ///
    /// 参数中的 Region 优先（按签名时的字符串形式，空串和非字符串值也参与
    /// 路由校验），其次是调用选项，最后是配置默认值；后两者为空串时视为未设置。
    fn resolve_region(&self, params: &RequestParams, options: &RequestOptions) -> Option<String> {
        if let Some(value) = params.get("Region").filter(|v| !v.is_undefined()) {
            return Some(value.to_flat_string());
        }
        options
            .region
            .clone()
            .filter(|r| !r.is_empty())
            .or_else(|| self.config.default_region.clone().filter(|r| !r.is_empty()))
    }

    /// Normalize and sign a call to a described endpoint without sending it.
    ///
    /// Checks the descriptor's required parameters and region requirement and
    /// routes to the descriptor's service label. The caller's method wins over
    /// the descriptor's default.
    pub fn prepare_descriptor(
        &self,
        descriptor: &ResourceDescriptor,
        params: RequestParams,
        options: RequestOptions,
    ) -> Result<SignedRequest> {
        if let Some(missing) = descriptor
            .required_params
            .iter()
            .find(|p| !params.is_defined(p))
        {
            return Err(ApiError::invalid_parameter(
                *missing,
                format!("required by {}", descriptor.action),
            ));
        }

        let region = self.resolve_region(&params, &options);
        if descriptor.regional && region.is_none() {
            return Err(ApiError::invalid_parameter(
                "Region",
                format!("{} is a regional action", descriptor.action),
            ));
        }

        let options = RequestOptions {
            service_type: Some(descriptor.service_label(region.as_deref())),
            method: options.method.or(Some(descriptor.method)),
            ..options
        };
        self.prepare(descriptor.action, params, &options)
    }

    /// Call a described endpoint.
    ///
    /// Builds the request with [`prepare_descriptor`](Self::prepare_descriptor)
    /// and dispatches it.
    pub async fn invoke(
        &self,
        descriptor: &ResourceDescriptor,
        params: RequestParams,
        options: RequestOptions,
    ) -> Result<ApiResponse> {
        let request = self.prepare_descriptor(descriptor, params, options)?;
        self.dispatcher.dispatch(&request).await
    }
}
