//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use qcloud_toolkit_api::{
    ApiClient, ApiError, ClientConfig, Credentials, SignedRequest, Transport, TransportResponse,
};

pub const TEST_SECRET_ID: &str = "AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE";
pub const TEST_SECRET_KEY: &str = "Gu5t9xGARNpq86cd98joQYCN3Cozk1qA";

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 记录所有请求并返回固定响应的假传输层
pub struct FakeTransport {
    response: std::result::Result<TransportResponse, ApiError>,
    requests: Mutex<Vec<SignedRequest>>,
}

impl FakeTransport {
    /// 固定返回 HTTP 200 + 给定 JSON
    pub fn json(body: serde_json::Value) -> Arc<Self> {
        Self::status(200, &body.to_string())
    }

    pub fn status(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(TransportResponse::new(status, body)),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: ApiError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// 已发送的请求数
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    /// 最后一个发送的请求
    pub fn last_request(&self) -> Option<SignedRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: &SignedRequest) -> qcloud_toolkit_api::Result<TransportResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.response.clone()
    }
}

pub fn test_credentials() -> Credentials {
    Credentials::new(TEST_SECRET_ID, TEST_SECRET_KEY)
}

/// 使用假传输层构建客户端
pub fn client_with(transport: Arc<FakeTransport>) -> ApiClient {
    client_with_config(transport, ClientConfig::default())
}

pub fn client_with_config(transport: Arc<FakeTransport>, config: ClientConfig) -> ApiClient {
    ApiClient::builder(test_credentials())
        .config(config)
        .transport(transport)
        .build()
        .expect("构建客户端失败")
}

/// 典型的成功响应
pub fn project_list_body() -> serde_json::Value {
    serde_json::json!({
        "code": 0,
        "message": "",
        "codeDesc": "Success",
        "data": [
            { "projectName": "默认项目", "projectId": 0 },
            { "projectName": "demo", "projectId": 1_000_123 }
        ]
    })
}
