use async_trait::async_trait;

use crate::error::Result;
use crate::request::SignedRequest;

/// 原始 HTTP 响应（状态码 + 响应体文本）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP 状态码
    pub status: u16,
    /// 响应体
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 传输层 Trait
///
/// 由 [`Dispatcher`](crate::Dispatcher) 调用，每次调用恰好发送一个请求，不做重试。
/// 默认实现为 [`ReqwestTransport`](crate::ReqwestTransport)，测试中可注入假实现。
#[async_trait]
pub trait Transport: Send + Sync {
    /// 发送已签名请求
    ///
    /// 只有网络层失败（DNS、连接、超时、读取响应体）才返回 `Err`；
    /// 任何 HTTP 状态码都作为 `Ok(TransportResponse)` 返回。
    async fn send(&self, request: &SignedRequest) -> Result<TransportResponse>;
}
