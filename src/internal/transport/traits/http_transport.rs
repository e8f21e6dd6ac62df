//! HTTP 请求能力：客户端只依赖“发出一个请求，拿回状态码、响应头和字节流”。
//!
//! 默认实现见 [`ReqwestTransport`](crate::internal::transport::structs::reqwest_transport::ReqwestTransport)，
//! 测试中可替换为内存实现。

use std::fmt;
use std::io;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use thiserror::Error;

/// 上行正文流
pub type RequestStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + 'static>>;

/// 下行正文流
pub type ResponseStream =
    Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send + 'static>>;

#[derive(Debug, Error)]
pub enum TransportError {
    /// 连接建立失败（DNS、拒绝连接、TLS 握手等）
    #[error("无法建立连接: {0}")]
    Connect(String),

    /// 其余请求/读取失败，包括超时
    #[error("请求失败: {0}")]
    Request(String),
}

pub enum DavBody {
    Empty,
    /// 一次性交给传输层的完整正文
    Bytes(Bytes),
    /// 按需拉取的分块正文
    Stream(RequestStream),
}

impl fmt::Debug for DavBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DavBody::Empty => f.write_str("Empty"),
            DavBody::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            DavBody::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl From<String> for DavBody {
    fn from(value: String) -> Self {
        DavBody::Bytes(Bytes::from(value))
    }
}

#[derive(Debug)]
pub struct DavRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: DavBody,
}

pub struct DavResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseStream,
}

impl fmt::Debug for DavResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DavResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish()
    }
}

impl DavResponse {
    /// 读完整个正文
    pub async fn bytes(mut self) -> Result<Bytes, TransportError> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = self.body.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer.freeze())
    }

    /// 读完整个正文并按 UTF-8（有损）转为文本
    pub async fn text(self) -> Result<String, TransportError> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// `Content-Length` 响应头，缺失或非法时为 `None`
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// 发出请求，至少等到响应头可用后返回；正文按需读取。
    async fn send(&self, request: DavRequest) -> Result<DavResponse, TransportError>;

    /// 释放底层会话。默认什么都不做。
    async fn close(&self) {}
}
