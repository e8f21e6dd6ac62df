use async_trait::async_trait;
use futures_util::StreamExt;
use log::trace;
use reqwest::{Body, Client, Proxy};

use crate::internal::auth::structs::webdav_auth::WebdavAuth;
use crate::internal::client::structs::client_config::DavClientConfig;
use crate::internal::error::DavError;
use crate::internal::transport::traits::http_transport::{
    DavBody, DavRequest, DavResponse, HttpTransport, TransportError,
};

use super::sync_body::SyncBody;

/// 基于 reqwest 的默认传输层
///
/// 连接池、TLS、代理与超时都由内部的 `Client` 持有；Basic 认证作为默认请求头挂在会话上。
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &DavClientConfig, auth: &WebdavAuth) -> Result<Self, DavError> {
        let mut builder = Client::builder()
            .http1_only()
            .default_headers(auth.session_headers());

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        if config.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(proxy_url) = &config.proxy {
            let mut proxy = Proxy::all(proxy_url.as_str())
                .map_err(|e| DavError::Config(format!("代理地址非法: {e}")))?;
            if let (Some(user), Some(password)) = (&config.proxy_user, &config.proxy_password) {
                proxy = proxy.basic_auth(user, password);
            }
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| DavError::Config(format!("创建 HTTP 客户端失败: {e}")))?;

        Ok(Self { client })
    }

    /// 直接使用调用方构建好的 `Client`（认证需已挂在默认请求头上）
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: DavRequest) -> Result<DavResponse, TransportError> {
        let DavRequest {
            method,
            url,
            headers,
            body,
        } = request;

        trace!("reqwest 发送 {method} {url}");

        let mut builder = self.client.request(method, url).headers(headers);
        builder = match body {
            DavBody::Empty => builder,
            DavBody::Bytes(bytes) => builder.body(bytes),
            DavBody::Stream(stream) => builder.body(Body::wrap_stream(SyncBody::new(stream))),
        };

        let response = builder.send().await.map_err(_map_reqwest_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(_map_reqwest_error))
            .boxed();

        Ok(DavResponse {
            status,
            headers,
            body,
        })
    }
}

fn _map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Request(error.to_string())
    }
}
