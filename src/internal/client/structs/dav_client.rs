//! WebDAV 客户端
//!
//! 客户端独占一个传输层会话（连接池、凭据、代理设置），整个生命周期内由所有操作只读共享。
//! 每个操作只发出一个“主请求”，在此之前可能发出若干用于前置检查的辅助请求。
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! # use webdav_fs::client::{DavClient, DavClientConfig};
//! # async fn example() -> Result<(), webdav_fs::DavError> {
//! let config = DavClientConfig::new("https://dav.example.com/remote.php/webdav")
//!     .with_credentials("account", "password");
//! let client = DavClient::new(config)?;
//!
//! for name in client.list("/documents").await? {
//!     println!("{name}");
//! }
//!
//! client.close().await;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use crate::internal::auth::structs::webdav_auth::WebdavAuth;
use crate::internal::error::DavError;
use crate::internal::transport::structs::reqwest_transport::ReqwestTransport;
use crate::internal::transport::traits::http_transport::{
    DavBody, DavRequest, DavResponse, HttpTransport, TransportError,
};
use crate::internal::urn::structs::urn::{Urn, unquote};
use crate::internal::webdav::enums::DavAction;
use crate::internal::webdav::functions::parse_response_body::server_prefix;

use super::client_config::DavClientConfig;

pub struct DavClient {
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) auth: WebdavAuth,
    /// 去掉结尾 `/` 的服务地址
    pub(crate) hostname: String,
    /// 编码后的根目录，去掉结尾 `/`
    pub(crate) root: String,
    pub(crate) chunk_size: usize,
}

impl fmt::Debug for DavClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DavClient")
            .field("hostname", &self.hostname)
            .field("root", &self.root)
            .field("auth", &self.auth)
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

impl DavClient {
    pub const ROOT: &'static str = "/";

    /// 使用默认的 reqwest 传输层创建客户端
    pub fn new(config: DavClientConfig) -> Result<Self, DavError> {
        let auth = WebdavAuth::new(
            config.login.as_deref(),
            config.password.as_deref(),
            config.token.as_deref(),
        )?;
        let transport = ReqwestTransport::new(&config, &auth)?;
        Self::build(config, auth, Arc::new(transport))
    }

    /// 使用调用方提供的传输层创建客户端。Basic 认证需由传输层自行处理。
    pub fn with_transport(
        config: DavClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, DavError> {
        let auth = WebdavAuth::new(None, None, config.token.as_deref())?;
        Self::build(config, auth, transport)
    }

    fn build(
        config: DavClientConfig,
        auth: WebdavAuth,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, DavError> {
        let hostname = config.validate()?;
        let root = if config.root.is_empty() {
            String::new()
        } else {
            Urn::new(&config.root)
                .quote()
                .trim_end_matches(Urn::SEPARATOR)
                .to_string()
        };

        debug!("创建 WebDAV 客户端: {hostname}{root}");

        Ok(Self {
            transport,
            auth,
            hostname,
            root,
            chunk_size: config.chunk_size,
        })
    }

    /// 关闭底层会话，释放连接。
    pub async fn close(self) {
        info!("关闭 WebDAV 客户端: {}", self.hostname);
        self.transport.close().await;
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// 编码路径对应的完整 URL
    pub(crate) fn url_for(&self, quoted_path: &str) -> String {
        format!("{}{}{}", self.hostname, self.root, quoted_path)
    }

    /// 服务端视角下的完整路径（根目录 + 资源路径，解码）
    pub(crate) fn full_path(&self, urn: &Urn) -> String {
        format!("{}{}", unquote(&self.root), urn.path())
    }

    /// 带服务地址路径前缀的完整路径，用于识别列表中的目录自身
    pub(crate) fn prefixed_full_path(&self, urn: &Urn) -> String {
        format!("{}{}", unquote(&server_prefix(&self.hostname)), self.full_path(urn))
    }

    /// 发出主请求并把状态码映射为领域错误
    ///
    /// `quoted_path` 为编码后的资源路径；`headers_ext` 覆盖动作的固定请求头。
    pub(crate) async fn execute(
        &self,
        action: DavAction,
        quoted_path: &str,
        body: DavBody,
        headers_ext: Option<HeaderMap>,
    ) -> Result<DavResponse, DavError> {
        let url = self.url_for(quoted_path);
        let method = action.method();

        let mut headers = action.default_headers();
        if let Some(ext) = headers_ext {
            headers.extend(ext);
        }
        self.auth.apply_bearer(&mut headers);

        debug!("{} {url}", method.as_str());

        let response = self
            .transport
            .send(DavRequest {
                method: method.to_method(),
                url: url.clone(),
                headers,
                body,
            })
            .await
            .map_err(|e| self.wrap_transport_error(e))?;

        debug!("{} {url} -> {}", method.as_str(), response.status);

        self.check_status(action, quoted_path, url, response).await
    }

    async fn check_status(
        &self,
        action: DavAction,
        quoted_path: &str,
        url: String,
        response: DavResponse,
    ) -> Result<DavResponse, DavError> {
        let status = response.status;

        if status == StatusCode::INSUFFICIENT_STORAGE {
            return Err(DavError::NotEnoughSpace);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(DavError::RemoteResourceNotFound {
                path: unquote(quoted_path),
            });
        }
        if status == StatusCode::METHOD_NOT_ALLOWED {
            return Err(DavError::MethodNotSupported {
                name: action.name().to_string(),
                server: self.hostname.clone(),
            });
        }
        if status.as_u16() >= 400 {
            // 正文只用于错误描述，读取失败时留空
            let message = response.text().await.unwrap_or_default();
            return Err(DavError::ResponseErrorCode {
                url,
                code: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    pub(crate) fn wrap_transport_error(&self, error: TransportError) -> DavError {
        DavError::from_transport(&self.hostname, error)
    }
}
