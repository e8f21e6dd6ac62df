//! WebDAV 客户端统一错误类型。
//!
//! 所有操作（查询、修改、传输）都返回 [`DavError`]，调用方可按变体区分处理。

use thiserror::Error;

use crate::internal::transport::traits::http_transport::TransportError;

#[derive(Debug, Error)]
pub enum DavError {
    /// 服务端返回 507
    #[error("远程服务器空间不足")]
    NotEnoughSpace,

    /// 服务端返回 404，或多状态响应中找不到要求的资源
    #[error("远程资源不存在: {path}")]
    RemoteResourceNotFound { path: String },

    /// 写类操作的目标父目录不存在
    #[error("远程父目录不存在: {path}")]
    RemoteParentNotFound { path: String },

    /// 服务端返回 405，或响应中缺少必需的 XML 节点
    #[error("服务器 {server} 不支持该操作: {name}")]
    MethodNotSupported { name: String, server: String },

    /// 其余 >= 400 的状态码
    #[error("请求 {url} 失败，状态码 {code}: {message}")]
    ResponseErrorCode {
        url: String,
        code: u16,
        message: String,
    },

    /// 路径的文件/目录属性与操作矛盾
    #[error("参数 {name} 的值无效: {value}")]
    OptionNotValid { name: String, value: String },

    #[error("本地资源不存在: {path}")]
    LocalResourceNotFound { path: String },

    /// 响应中没有请求的属性节点
    #[error("属性不存在: {name}")]
    PropertyNotFound { name: String },

    #[error("无法连接到服务器 {server}: {source}")]
    NoConnection {
        server: String,
        #[source]
        source: TransportError,
    },

    #[error("连接异常: {0}")]
    ConnectionException(#[source] TransportError),

    #[error("XML 处理失败: {0}")]
    Xml(String),

    #[error("本地文件操作失败: {0}")]
    Local(#[from] std::io::Error),

    #[error("配置无效: {0}")]
    Config(String),
}

impl DavError {
    /// 连接建立失败归为 `NoConnection`，其余传输层错误归为 `ConnectionException`
    pub(crate) fn from_transport(server: &str, error: TransportError) -> Self {
        if matches!(error, TransportError::Connect(_)) {
            DavError::NoConnection {
                server: server.to_string(),
                source: error,
            }
        } else {
            DavError::ConnectionException(error)
        }
    }

    /// 存在性探测时，这两类错误只表示“不存在”，不需要继续抛出。
    pub(crate) fn means_absent(&self) -> bool {
        matches!(
            self,
            DavError::RemoteResourceNotFound { .. }
                | DavError::ResponseErrorCode { .. }
        )
    }
}
