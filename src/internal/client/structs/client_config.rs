use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::internal::error::DavError;

/// 默认传输分块大小：64KB，上传与下载共用
pub const DEFAULT_CHUNK_SIZE: usize = 65536;

/// 默认根目录
pub const DEFAULT_ROOT: &str = "/";

/// 客户端配置
///
/// 可以直接用 `with_*` 链式构造，也可以通过 serde 从配置文件反序列化（缺失字段取默认值）。
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DavClientConfig {
    /// 服务地址，需包含协议，可带路径前缀，如 `https://dav.example.com/remote.php/webdav`
    pub hostname: String,
    pub login: Option<String>,
    pub password: Option<String>,
    /// 设置后每个请求附带 `Authorization: Bearer <token>`
    pub token: Option<String>,
    /// 服务端上的根目录，所有路径都相对于它
    pub root: String,
    /// 单次请求总超时（秒），不设置则不限制
    pub timeout_secs: Option<u64>,
    /// 上传/下载的分块大小，同时决定进度回调的粒度
    pub chunk_size: usize,
    /// 代理地址，格式 `[protocol://]host[:port]`
    pub proxy: Option<String>,
    pub proxy_user: Option<String>,
    pub proxy_password: Option<String>,
    /// 跳过 TLS 证书校验
    pub insecure: bool,
}

impl Default for DavClientConfig {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            login: None,
            password: None,
            token: None,
            root: DEFAULT_ROOT.to_string(),
            timeout_secs: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            proxy: None,
            proxy_user: None,
            proxy_password: None,
            insecure: false,
        }
    }
}

impl DavClientConfig {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_proxy_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.proxy_user = Some(user.into());
        self.proxy_password = Some(password.into());
        self
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// 校验配置，返回去掉结尾 `/` 的服务地址
    pub fn validate(&self) -> Result<String, DavError> {
        let hostname = _format_hostname(&self.hostname)?;

        if self.chunk_size == 0 {
            return Err(DavError::Config("chunk_size 必须大于 0".to_string()));
        }

        if let Some(proxy) = &self.proxy {
            if proxy.trim().is_empty() {
                return Err(DavError::Config("代理地址为空".to_string()));
            }
        }

        Ok(hostname)
    }
}

/// 防止debug泄漏账号
impl fmt::Debug for DavClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hidden = |v: &Option<String>| v.as_ref().map(|_| "<hidden>");
        f.debug_struct("DavClientConfig")
            .field("hostname", &self.hostname)
            .field("login", &self.login)
            .field("password", &hidden(&self.password))
            .field("token", &hidden(&self.token))
            .field("root", &self.root)
            .field("timeout_secs", &self.timeout_secs)
            .field("chunk_size", &self.chunk_size)
            .field("proxy", &self.proxy)
            .field("proxy_user", &self.proxy_user)
            .field("proxy_password", &hidden(&self.proxy_password))
            .field("insecure", &self.insecure)
            .finish()
    }
}

fn _format_hostname(hostname: &str) -> Result<String, DavError> {
    if hostname.is_empty() {
        return Err(DavError::Config("服务地址为空".to_string()));
    }

    let url = Url::parse(hostname).map_err(|e| DavError::Config(format!("服务地址非法: {e}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(DavError::Config(format!(
            "服务地址只支持 http/https: {hostname}"
        )));
    }

    Ok(hostname.trim_end_matches('/').to_string())
}
