use core::fmt;

use base64::Engine;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use sha2::{Digest, Sha256};

use crate::internal::error::DavError;

/// 认证结构体
///
/// 该结构体定位
/// - 存放 Basic 认证（会话级，预先挂在传输层的默认请求头上）
/// - 存放 Bearer token（请求级，每次请求合并进请求头）
///
/// 默认Eq时会比较全部凭据的摘要，如果需要单独比较token，需使用eq_only_token方法
#[derive(Clone, Default)]
pub struct WebdavAuth {
    basic: Option<HeaderValue>,
    bearer: Option<HeaderValue>,
    basic_digest: Option<String>,
    token_digest: Option<String>,
}

impl WebdavAuth {
    /// 登录名和密码同时提供才会启用 Basic 认证
    pub fn new(
        login: Option<&str>,
        password: Option<&str>,
        token: Option<&str>,
    ) -> Result<Self, DavError> {
        let mut auth = Self::default();

        if let (Some(login), Some(password)) = (login, password) {
            if !login.is_empty() && !password.is_empty() {
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{login}:{password}"));
                auth.basic = Some(sensitive(&format!("Basic {encoded}"))?);
                auth.basic_digest = Some(_digest(&encoded));
            }
        }

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            auth.bearer = Some(sensitive(&format!("Bearer {token}"))?);
            auth.token_digest = Some(_digest(token));
        }

        Ok(auth)
    }

    /// 会话级默认请求头（Basic 认证）
    pub fn session_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(basic) = &self.basic {
            headers.insert(AUTHORIZATION, basic.clone());
        }
        headers
    }

    /// 把 Bearer token 合并进单次请求的请求头
    pub fn apply_bearer(&self, headers: &mut HeaderMap) {
        if let Some(bearer) = &self.bearer {
            headers.insert(AUTHORIZATION, bearer.clone());
        }
    }

    pub fn has_basic(&self) -> bool {
        self.basic.is_some()
    }

    pub fn has_token(&self) -> bool {
        self.bearer.is_some()
    }

    /// 仅比较token是否相等
    pub fn eq_only_token(&self, other: &Self) -> bool {
        self.token_digest == other.token_digest
    }
}

/// 用于比较认证结构体是否相等
impl PartialEq for WebdavAuth {
    fn eq(&self, other: &Self) -> bool {
        self.basic_digest == other.basic_digest && self.token_digest == other.token_digest
    }
}

/// 防止debug泄漏账号
impl fmt::Debug for WebdavAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebdavAuth")
            .field("basic", &self.basic.as_ref().map(|_| "<hidden>"))
            .field("bearer", &self.bearer.as_ref().map(|_| "<hidden>"))
            .finish()
    }
}

fn _digest(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn sensitive(value: &str) -> Result<HeaderValue, DavError> {
    let mut header =
        HeaderValue::from_str(value).map_err(|e| DavError::Config(format!("认证信息非法: {e}")))?;
    header.set_sensitive(true);
    Ok(header)
}
