use reqwest::Method;
use reqwest::header::{ACCEPT, CONNECTION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

/// 客户端用到的 HTTP/WebDAV 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebDavMethod {
    GET,
    PUT,
    HEAD,
    DELETE,
    PROPFIND,
    PROPPATCH,
    MKCOL,
    COPY,
    MOVE,
}

impl WebDavMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebDavMethod::GET => "GET",
            WebDavMethod::PUT => "PUT",
            WebDavMethod::HEAD => "HEAD",
            WebDavMethod::DELETE => "DELETE",
            WebDavMethod::PROPFIND => "PROPFIND",
            WebDavMethod::PROPPATCH => "PROPPATCH",
            WebDavMethod::MKCOL => "MKCOL",
            WebDavMethod::COPY => "COPY",
            WebDavMethod::MOVE => "MOVE",
        }
    }

    pub fn to_method(&self) -> Method {
        match self {
            WebDavMethod::GET => Method::GET,
            WebDavMethod::PUT => Method::PUT,
            WebDavMethod::HEAD => Method::HEAD,
            WebDavMethod::DELETE => Method::DELETE,
            // 扩展方法名均为合法 token，不会解析失败
            _ => Method::from_bytes(self.as_str().as_bytes()).unwrap_or(Method::GET),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// 仅返回当前资源
    Zero,
    /// 返回当前资源及直接子资源
    One,
    /// 返回当前资源及所有子资源（谨慎使用）
    Infinity,
}

impl Depth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Zero => "0",
            Depth::One => "1",
            Depth::Infinity => "infinity",
        }
    }
}

pub(crate) const DEPTH: HeaderName = HeaderName::from_static("depth");
pub(crate) const DESTINATION: HeaderName = HeaderName::from_static("destination");
pub(crate) const OVERWRITE: HeaderName = HeaderName::from_static("overwrite");

/// 客户端动作。每个动作固定对应一个方法和一组请求头。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DavAction {
    List,
    Info,
    Free,
    Check,
    Mkdir,
    Clean,
    Copy,
    Move,
    Download,
    Upload,
    GetProperty,
    SetProperty,
}

impl DavAction {
    pub fn name(&self) -> &'static str {
        match self {
            DavAction::List => "list",
            DavAction::Info => "info",
            DavAction::Free => "free",
            DavAction::Check => "check",
            DavAction::Mkdir => "mkdir",
            DavAction::Clean => "clean",
            DavAction::Copy => "copy",
            DavAction::Move => "move",
            DavAction::Download => "download",
            DavAction::Upload => "upload",
            DavAction::GetProperty => "get_property",
            DavAction::SetProperty => "set_property",
        }
    }

    pub fn method(&self) -> WebDavMethod {
        match self {
            DavAction::List | DavAction::Info | DavAction::Free => WebDavMethod::PROPFIND,
            DavAction::GetProperty => WebDavMethod::PROPFIND,
            DavAction::SetProperty => WebDavMethod::PROPPATCH,
            DavAction::Check => WebDavMethod::HEAD,
            DavAction::Mkdir => WebDavMethod::MKCOL,
            DavAction::Clean => WebDavMethod::DELETE,
            DavAction::Copy => WebDavMethod::COPY,
            DavAction::Move => WebDavMethod::MOVE,
            DavAction::Download => WebDavMethod::GET,
            DavAction::Upload => WebDavMethod::PUT,
        }
    }

    /// 动作的固定请求头
    pub fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let any = HeaderValue::from_static("*/*");
        let form = HeaderValue::from_static("application/x-www-form-urlencoded");

        match self {
            DavAction::List | DavAction::Info => {
                headers.insert(ACCEPT, any);
                headers.insert(DEPTH, HeaderValue::from_static(Depth::One.as_str()));
            }
            DavAction::Free => {
                headers.insert(ACCEPT, any);
                headers.insert(DEPTH, HeaderValue::from_static(Depth::Zero.as_str()));
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/xml"));
            }
            DavAction::GetProperty | DavAction::SetProperty => {
                headers.insert(ACCEPT, any);
                headers.insert(DEPTH, HeaderValue::from_static(Depth::One.as_str()));
                headers.insert(CONTENT_TYPE, form);
            }
            DavAction::Mkdir | DavAction::Clean => {
                headers.insert(ACCEPT, any);
                headers.insert(CONNECTION, HeaderValue::from_static("Keep-Alive"));
            }
            DavAction::Upload => {
                headers.insert(ACCEPT, any);
                headers.insert(CONTENT_TYPE, form);
            }
            DavAction::Copy | DavAction::Move | DavAction::Check => {
                headers.insert(ACCEPT, any);
            }
            DavAction::Download => {}
        }

        headers
    }
}
