use std::time::Duration;

use reqwest::header::AUTHORIZATION;

use crate::internal::auth::structs::webdav_auth::WebdavAuth;
use crate::internal::client::structs::client_config::{DEFAULT_CHUNK_SIZE, DavClientConfig};
use crate::internal::client::structs::dav_client::DavClient;
use crate::internal::error::DavError;

// ═══ 认证 ═══

#[test]
fn basic_auth_is_session_header() {
    let auth = WebdavAuth::new(Some("user"), Some("pass"), None).unwrap();
    assert!(auth.has_basic());
    assert!(!auth.has_token());

    let headers = auth.session_headers();
    // base64("user:pass")
    assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Basic dXNlcjpwYXNz");
}

#[test]
fn bearer_is_applied_per_request() {
    let auth = WebdavAuth::new(None, None, Some("tok")).unwrap();
    assert!(auth.session_headers().is_empty());

    let mut headers = reqwest::header::HeaderMap::new();
    auth.apply_bearer(&mut headers);
    assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
}

#[test]
fn auth_equality_uses_digests() {
    let a = WebdavAuth::new(Some("u"), Some("p"), Some("t")).unwrap();
    let b = WebdavAuth::new(Some("u"), Some("p"), Some("t")).unwrap();
    let c = WebdavAuth::new(Some("u"), Some("other"), Some("t")).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.eq_only_token(&c));
}

#[test]
fn debug_hides_secrets() {
    let auth = WebdavAuth::new(Some("user"), Some("hunter2"), Some("tok")).unwrap();
    let printed = format!("{auth:?}");
    assert!(!printed.contains("hunter2"));
    assert!(!printed.contains("dXNlcjpodW50ZXIy"));

    let config = DavClientConfig::new("https://dav.example.com").with_credentials("user", "hunter2");
    assert!(!format!("{config:?}").contains("hunter2"));
}

// ═══ 配置 ═══

#[test]
fn config_defaults() {
    let config = DavClientConfig::default();
    assert_eq!(config.root, "/");
    assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    assert_eq!(config.timeout(), None);
    assert!(!config.insecure);
}

#[test]
fn config_builders() {
    let config = DavClientConfig::new("https://dav.example.com/")
        .with_timeout(Duration::from_secs(30))
        .with_chunk_size(1024)
        .with_proxy("http://proxy:3128")
        .with_proxy_auth("p", "q")
        .insecure(true);

    assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    assert_eq!(config.validate().unwrap(), "https://dav.example.com");
    assert!(config.insecure);
}

#[test]
fn config_validation() {
    let invalid = [
        DavClientConfig::default(),
        DavClientConfig::new("ftp://dav.example.com"),
        DavClientConfig::new("not a url"),
        DavClientConfig::new("https://dav.example.com").with_chunk_size(0),
        DavClientConfig::new("https://dav.example.com").with_proxy(" "),
    ];

    for config in invalid {
        assert!(
            matches!(config.validate(), Err(DavError::Config(_))),
            "{config:?}"
        );
    }
}

#[tokio::test]
async fn client_from_config() {
    let config = DavClientConfig::new("https://dav.example.com/remote.php/webdav/")
        .with_credentials("user", "pass")
        .with_root("/files");
    let client = DavClient::new(config).unwrap();

    assert_eq!(client.hostname(), "https://dav.example.com/remote.php/webdav");
    assert_eq!(client.chunk_size(), DEFAULT_CHUNK_SIZE);
}
