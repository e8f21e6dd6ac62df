use std::sync::Arc;

use async_trait::async_trait;

use crate::internal::client::structs::client_config::DavClientConfig;
use crate::internal::client::structs::dav_client::DavClient;
use crate::internal::error::DavError;
use crate::internal::transport::traits::http_transport::{
    DavRequest, DavResponse, HttpTransport, TransportError,
};
use crate::internal::webdav::structs::dav_property::DavProperty;
use crate::tests::fake_server::{BASE_URL, FakeDav};

fn docs_server() -> Arc<FakeDav> {
    let server = FakeDav::new();
    server.add_dir("/docs");
    server.add_file("/docs/a.txt", b"0123456789");
    server.add_dir("/docs/sub");
    server.add_file("/docs/sub/deep.txt", b"deep");
    server
}

// ═══ 列表 ═══

#[tokio::test]
async fn list_excludes_directory_itself() {
    let server = docs_server();
    let client = server.client();

    let names = client.list("/docs").await.unwrap();
    assert_eq!(names, vec!["a.txt".to_string(), "sub/".to_string()]);

    let requests = server.requests();
    assert_eq!(server.methods(), vec!["HEAD", "PROPFIND"]);
    assert_eq!(requests[1].path, "/docs/");
    assert_eq!(requests[1].header("depth"), Some("1"));
}

#[tokio::test]
async fn list_root_skips_existence_check() {
    let server = docs_server();
    let client = server.client();

    let names = client.list("/").await.unwrap();
    assert_eq!(names, vec!["docs/".to_string()]);
    assert_eq!(server.methods(), vec!["PROPFIND"]);
}

#[tokio::test]
async fn list_with_info_reports_kind_and_size() {
    let server = docs_server();
    let client = server.client();

    let infos = client.list_with_info("/docs/").await.unwrap();
    assert_eq!(infos.len(), 2);

    assert_eq!(infos[0].path.as_deref(), Some("/dav/docs/a.txt"));
    assert_eq!(infos[0].is_dir, Some(false));
    assert_eq!(infos[0].size_bytes(), Some(10));
    assert_eq!(infos[1].is_dir, Some(true));
}

#[tokio::test]
async fn list_missing_directory_fails() {
    let server = docs_server();
    let client = server.client();

    let result = client.list("/nope").await;
    assert!(matches!(result, Err(DavError::RemoteResourceNotFound { .. })));
    assert_eq!(server.methods(), vec!["HEAD"]);
}

#[tokio::test]
async fn list_under_configured_root() {
    let server = FakeDav::new();
    server.add_dir("/base");
    server.add_file("/base/inner.txt", b"x");
    let client = server.client_with(DavClientConfig::new(BASE_URL).with_root("/base/"));

    let names = client.list("/").await.unwrap();
    assert_eq!(names, vec!["inner.txt".to_string()]);
    assert_eq!(server.requests()[0].path, "/base/");
}

// ═══ 存在性与元数据 ═══

#[tokio::test]
async fn exists_follows_head_status() {
    let server = docs_server();
    let client = server.client();

    assert!(client.exists("/docs/a.txt").await.unwrap());
    assert!(client.exists("/docs/").await.unwrap());
    assert!(!client.exists("/docs/zzz").await.unwrap());
}

#[tokio::test]
async fn info_of_missing_resource_sends_no_propfind() {
    let server = docs_server();
    let client = server.client();

    let result = client.info("/missing").await;
    assert!(matches!(result, Err(DavError::RemoteResourceNotFound { .. })));

    let methods = server.methods();
    assert!(methods.iter().all(|m| m == "HEAD"), "{methods:?}");

    server.clear_log();
    let result = client.is_directory("/missing").await;
    assert!(matches!(result, Err(DavError::RemoteResourceNotFound { .. })));
    assert!(!server.methods().contains(&"PROPFIND".to_string()));
}

#[tokio::test]
async fn info_of_file() {
    let server = docs_server();
    let client = server.client();

    let info = client.info("/docs/a.txt").await.unwrap();
    assert_eq!(info.name.as_deref(), Some("a.txt"));
    assert_eq!(info.size.as_deref(), Some("10"));
    assert!(info.modified_at().is_some());
}

#[tokio::test]
async fn is_directory_queries_parent() {
    let server = docs_server();
    let client = server.client();

    assert!(client.is_directory("/docs").await.unwrap());
    assert!(client.is_directory("/docs/sub/").await.unwrap());
    assert!(!client.is_directory("/docs/a.txt").await.unwrap());

    let propfind = server
        .requests()
        .into_iter()
        .find(|r| r.method == "PROPFIND")
        .unwrap();
    assert_eq!(propfind.path, "/");
}

#[tokio::test]
async fn free_reads_quota() {
    let server = docs_server();
    server.set_quota(4096);
    let client = server.client();

    assert_eq!(client.free().await.unwrap(), 4096);
    let request = &server.requests()[0];
    assert_eq!(request.header("depth"), Some("0"));
    assert!(request.body_text().contains("quota-available-bytes"));
}

#[tokio::test]
async fn free_without_quota_is_not_supported() {
    let server = docs_server();
    let client = server.client();

    assert!(matches!(
        client.free().await,
        Err(DavError::MethodNotSupported { .. })
    ));
}

// ═══ 属性 ═══

#[tokio::test]
async fn property_round_trip() {
    let server = docs_server();
    let client = server.client();
    let property = DavProperty::new("x").with_value("v");

    client.set_property("/docs/a.txt", &property).await.unwrap();
    assert_eq!(server.property("/docs/a.txt", "x").as_deref(), Some("v"));

    let value = client
        .get_property("/docs/a.txt", &DavProperty::new("x"))
        .await
        .unwrap();
    assert_eq!(value.as_deref(), Some("v"));
}

#[tokio::test]
async fn unset_property_is_none() {
    let server = docs_server();
    let client = server.client();

    let value = client
        .get_property("/docs/a.txt", &DavProperty::new("never-set"))
        .await
        .unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn set_properties_in_one_request() {
    let server = docs_server();
    let client = server.client();
    let properties = [
        DavProperty::new("colour").with_value("red"),
        DavProperty::new("tag")
            .with_namespace("urn:tags")
            .with_value("a&b"),
    ];

    client.set_properties("/docs", &properties).await.unwrap();

    assert_eq!(server.methods(), vec!["HEAD", "PROPPATCH"]);
    assert_eq!(server.property("/docs", "colour").as_deref(), Some("red"));
    assert_eq!(server.property("/docs", "tag").as_deref(), Some("a&b"));
}

#[tokio::test]
async fn property_of_missing_resource_fails() {
    let server = docs_server();
    let client = server.client();

    let result = client.get_property("/ghost", &DavProperty::new("x")).await;
    assert!(matches!(result, Err(DavError::RemoteResourceNotFound { .. })));
    assert_eq!(server.methods(), vec!["HEAD"]);
}

// ═══ 认证与传输错误 ═══

#[tokio::test]
async fn bearer_token_is_attached_to_every_request() {
    let server = docs_server();
    let client = server.client_with(DavClientConfig::new(BASE_URL).with_token("secret-token"));

    client.list("/docs").await.unwrap();

    for request in server.requests() {
        assert_eq!(request.header("authorization"), Some("Bearer secret-token"));
    }
}

struct Unreachable;

#[async_trait]
impl HttpTransport for Unreachable {
    async fn send(&self, request: DavRequest) -> Result<DavResponse, TransportError> {
        if request.method == "HEAD" {
            Err(TransportError::Connect("connection refused".to_string()))
        } else {
            Err(TransportError::Request("timed out".to_string()))
        }
    }
}

#[tokio::test]
async fn transport_failures_map_to_connection_errors() {
    let client =
        DavClient::with_transport(DavClientConfig::new(BASE_URL), Arc::new(Unreachable)).unwrap();

    assert!(matches!(
        client.exists("/a").await,
        Err(DavError::NoConnection { ref server, .. }) if server == BASE_URL
    ));
    assert!(matches!(
        client.unlink("/a").await,
        Err(DavError::ConnectionException(_))
    ));
}
