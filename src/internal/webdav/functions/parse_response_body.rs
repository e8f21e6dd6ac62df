//! WebDAV 响应体解析：列表、元数据、剩余空间、目录判断与属性值。
//!
//! 所有函数都是纯函数，只依赖响应文本与路径。
//! `hostname` 是客户端配置的服务地址，其中的 URL 路径部分会被当作服务端挂载前缀。

use log::trace;
use url::Url;

use crate::internal::error::DavError;
use crate::internal::urn::structs::urn::Urn;
use crate::internal::webdav::raw_xml::multi_status::{MultiStatus, info_from_response};
use crate::internal::webdav::raw_xml::xml_tree::{DAV_NS, XmlElement};
use crate::internal::webdav::structs::resource_info::ResourceInfo;

/// 列表中每一项的定位符与是否目录。XML 无法解析时返回空列表。
pub fn parse_listing(xml: &str) -> Vec<(Urn, bool)> {
    match MultiStatus::parse(xml) {
        Ok(multi_status) => multi_status.to_urns(),
        Err(e) => {
            trace!("列表响应无法解析，按空列表处理: {e}");
            Vec::new()
        }
    }
}

/// 列表中每一项的完整元数据。XML 无法解析时返回空列表。
pub fn parse_listing_with_info(xml: &str) -> Vec<ResourceInfo> {
    match MultiStatus::parse(xml) {
        Ok(multi_status) => multi_status.to_resource_infos(),
        Err(e) => {
            trace!("列表响应无法解析，按空列表处理: {e}");
            Vec::new()
        }
    }
}

/// 读取 `quota-available-bytes`。节点缺失或正文无法解析都说明服务端不支持配额查询。
pub fn parse_free_space(xml: &str, hostname: &str) -> Result<u64, DavError> {
    let not_supported = || DavError::MethodNotSupported {
        name: "free".to_string(),
        server: hostname.to_string(),
    };

    let multi_status = MultiStatus::parse(xml).map_err(|_| not_supported())?;
    let root = multi_status.root();
    let node = if root.is(DAV_NS, "quota-available-bytes") {
        Some(root)
    } else {
        root.find(DAV_NS, "quota-available-bytes")
    };

    node.and_then(|n| n.text().parse::<u64>().ok())
        .ok_or_else(not_supported)
}

/// 找出 href 与 `path` 匹配的那个 `<D:response>`。
///
/// 先按原始 href 比较，再去掉服务端挂载前缀后比较。
pub fn extract_response_for_path(
    xml: &str,
    path: &str,
    hostname: &str,
) -> Result<XmlElement, DavError> {
    let multi_status = MultiStatus::parse(xml).map_err(|_| DavError::MethodNotSupported {
        name: "is_dir".to_string(),
        server: hostname.to_string(),
    })?;

    response_for_path(&multi_status, path, hostname).cloned()
}

fn response_for_path<'a>(
    multi_status: &'a MultiStatus,
    path: &str,
    hostname: &str,
) -> Result<&'a XmlElement, DavError> {
    let prefix = server_prefix(hostname);
    let normalized = Urn::normalize_path(path);

    for response in multi_status.top_level_responses() {
        let Some(href) = response.child(DAV_NS, "href").map(|h| h.text()) else {
            continue;
        };

        if Urn::compare_path(&normalized, href) {
            return Ok(response);
        }

        // 前缀只在路径段边界上剥离，`/davx` 不算 `/dav` 之下
        let without_prefix = match href.strip_prefix(prefix.as_str()) {
            Some(rest) if !prefix.is_empty() && _at_segment_boundary(rest) => rest,
            _ => href,
        };
        if Urn::compare_path(&normalized, without_prefix) {
            return Ok(response);
        }
    }

    Err(DavError::RemoteResourceNotFound {
        path: path.to_string(),
    })
}

/// 单个资源的元数据，缺失的字段保持为空
pub fn parse_info(xml: &str, path: &str, hostname: &str) -> Result<ResourceInfo, DavError> {
    let response = extract_response_for_path(xml, path, hostname)?;
    Ok(info_from_response(&response))
}

/// `resourcetype` 下存在 `collection` 即为目录；`resourcetype` 本身缺失视为服务端不支持
pub fn parse_is_directory(xml: &str, path: &str, hostname: &str) -> Result<bool, DavError> {
    let response = extract_response_for_path(xml, path, hostname)?;
    let resource_type =
        response
            .find(DAV_NS, "resourcetype")
            .ok_or_else(|| DavError::MethodNotSupported {
                name: "is_dir".to_string(),
                server: hostname.to_string(),
            })?;

    Ok(resource_type.child(DAV_NS, "collection").is_some())
}

/// 读取第一个本地名为 `name` 的元素（不限命名空间）的文本。
///
/// - 元素位于非 2xx 的 propstat 中：`Ok(None)`
/// - 元素存在：`Ok(Some(text))`，空元素为空串
/// - 没有该元素：`PropertyNotFound`
pub fn parse_property_value(xml: &str, name: &str) -> Result<Option<String>, DavError> {
    let root = XmlElement::parse(xml).map_err(|e| DavError::Xml(e.to_string()))?;

    match find_by_local_name(&root, name, None) {
        Some((_, Some(status))) if !is_success_status(status) => Ok(None),
        Some((element, _)) => Ok(Some(element.text().to_string())),
        None => Err(DavError::PropertyNotFound {
            name: name.to_string(),
        }),
    }
}

/// 深度优先查找，同时带上最近一层 propstat 的状态行
fn find_by_local_name<'a>(
    element: &'a XmlElement,
    name: &str,
    status: Option<&'a str>,
) -> Option<(&'a XmlElement, Option<&'a str>)> {
    if element.name == name {
        return Some((element, status));
    }

    let status = if element.is(DAV_NS, "propstat") {
        element.child(DAV_NS, "status").map(|s| s.text()).or(status)
    } else {
        status
    };

    element
        .children
        .iter()
        .find_map(|child| find_by_local_name(child, name, status))
}

/// "HTTP/1.1 200 OK" 这类状态行中是否为 2xx
fn is_success_status(status_line: &str) -> bool {
    status_line
        .split_whitespace()
        .find_map(|t| t.parse::<u16>().ok())
        .map(|code| (200..=299).contains(&code))
        .unwrap_or(false)
}

fn _at_segment_boundary(rest: &str) -> bool {
    rest.is_empty() || rest.starts_with('/')
}

/// 服务地址中的路径部分，不带结尾分隔符
pub(crate) fn server_prefix(hostname: &str) -> String {
    Url::parse(hostname)
        .map(|url| url.path().trim_end_matches('/').to_string())
        .unwrap_or_default()
}
