//! 多状态响应 `<D:multistatus>` 的只读视图。

use crate::internal::urn::structs::urn::{Urn, unquote, url_path_of};
use crate::internal::webdav::structs::resource_info::ResourceInfo;

use super::xml_tree::{DAV_NS, MalformedXml, XmlElement};

#[derive(Debug, Clone)]
pub struct MultiStatus {
    root: XmlElement,
}

impl MultiStatus {
    pub fn parse(xml: &str) -> Result<Self, MalformedXml> {
        XmlElement::parse(xml).map(|root| Self { root })
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// 文档中所有 `<D:response>`（任意深度）
    pub fn responses(&self) -> Vec<&XmlElement> {
        let mut responses = Vec::new();
        if self.root.is(DAV_NS, "response") {
            responses.push(&self.root);
        }
        responses.extend(self.root.find_all(DAV_NS, "response"));
        responses
    }

    /// 根节点下直接的 `<D:response>`，用于按路径匹配单个资源
    pub fn top_level_responses(&self) -> impl Iterator<Item = &XmlElement> {
        self.root.children_named(DAV_NS, "response")
    }

    /// 每个 response 的定位符与是否目录，href 缺失的条目跳过
    pub fn to_urns(&self) -> Vec<(Urn, bool)> {
        self.responses()
            .into_iter()
            .filter_map(|response| {
                let path = href_path(response)?;
                let is_dir = is_collection(response);
                Some((Urn::with_kind(&path, is_dir), is_dir))
            })
            .collect()
    }

    pub fn to_resource_infos(&self) -> Vec<ResourceInfo> {
        self.responses()
            .into_iter()
            .filter_map(|response| {
                let path = href_path(response)?;
                let mut info = info_from_response(response);
                info.is_dir = Some(is_collection(response));
                info.path = Some(path);
                Some(info)
            })
            .collect()
    }
}

/// href 的路径部分（解码）
fn href_path(response: &XmlElement) -> Option<String> {
    let href = response.find(DAV_NS, "href")?;
    Some(unquote(&url_path_of(href.text())))
}

pub(crate) fn is_collection(response: &XmlElement) -> bool {
    response.find(DAV_NS, "collection").is_some()
}

/// 从单个 response 中读取元数据，缺失的节点保持 `None`
pub(crate) fn info_from_response(response: &XmlElement) -> ResourceInfo {
    let text_of = |name: &str| response.find(DAV_NS, name).map(|e| e.text().to_string());

    ResourceInfo {
        created: text_of("creationdate"),
        name: text_of("displayname"),
        size: text_of("getcontentlength"),
        modified: text_of("getlastmodified"),
        etag: text_of("getetag"),
        ..Default::default()
    }
}
