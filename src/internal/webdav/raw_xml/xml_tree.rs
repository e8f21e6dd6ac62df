//! 轻量 XML 元素树。
//!
//! 基于 `quick_xml::reader::NsReader` 逐事件读取，解析出带命名空间的元素树，
//! 供多状态响应按 `{DAV:}name` 或仅按本地名查找节点。

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use thiserror::Error;

/// WebDAV 元素所在的命名空间
pub const DAV_NS: &str = "DAV:";

#[derive(Debug, Error)]
#[error("XML 格式错误: {0}")]
pub struct MalformedXml(pub String);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// 解析后的命名空间 URI，未绑定时为 `None`
    pub namespace: Option<String>,
    /// 本地名（不含前缀）
    pub name: String,
    text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn parse(xml: &str) -> Result<Self, MalformedXml> {
        let mut reader = NsReader::from_str(xml);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let (resolved, event) = reader
                .read_resolved_event()
                .map_err(|e| MalformedXml(e.to_string()))?;

            match event {
                Event::Start(start) => {
                    stack.push(Self::open(resolved, start.local_name().as_ref()));
                }
                Event::Empty(start) => {
                    let element = Self::open(resolved, start.local_name().as_ref());
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| MalformedXml("多余的结束标签".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = String::from_utf8_lossy(&text);
                        let unescaped =
                            unescape(&raw).map_err(|e| MalformedXml(e.to_string()))?;
                        current.text.push_str(&unescaped);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::GeneralRef(reference) => {
                    if let Some(current) = stack.last_mut() {
                        let resolved_char = reference
                            .resolve_char_ref()
                            .map_err(|e| MalformedXml(e.to_string()))?;
                        match resolved_char {
                            Some(ch) => current.text.push(ch),
                            None => {
                                let name = String::from_utf8_lossy(&reference);
                                let value = resolve_predefined_entity(&name).ok_or_else(
                                    || MalformedXml(format!("未知实体: &{name};")),
                                )?;
                                current.text.push_str(value);
                            }
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(MalformedXml("存在未闭合的元素".to_string()));
        }

        root.ok_or_else(|| MalformedXml("文档没有根元素".to_string()))
    }

    fn open(resolved: ResolveResult<'_>, local_name: &[u8]) -> Self {
        let namespace = match resolved {
            ResolveResult::Bound(Namespace(ns)) => Some(String::from_utf8_lossy(ns).into_owned()),
            _ => None,
        };

        Self {
            namespace,
            name: String::from_utf8_lossy(local_name).into_owned(),
            ..Default::default()
        }
    }

    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

    /// 去掉首尾空白的文本内容
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// 直接子元素中第一个匹配项
    pub fn child(&self, namespace: &str, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.is(namespace, name))
    }

    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.is(namespace, name))
    }

    /// 后代元素（不含自身）中按文档顺序的第一个匹配项
    pub fn find(&self, namespace: &str, name: &str) -> Option<&XmlElement> {
        self.children.iter().find_map(|c| {
            if c.is(namespace, name) {
                Some(c)
            } else {
                c.find(namespace, name)
            }
        })
    }

    /// 后代元素（不含自身）中全部匹配项，按文档顺序
    pub fn find_all<'a>(&'a self, namespace: &str, name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        self.collect(namespace, name, &mut found);
        found
    }

    fn collect<'a>(&'a self, namespace: &str, name: &str, found: &mut Vec<&'a XmlElement>) {
        for c in &self.children {
            if c.is(namespace, name) {
                found.push(c);
            }
            c.collect(namespace, name, found);
        }
    }
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), MalformedXml> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(MalformedXml("文档存在多个根元素".to_string())),
    }
    Ok(())
}
