//! WebDAV 请求体构建：PROPFIND / PROPPATCH 的 XML 正文。

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::internal::error::DavError;
use crate::internal::webdav::raw_xml::xml_tree::DAV_NS;
use crate::internal::webdav::structs::dav_property::DavProperty;

/// 查询剩余空间：`quota-available-bytes` + `quota-used-bytes`
pub fn build_free_space_request() -> Result<String, DavError> {
    let mut writer = XmlBodyWriter::new()?;
    writer.open(dav_root("propfind"))?;
    writer.open(BytesStart::new("prop"))?;
    writer.empty(BytesStart::new("quota-available-bytes"))?;
    writer.empty(BytesStart::new("quota-used-bytes"))?;
    writer.close("prop")?;
    writer.close("propfind")?;
    writer.finish()
}

/// 只查询一个属性的 PROPFIND 正文
pub fn build_get_property_request(property: &DavProperty) -> Result<String, DavError> {
    let mut writer = XmlBodyWriter::new()?;
    writer.open(dav_root("propfind"))?;
    writer.open(BytesStart::new("prop"))?;
    writer.empty(property_start(property))?;
    writer.close("prop")?;
    writer.close("propfind")?;
    writer.finish()
}

/// 批量设置属性的 PROPPATCH 正文，所有属性放在同一个 `<set>` 中
pub fn build_set_property_request(properties: &[DavProperty]) -> Result<String, DavError> {
    let mut writer = XmlBodyWriter::new()?;
    writer.open(dav_root("propertyupdate"))?;
    writer.open(BytesStart::new("set"))?;
    writer.open(BytesStart::new("prop"))?;
    for property in properties {
        writer.open(property_start(property))?;
        writer.text(&property.value)?;
        writer.close(&property.name)?;
    }
    writer.close("prop")?;
    writer.close("set")?;
    writer.close("propertyupdate")?;
    writer.finish()
}

fn dav_root(name: &str) -> BytesStart<'_> {
    BytesStart::new(name).with_attributes([("xmlns", DAV_NS)])
}

/// 属性元素总是显式声明自己的命名空间（空串表示不继承 `DAV:`）
fn property_start(property: &DavProperty) -> BytesStart<'_> {
    BytesStart::new(property.name.as_str())
        .with_attributes([("xmlns", property.namespace.as_str())])
}

struct XmlBodyWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlBodyWriter {
    fn new() -> Result<Self, DavError> {
        let mut body = Self {
            writer: Writer::new(Vec::new()),
        };
        body.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(body)
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), DavError> {
        self.writer
            .write_event(event)
            .map_err(|e| DavError::Xml(e.to_string()))
    }

    fn open(&mut self, start: BytesStart<'_>) -> Result<(), DavError> {
        self.write(Event::Start(start))
    }

    fn empty(&mut self, start: BytesStart<'_>) -> Result<(), DavError> {
        self.write(Event::Empty(start))
    }

    fn text(&mut self, value: &str) -> Result<(), DavError> {
        self.write(Event::Text(BytesText::new(value)))
    }

    fn close(&mut self, name: &str) -> Result<(), DavError> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn finish(self) -> Result<String, DavError> {
        String::from_utf8(self.writer.into_inner()).map_err(|e| DavError::Xml(e.to_string()))
    }
}
