//! WebDAV 线上格式：方法与请求头表、XML 正文的构建与解析。

pub mod enums;
pub mod functions;
pub mod raw_xml;
pub mod structs;
