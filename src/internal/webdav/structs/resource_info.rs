use chrono::{DateTime, FixedOffset};

/// 资源元数据，字段保持服务端返回的原始文本，不做语义解析。
///
/// `is_dir` 与 `path` 只在列表接口（`list_with_info`）中填充。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceInfo {
    /// `<creationdate>`
    pub created: Option<String>,
    /// `<displayname>`
    pub name: Option<String>,
    /// `<getcontentlength>`
    pub size: Option<String>,
    /// `<getlastmodified>`
    pub modified: Option<String>,
    /// `<getetag>`
    pub etag: Option<String>,
    pub is_dir: Option<bool>,
    /// 解码后的资源路径（来自 href）
    pub path: Option<String>,
}

impl ResourceInfo {
    /// 字段名，与 [`ResourceInfo::field`] 对应
    pub const FIELDS: [&'static str; 5] = ["created", "name", "size", "modified", "etag"];

    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            "created" => self.created.as_deref(),
            "name" => self.name.as_deref(),
            "size" => self.size.as_deref(),
            "modified" => self.modified.as_deref(),
            "etag" => self.etag.as_deref(),
            "path" => self.path.as_deref(),
            _ => None,
        }
    }

    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref().and_then(|s| s.trim().parse().ok())
    }

    /// `getlastmodified` 按 HTTP-date 解析，缺失或格式不符时为 `None`
    pub fn modified_at(&self) -> Option<DateTime<FixedOffset>> {
        self.modified
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc2822(s.trim()).ok())
    }
}
