//! 远程资源定位符。
//!
//! `Urn` 保存一次性百分号编码后的路径，同时提供解码后的路径、文件名、父目录等纯函数视图。
//! 构造后不可变，重命名/移动会产生新的 `Urn`。

use std::fmt;
use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use regex::Regex;
use url::Url;

/// 路径编码时保留的字符：字母数字以及 `/ _ . - ~`
const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// 两个分隔符之间只有 `.` 的片段，连续多段一次匹配。只折叠，不处理 `..` 的回退语义。
static DOT_SEGMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:\.+/)+").expect("DOT_SEGMENTS 正则非法"));

static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/+").expect("SEPARATOR_RUNS 正则非法"));

static REPEATED_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/{2,}").expect("REPEATED_SEPARATORS 正则非法"));

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Urn {
    quoted: String,
}

impl Urn {
    pub const SEPARATOR: &'static str = "/";

    /// 按文件语义构造（不强制尾部分隔符）
    pub fn new(path: &str) -> Self {
        Self::with_kind(path, false)
    }

    /// 按目录语义构造，结果一定以 `/` 结尾
    pub fn directory(path: &str) -> Self {
        Self::with_kind(path, true)
    }

    pub fn with_kind(path: &str, directory: bool) -> Self {
        let encoded = utf8_percent_encode(path, PATH_ENCODE_SET).to_string();
        let without_dots = DOT_SEGMENTS.replace_all(&encoded, Self::SEPARATOR);
        let mut quoted = SEPARATOR_RUNS
            .replace_all(&without_dots, Self::SEPARATOR)
            .into_owned();

        if !quoted.starts_with(Self::SEPARATOR) {
            quoted.insert_str(0, Self::SEPARATOR);
        }

        if directory && !quoted.ends_with(Self::SEPARATOR) {
            quoted.push_str(Self::SEPARATOR);
        }

        Self { quoted }
    }

    /// 解码后的路径
    pub fn path(&self) -> String {
        unquote(&self.quoted)
    }

    /// 编码后的路径，直接用于拼接请求 URL
    pub fn quote(&self) -> &str {
        &self.quoted
    }

    /// 最后一个非空片段（解码）。目录返回 `name/`。
    pub fn filename(&self) -> String {
        let segments: Vec<&str> = self.quoted.split(Self::SEPARATOR).collect();
        let last = segments.last().copied().unwrap_or_default();

        let name = if last.is_empty() {
            let dir_name = segments
                .len()
                .checked_sub(2)
                .and_then(|i| segments.get(i))
                .copied()
                .unwrap_or_default();
            format!("{dir_name}{}", Self::SEPARATOR)
        } else {
            last.to_string()
        };

        unquote(&name)
    }

    /// 上一级目录（解码、始终带尾部 `/`）。顶层资源的父目录是根 `/`。
    pub fn parent(&self) -> String {
        let nesting_level = self.nesting_level();

        let mut parent = if nesting_level == 1 {
            Self::SEPARATOR.to_string()
        } else {
            self.quoted
                .split(Self::SEPARATOR)
                .take(nesting_level)
                .collect::<Vec<_>>()
                .join(Self::SEPARATOR)
        };

        if !parent.ends_with(Self::SEPARATOR) {
            parent.push_str(Self::SEPARATOR);
        }

        unquote(&parent)
    }

    /// 分隔符个数，不计结尾那一个
    pub fn nesting_level(&self) -> usize {
        let body = &self.quoted[..self.quoted.len() - 1];
        body.matches(Self::SEPARATOR).count()
    }

    pub fn is_dir(&self) -> bool {
        self.quoted.ends_with(Self::SEPARATOR)
    }

    /// 仅用于比较：折叠连续分隔符并去掉一个结尾分隔符
    pub fn normalize_path(path: &str) -> String {
        let mut result = REPEATED_SEPARATORS
            .replace_all(path, Self::SEPARATOR)
            .into_owned();
        if result.ends_with(Self::SEPARATOR) {
            result.pop();
        }
        result
    }

    /// 判断 `href`（完整 URL 或路径，可能带编码）与 `path` 是否指向同一资源。
    ///
    /// 列表接口靠它排除被请求目录自身。
    pub fn compare_path(path: &str, href: &str) -> bool {
        let href_path = format!("{}{}", Self::SEPARATOR, unquote(&url_path_of(href)));
        Self::normalize_path(path) == Self::normalize_path(&href_path)
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub(crate) fn unquote(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// 取出 href 的路径部分：绝对 URL 交给 `url` 解析，相对引用去掉查询串与片段
pub(crate) fn url_path_of(href: &str) -> String {
    if let Ok(url) = Url::parse(href) {
        if url.has_host() {
            return url.path().to_string();
        }
    }

    href.split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_string()
}
