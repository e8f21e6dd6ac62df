/// 资源属性：既用于读取请求（只看 `namespace` + `name`），也用于批量设置。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DavProperty {
    /// 属性的 XML 命名空间，默认空
    pub namespace: String,
    pub name: String,
    /// 设置时写入的文本，默认空串
    pub value: String,
}

impl DavProperty {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}
