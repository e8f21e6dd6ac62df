//! 只读操作：列表、存在性、目录判断、元数据、剩余空间、属性读写。

use log::trace;
use reqwest::StatusCode;

use crate::internal::error::DavError;
use crate::internal::transport::traits::http_transport::{DavBody, DavResponse};
use crate::internal::urn::structs::urn::Urn;
use crate::internal::webdav::enums::DavAction;
use crate::internal::webdav::functions::build_request_body::{
    build_free_space_request, build_get_property_request, build_set_property_request,
};
use crate::internal::webdav::functions::parse_response_body::{
    parse_free_space, parse_info, parse_is_directory, parse_listing, parse_listing_with_info,
    parse_property_value,
};
use crate::internal::webdav::structs::dav_property::DavProperty;
use crate::internal::webdav::structs::resource_info::ResourceInfo;

use super::structs::dav_client::DavClient;

impl DavClient {
    /// 列出目录下的直接子项名称，子目录名带结尾 `/`，不包含目录自身。
    pub async fn list(&self, path: &str) -> Result<Vec<String>, DavError> {
        let (directory_urn, text) = self.fetch_listing(path).await?;

        Ok(parse_listing(&text)
            .into_iter()
            .filter(|(urn, _)| !self.is_listed_directory(&directory_urn, &urn.path()))
            .map(|(urn, _)| urn.filename())
            .collect())
    }

    /// 列出目录下的直接子项及其元数据（类似 `ls -l`），不包含目录自身。
    pub async fn list_with_info(&self, path: &str) -> Result<Vec<ResourceInfo>, DavError> {
        let (directory_urn, text) = self.fetch_listing(path).await?;

        Ok(parse_listing_with_info(&text)
            .into_iter()
            .filter(|info| {
                let listed = info.path.as_deref().unwrap_or_default();
                !self.is_listed_directory(&directory_urn, listed)
            })
            .collect())
    }

    async fn fetch_listing(&self, path: &str) -> Result<(Urn, String), DavError> {
        let directory_urn = Urn::directory(path);

        if directory_urn.path() != Self::ROOT && !self.exists(&directory_urn.path()).await? {
            return Err(DavError::RemoteResourceNotFound {
                path: directory_urn.path(),
            });
        }

        let response = self
            .execute(DavAction::List, directory_urn.quote(), DavBody::Empty, None)
            .await?;
        let text = self.read_text(response).await?;

        Ok((directory_urn, text))
    }

    /// 列表响应里会带上被请求的目录自身，按路径比较把它排除掉
    fn is_listed_directory(&self, directory_urn: &Urn, listed_path: &str) -> bool {
        Urn::compare_path(&self.full_path(directory_urn), listed_path)
            || Urn::compare_path(&self.prefixed_full_path(directory_urn), listed_path)
    }

    /// 服务端剩余空间（字节）
    pub async fn free(&self) -> Result<u64, DavError> {
        let body = build_free_space_request()?;
        let response = self
            .execute(DavAction::Free, "", body.into(), None)
            .await?;
        let text = self.read_text(response).await?;

        parse_free_space(&text, &self.hostname)
    }

    /// HEAD 探测。只有 200 视为存在；404 与其他错误状态码都视为不存在。
    pub async fn exists(&self, path: &str) -> Result<bool, DavError> {
        let urn = Urn::new(path);

        match self
            .execute(DavAction::Check, urn.quote(), DavBody::Empty, None)
            .await
        {
            Ok(response) => Ok(response.status == StatusCode::OK),
            Err(e) if e.means_absent() => {
                trace!("{} 不存在: {e}", urn.path());
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// 资源本身或其目录形式存在即可，否则 `RemoteResourceNotFound`
    pub(crate) async fn require_resource(&self, urn: &Urn) -> Result<(), DavError> {
        if self.exists(&urn.path()).await? {
            return Ok(());
        }

        if !urn.is_dir() && self.exists(&Urn::directory(&urn.path()).path()).await? {
            return Ok(());
        }

        Err(DavError::RemoteResourceNotFound { path: urn.path() })
    }

    /// 通过 PROPFIND 父目录判断资源是否为目录
    pub async fn is_directory(&self, path: &str) -> Result<bool, DavError> {
        let urn = Urn::new(path);
        self.require_resource(&urn).await?;

        let parent_urn = Urn::new(&urn.parent());
        let response = self
            .execute(DavAction::Info, parent_urn.quote(), DavBody::Empty, None)
            .await?;
        let text = self.read_text(response).await?;

        parse_is_directory(&text, &self.full_path(&urn), &self.hostname)
    }

    /// 资源元数据：创建时间、名称、大小、修改时间、etag
    pub async fn info(&self, path: &str) -> Result<ResourceInfo, DavError> {
        let urn = Urn::new(path);
        self.require_resource(&urn).await?;

        let response = self
            .execute(DavAction::Info, urn.quote(), DavBody::Empty, None)
            .await?;
        let text = self.read_text(response).await?;

        parse_info(&text, &self.full_path(&urn), &self.hostname)
    }

    /// 读取资源属性。属性未设置时返回 `Ok(None)`。
    pub async fn get_property(
        &self,
        path: &str,
        property: &DavProperty,
    ) -> Result<Option<String>, DavError> {
        let urn = Urn::new(path);
        self.require_existing(&urn).await?;

        let body = build_get_property_request(property)?;
        let response = self
            .execute(DavAction::GetProperty, urn.quote(), body.into(), None)
            .await?;
        let text = self.read_text(response).await?;

        match parse_property_value(&text, &property.name) {
            Err(DavError::PropertyNotFound { .. }) => Ok(None),
            other => other,
        }
    }

    /// 设置单个资源属性
    pub async fn set_property(&self, path: &str, property: &DavProperty) -> Result<(), DavError> {
        self.set_properties(path, std::slice::from_ref(property))
            .await
    }

    /// 一次 PROPPATCH 批量设置多个属性
    pub async fn set_properties(
        &self,
        path: &str,
        properties: &[DavProperty],
    ) -> Result<(), DavError> {
        let urn = Urn::new(path);
        self.require_existing(&urn).await?;

        let body = build_set_property_request(properties)?;
        self.execute(DavAction::SetProperty, urn.quote(), body.into(), None)
            .await?;

        Ok(())
    }

    /// 资源必须按原样存在，否则 `RemoteResourceNotFound`
    pub(crate) async fn require_existing(&self, urn: &Urn) -> Result<(), DavError> {
        if self.exists(&urn.path()).await? {
            Ok(())
        } else {
            Err(DavError::RemoteResourceNotFound { path: urn.path() })
        }
    }

    pub(crate) async fn read_text(&self, response: DavResponse) -> Result<String, DavError> {
        response
            .text()
            .await
            .map_err(|e| self.wrap_transport_error(e))
    }
}
