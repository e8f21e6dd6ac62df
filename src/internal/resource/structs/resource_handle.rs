use std::collections::BTreeMap;
use std::path::Path;

use crate::internal::client::structs::dav_client::DavClient;
use crate::internal::error::DavError;
use crate::internal::transfer::traits::progress::SharedProgress;
use crate::internal::urn::structs::urn::Urn;
use crate::internal::webdav::enums::Depth;
use crate::internal::webdav::structs::resource_info::ResourceInfo;

/// 远程资源句柄
///
/// `rename` / `move_to` 成功后替换句柄持有的路径，其余操作只读地委托给客户端。
#[derive(Debug)]
pub struct ResourceHandle<'a> {
    client: &'a DavClient,
    urn: Urn,
}

impl<'a> ResourceHandle<'a> {
    pub fn new(client: &'a DavClient, urn: Urn) -> Self {
        Self { client, urn }
    }

    pub fn urn(&self) -> &Urn {
        &self.urn
    }

    pub fn path(&self) -> String {
        self.urn.path()
    }

    /// 在同一父目录下改名，目录保持结尾 `/`
    pub async fn rename(&mut self, new_name: &str) -> Result<(), DavError> {
        let new_path = format!("{}{}", self.urn.parent(), Urn::new(new_name).filename());
        self.client
            .move_to(&self.urn.path(), &new_path, false)
            .await?;
        self.urn = Urn::new(&new_path);
        Ok(())
    }

    pub async fn move_to(&mut self, remote_path: &str) -> Result<(), DavError> {
        let new_urn = Urn::new(remote_path);
        self.client
            .move_to(&self.urn.path(), &new_urn.path(), false)
            .await?;
        self.urn = new_urn;
        Ok(())
    }

    /// 复制到新路径，返回指向副本的句柄
    pub async fn copy_to(&self, remote_path: &str) -> Result<ResourceHandle<'a>, DavError> {
        let urn = Urn::new(remote_path);
        self.client
            .copy_to(&self.urn.path(), &urn.path(), Depth::One)
            .await?;
        Ok(ResourceHandle::new(self.client, urn))
    }

    pub async fn delete(&self) -> Result<(), DavError> {
        self.client.unlink(&self.urn.path()).await
    }

    pub async fn exists(&self) -> Result<bool, DavError> {
        self.client.exists(&self.urn.path()).await
    }

    pub async fn is_directory(&self) -> Result<bool, DavError> {
        self.client.is_directory(&self.urn.path()).await
    }

    pub async fn info(&self) -> Result<ResourceInfo, DavError> {
        self.client.info(&self.urn.path()).await
    }

    /// 只保留 `keys` 中列出的元数据字段，未知字段忽略
    pub async fn info_filtered(
        &self,
        keys: &[&str],
    ) -> Result<BTreeMap<String, Option<String>>, DavError> {
        let info = self.info().await?;

        Ok(ResourceInfo::FIELDS
            .iter()
            .filter(|field| keys.contains(field))
            .map(|field| (field.to_string(), info.field(field).map(str::to_string)))
            .collect())
    }

    pub async fn download(
        &self,
        local_path: &Path,
        progress: Option<SharedProgress>,
    ) -> Result<(), DavError> {
        self.client
            .download(&self.urn.path(), local_path, progress)
            .await
    }
}

impl DavClient {
    /// 创建指向 `path` 的资源句柄，不发出请求
    pub fn resource(&self, path: &str) -> ResourceHandle<'_> {
        ResourceHandle::new(self, Urn::new(path))
    }
}
