//! 修改类操作：创建目录、删除、移动、复制。

use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::internal::error::DavError;
use crate::internal::transport::traits::http_transport::DavBody;
use crate::internal::urn::structs::urn::Urn;
use crate::internal::webdav::enums::{DEPTH, DESTINATION, DavAction, Depth, OVERWRITE};

use super::structs::dav_client::DavClient;

/// 部分服务端（如 Yandex）对已存在的目录执行 MKCOL 会返回 405，这里按成功处理
fn mkdir_reports_existing_collection(error: &DavError) -> bool {
    matches!(error, DavError::MethodNotSupported { .. })
}

impl DavClient {
    /// 创建目录，父目录必须存在。返回服务端是否确认创建（200/201，或目录已存在）。
    pub async fn create_directory(&self, path: &str) -> Result<bool, DavError> {
        let directory_urn = Urn::directory(path);

        if !self.exists(&directory_urn.parent()).await? {
            return Err(DavError::RemoteParentNotFound {
                path: directory_urn.path(),
            });
        }

        match self
            .execute(DavAction::Mkdir, directory_urn.quote(), DavBody::Empty, None)
            .await
        {
            Ok(response) => Ok(matches!(
                response.status,
                StatusCode::OK | StatusCode::CREATED
            )),
            Err(e) if mkdir_reports_existing_collection(&e) => {
                warn!("MKCOL {} 返回 405，视为目录已存在", directory_urn.path());
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    /// 删除远程资源，不做前置检查，以服务端结果为准
    pub async fn unlink(&self, path: &str) -> Result<(), DavError> {
        let urn = Urn::new(path);
        self.execute(DavAction::Clean, urn.quote(), DavBody::Empty, None)
            .await?;
        Ok(())
    }

    /// 同 [`DavClient::unlink`]
    pub async fn delete(&self, path: &str) -> Result<(), DavError> {
        self.unlink(path).await
    }

    /// 移动资源。源必须存在，目标的父目录必须存在。
    pub async fn move_to(
        &self,
        source: &str,
        destination: &str,
        overwrite: bool,
    ) -> Result<(), DavError> {
        let (urn_from, mut headers) = self.prepare_transfer_headers(source, destination).await?;
        headers.insert(
            OVERWRITE,
            HeaderValue::from_static(if overwrite { "T" } else { "F" }),
        );

        self.execute(DavAction::Move, urn_from.quote(), DavBody::Empty, Some(headers))
            .await?;
        Ok(())
    }

    /// 复制资源。源为目录时附带 `Depth` 头，否则按单个资源复制。
    pub async fn copy_to(
        &self,
        source: &str,
        destination: &str,
        depth: Depth,
    ) -> Result<(), DavError> {
        let (urn_from, mut headers) = self.prepare_transfer_headers(source, destination).await?;

        if self.is_directory(&urn_from.path()).await? {
            headers.insert(DEPTH, HeaderValue::from_static(depth.as_str()));
        }

        self.execute(DavAction::Copy, urn_from.quote(), DavBody::Empty, Some(headers))
            .await?;
        Ok(())
    }

    /// MOVE/COPY 共用的前置检查与 `Destination` 头
    async fn prepare_transfer_headers(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<(Urn, HeaderMap), DavError> {
        let urn_from = Urn::new(source);
        self.require_existing(&urn_from).await?;

        let urn_to = Urn::new(destination);
        if !self.exists(&urn_to.parent()).await? {
            return Err(DavError::RemoteParentNotFound {
                path: urn_to.path(),
            });
        }

        let destination_url = self.url_for(urn_to.quote());
        debug!("{} -> {destination_url}", urn_from.path());

        let mut headers = HeaderMap::new();
        headers.insert(
            DESTINATION,
            HeaderValue::from_str(&destination_url).map_err(|_| DavError::OptionNotValid {
                name: "destination".to_string(),
                value: destination.to_string(),
            })?,
        );

        Ok((urn_from, headers))
    }
}
