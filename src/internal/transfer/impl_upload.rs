use std::io::ErrorKind;
use std::path::Path;

use bytes::Bytes;
use futures_util::future::{BoxFuture, FutureExt};
use log::{debug, info, warn};
use tokio::fs;
use tokio::io::AsyncRead;

use crate::internal::client::structs::dav_client::DavClient;
use crate::internal::error::DavError;
use crate::internal::transfer::structs::chunk_stream::read_chunks;
use crate::internal::transfer::traits::progress::SharedProgress;
use crate::internal::transport::traits::http_transport::DavBody;
use crate::internal::urn::structs::urn::Urn;
use crate::internal::webdav::enums::DavAction;

impl DavClient {
    /// 从读取器上传到远程路径
    ///
    /// 正文由拉取式分块生产者提供：每次最多读 `chunk_size` 字节，读到 0 字节或累计达到 `size` 时结束。
    /// `overwrite` 为 false 且目标已存在时直接返回。
    pub async fn upload_to<R>(
        &self,
        path: &str,
        reader: R,
        size: u64,
        overwrite: bool,
        progress: Option<SharedProgress>,
    ) -> Result<(), DavError>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let Some(urn) = self.prepare_upload(path, overwrite).await? else {
            return Ok(());
        };

        let body = read_chunks(reader, size, self.chunk_size, progress);
        self.execute(DavAction::Upload, urn.quote(), DavBody::Stream(body), None)
            .await?;

        Ok(())
    }

    /// 把内存中的完整正文原样交给请求
    pub async fn upload_bytes(&self, path: &str, data: Bytes) -> Result<(), DavError> {
        let Some(urn) = self.prepare_upload(path, true).await? else {
            return Ok(());
        };

        self.execute(DavAction::Upload, urn.quote(), DavBody::Bytes(data), None)
            .await?;

        Ok(())
    }

    /// 上传单个本地文件，大小取自文件元数据
    pub async fn upload_file(
        &self,
        remote_path: &str,
        local_path: &Path,
        overwrite: bool,
        progress: Option<SharedProgress>,
    ) -> Result<(), DavError> {
        let file = fs::File::open(local_path)
            .await
            .map_err(|e| _local_error(e, local_path))?;
        let meta = file.metadata().await?;

        if meta.is_dir() {
            return Err(DavError::OptionNotValid {
                name: "local_path".to_string(),
                value: local_path.display().to_string(),
            });
        }

        info!("上传 {} -> {remote_path}", local_path.display());
        self.upload_to(remote_path, file, meta.len(), overwrite, progress)
            .await?;
        info!("上传完成 {remote_path}");

        Ok(())
    }

    /// 上传整个本地目录
    ///
    /// 危险操作：远程目录已存在且 `overwrite` 为 true 时会先被删除。
    /// `overwrite` 为 false 且远程目录已存在时直接返回。子项按本地目录遍历顺序逐个上传。
    pub fn upload_directory<'a>(
        &'a self,
        remote_path: &'a str,
        local_path: &'a Path,
        overwrite: bool,
        progress: Option<SharedProgress>,
    ) -> BoxFuture<'a, Result<(), DavError>> {
        async move {
            let urn = Urn::directory(remote_path);

            let meta = fs::metadata(local_path)
                .await
                .map_err(|e| _local_error(e, local_path))?;
            if !meta.is_dir() {
                return Err(DavError::OptionNotValid {
                    name: "local_path".to_string(),
                    value: local_path.display().to_string(),
                });
            }

            if self.exists(&urn.path()).await? {
                if !overwrite {
                    debug!("远程目录已存在，跳过 {}", urn.path());
                    return Ok(());
                }
                warn!("删除已存在的远程目录 {}", urn.path());
                self.unlink(&urn.path()).await?;
            }

            info!("上传目录 {} -> {}", local_path.display(), urn.path());
            self.create_directory(&urn.path()).await?;

            let mut entries = fs::read_dir(local_path).await?;
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().replace('\\', "");
                let remote_child = format!("{}{name}", urn.path());
                self.upload(&remote_child, &entry.path(), progress.clone())
                    .await?;
            }

            info!("目录上传完成 {}", urn.path());
            Ok(())
        }
        .boxed()
    }

    /// 按本地路径类型分派到文件或目录上传，总是覆盖已存在的目标
    pub fn upload<'a>(
        &'a self,
        remote_path: &'a str,
        local_path: &'a Path,
        progress: Option<SharedProgress>,
    ) -> BoxFuture<'a, Result<(), DavError>> {
        async move {
            let meta = fs::metadata(local_path)
                .await
                .map_err(|e| _local_error(e, local_path))?;

            if meta.is_dir() {
                self.upload_directory(remote_path, local_path, true, progress)
                    .await
            } else {
                self.upload_file(remote_path, local_path, true, progress)
                    .await
            }
        }
        .boxed()
    }

    /// 上传前置检查。返回 `None` 表示目标已存在且不覆盖。
    async fn prepare_upload(&self, path: &str, overwrite: bool) -> Result<Option<Urn>, DavError> {
        let urn = Urn::new(path);

        if urn.is_dir() {
            return Err(DavError::OptionNotValid {
                name: "remote_path".to_string(),
                value: path.to_string(),
            });
        }

        if !overwrite && self.exists(&urn.path()).await? {
            debug!("远程资源已存在，跳过 {}", urn.path());
            return Ok(None);
        }

        if !self.exists(&urn.parent()).await? {
            return Err(DavError::RemoteParentNotFound { path: urn.path() });
        }

        Ok(Some(urn))
    }
}

fn _local_error(error: std::io::Error, local_path: &Path) -> DavError {
    if error.kind() == ErrorKind::NotFound {
        DavError::LocalResourceNotFound {
            path: local_path.display().to_string(),
        }
    } else {
        DavError::Local(error)
    }
}
