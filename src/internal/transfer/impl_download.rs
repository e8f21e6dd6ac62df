use std::io::ErrorKind;
use std::path::Path;

use futures_util::StreamExt;
use futures_util::future::{BoxFuture, FutureExt};
use log::{info, warn};
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::internal::client::structs::dav_client::DavClient;
use crate::internal::error::DavError;
use crate::internal::transfer::structs::chunk_stream::{ChunkStream, rechunk};
use crate::internal::transfer::traits::progress::{SharedProgress, notify};
use crate::internal::transport::traits::http_transport::DavBody;
use crate::internal::urn::structs::urn::Urn;
use crate::internal::webdav::enums::DavAction;

impl DavClient {
    /// 以分块序列的形式读取远程文件，块大小为配置的 `chunk_size`
    pub async fn download_iter(&self, path: &str) -> Result<ChunkStream, DavError> {
        let (_, chunks) = self.open_download(path).await?;
        Ok(chunks)
    }

    /// 把远程文件写入 `sink`
    ///
    /// 总大小取自 `Content-Length`（缺失时为 0）。写第一块之前通知 `(0, total)`，
    /// 之后每写完一块通知累计字节数。
    pub async fn download_to<W>(
        &self,
        path: &str,
        sink: &mut W,
        progress: Option<SharedProgress>,
    ) -> Result<(), DavError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let (total, chunks) = self.open_download(path).await?;
        _pump(chunks, total, sink, progress.as_ref()).await
    }

    /// 下载单个文件到本地路径。本地文件在远程检查通过后才创建。
    pub async fn download_file(
        &self,
        remote_path: &str,
        local_path: &Path,
        progress: Option<SharedProgress>,
    ) -> Result<(), DavError> {
        let (total, chunks) = self.open_download(remote_path).await?;

        info!("下载 {remote_path} -> {}", local_path.display());
        let mut file = fs::File::create(local_path).await?;
        _pump(chunks, total, &mut file, progress.as_ref()).await?;
        info!("下载完成 {remote_path}");

        Ok(())
    }

    /// 下载整个目录
    ///
    /// 危险操作：本地已存在的同名路径会先被删除再重建。子项按列表顺序逐个下载。
    pub fn download_directory<'a>(
        &'a self,
        remote_path: &'a str,
        local_path: &'a Path,
        progress: Option<SharedProgress>,
    ) -> BoxFuture<'a, Result<(), DavError>> {
        async move {
            let urn = Urn::directory(remote_path);

            if !self.is_directory(&urn.path()).await? {
                return Err(DavError::OptionNotValid {
                    name: "remote_path".to_string(),
                    value: remote_path.to_string(),
                });
            }

            info!("下载目录 {} -> {}", urn.path(), local_path.display());
            _reset_local_directory(local_path).await?;

            for name in self.list(&urn.path()).await? {
                let remote_child = format!("{}{name}", urn.path());
                let local_child = local_path.join(name.trim_end_matches(Urn::SEPARATOR));
                self.download(&remote_child, &local_child, progress.clone())
                    .await?;
            }

            info!("目录下载完成 {}", urn.path());
            Ok(())
        }
        .boxed()
    }

    /// 按远程资源类型分派到文件或目录下载
    pub fn download<'a>(
        &'a self,
        remote_path: &'a str,
        local_path: &'a Path,
        progress: Option<SharedProgress>,
    ) -> BoxFuture<'a, Result<(), DavError>> {
        async move {
            if self.is_directory(remote_path).await? {
                self.download_directory(remote_path, local_path, progress)
                    .await
            } else {
                self.download_file(remote_path, local_path, progress).await
            }
        }
        .boxed()
    }

    /// 前置检查并发出 GET，返回 `(总大小, 分块序列)`
    async fn open_download(&self, path: &str) -> Result<(u64, ChunkStream), DavError> {
        let urn = Urn::new(path);

        if self.is_directory(&urn.path()).await? {
            return Err(DavError::OptionNotValid {
                name: "remote_path".to_string(),
                value: path.to_string(),
            });
        }

        let response = self
            .execute(DavAction::Download, urn.quote(), DavBody::Empty, None)
            .await?;
        let total = response.content_length().unwrap_or(0);
        let chunks = rechunk(response.body, self.chunk_size, self.hostname.clone());

        Ok((total, chunks))
    }
}

async fn _pump<W>(
    mut chunks: ChunkStream,
    total: u64,
    sink: &mut W,
    progress: Option<&SharedProgress>,
) -> Result<(), DavError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut current = 0u64;
    notify(progress, current, total).await;

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        sink.write_all(&chunk).await?;
        current += chunk.len() as u64;
        notify(progress, current, total).await;
    }

    sink.flush().await?;
    Ok(())
}

/// 删除已存在的本地路径（文件或目录），再创建空目录
async fn _reset_local_directory(local_path: &Path) -> Result<(), DavError> {
    match fs::metadata(local_path).await {
        Ok(meta) => {
            warn!("删除已存在的本地路径 {}", local_path.display());
            if meta.is_dir() {
                fs::remove_dir_all(local_path).await?;
            } else {
                fs::remove_file(local_path).await?;
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    fs::create_dir_all(local_path).await?;
    Ok(())
}
