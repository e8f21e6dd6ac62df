//! 分块流：下载方向把响应正文重新切成固定大小的块，上传方向从本地读取器按块拉取。

use std::io;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::internal::error::DavError;
use crate::internal::transfer::traits::progress::{SharedProgress, notify};
use crate::internal::transport::traits::http_transport::{RequestStream, ResponseStream};

/// 下载得到的分块序列：有限、只能向前、不可回退，重新读取需要重新发起下载
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, DavError>> + Send + 'static>>;

struct Rechunk {
    body: ResponseStream,
    buffer: BytesMut,
    finished: bool,
}

/// 除最后一块外，每块恰好 `chunk_size` 字节
pub(crate) fn rechunk(body: ResponseStream, chunk_size: usize, server: String) -> ChunkStream {
    let state = Rechunk {
        body,
        buffer: BytesMut::new(),
        finished: false,
    };

    stream::try_unfold(state, move |mut state| {
        let server = server.clone();
        async move {
            loop {
                if state.buffer.len() >= chunk_size {
                    let chunk = state.buffer.split_to(chunk_size).freeze();
                    return Ok(Some((chunk, state)));
                }

                if state.finished {
                    if state.buffer.is_empty() {
                        return Ok(None);
                    }
                    let rest = state.buffer.split().freeze();
                    return Ok(Some((rest, state)));
                }

                match state.body.next().await {
                    Some(Ok(bytes)) => state.buffer.extend_from_slice(&bytes),
                    Some(Err(e)) => return Err(DavError::from_transport(&server, e)),
                    None => state.finished = true,
                }
            }
        }
    })
    .boxed()
}

struct Producer<R> {
    reader: R,
    current: u64,
    started: bool,
}

/// 拉取式上传正文
///
/// 第一次被拉取时通知 `(0, size)`，之后每读一块通知一次累计字节数；
/// 读到 0 字节或累计达到 `size` 时结束。
pub(crate) fn read_chunks<R>(
    reader: R,
    size: u64,
    chunk_size: usize,
    progress: Option<SharedProgress>,
) -> RequestStream
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let state = Producer {
        reader,
        current: 0,
        started: false,
    };

    stream::try_unfold(state, move |mut state| {
        let progress = progress.clone();
        async move {
            if !state.started {
                state.started = true;
                notify(progress.as_ref(), 0, size).await;
            }

            if state.current >= size {
                return Ok::<_, io::Error>(None);
            }

            let remaining = usize::try_from(size - state.current).unwrap_or(usize::MAX);
            let want = chunk_size.min(remaining);
            let mut buffer = vec![0u8; want];
            let read = state.reader.read(&mut buffer).await?;
            if read == 0 {
                return Ok(None);
            }
            buffer.truncate(read);

            state.current += read as u64;
            notify(progress.as_ref(), state.current, size).await;

            Ok(Some((Bytes::from(buffer), state)))
        }
    })
    .boxed()
}
