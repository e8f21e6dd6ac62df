//! 让只实现了 `Send` 的上行流满足 reqwest 对正文流的 `Sync` 要求。

use std::io;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;

use crate::internal::transport::traits::http_transport::RequestStream;

/// 流只会被独占地轮询，`Mutex::get_mut` 不会真正加锁
pub(crate) struct SyncBody {
    inner: Mutex<RequestStream>,
}

impl SyncBody {
    pub(crate) fn new(stream: RequestStream) -> Self {
        Self {
            inner: Mutex::new(stream),
        }
    }
}

impl Stream for SyncBody {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let stream = self
            .get_mut()
            .inner
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        stream.as_mut().poll_next(cx)
    }
}
