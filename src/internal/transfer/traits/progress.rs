//! 进度回调：`(已传输字节, 总字节)`。
//!
//! 回调本身可以挂起，传输循环会等它完成后再拉取下一块，所以进度通知处在传输的关键路径上。

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

/// 进度通知接口
///
/// 使用方式二选一：
/// - 用 [`progress_fn`] / [`async_progress_fn`] 包装闭包；
/// - 自行实现本 trait。
#[async_trait]
pub trait ProgressHook: Send + Sync {
    async fn on_progress(&self, current: u64, total: u64);
}

/// 在目录传输的各个子项之间共享
pub type SharedProgress = Arc<dyn ProgressHook>;

/// 同步闭包适配器
pub struct ProgressFn<F>(pub F);

#[async_trait]
impl<F> ProgressHook for ProgressFn<F>
where
    F: Fn(u64, u64) + Send + Sync + 'static,
{
    async fn on_progress(&self, current: u64, total: u64) {
        (self.0)(current, total);
    }
}

/// 异步闭包适配器
pub struct AsyncProgressFn<F>(pub F);

#[async_trait]
impl<F, Fut> ProgressHook for AsyncProgressFn<F>
where
    F: Fn(u64, u64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn on_progress(&self, current: u64, total: u64) {
        (self.0)(current, total).await
    }
}

pub fn progress_fn<F>(f: F) -> SharedProgress
where
    F: Fn(u64, u64) + Send + Sync + 'static,
{
    Arc::new(ProgressFn(f))
}

pub fn async_progress_fn<F, Fut>(f: F) -> SharedProgress
where
    F: Fn(u64, u64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(AsyncProgressFn(f))
}

pub(crate) async fn notify(progress: Option<&SharedProgress>, current: u64, total: u64) {
    if let Some(hook) = progress {
        hook.on_progress(current, total).await;
    }
}
