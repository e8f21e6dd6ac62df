//! 传输引擎：单个资源与整棵目录树的分块上传/下载，带进度回调。
//!
//! 所有传输都在调用方的任务里顺序执行，不会派生新任务；目录传输按列表顺序逐个处理子项。

mod impl_download;
mod impl_upload;
pub mod structs;
pub mod traits;
