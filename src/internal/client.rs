//! 操作编排：每个 WebDAV 动作一个方法，负责前置检查、请求头/正文组装与状态码映射。

mod impl_mutate;
mod impl_query;
pub mod structs;
