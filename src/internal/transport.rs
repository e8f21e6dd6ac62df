//! HTTP 传输层：抽象的请求能力与基于 reqwest 的默认实现。

pub mod structs;
pub mod traits;
