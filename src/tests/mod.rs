//! 测试模块入口：公共逻辑在 `lib` 子模块，内存服务端在 `fake_server`，用例在 `internal`。

#[cfg(test)]
pub use lib::*;
