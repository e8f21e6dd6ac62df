//! 资源句柄：把一个远程路径和客户端绑在一起的游标。

pub mod structs;
