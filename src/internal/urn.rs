//! 路径模型：远程资源定位符的规范化、编码与比较。

pub mod structs;
