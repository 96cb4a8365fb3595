//! 资源包读取模块.

pub mod box_archive;
