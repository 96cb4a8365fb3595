//! # bumpkin-format
//!
//! Beasts & Bumpkins 容器格式库.
//!
//! - BOX 资源包读取 (游戏的全部数据都打包在 `*.BOX` 中)
//! - WAV 封装, 把解码后的 PCM 写成标准 WAV 文件
//! - 按扩展名识别资源类型
//! - 文件 / 内存两种后端的 I/O 抽象

pub mod asset;
pub mod demuxers;
pub mod io;
pub mod muxers;

// 重导出常用类型
pub use asset::AssetKind;
pub use demuxers::box_archive::{BoxArchive, BoxEntry, BoxTimestamp};
pub use io::IoContext;
pub use muxers::wav::{WavMuxer, encode_wav};
