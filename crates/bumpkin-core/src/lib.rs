//! # bumpkin-core
//!
//! bumpkin 工具集核心库, 提供错误类型、比特流读取器和 PCM 流描述.
//!
//! 其余 crate (解码器、资源包读取、WAV 封装) 都建立在本 crate 之上.

pub mod bitreader;
pub mod error;
pub mod pcm_spec;

// 重导出常用类型
pub use bitreader::BitReader;
pub use error::{BumpkinError, BumpkinResult};
pub use pcm_spec::PcmSpec;
