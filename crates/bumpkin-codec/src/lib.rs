//! # bumpkin-codec
//!
//! Beasts & Bumpkins 资源解码器库.
//!
//! 目前包含 M10 语音解码器: 把游戏的 LPC 压缩语音还原为 22050 Hz 单声道 16 位 PCM.
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! let data = std::fs::read("voice.m10").unwrap();
//! let frame = bumpkin_codec::m10::decode(&data).unwrap();
//! println!("{} 个采样, {:.2} 秒", frame.nb_samples(), frame.duration_secs());
//! ```

pub mod decoders;
pub mod frame;

// 重导出常用类型
pub use decoders::m10;
pub use decoders::m10::{M10Decoder, PtHeader};
pub use frame::AudioFrame;
