//! # bumpkin
//!
//! 纯 Rust 实现的 Beasts & Bumpkins 资源工具集.
//!
//! - **资源包**: 读取游戏的 `*.BOX` 资源包 (支持嵌套)
//! - **语音**: 解码 M10 压缩语音 (12 阶 LPC, 22050 Hz 单声道)
//! - **输出**: 把解码结果封装为标准 WAV 文件
//!
//! # 快速开始
//!
//! ```rust,no_run
//! let data = std::fs::read("HELLO.M10").unwrap();
//! let wav = bumpkin::m10_to_wav(&data).unwrap();
//! std::fs::write("hello.wav", wav).unwrap();
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `bumpkin-core` | 错误类型, 比特流读取, PCM 格式描述 |
//! | `bumpkin-codec` | M10 语音解码器 |
//! | `bumpkin-format` | BOX 资源包, WAV 封装, I/O 抽象 |

/// 核心类型与工具
pub use bumpkin_core as core;

/// 解码器
pub use bumpkin_codec as codec;

/// 资源包与 WAV 封装
pub use bumpkin_format as format;

use std::path::Path;

use bumpkin_codec::M10Decoder;
use bumpkin_core::BumpkinResult;
use bumpkin_format::{IoContext, WavMuxer};

/// 流式写文件时每次解码的采样数
const STREAM_CHUNK: usize = 4096;

/// 获取 bumpkin 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 把一个完整的 M10 文件转换为 WAV 文件字节
///
/// 输出为 44 字节头部加 `2 * 总采样数` 字节的 PCM 数据.
pub fn m10_to_wav(data: &[u8]) -> BumpkinResult<Vec<u8>> {
    let frame = bumpkin_codec::m10::decode(data)?;
    log::debug!(
        "M10 转 WAV: {} 个采样, {:.2} 秒",
        frame.nb_samples(),
        frame.duration_secs()
    );
    bumpkin_format::encode_wav(&frame)
}

/// 把一个完整的 M10 文件边解码边写成 WAV 文件, 返回写入的 PCM 字节数
///
/// 头部无法解析时不会创建输出文件; 解码中途出错时删除写了一半的文件.
pub fn write_m10_as_wav(data: &[u8], path: impl AsRef<Path>) -> BumpkinResult<u64> {
    let path = path.as_ref();
    let mut decoder = M10Decoder::open(data)?;
    let mut io = IoContext::open_write(path)?;

    let result = stream_wav(&mut decoder, &mut io);
    if result.is_err() {
        drop(io);
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("删除不完整的输出 {} 失败: {}", path.display(), e);
        }
    }
    result
}

fn stream_wav(decoder: &mut M10Decoder<'_>, io: &mut IoContext) -> BumpkinResult<u64> {
    let mut muxer = WavMuxer::new(decoder.spec());
    muxer.write_header(io)?;

    let mut chunk = [0i16; STREAM_CHUNK];
    loop {
        let n = decoder.read_samples(&mut chunk)?;
        if n == 0 {
            break;
        }
        muxer.write_samples(io, &chunk[..n])?;
    }

    muxer.write_trailer(io)?;
    log::debug!(
        "M10 写出 WAV: {} 块, {} 字节 PCM",
        decoder.blocks_decoded(),
        muxer.data_written()
    );
    Ok(muxer.data_written())
}
