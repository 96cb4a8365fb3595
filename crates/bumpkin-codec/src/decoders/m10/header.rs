//! PT 头部解析.
//!
//! M10 文件结构:
//! ```text
//! "PT" + 2 字节保留 + data_offset(LE32)
//! 头部记录序列 (以 0xFF 结束):
//!   0xFE / 0xFC       空记录
//!   0xFD              子头部, 内部记录序列以 0x8A 结束
//!   其他              1 字节值 (为 0xFF 时再跳过 4 字节) + 1 字节
//! 子头部记录:
//!   0x83 len value    压缩类型 (大端, 目前未使用)
//!   0x85 len value    总采样数 (大端)
//!   0xFF              空记录
//!   0x8A len ...      子头部结束, 跳过 len 字节
//!   其他 len ...      跳过 len 字节
//! data_offset 处开始是压缩码流.
//! ```

use bumpkin_core::{BumpkinError, BumpkinResult};
use log::debug;

/// 文件签名
const SIGNATURE: &[u8; 2] = b"PT";

const CODE_END: u8 = 0xFF;
const CODE_SKIP_A: u8 = 0xFE;
const CODE_SKIP_B: u8 = 0xFC;
const CODE_SUBHEADER: u8 = 0xFD;

const SUB_COMPRESSION_TYPE: u8 = 0x83;
const SUB_SAMPLE_COUNT: u8 = 0x85;
const SUB_NOP: u8 = 0xFF;
const SUB_END: u8 = 0x8A;

/// 解析后的 PT 头部
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtHeader {
    /// 压缩码流在文件中的绝对偏移
    pub data_offset: u32,
    /// 解码后的总采样数, 0 表示没有可解码的内容
    pub total_samples: u32,
    /// 压缩类型字段 (0x83), 记录但不参与解码
    pub compression_type: Option<u32>,
    /// 头部记录序列结束处的偏移
    pub header_end: usize,
}

/// 头部字节游标
///
/// 跳过操作允许越过末尾, 之后的读取会报错.
struct HeaderCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> HeaderCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_u8(&mut self) -> BumpkinResult<u8> {
        let b = self.data.get(self.pos).copied().ok_or_else(|| {
            BumpkinError::Format(format!("PT 头部在偏移 {} 处意外结束", self.pos))
        })?;
        self.pos += 1;
        Ok(b)
    }

    fn read_u32_le(&mut self) -> BumpkinResult<u32> {
        let mut buf = [0u8; 4];
        for b in &mut buf {
            *b = self.read_u8()?;
        }
        Ok(u32::from_le_bytes(buf))
    }

    /// 读取 `len` 字节大端无符号整数, 超过 4 字节时只保留低 32 位
    fn read_be(&mut self, len: u8) -> BumpkinResult<u32> {
        let mut value = 0u32;
        for _ in 0..len {
            value = (value << 8) | u32::from(self.read_u8()?);
        }
        Ok(value)
    }

    fn skip(&mut self, count: usize) {
        self.pos = self.pos.saturating_add(count);
    }
}

impl PtHeader {
    /// 从文件开头解析 PT 头部
    pub fn parse(data: &[u8]) -> BumpkinResult<Self> {
        if data.len() < SIGNATURE.len() || &data[..2] != SIGNATURE {
            return Err(BumpkinError::Format("缺少 PT 签名".into()));
        }

        let mut cur = HeaderCursor::new(data);
        cur.skip(4);
        let data_offset = cur.read_u32_le()?;

        let mut total_samples = 0u32;
        let mut compression_type = None;

        loop {
            match cur.read_u8()? {
                CODE_END => break,
                CODE_SKIP_A | CODE_SKIP_B => {}
                CODE_SUBHEADER => {
                    Self::parse_subheader(&mut cur, &mut total_samples, &mut compression_type)?
                }
                _ => {
                    if cur.read_u8()? == 0xFF {
                        cur.skip(4);
                    }
                    cur.read_u8()?;
                }
            }
        }

        let header = Self {
            data_offset,
            total_samples,
            compression_type,
            header_end: cur.pos,
        };

        debug!(
            "PT 头部: data_offset={}, total_samples={}, compression_type={:?}",
            header.data_offset, header.total_samples, header.compression_type,
        );

        Ok(header)
    }

    fn parse_subheader(
        cur: &mut HeaderCursor<'_>,
        total_samples: &mut u32,
        compression_type: &mut Option<u32>,
    ) -> BumpkinResult<()> {
        loop {
            match cur.read_u8()? {
                SUB_COMPRESSION_TYPE => {
                    let len = cur.read_u8()?;
                    *compression_type = Some(cur.read_be(len)?);
                }
                SUB_SAMPLE_COUNT => {
                    let len = cur.read_u8()?;
                    *total_samples = cur.read_be(len)?;
                }
                SUB_NOP => {}
                SUB_END => {
                    let len = cur.read_u8()?;
                    cur.skip(usize::from(len));
                    return Ok(());
                }
                _ => {
                    let len = cur.read_u8()?;
                    cur.skip(usize::from(len));
                }
            }
        }
    }
}
