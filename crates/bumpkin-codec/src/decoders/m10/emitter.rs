//! 浮点采样到 16 位 PCM 的舍入与饱和.
//!
//! 把采样加到 1.5 * 2^23 上, 指数被固定后尾数低位就是四舍五入后的整数值.
//! 取低 17 位, 落在正负区间之间空隙里的值按所在一侧推到 0x7FFF 或 0x8000.

/// 舍入偏置 12582912.0 的位模式
const ROUNDING_BIAS_BITS: u32 = 0x4B40_0000;
/// 取值掩码 (17 位)
const VALUE_MASK: u32 = 0x1_FFFF;
/// 正向饱和值
const POSITIVE_RAIL: u32 = 0x7FFF;
/// 负向饱和值
const NEGATIVE_RAIL: u32 = 0x8000;
/// 空隙区间上界 (不含)
const GAP_END: u32 = 0x1_8000;
/// 空隙中的正负分界
const GAP_SPLIT: u32 = 0x1_0000;

/// 将一个重建采样舍入并饱和到 16 位有符号整数
pub(crate) fn round_to_pcm(sample: f32) -> i16 {
    let biased = f32::from_bits(ROUNDING_BIAS_BITS) + sample;
    let mut clipped = biased.to_bits() & VALUE_MASK;

    if clipped > POSITIVE_RAIL && clipped < GAP_END {
        clipped = if clipped >= GAP_SPLIT {
            NEGATIVE_RAIL
        } else {
            POSITIVE_RAIL
        };
    }

    clipped as u16 as i16
}
