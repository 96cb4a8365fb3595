//! 子块激励 (残差) 熵解码.
//!
//! 两种模式:
//! - 简单模式: 每个位置 1~2 位, 取值 {-2, 0, 2}
//! - VLC 模式: 两页 512 项查找表 + 29 个符号, 支持零游程与一元编码的大幅度值

use bumpkin_core::BitReader;

use super::tables::{
    SCRATCH_LEN, SUBBLOCK_LEN, SYMBOL_ESCAPE_MAX, SYMBOL_ZERO_RUN_MAX, VLC_LOOKUP, VLC_SYMBOLS,
};

/// 一元编码幅度的起始值
const ESCAPE_BASE: i32 = 7;
/// 零游程长度的附加值
const ZERO_RUN_BASE: usize = 7;

/// 解码一个子块的激励到 `out[offset + k * stride]`, 直到写满 108 个位置
///
/// `stride` 为 2 时只填充一半位置, 另一半由调用方清零或插值.
pub(crate) fn decode_excitation(
    br: &mut BitReader<'_>,
    vlc: bool,
    out: &mut [f32; SCRATCH_LEN],
    offset: usize,
    stride: usize,
) {
    debug_assert!(stride == 1 || stride == 2);
    debug_assert!(offset + SUBBLOCK_LEN <= SCRATCH_LEN);

    if vlc {
        decode_vlc(br, out, offset, stride);
    } else {
        decode_ternary(br, out, offset, stride);
    }
}

/// 简单模式: 低 2 位为 01 → -2, 11 → +2 (各消耗 2 位); 最低位为 0 → 0 (消耗 1 位)
fn decode_ternary(br: &mut BitReader<'_>, out: &mut [f32; SCRATCH_LEN], offset: usize, stride: usize) {
    let mut index = 0;
    while index < SUBBLOCK_LEN {
        out[offset + index] = match br.peek_bits(2) {
            0b01 => {
                br.skip_bits(2);
                -2.0
            }
            0b11 => {
                br.skip_bits(2);
                2.0
            }
            _ => {
                br.skip_bits(1);
                0.0
            }
        };
        index += stride;
    }
}

/// VLC 模式
fn decode_vlc(br: &mut BitReader<'_>, out: &mut [f32; SCRATCH_LEN], offset: usize, stride: usize) {
    let mut index = 0;
    let mut page = 0u32;

    while index < SUBBLOCK_LEN {
        let code = VLC_LOOKUP[((page << 8) | br.peek_bits(8)) as usize];
        let symbol = VLC_SYMBOLS[code as usize];
        page = symbol.next_page;
        br.skip_bits(symbol.length);

        if code > SYMBOL_ZERO_RUN_MAX {
            out[offset + index] = symbol.value;
            index += stride;
        } else if code > SYMBOL_ESCAPE_MAX {
            // 零游程, 截断到子块末尾
            let mut run = br.read_bits(6) as usize + ZERO_RUN_BASE;
            if run * stride + index > SUBBLOCK_LEN {
                run = (SUBBLOCK_LEN - index) / stride;
            }
            for _ in 0..run {
                out[offset + index] = 0.0;
                index += stride;
            }
        } else {
            // 一元编码幅度: 每个 1 位加一, 末尾补零保证终止
            let mut magnitude = ESCAPE_BASE;
            while br.read_flag() {
                magnitude += 1;
            }
            let value = if br.read_flag() { magnitude } else { -magnitude };
            out[offset + index] = value as f32;
            index += stride;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 按低位先出顺序拼接位字段
    fn pack_bits(fields: &[(u32, u32)]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut acc = 0u64;
        let mut count = 0u32;
        for &(value, width) in fields {
            acc |= u64::from(value & ((1 << width) - 1)) << count;
            count += width;
            while count >= 8 {
                out.push(acc as u8);
                acc >>= 8;
                count -= 8;
            }
        }
        if count > 0 {
            out.push(acc as u8);
        }
        out
    }

    /// 在给定页中查找某符号编号对应的 8 位窥视值
    fn find_code(page: usize, symbol: u8) -> u32 {
        (0..256)
            .find(|&b| VLC_LOOKUP[(page << 8) | b] == symbol)
            .expect("符号不存在") as u32
    }

    #[test]
    fn test_简单模式取值() {
        // 01 → -2, 11 → +2, 0 → 0, 其余全零
        let data = pack_bits(&[(0b01, 2), (0b11, 2), (0, 1)]);
        let mut br = BitReader::new(&data);
        let mut out = [9.0f32; SCRATCH_LEN];
        decode_excitation(&mut br, false, &mut out, 5, 1);

        assert_eq!(out[5], -2.0);
        assert_eq!(out[6], 2.0);
        assert!(out[7..113].iter().all(|&v| v == 0.0));
        // 保护区未被写入
        assert!(out[..5].iter().all(|&v| v == 9.0));
        assert!(out[113..].iter().all(|&v| v == 9.0));
    }

    #[test]
    fn test_简单模式步长2() {
        let data = pack_bits(&[(0b11, 2)]);
        let mut br = BitReader::new(&data);
        let mut out = [9.0f32; SCRATCH_LEN];
        decode_excitation(&mut br, false, &mut out, 6, 2);

        assert_eq!(out[6], 2.0);
        for k in 1..54 {
            assert_eq!(out[6 + 2 * k], 0.0);
            assert_eq!(out[5 + 2 * k], 9.0, "奇数位置不应被写入");
        }
    }

    #[test]
    fn test_vlc_全零输入为静音() {
        let data = [0u8; 64];
        let mut br = BitReader::new(&data);
        let mut out = [1.0f32; SCRATCH_LEN];
        decode_excitation(&mut br, true, &mut out, 5, 1);
        assert!(out[5..113].iter().all(|&v| v == 0.0));
        // 符号 4 每个占 2 位, 共 216 位 = 27 字节
        assert_eq!(br.bits_left(), 64 * 8 - 216);
    }

    #[test]
    fn test_vlc_零游程截断() {
        // 符号 2 (零游程), 游程 63 + 7 = 70, 步长 2 时截断到 54
        let code = find_code(0, 2);
        let length = VLC_SYMBOLS[2].length;
        let data = pack_bits(&[(code, length), (63, 6)]);
        let mut br = BitReader::new(&data);
        let mut out = [5.0f32; SCRATCH_LEN];
        decode_excitation(&mut br, true, &mut out, 5, 2);

        for k in 0..54 {
            assert_eq!(out[5 + 2 * k], 0.0);
        }
        // 单个游程填满子块后立即结束, 只消耗 length + 6 位
        assert_eq!(br.bits_left(), data.len() * 8 - (length + 6) as usize);
    }

    #[test]
    fn test_vlc_一元编码长游程终止() {
        // 符号 0 后连续 25 个 1, 然后 0 结束, 符号位 1 → +32
        let code = find_code(0, 0);
        let mut fields = vec![(code, VLC_SYMBOLS[0].length)];
        fields.extend(std::iter::repeat_n((1, 1), 25));
        fields.push((0, 1));
        fields.push((1, 1));
        let data = pack_bits(&fields);

        let mut br = BitReader::new(&data);
        let mut out = [0.0f32; SCRATCH_LEN];
        decode_excitation(&mut br, true, &mut out, 5, 1);

        assert_eq!(out[5], 32.0);
        assert!(out[6..113].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_vlc_一元编码负号() {
        let code = find_code(0, 0);
        let data = pack_bits(&[(code, VLC_SYMBOLS[0].length), (0b011, 3), (0, 1)]);
        let mut br = BitReader::new(&data);
        let mut out = [0.0f32; SCRATCH_LEN];
        decode_excitation(&mut br, true, &mut out, 5, 1);
        // 两个 1 之后遇到 0: 7 + 2 = 9, 符号位 0 → 负
        assert_eq!(out[5], -9.0);
    }

    #[test]
    fn test_vlc_全1输入依然终止() {
        // 最坏情况: 符号 0 之后全是 1, 一元循环一直读到数据末尾, 之后补零结束
        let mut data = vec![find_code(0, 0) as u8];
        data.extend_from_slice(&[0xFF; 31]);
        let mut br = BitReader::new(&data);
        let mut out = [0.0f32; SCRATCH_LEN];
        decode_excitation(&mut br, true, &mut out, 5, 1);

        assert!(br.is_exhausted());
        // 7 + 248 个 1, 符号位为填充的 0
        assert_eq!(out[5], -255.0);
        assert!(out[6..113].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_vlc_普通符号() {
        // 符号 6 → +1.0, 页号 0 → 0
        let code = find_code(0, 6);
        let data = pack_bits(&[(code, VLC_SYMBOLS[6].length)]);
        let mut br = BitReader::new(&data);
        let mut out = [0.0f32; SCRATCH_LEN];
        decode_excitation(&mut br, true, &mut out, 5, 1);
        assert_eq!(out[5], 1.0);
    }
}
