//! M10 解码器常量表.
//!
//! 反射系数量化表、变长码 (VLC) 查找表与块结构常量.

/// 预测阶数 (反射系数个数)
pub(crate) const ORDER: usize = 12;
/// 每块采样数
pub(crate) const BLOCK_LEN: usize = 432;
/// 每子块采样数
pub(crate) const SUBBLOCK_LEN: usize = 108;
/// 每块子块数
pub(crate) const SUBBLOCKS: usize = BLOCK_LEN / SUBBLOCK_LEN;
/// 块间保留的历史激励长度
pub(crate) const HISTORY_LEN: usize = BLOCK_LEN - SUBBLOCK_LEN;
/// 延迟线长度: 历史激励 + 长时预测可能越过历史读取的范围 (恒为零)
pub(crate) const DELAY_LINE_LEN: usize = HISTORY_LEN + BLOCK_LEN;
/// 第一个子块在延迟线中的基准位置 (未减去延迟偏移)
pub(crate) const FIRST_LAG_BASE: usize = HISTORY_LEN - SUBBLOCK_LEN;
/// 激励暂存区的边缘保护长度
pub(crate) const SCRATCH_GUARD: usize = 5;
/// 激励暂存区长度: 子块 + 两侧保护区
pub(crate) const SCRATCH_LEN: usize = SUBBLOCK_LEN + 2 * SCRATCH_GUARD;
/// 步长表长度
pub(crate) const GAIN_TABLE_LEN: usize = 64;

/// 反射系数量化表 (关于中点对称)
///
/// 前 4 个系数用 6 位索引整张表, 后 8 个系数用 5 位索引从第 16 项开始的子表.
pub(crate) const REFLECTION_LOOKUP: [f32; 64] = [
    0.0, -9.9677598e-1, -9.90327e-1, -9.8387903e-1,
    -9.77431e-1, -9.7098202e-1, -9.6453398e-1, -9.58085e-1,
    -9.5163703e-1, -9.3075401e-1, -9.0495998e-1, -8.7916702e-1,
    -8.5337299e-1, -8.2757902e-1, -8.0178601e-1, -7.7599198e-1,
    -7.5019801e-1, -7.2440499e-1, -6.9861102e-1, -6.7063498e-1,
    -6.19048e-1, -5.6746e-1, -5.1587301e-1, -4.64286e-1,
    -4.12698e-1, -3.6111099e-1, -3.09524e-1, -2.5793701e-1,
    -2.06349e-1, -1.54762e-1, -1.03175e-1, -5.1587e-2,
    0.0, 5.1587e-2, 1.03175e-1, 1.54762e-1,
    2.06349e-1, 2.5793701e-1, 3.09524e-1, 3.6111099e-1,
    4.12698e-1, 4.64286e-1, 5.1587301e-1, 5.6746e-1,
    6.19048e-1, 6.7063498e-1, 6.9861102e-1, 7.2440499e-1,
    7.5019801e-1, 7.7599198e-1, 8.0178601e-1, 8.2757902e-1,
    8.5337299e-1, 8.7916702e-1, 9.0495998e-1, 9.3075401e-1,
    9.5163703e-1, 9.58085e-1, 9.6453398e-1, 9.7098202e-1,
    9.77431e-1, 9.8387903e-1, 9.90327e-1, 9.9677598e-1,
];

/// 后 8 个反射系数的索引偏移
pub(crate) const REFLECTION_SUBTABLE_OFFSET: usize = 16;

/// VLC 符号描述
#[derive(Debug, Clone, Copy)]
pub(crate) struct VlcSymbol {
    /// 下一次查表使用的高位页 (0 或 1)
    pub next_page: u32,
    /// 本符号占用的位数
    pub length: u32,
    /// 符号值 (仅对普通符号有效)
    pub value: f32,
}

impl VlcSymbol {
    const fn new(next_page: u32, length: u32, value: f32) -> Self {
        Self {
            next_page,
            length,
            value,
        }
    }
}

/// 符号 0/1: 一元编码的长游程幅度
pub(crate) const SYMBOL_ESCAPE_MAX: u8 = 1;
/// 符号 2/3: 零游程
pub(crate) const SYMBOL_ZERO_RUN_MAX: u8 = 3;

/// VLC 符号表, 由 [`VLC_LOOKUP`] 给出的符号编号索引
pub(crate) const VLC_SYMBOLS: [VlcSymbol; 29] = [
    VlcSymbol::new(1, 8, 0.0),
    VlcSymbol::new(1, 7, 0.0),
    VlcSymbol::new(0, 8, 0.0),
    VlcSymbol::new(0, 7, 0.0),
    VlcSymbol::new(0, 2, 0.0),
    VlcSymbol::new(0, 2, -1.0),
    VlcSymbol::new(0, 2, 1.0),
    VlcSymbol::new(0, 3, -1.0),
    VlcSymbol::new(0, 3, 1.0),
    VlcSymbol::new(1, 4, -2.0),
    VlcSymbol::new(1, 4, 2.0),
    VlcSymbol::new(1, 3, -2.0),
    VlcSymbol::new(1, 3, 2.0),
    VlcSymbol::new(1, 5, -3.0),
    VlcSymbol::new(1, 5, 3.0),
    VlcSymbol::new(1, 4, -3.0),
    VlcSymbol::new(1, 4, 3.0),
    VlcSymbol::new(1, 6, -4.0),
    VlcSymbol::new(1, 6, 4.0),
    VlcSymbol::new(1, 5, -4.0),
    VlcSymbol::new(1, 5, 4.0),
    VlcSymbol::new(1, 7, -5.0),
    VlcSymbol::new(1, 7, 5.0),
    VlcSymbol::new(1, 6, -5.0),
    VlcSymbol::new(1, 6, 5.0),
    VlcSymbol::new(1, 8, -6.0),
    VlcSymbol::new(1, 8, 6.0),
    VlcSymbol::new(1, 7, -6.0),
    VlcSymbol::new(1, 7, 6.0),
];

/// VLC 查找表: 以 `(页号 << 8) | 窥视的 8 位` 为索引, 得到符号编号 0..=28
pub(crate) const VLC_LOOKUP: [u8; 512] = [
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0D, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x11,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0E, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x15,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0D, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x12,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0E, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x19,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0D, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x11,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0E, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x16,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0D, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x12,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0E, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x00,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0D, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x11,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0E, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x15,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0D, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x12,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0E, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x1A,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0D, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x11,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0E, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x16,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0D, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x12,
    0x04, 0x06, 0x05, 0x09, 0x04, 0x06, 0x05, 0x0E, 0x04, 0x06, 0x05, 0x0A, 0x04, 0x06, 0x05, 0x02,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x13, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x17,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x14, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x1B,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x13, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x18,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x14, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x01,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x13, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x17,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x14, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x1C,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x13, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x18,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x14, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x03,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x13, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x17,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x14, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x1B,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x13, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x18,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x14, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x01,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x13, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x17,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x14, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x1C,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x13, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x18,
    0x04, 0x0B, 0x07, 0x0F, 0x04, 0x0C, 0x08, 0x14, 0x04, 0x0B, 0x07, 0x10, 0x04, 0x0C, 0x08, 0x03,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_反射系数表对称() {
        for i in 1..32 {
            assert_eq!(REFLECTION_LOOKUP[i], -REFLECTION_LOOKUP[64 - i], "索引 {i}");
        }
        assert_eq!(REFLECTION_LOOKUP[0], 0.0);
        assert_eq!(REFLECTION_LOOKUP[32], 0.0);
    }

    #[test]
    fn test_查找表符号范围() {
        assert!(VLC_LOOKUP.iter().all(|&s| (s as usize) < VLC_SYMBOLS.len()));
        assert!(VLC_SYMBOLS.iter().all(|s| (1..=8).contains(&s.length)));
        assert!(VLC_SYMBOLS.iter().all(|s| s.next_page <= 1));
    }

    #[test]
    fn test_块结构常量() {
        assert_eq!(SUBBLOCKS, 4);
        assert_eq!(HISTORY_LEN, 324);
        assert_eq!(DELAY_LINE_LEN, 756);
        assert_eq!(FIRST_LAG_BASE, 216);
        assert_eq!(SCRATCH_LEN, 118);
    }
}
