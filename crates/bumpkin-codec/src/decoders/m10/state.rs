//! 跨块持久的解码器状态.

use bumpkin_core::BitReader;

use super::tables::{BLOCK_LEN, DELAY_LINE_LEN, GAIN_TABLE_LEN, ORDER};

/// 步长表首项的单位
const GAIN_BASE_UNIT: f32 = 8.0;
/// 步长表公比的基准值与分辨率
const GAIN_RATIO_BASE: f64 = 1.04;
const GAIN_RATIO_STEP: f64 = 0.001;

/// 解码器状态
///
/// 每个音频资源独占一份, 由块解码逐块修改, 资源解码完成后丢弃.
#[derive(Debug, Clone)]
pub struct DecoderState {
    /// 码流首位: 为真时激励按半速率编码, 另一半位置清零或插值
    pub(crate) decimated: bool,
    /// 第一个反射系数索引低于此阈值时, 激励使用 VLC 模式
    pub(crate) vlc_threshold: u32,
    /// 激励增益步长表 (等比数列)
    pub(crate) gain_table: [f32; GAIN_TABLE_LEN],
    /// 反射系数, 每个四分之一步增量更新
    pub(crate) reflection: [f32; ORDER],
    /// 合成滤波历史
    pub(crate) filter_history: [f32; ORDER],
    /// 激励延迟线: [0, 324) 为上一块末尾的激励, [324, 756) 从不写入, 读到的都是零
    pub(crate) delay_line: [f32; DELAY_LINE_LEN],
    /// 当前块的输出采样
    pub(crate) samples: [f32; BLOCK_LEN],
}

impl DecoderState {
    /// 从码流开头读取初始化字段
    ///
    /// 读取顺序: 1 位半速率标志, 4 位 VLC 阈值, 4 位步长基数, 6 位公比.
    pub fn init(br: &mut BitReader<'_>) -> Self {
        let decimated = br.read_flag();
        let vlc_threshold = 32 - br.read_bits(4);

        let mut gain_table = [0.0f32; GAIN_TABLE_LEN];
        gain_table[0] = (br.read_bits(4) + 1) as f32 * GAIN_BASE_UNIT;

        let ratio = GAIN_RATIO_BASE + f64::from(br.read_bits(6)) * GAIN_RATIO_STEP;
        for i in 1..GAIN_TABLE_LEN {
            gain_table[i] = (f64::from(gain_table[i - 1]) * ratio) as f32;
        }

        Self {
            decimated,
            vlc_threshold,
            gain_table,
            reflection: [0.0; ORDER],
            filter_history: [0.0; ORDER],
            delay_line: [0.0; DELAY_LINE_LEN],
            samples: [0.0; BLOCK_LEN],
        }
    }

    /// 当前块的输出采样
    pub fn samples(&self) -> &[f32; BLOCK_LEN] {
        &self.samples
    }

    /// 当前反射系数
    pub fn reflection(&self) -> &[f32; ORDER] {
        &self.reflection
    }

    /// 激励是否按半速率编码
    pub fn is_decimated(&self) -> bool {
        self.decimated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_初始化字段() {
        // 位流: decimated=1 | threshold 位=3 | 步长 位=2 | 公比 位=10
        // 0b1 | 0011 | 0010 | 001010 → 按低位先出拼接
        let bits: u32 = 1 | (3 << 1) | (2 << 5) | (10 << 9);
        let data = bits.to_le_bytes();
        let mut br = BitReader::new(&data);
        let state = DecoderState::init(&mut br);

        assert!(state.is_decimated());
        assert_eq!(state.vlc_threshold, 29);
        assert_eq!(state.gain_table[0], 24.0);

        let ratio = 1.04 + 10.0 * 0.001;
        let expected = (24.0f64 * ratio) as f32;
        assert_eq!(state.gain_table[1], expected);
        assert!(state.gain_table.windows(2).all(|w| w[1] > w[0]));
        assert!(state.reflection.iter().all(|&v| v == 0.0));
        assert!(state.delay_line.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_全零码流() {
        let data = [0u8; 4];
        let mut br = BitReader::new(&data);
        let state = DecoderState::init(&mut br);
        assert!(!state.is_decimated());
        assert_eq!(state.vlc_threshold, 32);
        assert_eq!(state.gain_table[0], 8.0);
    }
}
