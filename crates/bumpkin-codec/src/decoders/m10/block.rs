//! 块解码: 每块 432 个采样, 分 4 个 108 采样的子块.
//!
//! 1. 读 12 个反射系数索引, 计算到目标系数的四分之一步增量
//! 2. 每个子块: 长时预测 (延迟线 + 增益) 加上熵解码的激励
//! 3. 把当前块后 324 个激励复制到延迟线头部, 延迟线其余部分始终为零
//! 4. 4 次合成, 每次前反射系数前进一个四分之一步

use bumpkin_core::{BitReader, BumpkinError, BumpkinResult};
use log::trace;

use super::residual::decode_excitation;
use super::state::DecoderState;
use super::synthesis::{interpolate_gaps, synthesize};
use super::tables::{
    BLOCK_LEN, FIRST_LAG_BASE, HISTORY_LEN, ORDER, REFLECTION_LOOKUP, REFLECTION_SUBTABLE_OFFSET,
    SCRATCH_GUARD, SCRATCH_LEN, SUBBLOCK_LEN, SUBBLOCKS,
};

/// 前 4 个反射系数索引的位宽
const WIDE_INDEX_BITS: u32 = 6;
const WIDE_INDEX_COUNT: usize = 4;
/// 后 8 个反射系数索引的位宽
const NARROW_INDEX_BITS: u32 = 5;

/// 合成分段: (起始采样, 12 采样组数)
const SYNTHESIS_PASSES: [(usize, usize); 4] = [(0, 1), (12, 1), (24, 1), (36, 33)];

impl DecoderState {
    /// 解码一块, 结果写入 `samples`
    pub(crate) fn decode_block(&mut self, br: &mut BitReader<'_>) -> BumpkinResult<()> {
        let (delta, vlc) = self.read_reflection_delta(br);

        // 暂存区在子块间复用, 半速率模式下未编码位置会被清零或插值覆盖
        let mut scratch = [0.0f32; SCRATCH_LEN];

        for sub in 0..SUBBLOCKS {
            let lag = br.read_bits(8) as usize;
            let pitch_gain = br.read_bits(4) as f32 * 2.0 / 30.0;
            let mut gain = self.gain_table[br.read_bits(6) as usize];

            if self.decimated {
                let phase_adjust = br.read_bits(1) as usize;
                let zero_gaps = br.read_flag();
                decode_excitation(br, vlc, &mut scratch, SCRATCH_GUARD + phase_adjust, 2);

                let gap_phase = SCRATCH_GUARD + 1 - phase_adjust;
                if zero_gaps {
                    for j in (0..SUBBLOCK_LEN).step_by(2) {
                        scratch[gap_phase + j] = 0.0;
                    }
                } else {
                    scratch[..SCRATCH_GUARD].fill(0.0);
                    scratch[SCRATCH_GUARD + SUBBLOCK_LEN..].fill(0.0);
                    interpolate_gaps(&mut scratch, gap_phase);
                    gain *= 0.5;
                }
            } else {
                decode_excitation(br, vlc, &mut scratch, SCRATCH_GUARD, 1);
            }

            let base = FIRST_LAG_BASE + sub * SUBBLOCK_LEN;
            let source = base.checked_sub(lag).ok_or_else(|| {
                BumpkinError::InvalidData(format!(
                    "长时预测延迟 {} 超出子块 {} 可用的历史范围 {}",
                    lag, sub, base,
                ))
            })?;

            let out = sub * SUBBLOCK_LEN;
            for j in 0..SUBBLOCK_LEN {
                self.samples[out + j] =
                    gain * scratch[SCRATCH_GUARD + j] + pitch_gain * self.delay_line[source + j];
            }
        }

        // 下一块的历史 = 当前块最后 324 个激励 (合成前); 延迟线尾部保持为零
        self.delay_line[..HISTORY_LEN].copy_from_slice(&self.samples[SUBBLOCK_LEN..]);

        for (start, groups) in SYNTHESIS_PASSES {
            for (k, d) in self.reflection.iter_mut().zip(delta.iter()) {
                *k += d;
            }
            synthesize(
                &self.reflection,
                &mut self.filter_history,
                &mut self.samples,
                start,
                groups,
            );
        }

        debug_assert_eq!(
            SYNTHESIS_PASSES[3].0 + SYNTHESIS_PASSES[3].1 * ORDER,
            BLOCK_LEN
        );
        trace!(
            "M10 块解码完成: vlc={}, 剩余 {} 位",
            vlc,
            br.bits_left()
        );
        Ok(())
    }

    /// 读取 12 个反射系数索引, 返回四分之一步增量与激励模式
    fn read_reflection_delta(&self, br: &mut BitReader<'_>) -> ([f32; ORDER], bool) {
        let mut delta = [0.0f32; ORDER];
        let mut vlc = false;

        for (i, d) in delta.iter_mut().enumerate() {
            let target = if i < WIDE_INDEX_COUNT {
                let index = br.read_bits(WIDE_INDEX_BITS);
                if i == 0 {
                    vlc = index < self.vlc_threshold;
                }
                REFLECTION_LOOKUP[index as usize]
            } else {
                let index = br.read_bits(NARROW_INDEX_BITS) as usize;
                REFLECTION_LOOKUP[index + REFLECTION_SUBTABLE_OFFSET]
            };
            *d = (target - self.reflection[i]) * 0.25;
        }

        (delta, vlc)
    }
}
