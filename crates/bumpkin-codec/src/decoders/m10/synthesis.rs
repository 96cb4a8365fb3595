//! 预测合成滤波.
//!
//! - 反射系数 → 直接型系数的递推变换
//! - 12 阶全极点合成滤波 (历史跨子块、跨块保持)
//! - 半速率激励的 FIR 插值
//!
//! 运算精度与原始码流编码器一致: 乘积在单精度下计算, 累加在双精度下进行.

use super::tables::{ORDER, SCRATCH_GUARD, SCRATCH_LEN, SUBBLOCK_LEN};

/// 插值 FIR 抽头 (对称, 中心两侧各 3 个)
const FIR_OUTER: f64 = 0.01803268;
const FIR_MIDDLE: f64 = -0.11459156;
const FIR_INNER: f64 = 0.59738597;

/// 由反射系数计算合成滤波器的直接型系数
///
/// 每次合成前重新计算, 因为反射系数在每个四分之一步都会变化.
pub(crate) fn reflection_to_direct(reflection: &[f32; ORDER]) -> [f32; ORDER] {
    let mut work = [0.0f32; 2 * ORDER];
    let mut direct = [0.0f32; ORDER];

    work[1..ORDER].copy_from_slice(&reflection[..ORDER - 1]);
    work[0] = 1.0;

    for i in 0..ORDER {
        let mut acc = f64::from(-work[ORDER - 1] * reflection[ORDER - 1]);

        for c in 0..ORDER - 1 {
            let w = work[ORDER - 2 - c];
            let k = reflection[ORDER - 2 - c];
            acc -= f64::from(w * k);
            work[ORDER - 1 - c] = acc as f32 * k + w;
        }

        work[0] = acc as f32;
        work[ORDER + i] = acc as f32;

        for j in 0..i {
            acc -= f64::from(work[ORDER - 1 + i - j] * direct[j]);
        }

        direct[i] = acc as f32;
    }

    direct
}

/// 对 `samples[start..start + groups * 12]` 原地执行全极点合成
///
/// 每组 12 个采样使用同一组直接型系数, 系数按循环方式与滤波历史对齐.
/// 结果同时写回采样缓冲区与 (逆序的) 滤波历史.
pub(crate) fn synthesize(
    reflection: &[f32; ORDER],
    history: &mut [f32; ORDER],
    samples: &mut [f32],
    start: usize,
    groups: usize,
) {
    debug_assert!(start + groups * ORDER <= samples.len());

    let coeffs = reflection_to_direct(reflection);

    for group in samples[start..start + groups * ORDER].chunks_exact_mut(ORDER) {
        for (k, sample) in group.iter_mut().enumerate() {
            let mut sum = 0.0f64;
            for (j, &h) in history.iter().enumerate() {
                sum += f64::from(h * coeffs[(j + k) % ORDER]);
            }

            let result = (f64::from(*sample) + sum) as f32;
            history[ORDER - 1 - k] = result;
            *sample = result;
        }
    }
}

/// 用对称 FIR 填补半速率激励中未编码的位置
///
/// `phase` 为第一个待填补位置 (5 或 6). 读取的两侧邻点都是已解码的位置,
/// 暂存区两端的保护区须事先清零.
pub(crate) fn interpolate_gaps(scratch: &mut [f32; SCRATCH_LEN], phase: usize) {
    debug_assert!(phase == SCRATCH_GUARD || phase == SCRATCH_GUARD + 1);

    for i in 0..SUBBLOCK_LEN / 2 {
        let centre = phase + 2 * i;
        let inner = f64::from(scratch[centre - 1] + scratch[centre + 1]);
        let middle = f64::from(scratch[centre - 3] + scratch[centre + 3]);
        let outer = f64::from(scratch[centre - 5] + scratch[centre + 5]);

        scratch[centre] = (middle * FIR_MIDDLE + outer * FIR_OUTER + inner * FIR_INNER) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_零反射系数得到零直接系数() {
        let direct = reflection_to_direct(&[0.0; ORDER]);
        assert!(direct.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_单个反射系数() {
        // 只有第一个反射系数非零时, 第一个直接系数等于其相反数
        let mut reflection = [0.0f32; ORDER];
        reflection[0] = 0.5;
        let direct = reflection_to_direct(&reflection);
        assert_eq!(direct[0], -0.5);
    }

    #[test]
    fn test_零系数合成为恒等变换() {
        let reflection = [0.0f32; ORDER];
        let mut history = [0.0f32; ORDER];
        let mut samples: Vec<f32> = (0..48).map(|i| i as f32 - 20.0).collect();
        let expected = samples.clone();

        synthesize(&reflection, &mut history, &mut samples, 0, 4);
        assert_eq!(samples, expected);
        // 历史为最后一组的逆序
        let mut tail: Vec<f32> = expected[36..48].to_vec();
        tail.reverse();
        assert_eq!(history.to_vec(), tail);
    }

    #[test]
    fn test_合成只修改指定范围() {
        let mut reflection = [0.0f32; ORDER];
        reflection[0] = 0.3;
        reflection[ORDER - 1] = -0.2;
        let mut history = [1.0f32; ORDER];
        let mut samples = vec![0.5f32; 60];

        synthesize(&reflection, &mut history, &mut samples, 12, 2);
        assert!(samples[..12].iter().all(|&v| v == 0.5));
        assert!(samples[36..].iter().all(|&v| v == 0.5));
        assert!(samples[12..36].iter().any(|&v| v != 0.5));
        assert!(samples.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_插值常量信号() {
        // 常量信号经插值后近似保持不变 (抽头和约为 0.5, 两侧对称相加)
        let mut scratch = [0.0f32; SCRATCH_LEN];
        for i in (SCRATCH_GUARD..SCRATCH_GUARD + SUBBLOCK_LEN).step_by(2) {
            scratch[i] = 1.0;
        }
        interpolate_gaps(&mut scratch, SCRATCH_GUARD + 1);

        let centre = SCRATCH_GUARD + 1 + 2 * 20;
        assert!((scratch[centre] - 1.0016542).abs() < 1e-5);
        // 已解码的位置保持不变
        assert_eq!(scratch[SCRATCH_GUARD + 40], 1.0);
    }
}
