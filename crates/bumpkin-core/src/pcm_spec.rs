//! PCM 流描述.
//!
//! 描述一段交错 PCM 数据的采样率、声道数与位深, 供 WAV 封装器写 fmt 块使用.

use std::fmt;

/// PCM 流描述
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PcmSpec {
    /// 采样率 (Hz)
    pub sample_rate: u32,
    /// 声道数
    pub channels: u16,
    /// 每个采样点的位数
    pub bits_per_sample: u16,
}

impl PcmSpec {
    /// 游戏语音的固定格式: 22050 Hz, 单声道, 16 位
    pub const M10_VOICE: Self = Self {
        sample_rate: 22050,
        channels: 1,
        bits_per_sample: 16,
    };

    /// 每个采样帧 (所有声道) 的字节数
    pub const fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    /// 每秒字节数
    pub const fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    /// 给定每声道采样数时的时长 (秒)
    pub fn duration_secs(&self, nb_samples: u64) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        nb_samples as f64 / f64::from(self.sample_rate)
    }
}

impl fmt::Display for PcmSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {} 声道, {} 位",
            self.sample_rate, self.channels, self.bits_per_sample
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_m10_语音格式() {
        let spec = PcmSpec::M10_VOICE;
        assert_eq!(spec.block_align(), 2);
        assert_eq!(spec.byte_rate(), 44100);
        assert_eq!(spec.duration_secs(22050), 1.0);
        assert_eq!(spec.to_string(), "22050 Hz, 1 声道, 16 位");
    }

    #[test]
    fn test_零采样率时长() {
        let spec = PcmSpec {
            sample_rate: 0,
            channels: 1,
            bits_per_sample: 16,
        };
        assert_eq!(spec.duration_secs(100), 0.0);
    }
}
