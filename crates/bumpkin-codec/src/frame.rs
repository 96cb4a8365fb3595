//! 解码后的音频数据.

use bumpkin_core::PcmSpec;

/// 音频帧
///
/// 一个资源解码后的全部交错 PCM 采样.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    /// 交错的 16 位有符号采样
    pub samples: Vec<i16>,
    /// 流格式
    pub spec: PcmSpec,
}

impl AudioFrame {
    /// 由采样与流格式创建音频帧
    pub fn new(samples: Vec<i16>, spec: PcmSpec) -> Self {
        Self { samples, spec }
    }

    /// 每声道采样数
    pub fn nb_samples(&self) -> usize {
        self.samples.len() / usize::from(self.spec.channels.max(1))
    }

    /// 时长 (秒)
    pub fn duration_secs(&self) -> f64 {
        self.spec.duration_secs(self.nb_samples() as u64)
    }

    /// PCM 数据的字节数
    pub fn byte_len(&self) -> usize {
        self.samples.len() * 2
    }

    /// 按小端序展开为字节
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}
