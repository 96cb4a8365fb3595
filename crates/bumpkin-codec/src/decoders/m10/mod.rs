//! M10 语音解码器 (Beasts & Bumpkins).
//!
//! 12 阶线性预测声码器, 22050 Hz 单声道, 输出 16 位 PCM.
//!
//! # 解码流程
//! 1. 解析 PT 头部 (码流偏移, 总采样数)
//! 2. 从码流开头读取初始化字段 (半速率标志, VLC 阈值, 增益步长表)
//! 3. 逐块解码: 反射系数增量, 4 个子块的长时预测 + 激励, 合成滤波
//! 4. 每个浮点采样经偏置舍入与饱和后输出, 恰好在总采样数处停止

mod block;
mod emitter;
mod header;
mod residual;
mod state;
mod synthesis;
mod tables;

use bumpkin_core::{BitReader, BumpkinResult, PcmSpec};
use log::{debug, warn};

use crate::frame::AudioFrame;

pub use header::PtHeader;
pub use state::DecoderState;

use emitter::round_to_pcm;
use tables::BLOCK_LEN;

/// 整体解码时每次拉取的采样数
const DECODE_CHUNK: usize = 4096;

/// M10 解码器
///
/// 借用整个文件内容, 按需逐块解码. 每个实例独立持有状态,
/// 不同资源可以在不同线程上并行解码.
pub struct M10Decoder<'a> {
    header: PtHeader,
    reader: BitReader<'a>,
    state: Box<DecoderState>,
    /// 当前块中下一个待输出采样的位置, 等于块长时需要解码新块
    buffer_pos: usize,
    /// 已输出的采样数
    produced: u32,
    /// 已解码的块数
    blocks: u64,
}

impl<'a> M10Decoder<'a> {
    /// 解析头部并初始化解码状态
    pub fn open(data: &'a [u8]) -> BumpkinResult<Self> {
        let header = PtHeader::parse(data)?;
        if header.total_samples == 0 {
            warn!("M10 头部没有采样数记录或采样数为 0, 输出为空");
        }

        let offset = header.data_offset as usize;
        let payload = match data.get(offset..) {
            Some(payload) => payload,
            None => {
                warn!(
                    "M10 码流偏移 {} 超出文件长度 {}, 按全零码流解码",
                    offset,
                    data.len()
                );
                &[]
            }
        };

        let mut reader = BitReader::new(payload);
        let state = Box::new(DecoderState::init(&mut reader));

        debug!(
            "打开 M10 解码器: 采样数={}, 码流 {} 字节, 半速率={}",
            header.total_samples,
            payload.len(),
            state.is_decimated(),
        );

        Ok(Self {
            header,
            reader,
            state,
            buffer_pos: BLOCK_LEN,
            produced: 0,
            blocks: 0,
        })
    }

    /// 文件头部
    pub fn header(&self) -> &PtHeader {
        &self.header
    }

    /// 输出格式
    pub fn spec(&self) -> PcmSpec {
        PcmSpec::M10_VOICE
    }

    /// 总采样数
    pub fn total_samples(&self) -> u32 {
        self.header.total_samples
    }

    /// 尚未输出的采样数
    pub fn samples_remaining(&self) -> u32 {
        self.header.total_samples - self.produced
    }

    /// 是否已输出全部采样
    pub fn is_finished(&self) -> bool {
        self.produced >= self.header.total_samples
    }

    /// 已解码的块数
    pub fn blocks_decoded(&self) -> u64 {
        self.blocks
    }

    /// 当前解码状态
    pub fn state(&self) -> &DecoderState {
        &self.state
    }

    /// 解码采样到 `out`, 返回写入的采样数
    ///
    /// 返回 0 表示已输出全部采样. 块解码出错时, 出错前已写入的采样仍然有效,
    /// 但解码器不能再继续使用.
    pub fn read_samples(&mut self, out: &mut [i16]) -> BumpkinResult<usize> {
        let want = out.len().min(self.samples_remaining() as usize);

        for slot in &mut out[..want] {
            if self.buffer_pos >= BLOCK_LEN {
                self.state.decode_block(&mut self.reader)?;
                self.buffer_pos = 0;
                self.blocks += 1;
            }
            *slot = round_to_pcm(self.state.samples[self.buffer_pos]);
            self.buffer_pos += 1;
            self.produced += 1;
        }

        Ok(want)
    }

    /// 解码剩余的全部采样
    pub fn decode_all(mut self) -> BumpkinResult<AudioFrame> {
        let remaining = self.samples_remaining() as usize;
        // 采样数来自文件头部, 预分配量设固定上限
        let mut samples = Vec::with_capacity(remaining.min(DECODE_CHUNK * 64));
        let mut chunk = [0i16; DECODE_CHUNK];

        loop {
            let n = self.read_samples(&mut chunk)?;
            if n == 0 {
                break;
            }
            samples.extend_from_slice(&chunk[..n]);
        }

        if self.reader.padding_bits() > 0 {
            debug!(
                "M10 码流提前耗尽, 共补零 {} 位",
                self.reader.padding_bits()
            );
        }
        debug!("M10 解码完成: {} 个采样, {} 块", samples.len(), self.blocks);

        Ok(AudioFrame::new(samples, PcmSpec::M10_VOICE))
    }
}

/// 解码一个完整的 M10 文件
pub fn decode(data: &[u8]) -> BumpkinResult<AudioFrame> {
    M10Decoder::open(data)?.decode_all()
}
