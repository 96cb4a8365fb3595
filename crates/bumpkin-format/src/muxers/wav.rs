//! WAV (RIFF WAVE) 封装器.
//!
//! 将 PCM 音频数据写入标准 44 字节头部的 WAV 文件.
//!
//! 写入流程:
//! 1. `write_header()` - 写入 RIFF 和 fmt 块, 预留 data 块大小
//! 2. `write_frame()` / `write_samples()` - 追加 PCM 数据
//! 3. `write_trailer()` - 回填 RIFF 大小和 data 块大小

use bumpkin_codec::AudioFrame;
use bumpkin_core::{BumpkinError, BumpkinResult, PcmSpec};
use log::debug;

use crate::io::IoContext;

/// WAV 音频格式码: PCM 整数
const WAV_FORMAT_PCM: u16 = 0x0001;
/// 标准 PCM fmt 块大小
const FMT_CHUNK_SIZE: u32 = 16;
/// RIFF 大小字段的偏移
const RIFF_SIZE_OFFSET: u64 = 4;
/// data 块大小字段的偏移: 12 (RIFF) + 24 (fmt) + 4 (data 标签)
const DATA_SIZE_OFFSET: u64 = 40;
/// 头部总长度
pub const WAV_HEADER_LEN: usize = 44;

/// WAV 封装器
pub struct WavMuxer {
    /// 输出格式
    spec: PcmSpec,
    /// 已写入的数据字节数
    data_written: u64,
    /// 是否已写入头部
    header_written: bool,
}

impl WavMuxer {
    /// 创建 WAV 封装器
    pub fn new(spec: PcmSpec) -> Self {
        Self {
            spec,
            data_written: 0,
            header_written: false,
        }
    }

    /// 输出格式
    pub fn spec(&self) -> PcmSpec {
        self.spec
    }

    /// 已写入的 PCM 字节数
    pub fn data_written(&self) -> u64 {
        self.data_written
    }

    /// 写入文件头部, data 块大小先写 0
    pub fn write_header(&mut self, io: &mut IoContext) -> BumpkinResult<()> {
        let spec = self.spec;
        if spec.channels == 0 || spec.sample_rate == 0 {
            return Err(BumpkinError::InvalidArgument(format!(
                "WAV 参数无效: {}",
                spec
            )));
        }
        if !matches!(spec.bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(BumpkinError::Unsupported(format!(
                "WAV 不支持的 PCM 位深: {}",
                spec.bits_per_sample
            )));
        }

        // RIFF header
        io.write_tag(b"RIFF")?;
        io.write_u32_le(0)?; // 占位, trailer 中回填
        io.write_tag(b"WAVE")?;

        // fmt chunk
        io.write_tag(b"fmt ")?;
        io.write_u32_le(FMT_CHUNK_SIZE)?;
        io.write_u16_le(WAV_FORMAT_PCM)?;
        io.write_u16_le(spec.channels)?;
        io.write_u32_le(spec.sample_rate)?;
        io.write_u32_le(spec.byte_rate())?;
        io.write_u16_le(spec.block_align())?;
        io.write_u16_le(spec.bits_per_sample)?;

        // data chunk header
        io.write_tag(b"data")?;
        io.write_u32_le(0)?; // 占位, trailer 中回填

        self.data_written = 0;
        self.header_written = true;

        debug!("WAV 写入头部: {}", spec);
        Ok(())
    }

    /// 追加原始 PCM 字节 (小端交错)
    pub fn write_pcm(&mut self, io: &mut IoContext, data: &[u8]) -> BumpkinResult<()> {
        if !self.header_written {
            return Err(BumpkinError::Internal("WAV 头部尚未写入".into()));
        }
        io.write_all(data)?;
        self.data_written += data.len() as u64;
        Ok(())
    }

    /// 追加 16 位采样
    pub fn write_samples(&mut self, io: &mut IoContext, samples: &[i16]) -> BumpkinResult<()> {
        if self.spec.bits_per_sample != 16 {
            return Err(BumpkinError::InvalidArgument(format!(
                "采样为 16 位, 输出格式为 {} 位",
                self.spec.bits_per_sample
            )));
        }
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        self.write_pcm(io, &bytes)
    }

    /// 追加一个音频帧
    pub fn write_frame(&mut self, io: &mut IoContext, frame: &AudioFrame) -> BumpkinResult<()> {
        if frame.spec != self.spec {
            return Err(BumpkinError::InvalidArgument(format!(
                "音频帧格式 ({}) 与输出格式 ({}) 不一致",
                frame.spec, self.spec
            )));
        }
        self.write_samples(io, &frame.samples)
    }

    /// 回填大小字段并刷新输出
    pub fn write_trailer(&mut self, io: &mut IoContext) -> BumpkinResult<()> {
        if !io.is_seekable() {
            return Err(BumpkinError::Unsupported(
                "WAV 输出不支持 seek, 无法回填大小字段".into(),
            ));
        }

        let data_size = u32::try_from(self.data_written)
            .ok()
            .filter(|&size| size <= u32::MAX - 36)
            .ok_or_else(|| {
                BumpkinError::InvalidData(format!(
                    "WAV 数据过大: {} 字节",
                    self.data_written
                ))
            })?;
        let riff_size = 36 + data_size; // 整个文件大小 - 8

        io.seek(std::io::SeekFrom::Start(RIFF_SIZE_OFFSET))?;
        io.write_u32_le(riff_size)?;

        io.seek(std::io::SeekFrom::Start(DATA_SIZE_OFFSET))?;
        io.write_u32_le(data_size)?;

        io.seek(std::io::SeekFrom::End(0))?;
        io.flush()?;

        debug!(
            "WAV 写入尾部: riff_size={}, data_size={}",
            riff_size, data_size,
        );

        Ok(())
    }
}

/// 把一个音频帧封装为完整的 WAV 文件字节
pub fn encode_wav(frame: &AudioFrame) -> BumpkinResult<Vec<u8>> {
    let mut io = IoContext::memory_writer();
    let mut muxer = WavMuxer::new(frame.spec);
    muxer.write_header(&mut io)?;
    muxer.write_frame(&mut io, frame)?;
    muxer.write_trailer(&mut io)?;
    io.into_data()
}
