//! I/O 抽象层.
//!
//! 为资源包读取器和 WAV 封装器提供统一的读写接口,
//! 支持文件与内存缓冲区两种后端.

use std::io::{self, Read, Seek, Write};
use std::path::Path;

use bumpkin_core::{BumpkinError, BumpkinResult};

/// I/O 上下文
///
/// 封装底层 I/O 操作, 读取方向带缓冲.
pub struct IoContext {
    /// 内部 I/O 实现
    inner: Box<dyn IoBackend>,
    /// 读缓冲区
    buffer: Vec<u8>,
    /// 缓冲区中的有效数据长度
    buf_len: usize,
    /// 缓冲区当前读取位置
    buf_pos: usize,
}

/// I/O 后端 trait
///
/// 实现此 trait 以支持不同的 I/O 来源.
pub trait IoBackend: Send {
    /// 读取数据到缓冲区
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    /// 全部写入
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;
    /// 把已写入的数据交给底层存储
    fn flush(&mut self) -> io::Result<()>;
    /// 定位 (seek)
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64>;
    /// 获取当前位置
    fn position(&mut self) -> io::Result<u64>;
    /// 获取总大小 (如果可知)
    fn size(&self) -> Option<u64>;
    /// 是否支持 seek
    fn is_seekable(&self) -> bool;
    /// 取出内存中的全部数据, 非内存后端返回 `None`
    fn take_data(&mut self) -> Option<Vec<u8>> {
        None
    }
}

/// 默认缓冲区大小 (32 KB)
const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

impl IoContext {
    /// 从 I/O 后端创建上下文
    pub fn new(backend: Box<dyn IoBackend>) -> Self {
        Self {
            inner: backend,
            buffer: vec![0u8; DEFAULT_BUFFER_SIZE],
            buf_len: 0,
            buf_pos: 0,
        }
    }

    /// 从文件路径打开 (只读)
    pub fn open_read(path: impl AsRef<Path>) -> BumpkinResult<Self> {
        let file = std::fs::File::open(path)?;
        Ok(Self::new(Box::new(FileBackend::new(file))))
    }

    /// 从文件路径打开 (写入, 已存在时截断)
    pub fn open_write(path: impl AsRef<Path>) -> BumpkinResult<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(FileBackend::new(file))))
    }

    /// 读取内存中的数据
    pub fn from_memory(data: Vec<u8>) -> Self {
        Self::new(Box::new(MemoryBackend::from_data(data)))
    }

    /// 写入到内存缓冲区
    pub fn memory_writer() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    // ========================
    // 读取方法
    // ========================

    /// 读取指定字节数
    pub fn read_exact(&mut self, buf: &mut [u8]) -> BumpkinResult<()> {
        let mut total_read = 0;
        while total_read < buf.len() {
            let buffered = self.buf_len - self.buf_pos;
            if buffered > 0 {
                let to_copy = buffered.min(buf.len() - total_read);
                buf[total_read..total_read + to_copy]
                    .copy_from_slice(&self.buffer[self.buf_pos..self.buf_pos + to_copy]);
                self.buf_pos += to_copy;
                total_read += to_copy;
            } else if !self.fill_buffer()? {
                return Err(BumpkinError::Eof);
            }
        }
        Ok(())
    }

    /// 读取 1 个字节
    pub fn read_u8(&mut self) -> BumpkinResult<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// 读取 u16 小端
    pub fn read_u16_le(&mut self) -> BumpkinResult<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// 读取 u32 小端
    pub fn read_u32_le(&mut self) -> BumpkinResult<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// 读取 i32 小端
    pub fn read_i32_le(&mut self) -> BumpkinResult<i32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    /// 读取固定长度的字节数组
    pub fn read_array<const N: usize>(&mut self) -> BumpkinResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// 读取指定数量的字节
    pub fn read_bytes(&mut self, count: usize) -> BumpkinResult<Vec<u8>> {
        let mut buf = vec![0u8; count];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// 跳过指定字节数
    pub fn skip(&mut self, count: usize) -> BumpkinResult<()> {
        // 先尝试消耗缓冲区中的数据
        let buffered = self.buf_len - self.buf_pos;
        if count <= buffered {
            self.buf_pos += count;
            return Ok(());
        }

        let mut left = count - buffered;
        self.buf_pos = self.buf_len;

        // seek 可以越过末尾, 这里逐块读取以便在数据不足时报告 Eof
        while left > 0 {
            if !self.fill_buffer()? {
                return Err(BumpkinError::Eof);
            }
            let consumed = left.min(self.buf_len);
            self.buf_pos = consumed;
            left -= consumed;
        }
        Ok(())
    }

    /// 是否已没有可读数据
    pub fn at_eof(&mut self) -> BumpkinResult<bool> {
        if self.buf_pos < self.buf_len {
            return Ok(false);
        }
        Ok(!self.fill_buffer()?)
    }

    /// 重新填充读缓冲区, 返回是否读到了数据
    fn fill_buffer(&mut self) -> BumpkinResult<bool> {
        self.buf_pos = 0;
        self.buf_len = self.inner.read(&mut self.buffer)?;
        Ok(self.buf_len > 0)
    }

    // ========================
    // 写入方法
    // ========================

    /// 写入全部数据
    pub fn write_all(&mut self, buf: &[u8]) -> BumpkinResult<()> {
        self.inner.write_all(buf)?;
        Ok(())
    }

    /// 写入 u16 小端
    pub fn write_u16_le(&mut self, v: u16) -> BumpkinResult<()> {
        self.write_all(&v.to_le_bytes())
    }

    /// 写入 u32 小端
    pub fn write_u32_le(&mut self, v: u32) -> BumpkinResult<()> {
        self.write_all(&v.to_le_bytes())
    }

    /// 写入 4 字节标签 (FourCC)
    pub fn write_tag(&mut self, tag: &[u8; 4]) -> BumpkinResult<()> {
        self.write_all(tag)
    }

    /// 刷新写入
    pub fn flush(&mut self) -> BumpkinResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    // ========================
    // 定位方法
    // ========================

    /// 定位 (seek)
    ///
    /// 注意: seek 会清空读缓冲区.
    pub fn seek(&mut self, pos: io::SeekFrom) -> BumpkinResult<u64> {
        self.buf_pos = 0;
        self.buf_len = 0;
        Ok(self.inner.seek(pos)?)
    }

    /// 获取当前位置
    ///
    /// 考虑读缓冲区中尚未消耗的数据量.
    pub fn position(&mut self) -> BumpkinResult<u64> {
        let raw_pos = self.inner.position()?;
        let buffered = (self.buf_len - self.buf_pos) as u64;
        Ok(raw_pos - buffered)
    }

    /// 是否支持随机访问
    pub fn is_seekable(&self) -> bool {
        self.inner.is_seekable()
    }

    /// 获取总大小
    pub fn size(&self) -> Option<u64> {
        self.inner.size()
    }

    /// 取出内存后端中的全部数据
    pub fn into_data(mut self) -> BumpkinResult<Vec<u8>> {
        self.inner
            .take_data()
            .ok_or_else(|| BumpkinError::Unsupported("只有内存后端可以取出数据".into()))
    }
}

/// 文件 I/O 后端
///
/// 写入经过 `BufWriter`, 读取与定位前先刷新.
struct FileBackend {
    file: io::BufWriter<std::fs::File>,
    size: Option<u64>,
}

impl FileBackend {
    fn new(file: std::fs::File) -> Self {
        let size = file.metadata().ok().map(|m| m.len());
        Self {
            file: io::BufWriter::new(file),
            size,
        }
    }
}

impl IoBackend for FileBackend {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.flush()?;
        self.file.get_mut().read(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }

    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }

    fn position(&mut self) -> io::Result<u64> {
        self.file.stream_position()
    }

    fn size(&self) -> Option<u64> {
        self.size
    }

    fn is_seekable(&self) -> bool {
        true
    }
}

/// 内存缓冲区 I/O 后端
///
/// 用于测试、嵌套资源包和内存中转换.
pub struct MemoryBackend {
    /// 数据缓冲区
    data: Vec<u8>,
    /// 当前位置
    pos: usize,
}

impl MemoryBackend {
    /// 从已有数据创建 (用于读取)
    pub fn from_data(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    /// 创建空缓冲区 (用于写入)
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            pos: 0,
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl IoBackend for MemoryBackend {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.data.len().saturating_sub(self.pos);
        let to_read = buf.len().min(available);
        if to_read == 0 {
            return Ok(0);
        }
        buf[..to_read].copy_from_slice(&self.data[self.pos..self.pos + to_read]);
        self.pos += to_read;
        Ok(to_read)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.pos > self.data.len() {
            self.data.resize(self.pos, 0);
        }
        // 覆盖已有数据, 超出部分追加
        let overlap = (self.data.len() - self.pos).min(buf.len());
        self.data[self.pos..self.pos + overlap].copy_from_slice(&buf[..overlap]);
        self.data.extend_from_slice(&buf[overlap..]);
        self.pos += buf.len();
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let new_pos = match pos {
            io::SeekFrom::Start(offset) => offset as i64,
            io::SeekFrom::End(offset) => self.data.len() as i64 + offset,
            io::SeekFrom::Current(offset) => self.pos as i64 + offset,
        };
        if new_pos < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek 位置不能为负",
            ));
        }
        self.pos = new_pos as usize;
        Ok(self.pos as u64)
    }

    fn position(&mut self) -> io::Result<u64> {
        Ok(self.pos as u64)
    }

    fn size(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }

    fn is_seekable(&self) -> bool {
        true
    }

    fn take_data(&mut self) -> Option<Vec<u8>> {
        self.pos = 0;
        Some(std::mem::take(&mut self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_内存读取() {
        let mut io = IoContext::from_memory(vec![0x01, 0x02, 0x03, 0x04, 0xFF, 0xFF, 0xFF, 0xFF, 9]);
        assert_eq!(io.read_u16_le().unwrap(), 0x0201);
        assert_eq!(io.read_array::<2>().unwrap(), [0x03, 0x04]);
        assert_eq!(io.read_i32_le().unwrap(), -1);
        assert_eq!(io.position().unwrap(), 8);
        assert!(!io.at_eof().unwrap());
        assert_eq!(io.read_u8().unwrap(), 9);
        assert!(io.at_eof().unwrap());
        assert!(matches!(io.read_u8(), Err(BumpkinError::Eof)));
    }

    #[test]
    fn test_跳过() {
        let mut io = IoContext::from_memory((0..=255u8).collect());
        io.skip(10).unwrap();
        assert_eq!(io.read_u8().unwrap(), 10);
        io.skip(200).unwrap();
        assert_eq!(io.read_u8().unwrap(), 211);
        assert!(matches!(io.skip(100), Err(BumpkinError::Eof)));
    }

    #[test]
    fn test_跳过超过缓冲区() {
        let data: Vec<u8> = (0..DEFAULT_BUFFER_SIZE * 3).map(|i| (i % 251) as u8).collect();
        let mut io = IoContext::from_memory(data);
        io.read_u8().unwrap();
        let target = DEFAULT_BUFFER_SIZE * 2 + 17;
        io.skip(target - 1).unwrap();
        assert_eq!(io.position().unwrap(), target as u64);
        assert_eq!(io.read_u8().unwrap(), (target % 251) as u8);
    }

    #[test]
    fn test_内存写入与回填() {
        let mut io = IoContext::memory_writer();
        io.write_tag(b"RIFF").unwrap();
        io.write_u32_le(0).unwrap();
        io.write_u16_le(0xBEEF).unwrap();
        io.seek(io::SeekFrom::Start(4)).unwrap();
        io.write_u32_le(0x1234_5678).unwrap();

        let data = io.into_data().unwrap();
        assert_eq!(data, b"RIFF\x78\x56\x34\x12\xEF\xBE");
    }

    #[test]
    fn test_文件读写() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("io_test.bin");

        let mut w = IoContext::open_write(&path).unwrap();
        w.write_all(b"BOX").unwrap();
        w.write_u32_le(7).unwrap();
        w.seek(io::SeekFrom::Start(0)).unwrap();
        w.write_all(b"box").unwrap();
        w.flush().unwrap();
        drop(w);

        let mut r = IoContext::open_read(&path).unwrap();
        assert_eq!(r.size(), Some(7));
        assert_eq!(&r.read_array::<3>().unwrap(), b"box");
        assert_eq!(r.read_u32_le().unwrap(), 7);
        assert!(r.into_data().is_err());
    }
}
