//! BOX 资源包读取器.
//!
//! BOX 文件结构:
//! ```text
//! "BOX" + 5 字节保留
//! 条目序列 (直到文件末尾):
//!   name       256 字节, 以 NUL 结尾 (读取后转为小写)
//!   path       256 字节, 以 NUL 结尾
//!   timestamp  8 x u16 小端 (年, 月, 星期, 日, 时, 分, 秒, 毫秒)
//!   size       i32 小端
//!   data       size 字节
//! ```
//!
//! 名称按 Windows-1252 解码.

use std::fmt;
use std::path::Path;

use bumpkin_core::{BumpkinError, BumpkinResult};
use bytes::Bytes;
use encoding_rs::WINDOWS_1252;
use log::debug;

use crate::asset::{AssetKind, file_stem};
use crate::io::IoContext;

/// 文件签名
const SIGNATURE: &[u8; 3] = b"BOX";
/// 签名之后的保留字节数
const RESERVED_LEN: usize = 5;
/// 名称与路径字段的长度
const NAME_FIELD_LEN: usize = 256;

/// 条目时间戳 (Windows `SYSTEMTIME` 布局)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoxTimestamp {
    pub year: u16,
    pub month: u16,
    pub day_of_week: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
    pub millisecond: u16,
}

impl BoxTimestamp {
    fn read(io: &mut IoContext) -> BumpkinResult<Self> {
        Ok(Self {
            year: io.read_u16_le()?,
            month: io.read_u16_le()?,
            day_of_week: io.read_u16_le()?,
            day: io.read_u16_le()?,
            hour: io.read_u16_le()?,
            minute: io.read_u16_le()?,
            second: io.read_u16_le()?,
            millisecond: io.read_u16_le()?,
        })
    }
}

impl fmt::Display for BoxTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.millisecond
        )
    }
}

/// 资源包中的一个条目
#[derive(Debug, Clone)]
pub struct BoxEntry {
    /// 小写文件名
    pub name: String,
    /// 打包时记录的原始路径
    pub path: String,
    /// 打包时记录的修改时间
    pub timestamp: BoxTimestamp,
    /// 条目内容
    pub data: Bytes,
}

impl BoxEntry {
    /// 按扩展名判断的资源类型
    pub fn kind(&self) -> AssetKind {
        AssetKind::from_filename(&self.name)
    }

    /// 内容字节数
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 去掉扩展名的文件名
    pub fn stem(&self) -> &str {
        file_stem(&self.name)
    }
}

/// 已解析的 BOX 资源包
#[derive(Debug, Clone)]
pub struct BoxArchive {
    /// 资源包文件名
    name: String,
    /// 按文件中的顺序排列的条目
    entries: Vec<BoxEntry>,
}

impl BoxArchive {
    /// 打开并解析资源包文件
    pub fn open(path: impl AsRef<Path>) -> BumpkinResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut io = IoContext::open_read(path)?;
        Self::read(name, &mut io)
    }

    /// 从内存数据解析 (用于嵌套资源包)
    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> BumpkinResult<Self> {
        let mut io = IoContext::from_memory(data.to_vec());
        Self::read(name, &mut io)
    }

    /// 从 I/O 上下文的当前位置解析到末尾
    pub fn read(name: impl Into<String>, io: &mut IoContext) -> BumpkinResult<Self> {
        let name = name.into();

        let signature = io.read_array::<3>().map_err(header_error)?;
        if &signature != SIGNATURE {
            return Err(BumpkinError::Format(format!(
                "{}: 缺少 BOX 签名",
                name
            )));
        }
        io.skip(RESERVED_LEN).map_err(header_error)?;

        let mut entries = Vec::new();
        while !io.at_eof()? {
            let entry = Self::read_entry(io)?;
            debug!(
                "BOX 条目: {} ({} 字节, 路径 {:?})",
                entry.name,
                entry.size(),
                entry.path
            );
            entries.push(entry);
        }

        debug!("BOX 资源包 {}: {} 个条目", name, entries.len());
        Ok(Self { name, entries })
    }

    fn read_entry(io: &mut IoContext) -> BumpkinResult<BoxEntry> {
        let name = decode_field(&io.read_array::<NAME_FIELD_LEN>()?).to_lowercase();
        let path = decode_field(&io.read_array::<NAME_FIELD_LEN>()?);
        let timestamp = BoxTimestamp::read(io)?;

        let size = io.read_i32_le()?;
        let size = usize::try_from(size).map_err(|_| {
            BumpkinError::InvalidData(format!("条目 {} 的大小为负: {}", name, size))
        })?;

        // 先检查剩余长度, 损坏的大小字段不应触发大块分配
        if let Some(total) = io.size() {
            let remaining = total.saturating_sub(io.position()?);
            if size as u64 > remaining {
                debug!(
                    "条目 {} 声明 {} 字节, 剩余仅 {} 字节",
                    name, size, remaining
                );
                return Err(BumpkinError::Eof);
            }
        }

        let data = Bytes::from(io.read_bytes(size)?);
        Ok(BoxEntry {
            name,
            path,
            timestamp,
            data,
        })
    }

    /// 资源包文件名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 去掉扩展名的资源包文件名, 用作输出目录名
    pub fn stem(&self) -> &str {
        file_stem(&self.name)
    }

    /// 全部条目
    pub fn entries(&self) -> &[BoxEntry] {
        &self.entries
    }

    /// 条目数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否没有条目
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按名称查找条目 (不区分大小写)
    pub fn find(&self, name: &str) -> Option<&BoxEntry> {
        let name = name.to_lowercase();
        self.entries.iter().find(|e| e.name == name)
    }

    /// 取出全部条目
    pub fn into_entries(self) -> Vec<BoxEntry> {
        self.entries
    }
}

/// 截断在第一个 NUL 处并按 Windows-1252 解码
fn decode_field(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(&raw[..end]);
    text.into_owned()
}

fn header_error(err: BumpkinError) -> BumpkinError {
    match err {
        BumpkinError::Eof => BumpkinError::Format("BOX 头部不完整".into()),
        other => other,
    }
}
