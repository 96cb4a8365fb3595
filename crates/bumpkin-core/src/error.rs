//! 统一错误类型定义.
//!
//! 所有 bumpkin crate 共用的错误类型, 支持跨模块传播.

use thiserror::Error;

/// bumpkin 统一错误类型
#[derive(Debug, Error)]
pub enum BumpkinError {
    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 不支持的操作
    #[error("不支持的操作: {0}")]
    Unsupported(String),

    /// 文件格式错误 (签名不匹配、头部越界等)
    #[error("格式错误: {0}")]
    Format(String),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 已到达数据末尾
    #[error("已到达数据末尾")]
    Eof,

    /// 无效数据 (损坏的码流等)
    #[error("无效数据: {0}")]
    InvalidData(String),

    /// 内部错误 (不应发生)
    #[error("内部错误: {0}")]
    Internal(String),
}

/// bumpkin 统一 Result 类型
pub type BumpkinResult<T> = Result<T, BumpkinError>;
