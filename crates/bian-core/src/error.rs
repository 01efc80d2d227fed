//! 统一错误类型定义.
//!
//! 所有 bian crate 共用的错误类型, 支持跨模块传播.

use thiserror::Error;

/// bian 框架统一错误类型
#[derive(Debug, Error)]
pub enum BianError {
    /// 内容探测失败: 主探测器与备用探测器都没有给出可用结果
    #[error("无法识别媒体内容格式")]
    UnrecognizedFormat,

    /// DRM 包装标识符语法错误 (缺少第二个 `+` 或模式未知)
    #[error("DRM 格式标识符无效: {0}")]
    MalformedDrmIdentifier(String),

    /// 标识符合法, 但没有对应的解封装器
    #[error("不支持的媒体格式: {0}")]
    UnsupportedFormat(String),

    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 无效数据 (损坏的头部等)
    #[error("无效数据: {0}")]
    InvalidData(String),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 已到达数据源末尾
    #[error("已到达数据源末尾")]
    Eof,
}

/// bian 框架统一 Result 类型
pub type BianResult<T> = Result<T, BianError>;
