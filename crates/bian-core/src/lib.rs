//! # bian-core
//!
//! 辨 (bian) 媒体格式识别框架核心库, 提供统一错误类型和通用元数据容器.
//!
//! 其余 crate 均依赖本 crate, 不包含任何格式相关逻辑.

pub mod error;
pub mod metadata;

// 重导出常用类型
pub use error::{BianError, BianResult};
pub use metadata::{MetaData, MetaValue};
