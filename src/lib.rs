//! # Bian (辨)
//!
//! 纯 Rust 实现的媒体格式识别与解封装器分发框架.
//!
//! 给定一个可随机访问的字节数据源和可选的格式声明, 识别其容器格式,
//! 解开 DRM 包装标识, 并返回绑定到该数据源的解封装器.
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use bian::format::IoSource;
//!
//! let source = IoSource::open("input.mp4").unwrap().into_handle();
//! let extractor = bian::default_factory().create(source, None).unwrap();
//! println!("解封装器: {} 标志: {:?}", extractor.name(), extractor.flags());
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `bian-core` | 错误类型与元数据容器 |
//! | `bian-format` | 格式探测、DRM 解包与解封装器分发 |

/// 核心类型 (错误与元数据)
pub use bian_core as core;

/// 格式探测与解封装器分发
pub use bian_format as format;

pub mod logging;

use bian_format::ExtractorFactory;

/// 获取 Bian 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 创建使用内置注册表和默认仲裁策略的工厂
pub fn default_factory() -> ExtractorFactory {
    ExtractorFactory::new()
}
