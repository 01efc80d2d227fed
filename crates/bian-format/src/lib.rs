//! # bian-format
//!
//! 媒体格式探测与解封装器分发.
//!
//! 调用方提供一个可随机访问的数据源 ([`DataSource`]) 以及可选的格式声明,
//! [`ExtractorFactory`] 负责探测、DRM 解包和分发, 返回绑定到该数据源的解封装器.

pub mod drm;
pub mod extractor;
pub mod extractors;
pub mod factory;
pub mod io;
pub mod mime;
pub mod registry;
pub mod sniff;
pub mod source;

pub use drm::DrmWrapper;
pub use extractor::{ExtractorFlags, ExtractorHandle, ExtractorInit, MediaExtractor};
pub use factory::{ExtractorFactory, extractor_mime};
pub use io::IoContext;
pub use registry::{ExtractorEntry, ExtractorPlugin, ExtractorRegistry};
pub use sniff::{ResolvedFormat, SniffOrigin, SniffPolicy, SniffResult, Sniffer, SnifferSet};
pub use source::{DataSource, IoSource, SourceHandle};
