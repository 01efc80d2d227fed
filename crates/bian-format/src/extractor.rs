//! 解封装器 (Extractor) 能力接口.
//!
//! 分发核心只依赖这里定义的最小接口: 元数据、能力标志和 DRM 标志.
//! 具体格式的解封装器可以提供更多功能, 但分发核心从不调用.

use std::sync::Arc;

use bian_core::{MetaData, metadata};
use bitflags::bitflags;

use crate::source::SourceHandle;

bitflags! {
    /// 解封装器能力标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExtractorFlags: u32 {
        /// 可以向后 seek
        const CAN_SEEK_BACKWARD = 1 << 0;
        /// 可以向前 seek
        const CAN_SEEK_FORWARD  = 1 << 1;
        /// 可以暂停
        const CAN_PAUSE         = 1 << 2;
        /// 支持 seek
        const CAN_SEEK          = 1 << 3;
    }
}

impl Default for ExtractorFlags {
    fn default() -> Self {
        Self::CAN_SEEK_BACKWARD | Self::CAN_SEEK_FORWARD | Self::CAN_PAUSE | Self::CAN_SEEK
    }
}

/// 共享的解封装器句柄
pub type ExtractorHandle = Arc<dyn MediaExtractor>;

/// 构造解封装器时传入的参数
///
/// DRM 标志在构造时确定, 构造后不可修改.
#[derive(Debug, Clone, Default)]
pub struct ExtractorInit {
    /// 内容是否受容器级 DRM 保护
    pub drm: bool,
    /// 探测阶段得到的附带信息
    pub sniff_meta: Option<MetaData>,
}

impl ExtractorInit {
    /// 创建不带探测信息的参数
    pub fn with_drm(drm: bool) -> Self {
        Self {
            drm,
            sniff_meta: None,
        }
    }
}

/// 解封装器 trait
pub trait MediaExtractor: Send + Sync {
    /// 解封装器名称
    fn name(&self) -> &str;

    /// 绑定的数据源
    fn source(&self) -> &SourceHandle;

    /// 容器级元数据, 至少返回空容器
    fn metadata(&self) -> MetaData {
        MetaData::new()
    }

    /// 能力标志
    fn flags(&self) -> ExtractorFlags {
        ExtractorFlags::default()
    }

    /// 构造时外部设置的 DRM 标志
    fn drm_flag(&self) -> bool;
}

/// 覆盖内层解封装器 DRM 标志的包装
///
/// 用于外部插件构造的解封装器: 插件可能忽略 [`ExtractorInit::drm`],
/// 分发核心计算出的 DRM 标志仍以这里为准.
pub(crate) struct DrmTagged {
    inner: Box<dyn MediaExtractor>,
    drm: bool,
}

impl DrmTagged {
    /// 标志已一致时原样返回, 否则包装
    pub(crate) fn apply(inner: Box<dyn MediaExtractor>, drm: bool) -> Box<dyn MediaExtractor> {
        if inner.drm_flag() == drm {
            inner
        } else {
            Box::new(Self { inner, drm })
        }
    }
}

impl MediaExtractor for DrmTagged {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn source(&self) -> &SourceHandle {
        self.inner.source()
    }

    fn metadata(&self) -> MetaData {
        self.inner.metadata()
    }

    fn flags(&self) -> ExtractorFlags {
        self.inner.flags()
    }

    fn drm_flag(&self) -> bool {
        self.drm
    }
}

/// 构建包含 MIME 类型的基础元数据
pub(crate) fn container_metadata(mime: &str) -> MetaData {
    let mut meta = MetaData::new();
    meta.set_str(metadata::KEY_MIME_TYPE, mime);
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_默认能力标志() {
        let flags = ExtractorFlags::default();
        assert!(flags.contains(ExtractorFlags::CAN_SEEK_BACKWARD));
        assert!(flags.contains(ExtractorFlags::CAN_SEEK_FORWARD));
        assert!(flags.contains(ExtractorFlags::CAN_PAUSE));
        assert!(flags.contains(ExtractorFlags::CAN_SEEK));
        assert_eq!(flags.bits(), 0b1111);
    }

    struct Plain(SourceHandle);

    impl MediaExtractor for Plain {
        fn name(&self) -> &str {
            "plain"
        }

        fn source(&self) -> &SourceHandle {
            &self.0
        }

        fn metadata(&self) -> MetaData {
            container_metadata("audio/x-plain")
        }

        fn flags(&self) -> ExtractorFlags {
            ExtractorFlags::CAN_PAUSE
        }

        fn drm_flag(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_drm_包装只覆盖标志() {
        let source = crate::source::IoSource::from_memory(Vec::new()).into_handle();
        let tagged = DrmTagged::apply(Box::new(Plain(Arc::clone(&source))), true);
        assert!(tagged.drm_flag());
        assert_eq!(tagged.name(), "plain");
        assert_eq!(tagged.flags(), ExtractorFlags::CAN_PAUSE);
        assert_eq!(
            tagged.metadata().get_str(metadata::KEY_MIME_TYPE),
            Some("audio/x-plain")
        );
        assert!(Arc::ptr_eq(tagged.source(), &source));

        let untouched = DrmTagged::apply(Box::new(Plain(source)), false);
        assert!(!untouched.drm_flag());
    }
}
