//! WVM (Widevine 前向锁定流) 解封装器.
//!
//! 该格式自带加密管理, 注册时标记为 DRM 豁免. 没有内置探测器.

use bian_core::{BianResult, MetaData};

use crate::extractor::{ExtractorInit, MediaExtractor, container_metadata};
use crate::mime;
use crate::source::SourceHandle;

/// WVM 解封装器
pub struct WvmExtractor {
    source: SourceHandle,
    drm: bool,
}

impl WvmExtractor {
    /// 创建 WVM 解封装器实例 (工厂函数)
    pub fn create(
        source: SourceHandle,
        init: &ExtractorInit,
    ) -> BianResult<Box<dyn MediaExtractor>> {
        Ok(Box::new(Self {
            source,
            drm: init.drm,
        }))
    }
}

impl MediaExtractor for WvmExtractor {
    fn name(&self) -> &str {
        "wvm"
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn metadata(&self) -> MetaData {
        container_metadata(mime::CONTAINER_WVM)
    }

    fn drm_flag(&self) -> bool {
        self.drm
    }
}
