//! 基于基本流 (ES) 的 DRM 解封装器.
//!
//! 处理 `drm+es_based+<hint>` 标识的内容. `hint` 不做校验,
//! 原样作为元数据中的 MIME 类型. 外部 DRM 标志不适用于此类内容.

use bian_core::{MetaData, metadata};

use crate::extractor::MediaExtractor;
use crate::source::SourceHandle;

/// DRM 解封装器
pub struct DrmExtractor {
    source: SourceHandle,
    hint: String,
}

impl DrmExtractor {
    /// 创建 DRM 解封装器, `hint` 为内层格式提示
    pub fn new(source: SourceHandle, hint: impl Into<String>) -> Self {
        Self {
            source,
            hint: hint.into(),
        }
    }

    /// 内层格式提示
    pub fn hint(&self) -> &str {
        &self.hint
    }
}

impl MediaExtractor for DrmExtractor {
    fn name(&self) -> &str {
        "drm"
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn metadata(&self) -> MetaData {
        let mut meta = MetaData::new();
        if !self.hint.is_empty() {
            meta.set_str(metadata::KEY_MIME_TYPE, &self.hint);
        }
        meta.set_i32(metadata::KEY_IS_DRM, 1);
        meta
    }

    fn drm_flag(&self) -> bool {
        false
    }
}
