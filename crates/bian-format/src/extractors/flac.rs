//! FLAC 原生容器解封装器.

use bian_core::{BianResult, MetaData};

use super::id3::skip_id3v2;
use crate::extractor::{ExtractorInit, MediaExtractor, container_metadata};
use crate::mime;
use crate::sniff::{SniffResult, Sniffer};
use crate::source::{DataSource, SourceHandle};

/// FLAC 解封装器
pub struct FlacExtractor {
    source: SourceHandle,
    drm: bool,
}

impl FlacExtractor {
    /// 创建 FLAC 解封装器实例 (工厂函数)
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

impl MediaExtractor for FlacExtractor {
    fn name(&self) -> &str {
        "flac"
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn metadata(&self) -> MetaData {
        container_metadata(mime::AUDIO_FLAC)
    }

    fn drm_flag(&self) -> bool {
        self.drm
    }
}

/// FLAC 格式探测器
///
/// 允许 "fLaC" 魔数前存在 ID3v2 标签.
pub struct FlacSniffer;

impl Sniffer for FlacSniffer {
    fn name(&self) -> &str {
        "flac"
    }

    fn sniff(&self, source: &dyn DataSource) -> Option<SniffResult> {
        let pos = skip_id3v2(source, 0).ok()?;
        let magic = source.read_header(pos, 4).ok()?;
        (magic == b"fLaC").then(|| SniffResult::new(mime::AUDIO_FLAC, 0.5))
    }
}
