//! Ogg 解封装器.

use bian_core::{BianResult, MetaData};

use crate::extractor::{ExtractorInit, MediaExtractor, container_metadata};
use crate::mime;
use crate::sniff::{SniffResult, Sniffer};
use crate::source::{DataSource, SourceHandle};

/// Ogg 解封装器
pub struct OggExtractor {
    source: SourceHandle,
    drm: bool,
}

impl OggExtractor {
    /// 创建 Ogg 解封装器实例 (工厂函数)
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

impl MediaExtractor for OggExtractor {
    fn name(&self) -> &str {
        "ogg"
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn metadata(&self) -> MetaData {
        container_metadata(mime::CONTAINER_OGG)
    }

    fn drm_flag(&self) -> bool {
        self.drm
    }
}

/// Ogg 格式探测器
pub struct OggSniffer;

impl Sniffer for OggSniffer {
    fn name(&self) -> &str {
        "ogg"
    }

    fn sniff(&self, source: &dyn DataSource) -> Option<SniffResult> {
        let header = source.read_header(0, 4).ok()?;
        (header == b"OggS").then(|| SniffResult::new(mime::CONTAINER_OGG, 0.2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::IoSource;

    #[test]
    fn test_探测_ogg_页头() {
        let source = IoSource::from_memory(b"OggS\x00\x02\x00\x00".to_vec());
        assert_eq!(
            OggSniffer.sniff(&source).map(|r| r.mime),
            Some(mime::CONTAINER_OGG.to_string())
        );
        let source = IoSource::from_memory(b"Ogg".to_vec());
        assert!(OggSniffer.sniff(&source).is_none());
    }
}
