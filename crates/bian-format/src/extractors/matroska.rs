//! Matroska / WebM 解封装器.

use bian_core::{BianResult, MetaData};

use crate::extractor::{ExtractorInit, MediaExtractor, container_metadata};
use crate::mime;
use crate::sniff::{SniffResult, Sniffer};
use crate::source::{DataSource, SourceHandle};

/// EBML Header 魔数
const EBML_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];
/// 搜索 DocType 时读取的头部长度
const EBML_HEADER_PROBE_SIZE: usize = 64;

/// Matroska 解封装器
pub struct MatroskaExtractor {
    source: SourceHandle,
    drm: bool,
}

impl MatroskaExtractor {
    /// 创建 Matroska 解封装器实例 (工厂函数)
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

impl MediaExtractor for MatroskaExtractor {
    fn name(&self) -> &str {
        "matroska"
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn metadata(&self) -> MetaData {
        container_metadata(mime::CONTAINER_MATROSKA)
    }

    fn drm_flag(&self) -> bool {
        self.drm
    }
}

/// Matroska 格式探测器
///
/// 需要 EBML 魔数, 且 EBML 头中的 DocType 为 "matroska" 或 "webm".
pub struct MatroskaSniffer;

impl Sniffer for MatroskaSniffer {
    fn name(&self) -> &str {
        "matroska"
    }

    fn sniff(&self, source: &dyn DataSource) -> Option<SniffResult> {
        let header = source.read_header(0, EBML_HEADER_PROBE_SIZE).ok()?;
        if header.len() < 4 || header[0..4] != EBML_MAGIC {
            return None;
        }
        let has_doc_type = [b"matroska".as_slice(), b"webm".as_slice()]
            .iter()
            .any(|doc| header.windows(doc.len()).any(|w| w == *doc));
        if !has_doc_type {
            log::debug!("EBML 头中未找到 Matroska DocType");
            return None;
        }
        Some(SniffResult::new(mime::CONTAINER_MATROSKA, 0.6))
    }
}
