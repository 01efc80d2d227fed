//! MPEG-2 节目流 (PS) 解封装器.

use bian_core::{BianResult, MetaData};

use crate::extractor::{ExtractorFlags, ExtractorInit, MediaExtractor, container_metadata};
use crate::mime;
use crate::sniff::{SniffResult, Sniffer};
use crate::source::{DataSource, SourceHandle};

/// Pack header 起始码
const PACK_START_CODE: [u8; 4] = [0x00, 0x00, 0x01, 0xBA];

/// MPEG-2 PS 解封装器
pub struct Mpeg2PsExtractor {
    source: SourceHandle,
    drm: bool,
}

impl Mpeg2PsExtractor {
    /// 创建 PS 解封装器实例 (工厂函数)
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

impl MediaExtractor for Mpeg2PsExtractor {
    fn name(&self) -> &str {
        "mpeg2ps"
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn metadata(&self) -> MetaData {
        container_metadata(mime::CONTAINER_MPEG2PS)
    }

    /// 节目流没有索引, 只声明暂停能力
    fn flags(&self) -> ExtractorFlags {
        ExtractorFlags::CAN_PAUSE
    }

    fn drm_flag(&self) -> bool {
        self.drm
    }
}

/// PS 格式探测器
///
/// 要求 pack header 带 MPEG-2 标记位 ('01' 前缀与 marker bit).
pub struct Mpeg2PsSniffer;

impl Sniffer for Mpeg2PsSniffer {
    fn name(&self) -> &str {
        "mpeg2ps"
    }

    fn sniff(&self, source: &dyn DataSource) -> Option<SniffResult> {
        let header = source.read_header(0, 5).ok()?;
        if header.len() < 5 || header[0..4] != PACK_START_CODE {
            return None;
        }
        if header[4] & 0xC4 != 0x44 {
            return None;
        }
        Some(SniffResult::new(mime::CONTAINER_MPEG2PS, 0.25))
    }
}
