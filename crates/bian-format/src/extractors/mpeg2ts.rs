//! MPEG-2 传输流 (TS) 解封装器.

use bian_core::{BianResult, MetaData};

use crate::extractor::{ExtractorFlags, ExtractorInit, MediaExtractor, container_metadata};
use crate::mime;
use crate::sniff::{SniffResult, Sniffer};
use crate::source::{DataSource, SourceHandle};

/// TS 包大小
const TS_PACKET_SIZE: u64 = 188;
/// TS 同步字节
const TS_SYNC_BYTE: u8 = 0x47;
/// 探测时检查的连续包数
const SNIFF_PACKETS: u64 = 5;

/// MPEG-2 TS 解封装器
pub struct Mpeg2TsExtractor {
    source: SourceHandle,
    drm: bool,
}

impl Mpeg2TsExtractor {
    /// 创建 TS 解封装器实例 (工厂函数)
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

impl MediaExtractor for Mpeg2TsExtractor {
    fn name(&self) -> &str {
        "mpeg2ts"
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn metadata(&self) -> MetaData {
        container_metadata(mime::CONTAINER_MPEG2TS)
    }

    /// 直播流 (大小未知) 只能暂停, 不能 seek
    fn flags(&self) -> ExtractorFlags {
        if self.source.size().is_some() {
            ExtractorFlags::default()
        } else {
            ExtractorFlags::CAN_PAUSE
        }
    }

    fn drm_flag(&self) -> bool {
        self.drm
    }
}

/// TS 格式探测器
pub struct Mpeg2TsSniffer;

impl Sniffer for Mpeg2TsSniffer {
    fn name(&self) -> &str {
        "mpeg2ts"
    }

    fn sniff(&self, source: &dyn DataSource) -> Option<SniffResult> {
        let mut byte = [0u8; 1];
        for i in 0..SNIFF_PACKETS {
            source.read_exact_at(i * TS_PACKET_SIZE, &mut byte).ok()?;
            if byte[0] != TS_SYNC_BYTE {
                return None;
            }
        }
        Some(SniffResult::new(mime::CONTAINER_MPEG2TS, 0.1))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::source::IoSource;

    fn make_ts(packets: usize) -> Vec<u8> {
        let mut data = vec![0xFFu8; packets * TS_PACKET_SIZE as usize];
        for i in 0..packets {
            data[i * TS_PACKET_SIZE as usize] = TS_SYNC_BYTE;
        }
        data
    }

    #[test]
    fn test_探测_ts_连续同步字节() {
        let source = IoSource::from_memory(make_ts(5));
        let result = Mpeg2TsSniffer.sniff(&source).unwrap();
        assert_eq!(result.mime, mime::CONTAINER_MPEG2TS);
        assert_eq!(result.confidence, 0.1);
    }

    #[test]
    fn test_探测_ts_包数不足() {
        let source = IoSource::from_memory(make_ts(4));
        assert!(Mpeg2TsSniffer.sniff(&source).is_none());

        let mut data = make_ts(5);
        data[3 * TS_PACKET_SIZE as usize] = 0x00;
        assert!(Mpeg2TsSniffer.sniff(&IoSource::from_memory(data)).is_none());
    }

    /// 大小未知的数据源
    struct LiveSource;

    impl DataSource for LiveSource {
        fn read_at(&self, _offset: u64, _buf: &mut [u8]) -> BianResult<usize> {
            Ok(0)
        }

        fn size(&self) -> Option<u64> {
            None
        }
    }

    #[test]
    fn test_直播流只能暂停() {
        let live = Mpeg2TsExtractor::create(Arc::new(LiveSource), &ExtractorInit::default())
            .unwrap();
        assert_eq!(live.flags(), ExtractorFlags::CAN_PAUSE);

        let file = IoSource::from_memory(make_ts(5)).into_handle();
        let file = Mpeg2TsExtractor::create(file, &ExtractorInit::default()).unwrap();
        assert_eq!(file.flags(), ExtractorFlags::default());
    }
}
