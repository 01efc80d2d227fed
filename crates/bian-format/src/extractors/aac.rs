//! AAC ADTS 裸流解封装器与探测器.

use bian_core::{BianResult, MetaData, metadata};

use super::id3::skip_id3v2;
use crate::extractor::{ExtractorInit, MediaExtractor, container_metadata};
use crate::mime;
use crate::sniff::{SniffResult, Sniffer};
use crate::source::{DataSource, SourceHandle};

/// ADTS 固定头长度 (无 CRC)
const ADTS_HEADER_SIZE: usize = 7;

/// 解析 ADTS 帧头, 返回帧长度
fn parse_adts_frame_length(data: &[u8]) -> Option<usize> {
    if data.len() < ADTS_HEADER_SIZE {
        return None;
    }

    // 同步字 0xFFF, layer 必须为 0
    if data[0] != 0xFF || (data[1] & 0xF6) != 0xF0 {
        return None;
    }

    let protection_absent = (data[1] & 0x01) != 0;
    let sampling_frequency_index = (data[2] >> 2) & 0x0F;
    if sampling_frequency_index >= 13 {
        return None;
    }

    let frame_length = (usize::from(data[3] & 0x03) << 11)
        | (usize::from(data[4]) << 3)
        | (usize::from(data[5]) >> 5);
    let header_size = if protection_absent { 7 } else { 9 };
    if frame_length < header_size {
        return None;
    }
    Some(frame_length)
}

/// AAC 解封装器
pub struct AacExtractor {
    source: SourceHandle,
    drm: bool,
    /// 第一个 ADTS 帧的偏移
    offset: Option<i64>,
}

impl AacExtractor {
    /// 创建 AAC 解封装器实例 (工厂函数)
    pub fn create(
        source: SourceHandle,
        init: &ExtractorInit,
    ) -> BianResult<Box<dyn MediaExtractor>> {
        let offset = init
            .sniff_meta
            .as_ref()
            .and_then(|m| m.get_i64(metadata::KEY_OFFSET));
        Ok(Box::new(Self {
            source,
            drm: init.drm,
            offset,
        }))
    }
}

impl MediaExtractor for AacExtractor {
    fn name(&self) -> &str {
        "aac"
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn metadata(&self) -> MetaData {
        let mut meta = container_metadata(mime::AUDIO_AAC_ADTS);
        if let Some(offset) = self.offset {
            meta.set_i64(metadata::KEY_OFFSET, offset);
        }
        meta
    }

    fn drm_flag(&self) -> bool {
        self.drm
    }
}

/// AAC ADTS 探测器
///
/// 数据足够时要求下一帧同样以同步字开头.
pub struct AacSniffer;

impl Sniffer for AacSniffer {
    fn name(&self) -> &str {
        "aac"
    }

    fn sniff(&self, source: &dyn DataSource) -> Option<SniffResult> {
        let pos = skip_id3v2(source, 0).ok()?;
        let header = source.read_header(pos, ADTS_HEADER_SIZE).ok()?;
        let frame_length = parse_adts_frame_length(&header)?;

        let next = pos + frame_length as u64;
        let has_next_frame = source.size().is_some_and(|size| next + 2 <= size);
        if has_next_frame {
            let sync = source.read_header(next, 2).ok()?;
            if sync.len() < 2 || sync[0] != 0xFF || (sync[1] & 0xF6) != 0xF0 {
                return None;
            }
        }

        let mut meta = MetaData::new();
        meta.set_i64(metadata::KEY_OFFSET, pos as i64);
        Some(SniffResult::new(mime::AUDIO_AAC_ADTS, 0.2).with_meta(meta))
    }
}

#[cfg(test)]
pub(crate) fn make_adts_frames(count: usize) -> Vec<u8> {
    // AAC LC, 44100 Hz, 双声道, 无 CRC, 16 字节/帧
    let mut data = Vec::new();
    for _ in 0..count {
        let start = data.len();
        data.extend_from_slice(&[0xFF, 0xF1, 0x50, 0x80, 0x02, 0x1F, 0xFC]);
        data.resize(start + 16, 0);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::id3::make_id3v2_tag;
    use crate::source::IoSource;

    #[test]
    fn test_解析_adts_帧长度() {
        assert_eq!(parse_adts_frame_length(&make_adts_frames(1)), Some(16));
        // layer 非 0
        assert_eq!(
            parse_adts_frame_length(&[0xFF, 0xF3, 0x50, 0x80, 0x02, 0x1F, 0xFC]),
            None
        );
        // 帧长度小于头部
        assert_eq!(
            parse_adts_frame_length(&[0xFF, 0xF1, 0x50, 0x80, 0x00, 0x1F, 0xFC]),
            None
        );
    }

    #[test]
    fn test_探测_adts_带_id3() {
        let mut data = make_id3v2_tag(20);
        data.extend(make_adts_frames(3));
        let source = IoSource::from_memory(data);

        let result = AacSniffer.sniff(&source).unwrap();
        assert_eq!(result.mime, mime::AUDIO_AAC_ADTS);
        assert_eq!(
            result.meta.unwrap().get_i64(metadata::KEY_OFFSET),
            Some(30)
        );
    }

    #[test]
    fn test_探测_下一帧失步() {
        let mut data = make_adts_frames(1);
        data.extend_from_slice(&[0x00; 16]);
        let source = IoSource::from_memory(data);
        assert!(AacSniffer.sniff(&source).is_none());
    }

    #[test]
    fn test_不与_mp3_探测冲突() {
        let source = IoSource::from_memory(make_adts_frames(4));
        assert!(super::super::mp3::Mp3Sniffer.sniff(&source).is_none());
    }
}
