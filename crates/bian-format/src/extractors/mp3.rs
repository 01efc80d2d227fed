//! MPEG 音频 (MP3) 解封装器与探测器.
//!
//! 探测时先跳过 ID3v2 标签, 然后在有限范围内搜索帧同步,
//! 要求找到的帧与下一帧的头部一致才认为识别成功.

use bian_core::{BianResult, MetaData, metadata};
use byteorder::{BigEndian, ByteOrder};

use super::id3::skip_id3v2;
use crate::extractor::{ExtractorInit, MediaExtractor, container_metadata};
use crate::mime;
use crate::sniff::{SniffResult, Sniffer};
use crate::source::{DataSource, SourceHandle};

/// 帧同步最多搜索的字节数
const MAX_RESYNC_BYTES: usize = 64 * 1024;
/// 比较相邻帧头时使用的掩码 (同步位、版本、层、采样率)
const HEADER_CONSTANT_MASK: u32 = 0xFFFE_0C00;

/// MPEG-1 Layer I 比特率表 (kbps)
const BITRATE_V1_L1: [u32; 15] = [
    0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448,
];
/// MPEG-1 Layer II 比特率表 (kbps)
const BITRATE_V1_L2: [u32; 15] = [
    0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384,
];
/// MPEG-1 Layer III 比特率表 (kbps)
const BITRATE_V1_L3: [u32; 15] = [
    0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];
/// MPEG-2/2.5 Layer I 比特率表 (kbps)
const BITRATE_V2_L1: [u32; 15] = [
    0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256,
];
/// MPEG-2/2.5 Layer II/III 比特率表 (kbps)
const BITRATE_V2_L23: [u32; 15] = [
    0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160,
];
/// MPEG-1 采样率表
const SAMPLERATE_V1: [u32; 3] = [44100, 48000, 32000];

/// 解析 4 字节帧头, 返回帧长度 (字节)
fn frame_size(header: u32) -> Option<usize> {
    if (header >> 21) != 0x7FF {
        return None;
    }

    // 版本: 3 = MPEG-1, 2 = MPEG-2, 0 = MPEG-2.5, 1 保留
    let version = (header >> 19) & 0x03;
    if version == 1 {
        return None;
    }
    let is_v1 = version == 3;

    // 层: 3 = Layer I, 2 = Layer II, 1 = Layer III, 0 保留
    let layer = match (header >> 17) & 0x03 {
        3 => 1,
        2 => 2,
        1 => 3,
        _ => return None,
    };

    let br_idx = ((header >> 12) & 0x0F) as usize;
    if br_idx == 0 || br_idx == 15 {
        return None;
    }
    let sr_idx = ((header >> 10) & 0x03) as usize;
    if sr_idx == 3 {
        return None;
    }

    let bitrate = match (is_v1, layer) {
        (true, 1) => BITRATE_V1_L1[br_idx],
        (true, 2) => BITRATE_V1_L2[br_idx],
        (true, _) => BITRATE_V1_L3[br_idx],
        (false, 1) => BITRATE_V2_L1[br_idx],
        (false, _) => BITRATE_V2_L23[br_idx],
    } * 1000;
    let sample_rate = match version {
        3 => SAMPLERATE_V1[sr_idx],
        2 => SAMPLERATE_V1[sr_idx] / 2,
        _ => SAMPLERATE_V1[sr_idx] / 4,
    };
    let padding = (header >> 9) & 1;

    let size = match layer {
        1 => (12 * bitrate / sample_rate + padding) * 4,
        2 => 144 * bitrate / sample_rate + padding,
        _ if is_v1 => 144 * bitrate / sample_rate + padding,
        _ => 72 * bitrate / sample_rate + padding,
    };
    Some(size as usize)
}

/// 在 `start` 之后搜索第一个后继帧也有效的帧头, 返回其偏移
fn resync(source: &dyn DataSource, start: u64) -> BianResult<Option<u64>> {
    let window = source.read_header(start, MAX_RESYNC_BYTES)?;
    let mut pos = 0usize;
    while pos + 4 <= window.len() {
        let header = BigEndian::read_u32(&window[pos..pos + 4]);
        if let Some(size) = frame_size(header) {
            let next = start + (pos + size) as u64;
            let mut next_header = [0u8; 4];
            if source.read_exact_at(next, &mut next_header).is_ok() {
                let next_header = BigEndian::read_u32(&next_header);
                if frame_size(next_header).is_some()
                    && next_header & HEADER_CONSTANT_MASK == header & HEADER_CONSTANT_MASK
                {
                    return Ok(Some(start + pos as u64));
                }
            }
        }
        pos += 1;
    }
    Ok(None)
}

/// MP3 解封装器
pub struct Mp3Extractor {
    source: SourceHandle,
    drm: bool,
    /// 探测阶段得到的帧偏移信息
    sniff_meta: Option<MetaData>,
}

impl Mp3Extractor {
    /// 创建 MP3 解封装器实例 (工厂函数)
    pub fn create(
        source: SourceHandle,
        init: &ExtractorInit,
    ) -> BianResult<Box<dyn MediaExtractor>> {
        Ok(Box::new(Self {
            source,
            drm: init.drm,
            sniff_meta: init.sniff_meta.clone(),
        }))
    }
}

impl MediaExtractor for Mp3Extractor {
    fn name(&self) -> &str {
        "mp3"
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn metadata(&self) -> MetaData {
        let mut meta = container_metadata(mime::AUDIO_MPEG);
        if let Some(sniffed) = &self.sniff_meta {
            for key in [metadata::KEY_OFFSET, metadata::KEY_POST_ID3_OFFSET] {
                if let Some(value) = sniffed.get(key) {
                    meta.set(key, value.clone());
                }
            }
        }
        meta
    }

    fn drm_flag(&self) -> bool {
        self.drm
    }
}

/// MP3 格式探测器
pub struct Mp3Sniffer;

impl Sniffer for Mp3Sniffer {
    fn name(&self) -> &str {
        "mp3"
    }

    fn sniff(&self, source: &dyn DataSource) -> Option<SniffResult> {
        let post_id3 = skip_id3v2(source, 0).ok()?;
        let offset = resync(source, post_id3).ok()??;

        let mut meta = MetaData::new();
        meta.set_i64(metadata::KEY_OFFSET, offset as i64);
        meta.set_i64(metadata::KEY_POST_ID3_OFFSET, post_id3 as i64);
        Some(SniffResult::new(mime::AUDIO_MPEG, 0.2).with_meta(meta))
    }
}

#[cfg(test)]
pub(crate) fn make_mp3_frames(count: usize) -> Vec<u8> {
    // MPEG-1 Layer III, 128 kbps, 44100 Hz, 无填充: 417 字节/帧
    let mut data = Vec::new();
    for _ in 0..count {
        let start = data.len();
        data.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        data.resize(start + 417, 0);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::id3::make_id3v2_tag;
    use crate::source::IoSource;

    #[test]
    fn test_帧长度计算() {
        assert_eq!(frame_size(0xFFFB_9064), Some(417));
        // 填充位
        assert_eq!(frame_size(0xFFFB_9264), Some(418));
        // 保留版本 / 保留层 / 无效比特率
        assert_eq!(frame_size(0xFFEB_9064), None);
        assert_eq!(frame_size(0xFFF9_9064), None);
        assert_eq!(frame_size(0xFFFB_F064), None);
    }

    #[test]
    fn test_探测_连续两帧() {
        let source = IoSource::from_memory(make_mp3_frames(2));
        let result = Mp3Sniffer.sniff(&source).unwrap();
        assert_eq!(result.mime, mime::AUDIO_MPEG);
        assert_eq!(result.confidence, 0.2);
        let meta = result.meta.unwrap();
        assert_eq!(meta.get_i64(metadata::KEY_OFFSET), Some(0));
        assert_eq!(meta.get_i64(metadata::KEY_POST_ID3_OFFSET), Some(0));
    }

    #[test]
    fn test_探测_跳过_id3_与垃圾数据() {
        let mut data = make_id3v2_tag(100);
        data.extend_from_slice(&[0x00; 7]);
        data.extend(make_mp3_frames(3));
        let source = IoSource::from_memory(data);

        let meta = Mp3Sniffer.sniff(&source).unwrap().meta.unwrap();
        assert_eq!(meta.get_i64(metadata::KEY_POST_ID3_OFFSET), Some(110));
        assert_eq!(meta.get_i64(metadata::KEY_OFFSET), Some(117));
    }

    #[test]
    fn test_探测_单帧不足以确认() {
        let source = IoSource::from_memory(make_mp3_frames(1));
        assert!(Mp3Sniffer.sniff(&source).is_none());
    }

    #[test]
    fn test_解封装器携带探测偏移() {
        let mut sniffed = MetaData::new();
        sniffed.set_i64(metadata::KEY_OFFSET, 117);
        sniffed.set_str("unrelated", "x");
        let init = ExtractorInit {
            drm: false,
            sniff_meta: Some(sniffed),
        };
        let source = IoSource::from_memory(make_mp3_frames(2)).into_handle();
        let extractor = Mp3Extractor::create(source, &init).unwrap();

        let meta = extractor.metadata();
        assert_eq!(meta.get_i64(metadata::KEY_OFFSET), Some(117));
        assert!(!meta.contains("unrelated"));
    }
}
