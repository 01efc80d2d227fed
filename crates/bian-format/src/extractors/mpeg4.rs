//! ISO 基础媒体文件格式 (MP4 / 3GP / M4A) 解封装器.

use bian_core::{BianResult, MetaData};
use byteorder::{BigEndian, ByteOrder};

use crate::extractor::{ExtractorInit, MediaExtractor, container_metadata};
use crate::mime;
use crate::sniff::{SniffResult, Sniffer};
use crate::source::{DataSource, SourceHandle};

/// 已知品牌的 ftyp 探测置信度
const CONFIDENCE_BRAND: f32 = 0.4;
/// 仅凭顶层 box 名称的探测置信度
const CONFIDENCE_LEGACY: f32 = 0.1;
/// ftyp box 最多读取的字节数
const MAX_FTYP_SIZE: usize = 256;

/// 可识别的主品牌/兼容品牌
const KNOWN_BRANDS: &[&[u8; 4]] = &[
    b"isom", b"iso2", b"iso4", b"iso5", b"iso6", b"avc1", b"hvc1", b"hev1", b"3gp4", b"3gp5",
    b"3gp6", b"3gr6", b"3gs6", b"3ge6", b"3gg6", b"mp41", b"mp42", b"dash", b"M4V ", b"M4A ",
    b"M4B ", b"M4P ", b"M4VH", b"M4VP", b"f4v ", b"kddi", b"MSNV", b"qt  ", b"mmp4",
];

/// 纯音频品牌
const AUDIO_BRANDS: &[&[u8; 4]] = &[b"M4A ", b"M4B ", b"M4P "];

/// 不带 ftyp 的旧文件可能出现的顶层 box
const LEGACY_TOP_LEVEL_BOXES: &[&[u8; 4]] =
    &[b"ftyp", b"moov", b"mdat", b"free", b"skip", b"wide"];

/// 读取文件开头 ftyp box 的主品牌
fn read_major_brand(source: &dyn DataSource) -> BianResult<Option<[u8; 4]>> {
    let header = source.read_header(0, 12)?;
    if header.len() < 12 || &header[4..8] != b"ftyp" {
        return Ok(None);
    }
    let mut brand = [0u8; 4];
    brand.copy_from_slice(&header[8..12]);
    Ok(Some(brand))
}

/// MPEG-4 解封装器
pub struct Mpeg4Extractor {
    source: SourceHandle,
    drm: bool,
    /// ftyp 主品牌 (无 ftyp 时为 None)
    major_brand: Option<[u8; 4]>,
}

impl Mpeg4Extractor {
    /// 创建 MPEG-4 解封装器实例 (工厂函数)
    pub fn create(
        source: SourceHandle,
        init: &ExtractorInit,
    ) -> BianResult<Box<dyn MediaExtractor>> {
        let major_brand = read_major_brand(source.as_ref())?;
        Ok(Box::new(Self {
            source,
            drm: init.drm,
            major_brand,
        }))
    }
}

impl MediaExtractor for Mpeg4Extractor {
    fn name(&self) -> &str {
        "mpeg4"
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn metadata(&self) -> MetaData {
        let is_audio = self
            .major_brand
            .is_some_and(|brand| AUDIO_BRANDS.contains(&&brand));
        if is_audio {
            container_metadata(mime::CONTAINER_MPEG4_AUDIO)
        } else {
            container_metadata(mime::CONTAINER_MPEG4)
        }
    }

    fn drm_flag(&self) -> bool {
        self.drm
    }
}

/// MPEG-4 格式探测器
pub struct Mpeg4Sniffer;

impl Mpeg4Sniffer {
    /// 检查 ftyp box 中是否包含已知品牌
    fn has_known_brand(ftyp: &[u8]) -> bool {
        // 8 字节 box 头 + 主品牌 + 次版本号, 之后是兼容品牌列表
        if ftyp.len() < 16 {
            return false;
        }
        let major = &ftyp[8..12];
        KNOWN_BRANDS.iter().any(|b| b.as_slice() == major)
            || ftyp[16..]
                .chunks_exact(4)
                .any(|c| KNOWN_BRANDS.iter().any(|b| b.as_slice() == c))
    }
}

impl Sniffer for Mpeg4Sniffer {
    fn name(&self) -> &str {
        "mpeg4"
    }

    fn sniff(&self, source: &dyn DataSource) -> Option<SniffResult> {
        let header = source.read_header(0, 8).ok()?;
        if header.len() < 8 {
            return None;
        }
        let box_type = &header[4..8];

        if box_type == b"ftyp" {
            let box_size = BigEndian::read_u32(&header[0..4]) as usize;
            if (16..=MAX_FTYP_SIZE).contains(&box_size) {
                let ftyp = source.read_header(0, box_size).ok()?;
                if Self::has_known_brand(&ftyp) {
                    return Some(SniffResult::new(mime::CONTAINER_MPEG4, CONFIDENCE_BRAND));
                }
            }
        }

        if LEGACY_TOP_LEVEL_BOXES
            .iter()
            .any(|b| b.as_slice() == box_type)
        {
            return Some(SniffResult::new(mime::CONTAINER_MPEG4, CONFIDENCE_LEGACY));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use bian_core::metadata::KEY_MIME_TYPE;

    use super::*;
    use crate::source::IoSource;

    fn make_ftyp(major: &[u8; 4], compatible: &[&[u8; 4]]) -> Vec<u8> {
        let size = 16 + 4 * compatible.len() as u32;
        let mut data = size.to_be_bytes().to_vec();
        data.extend_from_slice(b"ftyp");
        data.extend_from_slice(major);
        data.extend_from_slice(&0u32.to_be_bytes());
        for brand in compatible {
            data.extend_from_slice(*brand);
        }
        data
    }

    #[test]
    fn test_探测_ftyp_已知品牌() {
        let source = IoSource::from_memory(make_ftyp(b"isom", &[b"iso2", b"mp41"]));
        let result = Mpeg4Sniffer.sniff(&source).unwrap();
        assert_eq!(result.mime, mime::CONTAINER_MPEG4);
        assert_eq!(result.confidence, CONFIDENCE_BRAND);
    }

    #[test]
    fn test_探测_ftyp_兼容品牌() {
        let source = IoSource::from_memory(make_ftyp(b"xxxx", &[b"yyyy", b"3gp6"]));
        assert_eq!(
            Mpeg4Sniffer.sniff(&source).unwrap().confidence,
            CONFIDENCE_BRAND
        );
    }

    #[test]
    fn test_探测_未知品牌与旧格式() {
        let source = IoSource::from_memory(make_ftyp(b"xxxx", &[b"yyyy"]));
        assert_eq!(
            Mpeg4Sniffer.sniff(&source).unwrap().confidence,
            CONFIDENCE_LEGACY
        );

        let mut moov = 8u32.to_be_bytes().to_vec();
        moov.extend_from_slice(b"moov");
        let source = IoSource::from_memory(moov);
        assert_eq!(
            Mpeg4Sniffer.sniff(&source).unwrap().confidence,
            CONFIDENCE_LEGACY
        );

        let source = IoSource::from_memory(b"\x00\x00\x00\x08junk".to_vec());
        assert!(Mpeg4Sniffer.sniff(&source).is_none());
    }

    #[test]
    fn test_纯音频品牌() {
        let source = IoSource::from_memory(make_ftyp(b"M4A ", &[b"isom"])).into_handle();
        let extractor = Mpeg4Extractor::create(source, &ExtractorInit::default()).unwrap();
        assert_eq!(
            extractor.metadata().get_str(KEY_MIME_TYPE),
            Some(mime::CONTAINER_MPEG4_AUDIO)
        );
    }
}
