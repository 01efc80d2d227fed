//! WAV (RIFF WAVE) 解封装器.

use bian_core::{BianResult, MetaData};

use crate::extractor::{ExtractorInit, MediaExtractor, container_metadata};
use crate::mime;
use crate::sniff::{SniffResult, Sniffer};
use crate::source::{DataSource, SourceHandle};

/// WAV 探测置信度
const WAV_CONFIDENCE: f32 = 0.3;

/// WAV 解封装器
pub struct WavExtractor {
    source: SourceHandle,
    drm: bool,
}

impl WavExtractor {
    /// 创建 WAV 解封装器实例 (工厂函数)
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

impl MediaExtractor for WavExtractor {
    fn name(&self) -> &str {
        "wav"
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn metadata(&self) -> MetaData {
        container_metadata(mime::CONTAINER_WAV)
    }

    fn drm_flag(&self) -> bool {
        self.drm
    }
}

/// WAV 格式探测器
pub struct WavSniffer;

impl Sniffer for WavSniffer {
    fn name(&self) -> &str {
        "wav"
    }

    fn sniff(&self, source: &dyn DataSource) -> Option<SniffResult> {
        // 检查 RIFF/WAVE 魔数
        let header = source.read_header(0, 12).ok()?;
        if header.len() == 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"WAVE" {
            return Some(SniffResult::new(mime::CONTAINER_WAV, WAV_CONFIDENCE));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::IoSource;

    #[test]
    fn test_探测_wav_魔数() {
        let source = IoSource::from_memory(b"RIFF\x24\x00\x00\x00WAVEfmt ".to_vec());
        let result = WavSniffer.sniff(&source).unwrap();
        assert_eq!(result.mime, mime::CONTAINER_WAV);
        assert_eq!(result.confidence, WAV_CONFIDENCE);
    }

    #[test]
    fn test_探测_riff_非_wave() {
        let source = IoSource::from_memory(b"RIFF\x24\x00\x00\x00AVI LIST".to_vec());
        assert!(WavSniffer.sniff(&source).is_none());
    }
}
