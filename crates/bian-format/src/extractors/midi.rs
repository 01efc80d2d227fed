//! 标准 MIDI 文件解封装器.

use bian_core::{BianResult, MetaData};

use crate::extractor::{ExtractorInit, MediaExtractor, container_metadata};
use crate::mime;
use crate::sniff::{SniffResult, Sniffer};
use crate::source::{DataSource, SourceHandle};

/// MIDI 解封装器
pub struct MidiExtractor {
    source: SourceHandle,
    drm: bool,
}

impl MidiExtractor {
    /// 创建 MIDI 解封装器实例 (工厂函数)
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

impl MediaExtractor for MidiExtractor {
    fn name(&self) -> &str {
        "midi"
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn metadata(&self) -> MetaData {
        container_metadata(mime::AUDIO_MIDI)
    }

    fn drm_flag(&self) -> bool {
        self.drm
    }
}

/// MIDI 格式探测器 ("MThd" 头块)
pub struct MidiSniffer;

impl Sniffer for MidiSniffer {
    fn name(&self) -> &str {
        "midi"
    }

    fn sniff(&self, source: &dyn DataSource) -> Option<SniffResult> {
        let header = source.read_header(0, 4).ok()?;
        (header == b"MThd").then(|| SniffResult::new(mime::AUDIO_MIDI, 0.8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::IoSource;

    #[test]
    fn test_探测_midi() {
        let source = IoSource::from_memory(b"MThd\x00\x00\x00\x06\x00\x01".to_vec());
        let result = MidiSniffer.sniff(&source).unwrap();
        assert_eq!(result.mime, mime::AUDIO_MIDI);
        assert_eq!(result.confidence, 0.8);
    }
}
