//! AMR 窄带/宽带存储格式解封装器.
//!
//! 文件以 "#!AMR\n" (窄带) 或 "#!AMR-WB\n" (宽带) 开头.

use bian_core::{BianResult, MetaData};

use crate::extractor::{ExtractorInit, MediaExtractor, container_metadata};
use crate::mime;
use crate::sniff::{SniffResult, Sniffer};
use crate::source::{DataSource, SourceHandle};

const AMR_NB_MAGIC: &[u8] = b"#!AMR\n";
const AMR_WB_MAGIC: &[u8] = b"#!AMR-WB\n";

/// 根据文件头判断 AMR 类型, 返回对应 MIME
fn amr_mime(header: &[u8]) -> Option<&'static str> {
    if header.starts_with(AMR_NB_MAGIC) {
        Some(mime::AUDIO_AMR_NB)
    } else if header.starts_with(AMR_WB_MAGIC) {
        Some(mime::AUDIO_AMR_WB)
    } else {
        None
    }
}

/// AMR 解封装器
pub struct AmrExtractor {
    source: SourceHandle,
    drm: bool,
    /// 是否为宽带 (AMR-WB)
    wideband: bool,
}

impl AmrExtractor {
    /// 创建 AMR 窄带解封装器实例 (工厂函数)
    ///
    /// 文件头可识别时以文件头为准, 否则按窄带处理.
    pub fn create(
        source: SourceHandle,
        init: &ExtractorInit,
    ) -> BianResult<Box<dyn MediaExtractor>> {
        Self::build(source, init, false)
    }

    /// 创建 AMR 宽带解封装器实例 (工厂函数)
    ///
    /// 文件头可识别时以文件头为准, 否则按宽带处理.
    pub fn create_wideband(
        source: SourceHandle,
        init: &ExtractorInit,
    ) -> BianResult<Box<dyn MediaExtractor>> {
        Self::build(source, init, true)
    }

    fn build(
        source: SourceHandle,
        init: &ExtractorInit,
        default_wideband: bool,
    ) -> BianResult<Box<dyn MediaExtractor>> {
        let header = source.read_header(0, AMR_WB_MAGIC.len())?;
        let wideband = match amr_mime(&header) {
            Some(m) => m == mime::AUDIO_AMR_WB,
            None => default_wideband,
        };
        Ok(Box::new(Self {
            source,
            drm: init.drm,
            wideband,
        }))
    }
}

impl MediaExtractor for AmrExtractor {
    fn name(&self) -> &str {
        "amr"
    }

    fn source(&self) -> &SourceHandle {
        &self.source
    }

    fn metadata(&self) -> MetaData {
        if self.wideband {
            container_metadata(mime::AUDIO_AMR_WB)
        } else {
            container_metadata(mime::AUDIO_AMR_NB)
        }
    }

    fn drm_flag(&self) -> bool {
        self.drm
    }
}

/// AMR 格式探测器
pub struct AmrSniffer;

impl Sniffer for AmrSniffer {
    fn name(&self) -> &str {
        "amr"
    }

    fn sniff(&self, source: &dyn DataSource) -> Option<SniffResult> {
        let header = source.read_header(0, AMR_WB_MAGIC.len()).ok()?;
        amr_mime(&header).map(|m| SniffResult::new(m, 0.5))
    }
}
