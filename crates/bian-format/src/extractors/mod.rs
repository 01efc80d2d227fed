//! 内置解封装器与内容探测器.
//!
//! 每种格式一个模块, 解封装器与对应的探测器放在一起.

pub mod aac;
pub mod amr;
pub mod drm;
pub mod flac;
mod id3;
pub mod matroska;
pub mod midi;
pub mod mp3;
pub mod mpeg2ps;
pub mod mpeg2ts;
pub mod mpeg4;
pub mod ogg;
pub mod wav;
pub mod wvm;

use crate::mime;
use crate::registry::ExtractorRegistry;
use crate::sniff::SnifferSet;

/// 注册所有内置解封装器
pub fn register_all_extractors(registry: &mut ExtractorRegistry) {
    registry.register(mime::CONTAINER_MPEG4, "mpeg4", mpeg4::Mpeg4Extractor::create);
    registry.register(mime::CONTAINER_MPEG4_AUDIO, "mpeg4", mpeg4::Mpeg4Extractor::create);
    registry.register(mime::AUDIO_MPEG, "mp3", mp3::Mp3Extractor::create);
    registry.register(mime::AUDIO_AMR_NB, "amr", amr::AmrExtractor::create);
    registry.register(mime::AUDIO_AMR_WB, "amr", amr::AmrExtractor::create_wideband);
    registry.register(mime::AUDIO_FLAC, "flac", flac::FlacExtractor::create);
    registry.register(mime::CONTAINER_WAV, "wav", wav::WavExtractor::create);
    registry.register(mime::CONTAINER_OGG, "ogg", ogg::OggExtractor::create);
    registry.register(mime::CONTAINER_MATROSKA, "matroska", matroska::MatroskaExtractor::create);
    registry.register(mime::CONTAINER_MPEG2TS, "mpeg2ts", mpeg2ts::Mpeg2TsExtractor::create);
    // WVM 自行管理加密, 从不携带外部 DRM 标志
    registry.register_drm_exempt(mime::CONTAINER_WVM, "wvm", wvm::WvmExtractor::create);
    registry.register(mime::AUDIO_AAC_ADTS, "aac", aac::AacExtractor::create);
    registry.register(mime::CONTAINER_MPEG2PS, "mpeg2ps", mpeg2ps::Mpeg2PsExtractor::create);
    registry.register(mime::AUDIO_MIDI, "midi", midi::MidiExtractor::create);
}

/// 注册所有内置探测器
///
/// 顺序决定平局时的优先级.
pub fn register_all_sniffers(set: &mut SnifferSet) {
    set.register(Box::new(mpeg4::Mpeg4Sniffer));
    set.register(Box::new(matroska::MatroskaSniffer));
    set.register(Box::new(ogg::OggSniffer));
    set.register(Box::new(wav::WavSniffer));
    set.register(Box::new(flac::FlacSniffer));
    set.register(Box::new(amr::AmrSniffer));
    set.register(Box::new(mpeg2ts::Mpeg2TsSniffer));
    set.register(Box::new(mp3::Mp3Sniffer));
    set.register(Box::new(aac::AacSniffer));
    set.register(Box::new(mpeg2ps::Mpeg2PsSniffer));
    set.register(Box::new(midi::MidiSniffer));
}
