//! 媒体格式标识符 (MIME) 注册表.
//!
//! 所有格式标识符都是规范的 MIME 字符串. 比较时不区分大小写,
//! 请使用 [`matches`] 而不是 `==`.
//!
//! 注意: 部分语义名称有意指向同一个字符串 (如 `VIDEO_VPX` / `VIDEO_VP8`,
//! `AUDIO_EAC3` / `AUDIO_EC3`), 这是为兼容旧名称保留的别名.

// ========================
// 图片
// ========================

pub const IMAGE_JPEG: &str = "image/jpeg";

// ========================
// 视频
// ========================

/// 旧名称, 与 [`VIDEO_VP8`] 相同
pub const VIDEO_VPX: &str = "video/x-vnd.on2.vp8";
pub const VIDEO_VP8: &str = "video/x-vnd.on2.vp8";
pub const VIDEO_VP9: &str = "video/x-vnd.on2.vp9";
pub const VIDEO_AVC: &str = "video/avc";
pub const VIDEO_HEVC: &str = "video/hevc";
pub const VIDEO_MPEG4: &str = "video/mp4v-es";
pub const VIDEO_H263: &str = "video/3gpp";
pub const VIDEO_MPEG2: &str = "video/mpeg2";
pub const VIDEO_RM10: &str = "video/rm10";
pub const VIDEO_RM20: &str = "video/rm20";
pub const VIDEO_RM40: &str = "video/rm40";
pub const VIDEO_RAW: &str = "video/raw";
pub const VIDEO_WMV1: &str = "video/wmv1";
pub const VIDEO_WMV2: &str = "video/wmv2";
pub const VIDEO_WMV3: &str = "video/wmv3";

// ========================
// 音频
// ========================

pub const AUDIO_AMR_NB: &str = "audio/3gpp";
pub const AUDIO_AMR_WB: &str = "audio/amr-wb";
pub const AUDIO_MPEG: &str = "audio/mpeg";
pub const AUDIO_MPEG_LAYER_I: &str = "audio/mpeg-L1";
pub const AUDIO_MPEG_LAYER_II: &str = "audio/mpeg-L2";
pub const AUDIO_MIDI: &str = "audio/midi";
pub const AUDIO_AAC: &str = "audio/mp4a-latm";
pub const AUDIO_QCELP: &str = "audio/qcelp";
pub const AUDIO_VORBIS: &str = "audio/vorbis";
pub const AUDIO_OPUS: &str = "audio/opus";
pub const AUDIO_G711_ALAW: &str = "audio/g711-alaw";
pub const AUDIO_G711_MLAW: &str = "audio/g711-mlaw";
pub const AUDIO_RAW: &str = "audio/raw";
pub const AUDIO_ADPCM_IMA: &str = "audio/adpcm-ima";
pub const AUDIO_ADPCM_MS: &str = "audio/adpcm-ms";
pub const AUDIO_FLAC: &str = "audio/flac";
pub const AUDIO_AAC_ADTS: &str = "audio/aac-adts";
pub const AUDIO_ALAC: &str = "audio/alac";
pub const AUDIO_AAC_ADIF: &str = "audio/aac-adif";
pub const AUDIO_AAC_LATM: &str = "audio/aac-latm";
pub const AUDIO_ADTS_PROFILE: &str = "audio/adts";
/// WMA 与其他编码族存在探测冲突, 默认总是请求备用探测器复核
pub const AUDIO_WMA: &str = "audio/wma";
pub const AUDIO_WMAPRO: &str = "audio/wmapro";
pub const AUDIO_DTSHD: &str = "audio/dtshd";
pub const AUDIO_MSGSM: &str = "audio/gsm";
pub const AUDIO_AC3: &str = "audio/ac3";
pub const AUDIO_EAC3: &str = "audio/eac3";
pub const AUDIO_TRUEHD: &str = "audio/truehd";
/// 与 [`AUDIO_EAC3`] 相同
pub const AUDIO_EC3: &str = "audio/eac3";
pub const AUDIO_APE: &str = "audio/ape";
pub const AUDIO_FFMPEG: &str = "audio/ffmpeg";

// ========================
// 容器
// ========================

pub const CONTAINER_MPEG4: &str = "video/mp4";
/// 纯音频 MP4, 分发到与 [`CONTAINER_MPEG4`] 相同的解封装器
pub const CONTAINER_MPEG4_AUDIO: &str = "audio/mp4";
pub const CONTAINER_WAV: &str = "audio/x-wav";
pub const CONTAINER_AIFF: &str = "audio/x-aiff";
pub const CONTAINER_OGG: &str = "application/ogg";
pub const CONTAINER_MATROSKA: &str = "video/x-matroska";
pub const CONTAINER_MPEG2TS: &str = "video/mp2ts";
pub const CONTAINER_AVI: &str = "video/avi";
pub const CONTAINER_MPEG2PS: &str = "video/mp2p";
/// 前向锁定的流媒体格式 (Widevine), 从不被 DRM 包装
pub const CONTAINER_WVM: &str = "video/wvm";
pub const CONTAINER_DDP: &str = "audio/ddp";

// ========================
// 字幕 / 数据
// ========================

pub const TEXT_3GPP: &str = "text/3gpp-tt";
pub const TEXT_SUBRIP: &str = "application/x-subrip";
pub const TEXT_VTT: &str = "text/vtt";
pub const TEXT_CEA_608: &str = "text/cea-608";
pub const DATA_TIMED_ID3: &str = "application/x-id3v4";

/// 所有已注册的 (语义名称, MIME) 对
pub const ALL: &[(&str, &str)] = &[
    ("IMAGE_JPEG", IMAGE_JPEG),
    ("VIDEO_VPX", VIDEO_VPX),
    ("VIDEO_VP8", VIDEO_VP8),
    ("VIDEO_VP9", VIDEO_VP9),
    ("VIDEO_AVC", VIDEO_AVC),
    ("VIDEO_HEVC", VIDEO_HEVC),
    ("VIDEO_MPEG4", VIDEO_MPEG4),
    ("VIDEO_H263", VIDEO_H263),
    ("VIDEO_MPEG2", VIDEO_MPEG2),
    ("VIDEO_RM10", VIDEO_RM10),
    ("VIDEO_RM20", VIDEO_RM20),
    ("VIDEO_RM40", VIDEO_RM40),
    ("VIDEO_RAW", VIDEO_RAW),
    ("VIDEO_WMV1", VIDEO_WMV1),
    ("VIDEO_WMV2", VIDEO_WMV2),
    ("VIDEO_WMV3", VIDEO_WMV3),
    ("AUDIO_AMR_NB", AUDIO_AMR_NB),
    ("AUDIO_AMR_WB", AUDIO_AMR_WB),
    ("AUDIO_MPEG", AUDIO_MPEG),
    ("AUDIO_MPEG_LAYER_I", AUDIO_MPEG_LAYER_I),
    ("AUDIO_MPEG_LAYER_II", AUDIO_MPEG_LAYER_II),
    ("AUDIO_MIDI", AUDIO_MIDI),
    ("AUDIO_AAC", AUDIO_AAC),
    ("AUDIO_QCELP", AUDIO_QCELP),
    ("AUDIO_VORBIS", AUDIO_VORBIS),
    ("AUDIO_OPUS", AUDIO_OPUS),
    ("AUDIO_G711_ALAW", AUDIO_G711_ALAW),
    ("AUDIO_G711_MLAW", AUDIO_G711_MLAW),
    ("AUDIO_RAW", AUDIO_RAW),
    ("AUDIO_ADPCM_IMA", AUDIO_ADPCM_IMA),
    ("AUDIO_ADPCM_MS", AUDIO_ADPCM_MS),
    ("AUDIO_FLAC", AUDIO_FLAC),
    ("AUDIO_AAC_ADTS", AUDIO_AAC_ADTS),
    ("AUDIO_ALAC", AUDIO_ALAC),
    ("AUDIO_AAC_ADIF", AUDIO_AAC_ADIF),
    ("AUDIO_AAC_LATM", AUDIO_AAC_LATM),
    ("AUDIO_ADTS_PROFILE", AUDIO_ADTS_PROFILE),
    ("AUDIO_WMA", AUDIO_WMA),
    ("AUDIO_WMAPRO", AUDIO_WMAPRO),
    ("AUDIO_DTSHD", AUDIO_DTSHD),
    ("AUDIO_MSGSM", AUDIO_MSGSM),
    ("AUDIO_AC3", AUDIO_AC3),
    ("AUDIO_EAC3", AUDIO_EAC3),
    ("AUDIO_TRUEHD", AUDIO_TRUEHD),
    ("AUDIO_EC3", AUDIO_EC3),
    ("AUDIO_APE", AUDIO_APE),
    ("AUDIO_FFMPEG", AUDIO_FFMPEG),
    ("CONTAINER_MPEG4", CONTAINER_MPEG4),
    ("CONTAINER_MPEG4_AUDIO", CONTAINER_MPEG4_AUDIO),
    ("CONTAINER_WAV", CONTAINER_WAV),
    ("CONTAINER_AIFF", CONTAINER_AIFF),
    ("CONTAINER_OGG", CONTAINER_OGG),
    ("CONTAINER_MATROSKA", CONTAINER_MATROSKA),
    ("CONTAINER_MPEG2TS", CONTAINER_MPEG2TS),
    ("CONTAINER_AVI", CONTAINER_AVI),
    ("CONTAINER_MPEG2PS", CONTAINER_MPEG2PS),
    ("CONTAINER_WVM", CONTAINER_WVM),
    ("CONTAINER_DDP", CONTAINER_DDP),
    ("TEXT_3GPP", TEXT_3GPP),
    ("TEXT_SUBRIP", TEXT_SUBRIP),
    ("TEXT_VTT", TEXT_VTT),
    ("TEXT_CEA_608", TEXT_CEA_608),
    ("DATA_TIMED_ID3", DATA_TIMED_ID3),
];

/// 不区分大小写地比较两个格式标识符
pub fn matches(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// 根据语义名称 (如 "AUDIO_FLAC") 查找 MIME 字符串
pub fn lookup(name: &str) -> Option<&'static str> {
    ALL.iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| *v)
}

/// MIME 字符串是否出现在注册表中
pub fn is_known(mime: &str) -> bool {
    ALL.iter().any(|(_, v)| matches(v, mime))
}
