//! DRM 包装标识符解析.
//!
//! 语法为 `drm+<mode>+<inner>`:
//! - `mode` 为 `es_based` (基于基本流) 或 `container_based` (基于容器)
//! - `inner` 为明文内容的格式标识符
//!
//! 前缀和模式都按字面值 (区分大小写) 匹配.

use bian_core::{BianError, BianResult};

/// DRM 标识符前缀
pub const DRM_PREFIX: &str = "drm+";
/// 基于基本流的 DRM 模式
pub const MODE_ES_BASED: &str = "es_based";
/// 基于容器的 DRM 模式
pub const MODE_CONTAINER_BASED: &str = "container_based";

/// 解包后的格式标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrmWrapper<'a> {
    /// 不是 DRM 包装, 原样分发
    Plain(&'a str),
    /// 基于基本流的 DRM, `hint` 为第二个 `+` 之后的全部内容
    ElementaryStream { hint: &'a str },
    /// 基于容器的 DRM, 按 `inner` 分发并标记 DRM
    Container { inner: &'a str },
}

impl DrmWrapper<'_> {
    /// 分发阶段是否需要标记 DRM
    pub fn is_container_drm(&self) -> bool {
        matches!(self, Self::Container { .. })
    }
}

/// 解析格式标识符中的 DRM 包装
pub fn parse(mime: &str) -> BianResult<DrmWrapper<'_>> {
    let Some(rest) = mime.strip_prefix(DRM_PREFIX) else {
        return Ok(DrmWrapper::Plain(mime));
    };
    let Some((mode, inner)) = rest.split_once('+') else {
        return Err(BianError::MalformedDrmIdentifier(format!(
            "缺少第二个 '+' 分隔符: {mime}"
        )));
    };
    match mode {
        MODE_ES_BASED => Ok(DrmWrapper::ElementaryStream { hint: inner }),
        MODE_CONTAINER_BASED => Ok(DrmWrapper::Container { inner }),
        _ => Err(BianError::MalformedDrmIdentifier(format!(
            "未知的 DRM 模式 '{mode}': {mime}"
        ))),
    }
}
