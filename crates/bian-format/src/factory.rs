//! 解封装器工厂.
//!
//! 把内容探测、DRM 解包和注册表分发串成一次 `create` 调用:
//!
//! ```text
//! 显式格式 ─┐
//!           ├─> DRM 解包 ─> 注册表 ─> (备用插件) ─> ExtractorHandle
//! 探测仲裁 ─┘
//! ```

use std::sync::Arc;

use bian_core::{BianError, BianResult, metadata};

use crate::drm::{self, DrmWrapper};
use crate::extractor::{DrmTagged, ExtractorHandle, ExtractorInit, MediaExtractor};
use crate::extractors::drm::DrmExtractor;
use crate::registry::{ExtractorPlugin, ExtractorRegistry};
use crate::sniff::{self, ResolvedFormat, SniffOrigin, SniffPolicy, Sniffer};
use crate::source::{DataSource, SourceHandle};

/// 解封装器工厂
///
/// 每次 `create` 都是独立的: 不缓存探测结果, 不保留数据源.
pub struct ExtractorFactory {
    registry: Arc<ExtractorRegistry>,
    secondary_sniffer: Option<Arc<dyn Sniffer>>,
    plugin: Option<Arc<dyn ExtractorPlugin>>,
    policy: SniffPolicy,
}

impl Default for ExtractorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorFactory {
    /// 使用进程级内置注册表创建工厂
    pub fn new() -> Self {
        Self::with_registry(ExtractorRegistry::global())
    }

    /// 使用指定注册表创建工厂
    pub fn with_registry(registry: Arc<ExtractorRegistry>) -> Self {
        Self {
            registry,
            secondary_sniffer: None,
            plugin: None,
            policy: SniffPolicy::default(),
        }
    }

    /// 设置备用探测器
    pub fn with_secondary_sniffer(mut self, sniffer: Arc<dyn Sniffer>) -> Self {
        self.secondary_sniffer = Some(sniffer);
        self
    }

    /// 设置备用分发插件
    pub fn with_plugin(mut self, plugin: Arc<dyn ExtractorPlugin>) -> Self {
        self.plugin = Some(plugin);
        self
    }

    /// 设置仲裁策略, 阈值越界时返回 [`BianError::InvalidArgument`]
    pub fn with_policy(mut self, policy: SniffPolicy) -> BianResult<Self> {
        policy.validate()?;
        self.policy = policy;
        Ok(self)
    }

    /// 当前使用的注册表
    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// 当前仲裁策略
    pub fn policy(&self) -> &SniffPolicy {
        &self.policy
    }

    /// 探测并仲裁数据源格式
    pub fn resolve_format(&self, source: &dyn DataSource) -> BianResult<ResolvedFormat> {
        sniff::resolve_format(source, self.secondary_sniffer.as_deref(), &self.policy)
    }

    /// 为数据源创建解封装器
    ///
    /// `explicit` 为调用方声明的格式; 为 None 时自动探测.
    /// 显式格式未注册时直接返回 [`BianError::UnsupportedFormat`], 不会回退到探测.
    pub fn create(
        &self,
        source: SourceHandle,
        explicit: Option<&str>,
    ) -> BianResult<ExtractorHandle> {
        let (mime, sniff_meta, origin) = match explicit {
            Some(mime) => (mime.to_string(), None, None),
            None => {
                let resolved = self.resolve_format(source.as_ref())?;
                log::info!(
                    "自动识别为 {} (置信度 {:.2}, 来源 {:?})",
                    resolved.mime,
                    resolved.confidence,
                    resolved.origin
                );
                (resolved.mime, resolved.meta, Some(resolved.origin))
            }
        };

        let (inner, drm) = match drm::parse(&mime)? {
            DrmWrapper::Plain(inner) => (inner, false),
            DrmWrapper::Container { inner } => (inner, true),
            DrmWrapper::ElementaryStream { hint } => {
                log::debug!("基于基本流的 DRM 内容, 内层提示: {hint}");
                return Ok(Arc::new(DrmExtractor::new(source, hint)));
            }
        };

        let init = ExtractorInit { drm, sniff_meta };
        let extractor = self.dispatch(source, inner, &init, origin)?;
        log::debug!(
            "格式 {inner} 使用解封装器 {} (DRM: {})",
            extractor.name(),
            extractor.drm_flag()
        );
        Ok(Arc::from(extractor))
    }

    /// 按格式分发到具体解封装器
    ///
    /// 备用探测器胜出时优先询问插件; 插件在一次调用中最多被询问一次.
    fn dispatch(
        &self,
        source: SourceHandle,
        mime: &str,
        init: &ExtractorInit,
        origin: Option<SniffOrigin>,
    ) -> BianResult<Box<dyn MediaExtractor>> {
        let mut plugin_consulted = false;
        if origin == Some(SniffOrigin::Secondary) {
            if let Some(extractor) = self.try_plugin(&source, mime, init) {
                return Ok(extractor);
            }
            plugin_consulted = true;
        }

        if let Some(entry) = self.registry.lookup(mime) {
            return entry.create(source, init);
        }

        if !plugin_consulted {
            if let Some(extractor) = self.try_plugin(&source, mime, init) {
                return Ok(extractor);
            }
        }

        log::warn!("没有可用的解封装器: {mime}");
        Err(BianError::UnsupportedFormat(mime.to_string()))
    }

    /// 询问备用插件; 返回的解封装器一律携带计算出的 DRM 标志
    fn try_plugin(
        &self,
        source: &SourceHandle,
        mime: &str,
        init: &ExtractorInit,
    ) -> Option<Box<dyn MediaExtractor>> {
        let plugin = self.plugin.as_ref()?;
        let extractor = plugin.create(source, mime, init);
        log::debug!(
            "备用插件 {} 处理 {mime}: {}",
            plugin.name(),
            if extractor.is_some() { "成功" } else { "无结果" }
        );
        extractor.map(|extractor| DrmTagged::apply(extractor, init.drm))
    }
}

/// 读取解封装器元数据中的 MIME 类型
pub fn extractor_mime(extractor: &dyn MediaExtractor) -> Option<String> {
    extractor
        .metadata()
        .get_str(metadata::KEY_MIME_TYPE)
        .map(str::to_string)
}
