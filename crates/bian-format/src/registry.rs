//! 解封装器注册表.
//!
//! 维护 "格式标识符 → 构造函数" 的分发表. 标识符按小写存储,
//! 查找不区分大小写. 内置表在进程内只构建一次.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use bian_core::{BianError, BianResult};

use crate::extractor::{ExtractorInit, MediaExtractor};
use crate::source::SourceHandle;

/// 解封装器构造函数类型
pub type ExtractorConstructor =
    fn(SourceHandle, &ExtractorInit) -> BianResult<Box<dyn MediaExtractor>>;

/// 备用分发插件
///
/// 为内置表之外的格式提供解封装器. 返回 None 表示"无意见", 不视为错误.
pub trait ExtractorPlugin: Send + Sync {
    /// 插件名称, 用于日志
    fn name(&self) -> &str;

    /// 尝试为指定格式创建解封装器
    fn create(
        &self,
        source: &SourceHandle,
        mime: &str,
        init: &ExtractorInit,
    ) -> Option<Box<dyn MediaExtractor>>;
}

/// 注册条目
#[derive(Clone)]
pub struct ExtractorEntry {
    /// 解封装器名称
    pub name: String,
    /// 构造函数
    pub constructor: ExtractorConstructor,
    /// 是否忽略 DRM 标志 (此类格式从不被 DRM 包装)
    pub drm_exempt: bool,
}

impl ExtractorEntry {
    /// 使用此条目构造解封装器
    pub fn create(
        &self,
        source: SourceHandle,
        init: &ExtractorInit,
    ) -> BianResult<Box<dyn MediaExtractor>> {
        if self.drm_exempt && init.drm {
            let exempt = ExtractorInit {
                drm: false,
                sniff_meta: init.sniff_meta.clone(),
            };
            return (self.constructor)(source, &exempt);
        }
        (self.constructor)(source, init)
    }
}

/// 解封装器注册表
#[derive(Default)]
pub struct ExtractorRegistry {
    entries: HashMap<String, ExtractorEntry>,
}

static GLOBAL_REGISTRY: OnceLock<Arc<ExtractorRegistry>> = OnceLock::new();

impl ExtractorRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建包含所有内置解封装器的注册表
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        crate::extractors::register_all_extractors(&mut registry);
        registry
    }

    /// 进程级共享的内置注册表
    pub fn global() -> Arc<ExtractorRegistry> {
        Arc::clone(GLOBAL_REGISTRY.get_or_init(|| Arc::new(Self::with_builtin())))
    }

    /// 注册一个解封装器, 同一标识符的旧条目被替换
    pub fn register(
        &mut self,
        mime: &str,
        name: impl Into<String>,
        constructor: ExtractorConstructor,
    ) {
        self.insert(mime, name.into(), constructor, false);
    }

    /// 注册一个忽略 DRM 标志的解封装器
    pub fn register_drm_exempt(
        &mut self,
        mime: &str,
        name: impl Into<String>,
        constructor: ExtractorConstructor,
    ) {
        self.insert(mime, name.into(), constructor, true);
    }

    fn insert(
        &mut self,
        mime: &str,
        name: String,
        constructor: ExtractorConstructor,
        drm_exempt: bool,
    ) {
        self.entries.insert(
            mime.to_ascii_lowercase(),
            ExtractorEntry {
                name,
                constructor,
                drm_exempt,
            },
        );
    }

    /// 查找格式对应的条目 (不区分大小写)
    pub fn lookup(&self, mime: &str) -> Option<&ExtractorEntry> {
        self.entries.get(&mime.to_ascii_lowercase())
    }

    /// 是否支持指定格式
    pub fn contains(&self, mime: &str) -> bool {
        self.lookup(mime).is_some()
    }

    /// 创建指定格式的解封装器
    pub fn create(
        &self,
        source: SourceHandle,
        mime: &str,
        init: &ExtractorInit,
    ) -> BianResult<Box<dyn MediaExtractor>> {
        let entry = self
            .lookup(mime)
            .ok_or_else(|| BianError::UnsupportedFormat(mime.to_string()))?;
        entry.create(source, init)
    }

    /// 获取所有已注册的 (标识符, 名称), 按标识符排序
    pub fn list(&self) -> Vec<(&str, &str)> {
        let mut list: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(mime, entry)| (mime.as_str(), entry.name.as_str()))
            .collect();
        list.sort_unstable();
        list
    }
}
