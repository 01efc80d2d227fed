//! 内容探测与仲裁.
//!
//! 未声明格式时, 先由数据源自身的探测器给出 (MIME, 置信度),
//! 再按 [`SniffPolicy`] 决定是否请求备用探测器复核, 最后仲裁出胜者.

use std::sync::{Arc, OnceLock};

use bian_core::{BianError, BianResult, MetaData};
use serde::Deserialize;

use crate::mime;
use crate::source::DataSource;

/// 探测结果
///
/// 置信度取值 [0, 1], 0 表示"未识别"而不是"低置信度".
#[derive(Debug, Clone, PartialEq)]
pub struct SniffResult {
    /// 识别出的格式标识符
    pub mime: String,
    /// 置信度
    pub confidence: f32,
    /// 探测过程中得到的附带信息 (如首帧偏移)
    pub meta: Option<MetaData>,
}

impl SniffResult {
    /// 创建不带附带信息的结果
    pub fn new(mime: impl Into<String>, confidence: f32) -> Self {
        Self {
            mime: mime.into(),
            confidence,
            meta: None,
        }
    }

    /// 附加探测信息
    pub fn with_meta(mut self, meta: MetaData) -> Self {
        self.meta = Some(meta);
        self
    }

    /// 是否为有效识别 (置信度为正)
    pub fn is_recognized(&self) -> bool {
        self.confidence > 0.0
    }
}

/// 格式探测器 trait
///
/// 内置探测器与可选的备用探测引擎都实现此 trait.
/// 探测失败 (包括读取错误) 一律返回 None, 不向上传播错误.
pub trait Sniffer: Send + Sync {
    /// 探测器名称, 用于日志
    fn name(&self) -> &str;

    /// 探测数据源格式
    fn sniff(&self, source: &dyn DataSource) -> Option<SniffResult>;
}

/// 探测器集合
///
/// 依次运行所有探测器, 返回置信度最高的结果; 置信度相同时先注册者优先.
#[derive(Default)]
pub struct SnifferSet {
    sniffers: Vec<Box<dyn Sniffer>>,
}

static BUILTIN_SNIFFERS: OnceLock<Arc<SnifferSet>> = OnceLock::new();

impl SnifferSet {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级共享的内置探测器集合
    pub fn builtin() -> Arc<SnifferSet> {
        Arc::clone(BUILTIN_SNIFFERS.get_or_init(|| {
            let mut set = SnifferSet::new();
            crate::extractors::register_all_sniffers(&mut set);
            Arc::new(set)
        }))
    }

    /// 注册一个探测器
    pub fn register(&mut self, sniffer: Box<dyn Sniffer>) {
        self.sniffers.push(sniffer);
    }

    /// 已注册的探测器数量
    pub fn len(&self) -> usize {
        self.sniffers.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.sniffers.is_empty()
    }

    /// 运行所有探测器
    pub fn sniff(&self, source: &dyn DataSource) -> Option<SniffResult> {
        let mut best: Option<SniffResult> = None;
        for sniffer in &self.sniffers {
            let Some(result) = sniffer.sniff(source) else {
                continue;
            };
            if !result.is_recognized() {
                continue;
            }
            log::trace!(
                "探测器 {} 识别为 {} (置信度 {:.2})",
                sniffer.name(),
                result.mime,
                result.confidence
            );
            if best
                .as_ref()
                .is_none_or(|b| result.confidence > b.confidence)
            {
                best = Some(result);
            }
        }
        best
    }
}

/// 仲裁策略
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SniffPolicy {
    /// 主探测置信度低于此值时请求备用探测器
    pub secondary_threshold: f32,
    /// 已知存在歧义的格式, 无论置信度多高都请求备用探测器复核
    pub ambiguous_mimes: Vec<String>,
    /// 无备用探测器时, 主探测置信度必须严格大于此值才被接受
    pub min_confidence: f32,
}

impl Default for SniffPolicy {
    fn default() -> Self {
        Self {
            secondary_threshold: 0.8,
            ambiguous_mimes: vec![mime::AUDIO_WMA.to_string()],
            min_confidence: 0.0,
        }
    }
}

impl SniffPolicy {
    /// 从 JSON 文本加载, 缺省字段取默认值, 未知字段报错
    pub fn from_json(text: &str) -> BianResult<Self> {
        let policy: SniffPolicy = serde_json::from_str(text)
            .map_err(|e| BianError::InvalidArgument(format!("仲裁策略解析失败: {e}")))?;
        policy.validate()?;
        Ok(policy)
    }

    /// 检查阈值范围
    pub fn validate(&self) -> BianResult<()> {
        for (name, value) in [
            ("secondary_threshold", self.secondary_threshold),
            ("min_confidence", self.min_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(BianError::InvalidArgument(format!(
                    "{name} 必须位于 [0, 1], 实际为 {value}"
                )));
            }
        }
        Ok(())
    }

    /// 是否需要请求备用探测器
    pub fn should_consult_secondary(&self, primary_mime: &str, primary_confidence: f32) -> bool {
        primary_confidence < self.secondary_threshold
            || self
                .ambiguous_mimes
                .iter()
                .any(|m| mime::matches(m, primary_mime))
    }
}

/// 探测结果的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffOrigin {
    /// 数据源自身的探测器
    Primary,
    /// 备用探测器
    Secondary,
}

/// 仲裁后的格式
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFormat {
    /// 胜出的格式标识符
    pub mime: String,
    /// 胜出者的置信度, 此后仅供参考
    pub confidence: f32,
    /// 胜出者的附带信息
    pub meta: Option<MetaData>,
    /// 胜出者来源
    pub origin: SniffOrigin,
}

impl ResolvedFormat {
    fn from_result(result: SniffResult, origin: SniffOrigin) -> Self {
        Self {
            mime: result.mime,
            confidence: result.confidence,
            meta: result.meta,
            origin,
        }
    }
}

/// 探测并仲裁数据源格式
///
/// 规则:
/// - 没有备用探测器时, 主探测置信度需大于 `policy.min_confidence`
/// - 备用探测器未识别且主探测置信度 <= 0 时失败
/// - 主探测置信度为 0, 或备用置信度更高, 或备用给出了不同的正置信度结果时, 备用胜出
pub fn resolve_format(
    source: &dyn DataSource,
    secondary: Option<&dyn Sniffer>,
    policy: &SniffPolicy,
) -> BianResult<ResolvedFormat> {
    let primary = source
        .sniff()
        .unwrap_or_else(|| SniffResult::new("", 0.0));

    let Some(secondary) = secondary else {
        if primary.confidence > policy.min_confidence {
            return Ok(ResolvedFormat::from_result(primary, SniffOrigin::Primary));
        }
        log::error!("无法自动识别数据源内容格式");
        return Err(BianError::UnrecognizedFormat);
    };

    if !policy.should_consult_secondary(&primary.mime, primary.confidence) {
        if primary.is_recognized() {
            return Ok(ResolvedFormat::from_result(primary, SniffOrigin::Primary));
        }
        return Err(BianError::UnrecognizedFormat);
    }

    let alternate = secondary.sniff(source).filter(SniffResult::is_recognized);
    log::debug!(
        "备用探测器 {} 结果: {:?}, 主探测: {} ({:.2})",
        secondary.name(),
        alternate.as_ref().map(|r| (r.mime.as_str(), r.confidence)),
        primary.mime,
        primary.confidence
    );

    let Some(alternate) = alternate else {
        if primary.confidence <= 0.0 {
            log::error!("主探测器与备用探测器均无法识别内容格式");
            return Err(BianError::UnrecognizedFormat);
        }
        return Ok(ResolvedFormat::from_result(primary, SniffOrigin::Primary));
    };

    let overrides = primary.confidence == 0.0
        || alternate.confidence > primary.confidence
        || !mime::matches(&alternate.mime, &primary.mime);
    if overrides {
        Ok(ResolvedFormat::from_result(alternate, SniffOrigin::Secondary))
    } else {
        Ok(ResolvedFormat::from_result(primary, SniffOrigin::Primary))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// 只返回固定探测结果的数据源
    struct FixedSource(Option<SniffResult>);

    impl DataSource for FixedSource {
        fn read_at(&self, _offset: u64, _buf: &mut [u8]) -> BianResult<usize> {
            Ok(0)
        }

        fn size(&self) -> Option<u64> {
            Some(0)
        }

        fn sniff(&self) -> Option<SniffResult> {
            self.0.clone()
        }
    }

    /// 记录调用次数的备用探测器
    struct CountingSniffer {
        result: Option<SniffResult>,
        calls: AtomicUsize,
    }

    impl CountingSniffer {
        fn new(result: Option<SniffResult>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Sniffer for CountingSniffer {
        fn name(&self) -> &str {
            "counting"
        }

        fn sniff(&self, _source: &dyn DataSource) -> Option<SniffResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn source(mime: &str, confidence: f32) -> FixedSource {
        FixedSource(Some(SniffResult::new(mime, confidence)))
    }

    #[test]
    fn test_无备用_零置信度失败() {
        let result = resolve_format(&source("audio/mpeg", 0.0), None, &SniffPolicy::default());
        assert!(matches!(result, Err(BianError::UnrecognizedFormat)));

        let result = resolve_format(&FixedSource(None), None, &SniffPolicy::default());
        assert!(matches!(result, Err(BianError::UnrecognizedFormat)));
    }

    #[test]
    fn test_无备用_低置信度仍被接受() {
        let resolved =
            resolve_format(&source("video/mp2ts", 0.1), None, &SniffPolicy::default()).unwrap();
        assert_eq!(resolved.mime, "video/mp2ts");
        assert_eq!(resolved.origin, SniffOrigin::Primary);
    }

    #[test]
    fn test_无备用_最低置信度策略() {
        let policy = SniffPolicy {
            min_confidence: 0.3,
            ..SniffPolicy::default()
        };
        let result = resolve_format(&source("video/mp2ts", 0.1), None, &policy);
        assert!(matches!(result, Err(BianError::UnrecognizedFormat)));
    }

    #[test]
    fn test_高置信度不触发备用() {
        let secondary = CountingSniffer::new(Some(SniffResult::new("video/avi", 1.0)));
        let resolved = resolve_format(
            &source("video/mp4", 0.9),
            Some(&secondary),
            &SniffPolicy::default(),
        )
        .unwrap();
        assert_eq!(resolved.mime, "video/mp4");
        assert_eq!(resolved.origin, SniffOrigin::Primary);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_歧义格式总是触发备用() {
        let secondary = CountingSniffer::new(Some(SniffResult::new("video/x-ms-asf", 0.5)));
        let resolved = resolve_format(
            &source("AUDIO/WMA", 0.95),
            Some(&secondary),
            &SniffPolicy::default(),
        )
        .unwrap();
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 1);
        // 不同标识且备用置信度为正, 备用胜出
        assert_eq!(resolved.mime, "video/x-ms-asf");
        assert_eq!(resolved.origin, SniffOrigin::Secondary);
    }

    #[test]
    fn test_置信度相同但标识不同时备用胜出() {
        let secondary = CountingSniffer::new(Some(SniffResult::new("B", 0.5)));
        let resolved =
            resolve_format(&source("A", 0.5), Some(&secondary), &SniffPolicy::default()).unwrap();
        assert_eq!(resolved.mime, "B");
        assert_eq!(resolved.confidence, 0.5);
    }

    #[test]
    fn test_相同标识较低置信度时主探测保留() {
        let mut meta = MetaData::new();
        meta.set_i64(bian_core::metadata::KEY_OFFSET, 3);
        let primary = FixedSource(Some(SniffResult::new("audio/mpeg", 0.5).with_meta(meta)));
        let secondary = CountingSniffer::new(Some(SniffResult::new("Audio/MPEG", 0.3)));

        let resolved = resolve_format(&primary, Some(&secondary), &SniffPolicy::default()).unwrap();
        assert_eq!(resolved.origin, SniffOrigin::Primary);
        assert_eq!(resolved.confidence, 0.5);
        assert!(resolved.meta.is_some());
    }

    #[test]
    fn test_相同标识更高置信度时备用胜出() {
        let secondary = CountingSniffer::new(Some(SniffResult::new("audio/mpeg", 0.7)));
        let resolved = resolve_format(
            &source("audio/mpeg", 0.2),
            Some(&secondary),
            &SniffPolicy::default(),
        )
        .unwrap();
        assert_eq!(resolved.origin, SniffOrigin::Secondary);
        assert_eq!(resolved.confidence, 0.7);
    }

    #[test]
    fn test_主探测为零时备用胜出() {
        let secondary = CountingSniffer::new(Some(SniffResult::new("audio/ape", 0.1)));
        let resolved =
            resolve_format(&FixedSource(None), Some(&secondary), &SniffPolicy::default()).unwrap();
        assert_eq!(resolved.mime, "audio/ape");
        assert_eq!(resolved.origin, SniffOrigin::Secondary);
    }

    #[test]
    fn test_两者均未识别时失败() {
        let secondary = CountingSniffer::new(None);
        let result = resolve_format(&FixedSource(None), Some(&secondary), &SniffPolicy::default());
        assert!(matches!(result, Err(BianError::UnrecognizedFormat)));

        let zero = CountingSniffer::new(Some(SniffResult::new("audio/ape", 0.0)));
        let result = resolve_format(&source("", 0.0), Some(&zero), &SniffPolicy::default());
        assert!(matches!(result, Err(BianError::UnrecognizedFormat)));
    }

    #[test]
    fn test_备用未识别时主探测保留() {
        let secondary = CountingSniffer::new(None);
        let resolved = resolve_format(
            &source("application/ogg", 0.2),
            Some(&secondary),
            &SniffPolicy::default(),
        )
        .unwrap();
        assert_eq!(resolved.mime, "application/ogg");
        assert_eq!(resolved.origin, SniffOrigin::Primary);
    }

    #[test]
    fn test_策略_json_加载() {
        let policy = SniffPolicy::from_json(r#"{"secondary_threshold": 0.5}"#).unwrap();
        assert_eq!(policy.secondary_threshold, 0.5);
        assert_eq!(policy.ambiguous_mimes, vec!["audio/wma".to_string()]);
        assert_eq!(policy.min_confidence, 0.0);

        let err = SniffPolicy::from_json(r#"{"min_confidence": 1.5}"#);
        assert!(matches!(err, Err(BianError::InvalidArgument(_))));
        let err = SniffPolicy::from_json("not json");
        assert!(matches!(err, Err(BianError::InvalidArgument(_))));
    }

    #[test]
    fn test_策略_拼错的字段名被拒绝() {
        let err = SniffPolicy::from_json(r#"{"min_confidnce": 0.5}"#);
        assert!(
            matches!(&err, Err(BianError::InvalidArgument(m)) if m.contains("min_confidnce")),
            "{err:?}"
        );
    }

    #[test]
    fn test_策略_非数值阈值被拒绝() {
        let policy = SniffPolicy {
            secondary_threshold: f32::NAN,
            ..SniffPolicy::default()
        };
        assert!(matches!(policy.validate(), Err(BianError::InvalidArgument(_))));
    }

    #[test]
    fn test_探测器集合_先注册者在平局时优先() {
        struct Fixed(&'static str, f32);
        impl Sniffer for Fixed {
            fn name(&self) -> &str {
                self.0
            }
            fn sniff(&self, _source: &dyn DataSource) -> Option<SniffResult> {
                Some(SniffResult::new(self.0, self.1))
            }
        }

        let mut set = SnifferSet::new();
        set.register(Box::new(Fixed("first", 0.3)));
        set.register(Box::new(Fixed("second", 0.3)));
        set.register(Box::new(Fixed("zero", 0.0)));
        let best = set.sniff(&FixedSource(None)).unwrap();
        assert_eq!(best.mime, "first");

        set.register(Box::new(Fixed("third", 0.4)));
        assert_eq!(set.sniff(&FixedSource(None)).unwrap().mime, "third");
    }
}
