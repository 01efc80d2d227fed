//! 通用键值元数据容器.
//!
//! 探测器的附带信息和解封装器的容器级元数据都使用 [`MetaData`] 传递.
//! 键为字符串, 值为少量带类型的标量.

use std::collections::BTreeMap;
use std::fmt;

/// 元数据键: 容器 MIME 类型
pub const KEY_MIME_TYPE: &str = "mime";
/// 元数据键: 内容是否受 DRM 保护 (i32, 1 表示是)
pub const KEY_IS_DRM: &str = "is-drm";
/// 元数据键: 第一个有效帧在数据源中的字节偏移
pub const KEY_OFFSET: &str = "offset";
/// 元数据键: ID3v2 标签之后的字节偏移
pub const KEY_POST_ID3_OFFSET: &str = "post-id3-offset";

/// 元数据值
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    /// 32 位整数
    Int32(i32),
    /// 64 位整数
    Int64(i64),
    /// 字符串
    Str(String),
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

/// 键值元数据容器
///
/// 按键有序存储, 便于稳定输出. 空容器是合法值.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaData {
    items: BTreeMap<String, MetaValue>,
}

impl MetaData {
    /// 创建空容器
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入任意类型的值, 覆盖同名键
    pub fn set(&mut self, key: impl Into<String>, value: MetaValue) {
        self.items.insert(key.into(), value);
    }

    /// 写入 i32
    pub fn set_i32(&mut self, key: impl Into<String>, value: i32) {
        self.set(key, MetaValue::Int32(value));
    }

    /// 写入 i64
    pub fn set_i64(&mut self, key: impl Into<String>, value: i64) {
        self.set(key, MetaValue::Int64(value));
    }

    /// 写入字符串
    pub fn set_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, MetaValue::Str(value.into()));
    }

    /// 读取原始值
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.items.get(key)
    }

    /// 读取 i32, 类型不符时返回 None
    pub fn get_i32(&self, key: &str) -> Option<i32> {
        match self.items.get(key) {
            Some(MetaValue::Int32(v)) => Some(*v),
            _ => None,
        }
    }

    /// 读取 i64, i32 值会被自动扩展
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.items.get(key) {
            Some(MetaValue::Int64(v)) => Some(*v),
            Some(MetaValue::Int32(v)) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// 读取字符串
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.items.get(key) {
            Some(MetaValue::Str(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// 是否包含指定键
    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 按键顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }
}
