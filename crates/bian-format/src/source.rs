//! 可随机访问的字节数据源.
//!
//! [`DataSource`] 是探测器和解封装器共同依赖的输入抽象: 按偏移读取,
//! 不维护共享的读取位置, 因此探测不会影响后续解封装器的读取.

use std::path::Path;
use std::sync::{Arc, Mutex};

use bian_core::{BianError, BianResult};

use crate::io::IoContext;
use crate::sniff::{SniffResult, SnifferSet};

/// 共享的数据源句柄
///
/// 解封装器持有其克隆, 数据源的生命周期至少与解封装器一样长.
pub type SourceHandle = Arc<dyn DataSource>;

/// 数据源 trait
pub trait DataSource: Send + Sync {
    /// 从 `offset` 处读取数据到 `buf`, 返回实际读取的字节数 (0 表示末尾)
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> BianResult<usize>;

    /// 总大小 (如果可知)
    fn size(&self) -> Option<u64>;

    /// 识别自身内容格式
    ///
    /// 返回置信度最高的探测结果, 无法识别时返回 None (等价于置信度 0).
    fn sniff(&self) -> Option<SniffResult> {
        None
    }

    /// 从 `offset` 处读满 `buf`, 数据不足时返回 [`BianError::Eof`]
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> BianResult<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_at(offset + filled as u64, &mut buf[filled..])?;
            if n == 0 {
                return Err(BianError::Eof);
            }
            filled += n;
        }
        Ok(())
    }

    /// 读取 `offset` 处最多 `len` 字节, 末尾不足时返回较短的数据
    fn read_header(&self, offset: u64, len: usize) -> BianResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            let n = self.read_at(offset + filled as u64, &mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        buf.truncate(filled);
        Ok(buf)
    }
}

/// 基于 [`IoContext`] 的数据源
///
/// 内部用互斥锁保护 I/O 上下文的缓存窗口, 对外提供无状态的按偏移读取.
pub struct IoSource {
    io: Mutex<IoContext>,
    size: Option<u64>,
    sniffers: Arc<SnifferSet>,
}

impl IoSource {
    /// 从 I/O 上下文创建, 使用内置探测器集合
    pub fn new(io: IoContext) -> Self {
        Self::with_sniffers(io, SnifferSet::builtin())
    }

    /// 从 I/O 上下文创建, 使用指定的探测器集合
    pub fn with_sniffers(io: IoContext, sniffers: Arc<SnifferSet>) -> Self {
        let size = io.size();
        Self {
            io: Mutex::new(io),
            size,
            sniffers,
        }
    }

    /// 打开文件作为数据源
    pub fn open(path: impl AsRef<Path>) -> BianResult<Self> {
        Ok(Self::new(IoContext::open_read(path)?))
    }

    /// 以内存数据作为数据源
    pub fn from_memory(data: Vec<u8>) -> Self {
        Self::new(IoContext::from_memory(data))
    }

    /// 转换为共享句柄
    pub fn into_handle(self) -> SourceHandle {
        Arc::new(self)
    }
}

impl DataSource for IoSource {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> BianResult<usize> {
        if self.size.is_some_and(|size| offset >= size) {
            return Ok(0);
        }
        let mut io = self
            .io
            .lock()
            .map_err(|_| BianError::InvalidData("数据源锁已损坏".into()))?;
        io.read_at(offset, buf)
    }

    fn size(&self) -> Option<u64> {
        self.size
    }

    fn sniff(&self) -> Option<SniffResult> {
        self.sniffers.sniff(self)
    }
}
