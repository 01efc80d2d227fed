//! 只读 I/O 层.
//!
//! [`IoContext`] 按偏移读取底层后端, 并缓存最近读取的一段窗口.
//! 探测器反复读取文件开头的少量字节, 窗口命中时不再访问后端.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use bian_core::BianResult;

/// 缓存窗口大小 (32 KB)
const WINDOW_SIZE: usize = 32 * 1024;

/// I/O 后端 trait
///
/// 实现此 trait 以支持不同的数据来源 (文件、内存等).
pub trait IoBackend: Send {
    /// 从 `offset` 处读取数据, 返回 0 表示已到末尾
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// 总大小 (如果可知)
    fn size(&self) -> Option<u64>;
}

/// 带窗口缓存的 I/O 上下文
pub struct IoContext {
    backend: Box<dyn IoBackend>,
    /// 窗口起始偏移
    window_start: u64,
    /// 窗口数据, 长度即有效字节数
    window: Vec<u8>,
}

impl IoContext {
    /// 从 I/O 后端创建上下文
    pub fn new(backend: Box<dyn IoBackend>) -> Self {
        Self {
            backend,
            window_start: 0,
            window: Vec::with_capacity(WINDOW_SIZE),
        }
    }

    /// 从文件路径打开 (只读)
    pub fn open_read(path: impl AsRef<Path>) -> BianResult<Self> {
        let file = File::open(path)?;
        Ok(Self::new(Box::new(FileBackend::new(file))))
    }

    /// 从内存数据创建
    pub fn from_memory(data: Vec<u8>) -> Self {
        Self::new(Box::new(MemoryBackend::new(data)))
    }

    /// 总大小
    pub fn size(&self) -> Option<u64> {
        self.backend.size()
    }

    /// 从 `offset` 处读取到 `buf`, 返回实际读取的字节数
    ///
    /// 只有在窗口未命中时才访问后端, 单次调用最多返回一个窗口的数据.
    pub fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> BianResult<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if !self.window_contains(offset) {
            self.fill_window(offset)?;
        }
        let start = (offset - self.window_start) as usize;
        let n = buf.len().min(self.window.len() - start);
        buf[..n].copy_from_slice(&self.window[start..start + n]);
        Ok(n)
    }

    fn window_contains(&self, offset: u64) -> bool {
        offset >= self.window_start && offset < self.window_start + self.window.len() as u64
    }

    fn fill_window(&mut self, offset: u64) -> BianResult<()> {
        self.window.resize(WINDOW_SIZE, 0);
        let mut filled = 0;
        while filled < WINDOW_SIZE {
            let n = self
                .backend
                .read_at(offset + filled as u64, &mut self.window[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        self.window.truncate(filled);
        self.window_start = offset;
        Ok(())
    }
}

/// 文件后端
struct FileBackend {
    file: File,
    size: Option<u64>,
}

impl FileBackend {
    fn new(file: File) -> Self {
        let size = file.metadata().ok().map(|m| m.len());
        Self { file, size }
    }
}

impl IoBackend for FileBackend {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read(buf)
    }

    fn size(&self) -> Option<u64> {
        self.size
    }
}

/// 内存后端
pub struct MemoryBackend {
    data: Vec<u8>,
}

impl MemoryBackend {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl IoBackend for MemoryBackend {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        let Some(available) = self.data.get(start..) else {
            return Ok(0);
        };
        let n = buf.len().min(available.len());
        buf[..n].copy_from_slice(&available[..n]);
        Ok(n)
    }

    fn size(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }
}
