//! ID3v2 标签跳过.
//!
//! MP3 / AAC / FLAC 文件常以一个或多个 ID3v2 标签开头, 探测前需要跳过.

use bian_core::BianResult;

use crate::source::DataSource;

/// ID3v2 头部长度
const ID3V2_HEADER_SIZE: u64 = 10;

/// 解析 28 位 syncsafe 整数
fn syncsafe_u32(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(4)
        .fold(0u32, |acc, b| (acc << 7) | u32::from(b & 0x7F))
}

/// 从 `pos` 开始跳过所有连续的 ID3v2 标签, 返回标签之后的偏移
pub(crate) fn skip_id3v2(source: &dyn DataSource, mut pos: u64) -> BianResult<u64> {
    loop {
        let header = source.read_header(pos, ID3V2_HEADER_SIZE as usize)?;
        if header.len() < ID3V2_HEADER_SIZE as usize || &header[0..3] != b"ID3" {
            return Ok(pos);
        }
        let len = u64::from(syncsafe_u32(&header[6..10]));
        // footer 标志 (bit 4) 表示还有 10 字节尾部
        let footer = if header[5] & 0x10 != 0 {
            ID3V2_HEADER_SIZE
        } else {
            0
        };
        pos += ID3V2_HEADER_SIZE + len + footer;
    }
}

#[cfg(test)]
pub(crate) fn make_id3v2_tag(payload_len: u32) -> Vec<u8> {
    let mut tag = b"ID3\x04\x00\x00".to_vec();
    tag.extend_from_slice(&[
        ((payload_len >> 21) & 0x7F) as u8,
        ((payload_len >> 14) & 0x7F) as u8,
        ((payload_len >> 7) & 0x7F) as u8,
        (payload_len & 0x7F) as u8,
    ]);
    tag.resize(tag.len() + payload_len as usize, 0);
    tag
}
