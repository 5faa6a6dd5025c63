//! # 隐写核心算法模块
//!
//! 在 RGBA 像素缓冲区的 R/G/B 通道最低位中隐藏和恢复文本。
//!
//! ## 布局
//!
//! - 通道流：按像素顺序排列的 R、G、B 样本，跳过每个像素的 A 样本。
//! - 通道流位置 `0..32`：载荷字节数，`u32`，高位在前。
//! - 随后 `len * 8` 个位置：载荷的 UTF-8 字节，每个字节高位在前。
//!
//! 每个被写入的样本只改变最低位，其余比特保持不变。

use crate::constants::{BITS_PER_BYTE, BYTES_PER_PIXEL, CHANNELS_PER_PIXEL, HEADER_BITS};
use crate::error::{Result, StegoError};
use log::{debug, warn};

/// 计算 `width x height` 的 RGBA 图像最多可隐藏的载荷字节数。
///
/// 通道流不足以容纳长度头时返回 0。
pub fn capacity_bytes(width: u32, height: u32) -> usize {
    stream_bits_for(width, height)
        .checked_sub(HEADER_BITS as usize)
        .map_or(0, |bits| bits / BITS_PER_BYTE as usize)
}

/// 将通道流位置映射为像素缓冲区中的字节偏移。
///
/// `0 -> R`, `1 -> G`, `2 -> B`，随后进入下一个像素；Alpha 样本永远不会被寻址。
pub fn channel_offset(index: usize) -> usize {
    let pixel = index / CHANNELS_PER_PIXEL;
    let channel = index % CHANNELS_PER_PIXEL;
    pixel * BYTES_PER_PIXEL + channel
}

/// 将 `value` 的低 `bits` 位 (高位在前) 写入通道流位置 `position` 起的最低位。
///
/// 写入前检查边界，越界时缓冲区保持不变。
pub fn modify(value: u32, bits: u32, pix: &mut [u8], position: usize) -> Result<()> {
    check_region(pix, position, bits)?;

    for k in 0..bits {
        let bit = ((value >> (bits - 1 - k)) & 1) as u8;
        let byte = &mut pix[channel_offset(position + k as usize)];
        *byte = (*byte & 0xFE) | bit;
    }

    Ok(())
}

/// 从通道流位置 `position` 起读取 `bits` 个最低位，按高位在前拼成整数。
pub fn recover(pix: &[u8], position: usize, bits: u32) -> Result<u32> {
    check_region(pix, position, bits)?;

    let value = (0..bits).fold(0u32, |acc, k| {
        let lsb = pix[channel_offset(position + k as usize)] & 1;
        (acc << 1) | u32::from(lsb)
    });

    Ok(value)
}

/// 将 `message` 隐藏到 `pix` 中。
///
/// 容量不足时返回 [`StegoError::CapacityExceeded`]，且不会修改缓冲区。
///
/// # Errors
///
/// * [`StegoError::InvalidBuffer`] - 缓冲区长度与宽高不符。
/// * [`StegoError::CapacityExceeded`] - 长度头与载荷无法放入通道流。
pub fn embed(pix: &mut [u8], width: u32, height: u32, message: &str) -> Result<()> {
    check_dimensions(pix, width, height)?;

    let payload = message.as_bytes();
    let available_bits = stream_bits(pix);
    let required_bits = payload
        .len()
        .saturating_mul(BITS_PER_BYTE as usize)
        .saturating_add(HEADER_BITS as usize);

    let header = match u32::try_from(payload.len()) {
        Ok(len) if required_bits <= available_bits => len,
        _ => {
            return Err(StegoError::CapacityExceeded {
                required_bits,
                available_bits,
            });
        }
    };

    debug!(
        "embedding {} payload bytes ({} of {} channel bits)",
        payload.len(),
        required_bits,
        available_bits
    );

    modify(header, HEADER_BITS, pix, 0)?;

    payload.iter().enumerate().try_for_each(|(i, &byte)| {
        let position = HEADER_BITS as usize + BITS_PER_BYTE as usize * i;
        modify(u32::from(byte), BITS_PER_BYTE, pix, position)
    })
}

/// 从 `pix` 中恢复隐藏的文本。
///
/// 长度头为 0 或超出容量时视为没有消息，返回空字符串。
///
/// # Errors
///
/// * [`StegoError::InvalidBuffer`] - 缓冲区长度与宽高不符。
/// * [`StegoError::InvalidEncoding`] - 载荷不是合法的 UTF-8。
pub fn extract(pix: &[u8], width: u32, height: u32) -> Result<String> {
    check_dimensions(pix, width, height)?;

    if stream_bits(pix) < HEADER_BITS as usize {
        debug!("image too small to hold a length header");
        return Ok(String::new());
    }

    let text_len = recover(pix, 0, HEADER_BITS)? as usize;
    let capacity = capacity_bytes(width, height);

    if text_len == 0 {
        debug!("length header is zero, no message present");
        return Ok(String::new());
    }
    if text_len > capacity {
        warn!(
            "length header claims {} bytes but capacity is {}, treating as no message",
            text_len, capacity
        );
        return Ok(String::new());
    }

    debug!("extracting {} payload bytes", text_len);

    let text = (0..text_len)
        .map(|i| {
            let position = HEADER_BITS as usize + BITS_PER_BYTE as usize * i;
            recover(pix, position, BITS_PER_BYTE).map(|value| value as u8)
        })
        .collect::<Result<Vec<u8>>>()?;

    Ok(String::from_utf8(text)?)
}

fn stream_bits_for(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(CHANNELS_PER_PIXEL)
}

fn stream_bits(pix: &[u8]) -> usize {
    pix.len() / BYTES_PER_PIXEL * CHANNELS_PER_PIXEL
}

fn check_dimensions(pix: &[u8], width: u32, height: u32) -> Result<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL));

    if expected != Some(pix.len()) {
        return Err(StegoError::InvalidBuffer {
            len: pix.len(),
            width,
            height,
        });
    }

    Ok(())
}

fn check_region(pix: &[u8], position: usize, bits: u32) -> Result<()> {
    let in_bounds = bits <= u32::BITS
        && position
            .checked_add(bits as usize)
            .is_some_and(|end| end <= stream_bits(pix));

    if !in_bounds {
        return Err(StegoError::OutOfBounds { position, bits });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_offset_skips_alpha() {
        let offsets: Vec<usize> = (0..7).map(channel_offset).collect();
        assert_eq!(offsets, vec![0, 1, 2, 4, 5, 6, 8]);
        assert!((0..3000).all(|i| channel_offset(i) % BYTES_PER_PIXEL != 3));
    }

    #[test]
    fn test_capacity_bytes() {
        assert_eq!(capacity_bytes(10, 10), 33);
        assert_eq!(capacity_bytes(1, 1), 0);
        assert_eq!(capacity_bytes(0, 100), 0);
        // 11 个像素 = 33 bits，仅够放下长度头
        assert_eq!(capacity_bytes(11, 1), 0);
        assert_eq!(capacity_bytes(14, 1), 1);
    }

    #[test]
    fn test_modify_writes_msb_first() {
        let mut pix = vec![0u8; 8];
        modify(0b101, 3, &mut pix, 0).unwrap();
        assert_eq!(pix[..4], [1u8, 0, 1, 0]);

        modify(0b11, 2, &mut pix, 3).unwrap();
        assert_eq!(pix[4..], [1u8, 1, 0, 0]);
    }

    #[test]
    fn test_modify_preserves_upper_bits() {
        let mut pix = vec![0xFF, 0xFE, 0x80, 0x42];
        modify(0b010, 3, &mut pix, 0).unwrap();
        assert_eq!(pix, vec![0xFEu8, 0xFF, 0x80, 0x42]);
    }

    #[test]
    fn test_modify_recover_header_width() {
        let mut pix = vec![0x55u8; 44];
        modify(0xDEAD_BEEF, 32, &mut pix, 0).unwrap();
        assert_eq!(recover(&pix, 0, 32).unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn test_out_of_bounds_leaves_buffer_untouched() {
        let mut pix = vec![7u8; 8];
        let err = modify(0xFF, 8, &mut pix, 0).unwrap_err();
        assert!(matches!(err, StegoError::OutOfBounds { position: 0, bits: 8 }));
        assert_eq!(pix, vec![7u8; 8]);

        assert!(recover(&pix, 5, 2).is_err());
        assert!(recover(&pix, 0, 33).is_err());
        assert!(recover(&pix, usize::MAX, 1).is_err());
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut pix = vec![0u8; 400];
        assert!(matches!(
            embed(&mut pix, 10, 9, "hi"),
            Err(StegoError::InvalidBuffer { len: 400, width: 10, height: 9 })
        ));
        assert!(matches!(
            extract(&pix[..399], 10, 10),
            Err(StegoError::InvalidBuffer { .. })
        ));
    }

    #[test]
    fn test_tiny_image_has_no_message() {
        let pix = vec![0xFFu8; 4 * 4];
        assert_eq!(extract(&pix, 2, 2).unwrap(), "");
    }
}
