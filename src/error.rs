//! # 错误模型模块
//!
//! 隐写编解码器的全部失败情形集中在 `StegoError` 中。
//! "未找到消息" 不是错误：`extract` 对此返回空字符串。

use std::string::FromUtf8Error;

/// 隐写编解码器的统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum StegoError {
    /// 缓冲区长度与 `width * height * 4` 不一致。
    #[error("pixel buffer of {len} bytes does not match a {width}x{height} RGBA image")]
    InvalidBuffer { len: usize, width: u32, height: u32 },

    /// 长度头加载荷所需的比特数超过了通道流的容量。
    #[error("message needs {required_bits} bits but the image only offers {available_bits}")]
    CapacityExceeded {
        required_bits: usize,
        available_bits: usize,
    },

    /// 恢复出的载荷不是合法的 UTF-8。
    #[error("recovered payload is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] FromUtf8Error),

    /// 读写区域超出了通道流的边界。
    #[error("{bits} bits at channel position {position} fall outside the channel stream")]
    OutOfBounds { position: usize, bits: u32 },
}

pub type Result<T> = std::result::Result<T, StegoError>;
