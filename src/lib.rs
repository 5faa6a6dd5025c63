//! # lsb_canvas 库
//!
//! 本库包含 LSB 文本隐写编解码器及其命令行宿主。
//! 核心算法 (`steganography`) 只处理原始 RGBA 缓冲区，不涉及任何文件 I/O。

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod image_io;
pub mod logging;
pub mod steganography;

pub use error::StegoError;
pub use steganography::{capacity_bytes, embed, extract};
