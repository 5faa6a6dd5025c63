/// 长度头占用的比特数。
/// 载荷长度 (字节数) 以 `u32` 存储，每个颜色通道的最低位承载 1 bit，
/// 因此长度头占用通道流的前 32 个位置。
pub const HEADER_BITS: u32 = 32;

/// 每个像素中可用于隐写的通道数 (R, G, B)。Alpha 通道从不修改。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// RGBA 像素缓冲区中每个像素占用的字节数。
pub const BYTES_PER_PIXEL: usize = 4;

/// 每个载荷字节在通道流中占用的位置数。
pub const BITS_PER_BYTE: u32 = 8;

/// 未指定输出路径时，隐写结果图像的文件名前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复文本的文件名前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";
