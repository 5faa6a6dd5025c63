//! # 图像读写模块
//!
//! 负责在图像文件与原始 RGBA 像素缓冲区之间转换。
//! 隐写后的结果只允许以无损格式保存，否则隐藏的比特会在重新压缩时丢失。

use anyhow::{Context, Result, bail};
use colored::Colorize;
use image::{ExtendedColorType, ImageFormat};
use log::debug;
use std::path::Path;

/// 解码后的 RGBA 像素缓冲区及其尺寸。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaPixels {
    pub width: u32,
    pub height: u32,
    /// 每像素 4 字节 `[R, G, B, A]`，按行优先排列。
    pub data: Vec<u8>,
}

/// 读取图像文件并转换为 8 位 RGBA 缓冲区。
///
/// # Errors
///
/// 文件无法打开或不是受支持的图像格式时返回错误。
pub fn load_rgba(path: &Path) -> Result<RgbaPixels> {
    let img = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!("loaded {}x{} image from {}", width, height, path.display());

    Ok(RgbaPixels {
        width,
        height,
        data: rgba.into_raw(),
    })
}

/// 将 RGBA 缓冲区按输出路径的扩展名编码为无损图像。
///
/// # Errors
///
/// * 输出格式不是无损格式 (见 [`lossless_format`])。
/// * 编码或写入文件失败。
pub fn save_rgba(pixels: &RgbaPixels, path: &Path) -> Result<()> {
    let format = lossless_format(path)?;

    image::save_buffer_with_format(
        path,
        &pixels.data,
        pixels.width,
        pixels.height,
        ExtendedColorType::Rgba8,
        format,
    )
    .with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 根据扩展名确定输出格式，拒绝有损格式和未知格式。
pub fn lossless_format(path: &Path) -> Result<ImageFormat> {
    let format = ImageFormat::from_path(path).with_context(|| {
        format!(
            "Unsupported output image format: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    match format {
        ImageFormat::Png
        | ImageFormat::Bmp
        | ImageFormat::Tiff
        | ImageFormat::WebP
        | ImageFormat::Qoi => Ok(format),
        other => bail!(
            "Output format {:?} is lossy or unsupported and would destroy the hidden bits: {}",
            other,
            path.to_string_lossy().red().bold()
        ),
    }
}
