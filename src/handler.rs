//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::{DOCTORED_PREFIX, RECOVERED_PREFIX};
use crate::image_io::{load_rgba, lossless_format, save_rgba};
use crate::steganography::{capacity_bytes, embed, extract};
use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和文本、检查隐写空间是否足够、调用隐写核心函数，
/// 最后将结果以无损格式写入目标图像文件。输入图像文件本身不会被修改。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`，或目标格式不是无损格式。
/// * 无法读取输入的图像或文本文件，或文本为空。
/// * 图像没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .unwrap_or_else(|| default_output(&args.image, DOCTORED_PREFIX, "png"));
    ensure_writable(&dest, args.force)?;
    lossless_format(&dest)?;

    let message = match (args.text, args.message) {
        (Some(path), _) => fs::read_to_string(&path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        })?,
        (None, Some(message)) => message,
        (None, None) => anyhow::bail!("Either a text file or a message must be given."),
    };

    anyhow::ensure!(
        !message.is_empty(),
        "Nothing to hide: the message is empty."
    );

    let mut picture = load_rgba(&args.image)?;

    let required_space = message.len();
    let available_space = capacity_bytes(picture.width, picture.height);

    anyhow::ensure!(
        available_space >= required_space,
        "Not enough space in the image to hide the text. \nRequired: {} bytes, Available: {} bytes",
        required_space.to_string().red().bold(),
        available_space.to_string().green().bold()
    );

    info!(
        "hiding {} bytes in {}x{} image (capacity {} bytes)",
        required_space, picture.width, picture.height, available_space
    );

    embed(&mut picture.data, picture.width, picture.height, &message).with_context(|| {
        format!(
            "Failed to hide the text in: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    save_rgba(&picture, &dest)?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像、调用恢复核心函数，并将恢复的文本写入目标文件。
/// 图像中没有隐藏消息时只给出提示，不会创建输出文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 隐藏的数据不是合法的 UTF-8 文本。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let picture = load_rgba(&args.image)?;

    let text = extract(&picture.data, picture.width, picture.height).with_context(|| {
        format!(
            "Failed to recover the text from '{}'. \nThe image may be corrupted or was not produced by this tool.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    if text.is_empty() {
        println!(
            "No hidden message found in: {}",
            args.image.to_string_lossy().yellow().bold()
        );
        return Ok(());
    }

    info!("recovered {} bytes of text", text.len());

    let dest = args
        .text
        .unwrap_or_else(|| default_output(&args.image, RECOVERED_PREFIX, "txt"));
    ensure_writable(&dest, args.force)?;

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令：显示图像尺寸和可隐藏的最大字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = load_rgba(&args.image)?;
    let capacity = capacity_bytes(picture.width, picture.height);

    println!(
        "Image {} ({}x{}) can hide up to {} bytes of text.",
        args.image.to_string_lossy().green().bold(),
        picture.width,
        picture.height,
        capacity.to_string().green().bold()
    );

    Ok(())
}

/// 在输入文件所在目录生成默认输出路径：`<prefix><stem>.<extension>`。
pub fn default_output(input: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());

    input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("{prefix}{stem}.{extension}"))
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}
