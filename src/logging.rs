//! # 日志初始化模块

use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// 根据 `-v` 的次数初始化日志，`RUST_LOG` 存在时优先生效。
///
/// 日志输出到 stderr，stdout 仅用于给用户的结果信息。
pub fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Builder::new()
        .filter_level(level)
        .parse_env(Env::default())
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
