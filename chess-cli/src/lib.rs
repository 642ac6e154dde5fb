//! 国际象棋命令行工具
//!
//! 包含:
//! - 参数解析与局面来源（FEN、文本棋盘文件、标准输入）
//! - 子命令执行与输出（文本或 JSON）

pub mod commands;
pub mod config;

pub use commands::run;
pub use config::{Cli, Command, ConfigError, SourceArgs};
