//! 命令行参数与局面来源

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chess_core::{Position, Side, TextBoardOptions};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::debug;

/// 从标准输入读取棋盘时使用的文件名
pub const STDIN_PATH: &str = "-";

/// 参数解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid side {0:?}, expected \"w\" or \"b\"")]
    InvalidSide(String),
}

/// 国际象棋伪合法走法查询工具
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// 输出 chess_core 的调试日志
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// 局面来源；都不给时使用初始局面
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// FEN 字符串
    #[arg(long, conflicts_with = "board")]
    pub fen: Option<String>,

    /// 文本棋盘文件，`-` 表示标准输入
    #[arg(long)]
    pub board: Option<PathBuf>,

    /// 覆盖走子方（w 或 b）
    #[arg(long, value_parser = parse_side)]
    pub side: Option<Side>,

    /// 覆盖易位权（如 KQkq、Q、-）
    #[arg(long)]
    pub castling: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 列出当前走子方的伪合法走法
    Moves {
        /// 输出完整走法记录
        #[arg(short, long)]
        verbose: bool,

        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },
    /// 输出文本棋盘
    Render,
    /// 依次执行走法，输出最终棋盘和可走的走法
    Play {
        /// 代数记谱，如 e4 Nf3 O-O
        #[arg(required = true)]
        moves: Vec<String>,
    },
}

fn parse_side(value: &str) -> std::result::Result<Side, ConfigError> {
    let mut chars = value.chars();
    match (chars.next().and_then(Side::from_fen_char), chars.next()) {
        (Some(side), None) => Ok(side),
        _ => Err(ConfigError::InvalidSide(value.to_string())),
    }
}

impl SourceArgs {
    /// 走子方与易位权覆盖项
    pub fn options(&self) -> TextBoardOptions {
        TextBoardOptions {
            side_to_move: self.side,
            castling: self.castling.clone(),
        }
    }

    /// 按参数构造局面
    pub fn load_position(&self) -> Result<Position> {
        let options = self.options();

        if let Some(path) = &self.board {
            let text = read_board_text(path)?;
            let mut position = Position::empty();
            position
                .load_text_board(&text, &options)
                .with_context(|| format!("Failed to load board from {}", path.display()))?;
            debug!(path = %path.display(), "loaded text board");
            return Ok(position);
        }

        let mut position = match &self.fen {
            Some(fen) => {
                let mut position = Position::empty();
                position
                    .load_fen(fen)
                    .with_context(|| format!("Failed to load FEN {:?}", fen))?;
                position
            }
            None => Position::initial(),
        };

        if let Some(side) = options.side_to_move {
            position.side_to_move = side;
        }
        if let Some(rights) = options
            .castling_rights()
            .context("Failed to apply --castling")?
        {
            position.castling_rights = rights;
        }

        Ok(position)
    }
}

fn read_board_text(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read board from stdin")?;
        return Ok(text);
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Board, CastlingRights, Square};
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("chess-cli").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        let cli = parse(&["moves", "--verbose", "--json"]);
        assert_eq!(
            cli.command,
            Command::Moves {
                verbose: true,
                json: true
            }
        );
        assert!(!cli.debug);

        let cli = parse(&["--side", "b", "--debug", "render"]);
        assert_eq!(cli.command, Command::Render);
        assert_eq!(cli.source.side, Some(Side::Black));
        assert!(cli.debug);

        let cli = parse(&["play", "e4", "e5"]);
        assert_eq!(
            cli.command,
            Command::Play {
                moves: vec!["e4".to_string(), "e5".to_string()]
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_arguments() {
        let base = ["chess-cli"];
        let attempt = |args: &[&str]| Cli::try_parse_from(base.iter().chain(args.iter()));

        assert!(attempt(&["--side", "x", "render"]).is_err());
        assert!(attempt(&["--side", "white", "render"]).is_err());
        assert!(attempt(&["--fen", "8/8/8/8/8/8/8/8 w - - 0 1", "--board", "-", "render"]).is_err());
        assert!(attempt(&["play"]).is_err());
    }

    #[test]
    fn test_default_source_is_initial() {
        let position = SourceArgs::default().load_position().unwrap();
        assert_eq!(position, Position::initial());
    }

    #[test]
    fn test_fen_with_overrides() {
        let source = SourceArgs {
            fen: Some("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".to_string()),
            side: Some(Side::Black),
            castling: Some("k".to_string()),
            ..Default::default()
        };
        let position = source.load_position().unwrap();

        assert_eq!(position.side_to_move, Side::Black);
        assert_eq!(position.castling_rights.to_fen(), "k");
    }

    #[test]
    fn test_invalid_fen_has_context() {
        let source = SourceArgs {
            fen: Some("not a fen".to_string()),
            ..Default::default()
        };
        let err = source.load_position().unwrap_err();
        assert!(err.to_string().starts_with("Failed to load FEN"));
        assert!(err.downcast_ref::<chess_core::ChessError>().is_some());
    }

    #[test]
    fn test_load_board_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\n{}\n", Board::initial().render()).unwrap();

        let source = SourceArgs {
            board: Some(file.path().to_path_buf()),
            castling: Some("KQkq".to_string()),
            ..Default::default()
        };
        let position = source.load_position().unwrap();

        assert_eq!(position.board, Board::initial());
        assert_eq!(position.side_to_move, Side::White);
        assert_eq!(position.castling_rights, CastlingRights::all());
    }

    #[test]
    fn test_board_file_defaults_to_no_castling() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", Board::initial().render()).unwrap();

        let source = SourceArgs {
            board: Some(file.path().to_path_buf()),
            side: Some(Side::Black),
            ..Default::default()
        };
        let position = source.load_position().unwrap();

        assert_eq!(position.side_to_move, Side::Black);
        assert_eq!(position.castling_rights, CastlingRights::none());
        assert!(position
            .board
            .get(Square::from_name("e8").unwrap())
            .is_some());
    }

    #[test]
    fn test_missing_and_malformed_board_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = SourceArgs {
            board: Some(dir.path().join("missing.txt")),
            ..Default::default()
        };
        let err = source.load_position().unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));

        let path = dir.path().join("short.txt");
        fs::write(&path, ". . . . . . . .\n").unwrap();
        let source = SourceArgs {
            board: Some(path),
            ..Default::default()
        };
        let err = source.load_position().unwrap_err();
        assert!(err.to_string().starts_with("Failed to load board"));
    }
}
