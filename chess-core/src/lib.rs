//! 国际象棋走法生成库
//!
//! 包含:
//! - 棋子、格子、棋盘、局面等核心数据结构
//! - 伪合法走法生成（含易位、吃过路兵、升变）与攻击检测
//! - 执行走法与悔棋
//! - 代数记谱（输出与尽力解析）
//! - 局面格式（FEN、文本棋盘）

mod board;
mod constants;
mod error;
mod fen;
mod moves;
mod notation;
mod piece;
mod position;
mod text_board;

pub use board::Board;
pub use constants::*;
pub use error::{ChessError, Result};
pub use fen::{Fen, INITIAL_FEN};
pub use moves::{Move, MoveGenerator};
pub use notation::Notation;
pub use piece::{Piece, PieceType, Side, Square};
pub use position::{CastlingRights, HistoryEntry, MoveList, Position, WingRights};
pub use text_board::{TextBoard, TextBoardOptions, EMPTY_SYMBOL};
