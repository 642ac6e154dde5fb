//! FEN 格式解析和生成
//!
//! 国际象棋 FEN 格式：
//! `<棋盘> <走子方> <易位权> <过路兵格> <半回合数> <回合数>`
//!
//! 示例：
//! `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1`

use tracing::debug;

use crate::board::Board;
use crate::constants::BOARD_SIZE;
use crate::error::ChessError;
use crate::piece::{Piece, Side, Square};
use crate::position::{CastlingRights, Position};

/// 初始局面 FEN
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN 字段数
const FEN_FIELDS: usize = 6;

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析 FEN 字符串为局面
    pub fn parse(fen: &str) -> Result<Position, ChessError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != FEN_FIELDS {
            return Err(invalid(format!(
                "Expected {} fields, got {}",
                FEN_FIELDS,
                parts.len()
            )));
        }

        let board = Self::parse_board(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Side::White,
            "b" => Side::Black,
            other => return Err(invalid(format!("Invalid side to move: {}", other))),
        };

        let castling_rights = CastlingRights::from_fen(parts[2])
            .ok_or_else(|| invalid(format!("Invalid castling rights: {}", parts[2])))?;

        let en_passant_target = match parts[3] {
            "-" => None,
            name => Some(
                Square::from_name(name)
                    .map_err(|_| invalid(format!("Invalid en passant square: {}", name)))?,
            ),
        };

        let halfmove_clock = parts[4]
            .parse()
            .map_err(|_| invalid(format!("Invalid halfmove clock: {}", parts[4])))?;
        let fullmove_number = parts[5]
            .parse()
            .map_err(|_| invalid(format!("Invalid fullmove number: {}", parts[5])))?;

        let mut position = Position::from_board(board, side_to_move, castling_rights);
        position.en_passant_target = en_passant_target;
        position.halfmove_clock = halfmove_clock;
        position.fullmove_number = fullmove_number;

        debug!(fen, "parsed FEN");
        Ok(position)
    }

    /// 解析棋盘部分
    fn parse_board(board_str: &str) -> Result<Board, ChessError> {
        let mut board = Board::empty();
        let rows: Vec<&str> = board_str.split('/').collect();

        if rows.len() != BOARD_SIZE {
            return Err(invalid(format!(
                "Expected {} ranks, got {}",
                BOARD_SIZE,
                rows.len()
            )));
        }

        // FEN 从第 8 横线开始，与内部行号一致
        for (rank, row) in rows.iter().enumerate() {
            let mut file = 0usize;

            for c in row.chars() {
                if file >= BOARD_SIZE {
                    return Err(invalid(format!("Rank {} has too many files: {}", rank, row)));
                }

                if let Some(empty_count) = c.to_digit(10) {
                    if !(1..=BOARD_SIZE as u32).contains(&empty_count) {
                        return Err(invalid(format!("Invalid empty-square count: {}", c)));
                    }
                    file += empty_count as usize;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    board.set(Square::new_unchecked(rank as u8, file as u8), Some(piece));
                    file += 1;
                } else {
                    return Err(invalid(format!("Invalid piece character: {}", c)));
                }
            }

            if file != BOARD_SIZE {
                return Err(invalid(format!(
                    "Rank {} has {} files, expected {}: {}",
                    rank, file, BOARD_SIZE, row
                )));
            }
        }

        Ok(board)
    }

    /// 将局面转换为 FEN 字符串
    pub fn to_string(position: &Position) -> String {
        format!(
            "{} {} {} {} {} {}",
            Self::board_to_string(&position.board),
            position.side_to_move.to_fen_char(),
            position.castling_rights.to_fen(),
            position
                .en_passant_target
                .map_or_else(|| "-".to_string(), |sq| sq.name()),
            position.halfmove_clock,
            position.fullmove_number
        )
    }

    /// 将棋盘转换为 FEN 棋盘部分
    pub fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE);

        for rank in 0..BOARD_SIZE {
            let mut row = String::new();
            let mut empty_count = 0;

            for file in 0..BOARD_SIZE {
                if let Some(piece) = board.get(Square::new_unchecked(rank as u8, file as u8)) {
                    if empty_count > 0 {
                        row.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row.push(piece.to_fen_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                row.push_str(&empty_count.to_string());
            }

            rows.push(row);
        }

        rows.join("/")
    }
}

fn invalid(reason: String) -> ChessError {
    ChessError::InvalidFen { reason }
}
