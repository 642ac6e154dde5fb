//! 文本棋盘格式
//!
//! 8 行，每行 8 个以空格分隔的符号，第 8 横线在最上方：
//!
//! ```text
//! . . . . . . k .
//! . . . . . . . .
//! . . . . . . . .
//! . . . . . . . .
//! . . . . . . . .
//! . . . . . . . .
//! . . . . . P P .
//! . . . . . . K .
//! ```
//!
//! 大写为白方，小写为黑方，`.` 为空格子。

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::BOARD_SIZE;
use crate::error::ChessError;
use crate::piece::{Piece, Side, Square};
use crate::position::CastlingRights;

/// 空格子符号
pub const EMPTY_SYMBOL: char = '.';

/// 载入文本棋盘时的附加状态，未给出的字段保持局面原值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBoardOptions {
    /// 走子方
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_to_move: Option<Side>,
    /// FEN 格式的易位权（如 `KQkq`、`K`、`-`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub castling: Option<String>,
}

impl TextBoardOptions {
    /// 设置走子方
    pub fn with_side_to_move(mut self, side: Side) -> Self {
        self.side_to_move = Some(side);
        self
    }

    /// 设置易位权
    pub fn with_castling(mut self, castling: impl Into<String>) -> Self {
        self.castling = Some(castling.into());
        self
    }

    /// 解析易位权字段
    pub fn castling_rights(&self) -> Result<Option<CastlingRights>, ChessError> {
        self.castling
            .as_deref()
            .map(|text| {
                CastlingRights::from_fen(text).ok_or_else(|| ChessError::InvalidBoardText {
                    reason: format!("Invalid castling rights: {}", text),
                })
            })
            .transpose()
    }
}

/// 文本棋盘处理
pub struct TextBoard;

impl TextBoard {
    /// 解析文本棋盘，首尾空行被忽略
    pub fn parse(text: &str) -> Result<Board, ChessError> {
        let rows: Vec<&str> = text.trim().lines().collect();
        if rows.len() != BOARD_SIZE {
            return Err(invalid(format!(
                "Expected {} rows, got {}",
                BOARD_SIZE,
                rows.len()
            )));
        }

        let mut board = Board::empty();
        for (rank, row) in rows.iter().enumerate() {
            let symbols: Vec<&str> = row.split_whitespace().collect();
            if symbols.len() != BOARD_SIZE {
                return Err(invalid(format!(
                    "Row {} has {} squares, expected {}: {}",
                    rank,
                    symbols.len(),
                    BOARD_SIZE,
                    row.trim()
                )));
            }

            for (file, symbol) in symbols.iter().enumerate() {
                let sq = Square::new_unchecked(rank as u8, file as u8);
                board.set(sq, Self::parse_symbol(symbol)?);
            }
        }

        Ok(board)
    }

    /// 解析单个符号
    fn parse_symbol(symbol: &str) -> Result<Option<Piece>, ChessError> {
        let mut chars = symbol.chars();
        match (chars.next(), chars.next()) {
            (Some(EMPTY_SYMBOL), None) => Ok(None),
            (Some(c), None) => Piece::from_fen_char(c)
                .map(Some)
                .ok_or_else(|| invalid(format!("Invalid piece symbol: {}", symbol))),
            _ => Err(invalid(format!("Invalid piece symbol: {}", symbol))),
        }
    }

    /// 输出文本棋盘，行之间以换行分隔，末尾无换行
    pub fn to_string(board: &Board) -> String {
        (0..BOARD_SIZE)
            .map(|rank| {
                (0..BOARD_SIZE)
                    .map(|file| {
                        board
                            .get(Square::new_unchecked(rank as u8, file as u8))
                            .map_or(EMPTY_SYMBOL, |piece| piece.to_fen_char())
                            .to_string()
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn invalid(reason: String) -> ChessError {
    ChessError::InvalidBoardText { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceType;

    const KING_AND_PAWNS: &str = "
. . . . . . k .
. . . . . . . .
. . . . . . . .
. . . . . . . .
. . . . . . . .
. . . . . . . .
. . . . . P P .
. . . . . . K .";

    #[test]
    fn test_parse_board() {
        let board = TextBoard::parse(KING_AND_PAWNS).unwrap();

        assert_eq!(
            board.get(Square::from_name("g8").unwrap()),
            Some(Piece::new(PieceType::King, Side::Black))
        );
        assert_eq!(
            board.get(Square::from_name("g1").unwrap()),
            Some(Piece::new(PieceType::King, Side::White))
        );
        assert_eq!(
            board.get(Square::from_name("f2").unwrap()),
            Some(Piece::new(PieceType::Pawn, Side::White))
        );
        assert_eq!(board.all_pieces().len(), 4);
    }

    #[test]
    fn test_roundtrip() {
        let board = TextBoard::parse(KING_AND_PAWNS).unwrap();
        assert_eq!(TextBoard::to_string(&board), KING_AND_PAWNS.trim());

        let initial = Board::initial();
        assert_eq!(TextBoard::parse(&initial.render()).unwrap(), initial);
    }

    #[test]
    fn test_empty_board_symbols() {
        let text = Board::empty().render();
        let symbols: Vec<&str> = text.split_whitespace().collect();

        assert_eq!(symbols.len(), BOARD_SIZE * BOARD_SIZE);
        assert!(symbols.iter().all(|s| *s == EMPTY_SYMBOL.to_string()));
        assert_eq!(text.lines().count(), BOARD_SIZE);
        assert_eq!(TextBoard::parse(&text).unwrap(), Board::empty());
    }

    #[test]
    fn test_indented_rows() {
        let text = KING_AND_PAWNS
            .lines()
            .map(|line| format!("    {}", line))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(TextBoard::parse(&text).is_ok());
    }

    #[test]
    fn test_wrong_row_count() {
        let text = ". . . . . . . .\n. . . . . . . .";
        let err = TextBoard::parse(text).unwrap_err();
        assert!(matches!(err, ChessError::InvalidBoardText { .. }));
    }

    #[test]
    fn test_wrong_square_count() {
        let text = KING_AND_PAWNS.replacen(". . . . . . k .", ". . . . . k .", 1);
        assert!(TextBoard::parse(&text).is_err());
    }

    #[test]
    fn test_invalid_symbol() {
        let text = KING_AND_PAWNS.replacen(". . . . . . k .", ". . . . . . x .", 1);
        assert!(TextBoard::parse(&text).is_err());

        let text = KING_AND_PAWNS.replacen(". . . . . . k .", ". . . . . . kk .", 1);
        assert!(TextBoard::parse(&text).is_err());
    }

    #[test]
    fn test_options_castling() {
        let options = TextBoardOptions::default().with_castling("Kq");
        let rights = options.castling_rights().unwrap().unwrap();
        assert!(rights.white.kingside);
        assert!(!rights.white.queenside);
        assert!(rights.black.queenside);

        assert_eq!(TextBoardOptions::default().castling_rights(), Ok(None));
        assert!(TextBoardOptions::default()
            .with_castling("abc")
            .castling_rights()
            .is_err());
    }

    #[test]
    fn test_options_deserialize() {
        let options: TextBoardOptions =
            serde_json::from_str(r#"{"side_to_move":"Black"}"#).unwrap();
        assert_eq!(options.side_to_move, Some(Side::Black));
        assert_eq!(options.castling, None);
    }
}
