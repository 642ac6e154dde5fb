//! 棋盘格子存储

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;
use crate::piece::{Piece, PieceType, Side, Square};
use crate::text_board::TextBoard;

/// 初始局面的底线排列（按列号）
const BACK_RANK_ORDER: [PieceType; BOARD_SIZE] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// 8x8 棋盘，`squares[rank][file]`，行 0 为第 8 横线
    squares: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// 创建初始棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();

        for side in [Side::White, Side::Black] {
            for (file, piece_type) in BACK_RANK_ORDER.iter().enumerate() {
                board.set(
                    Square::new_unchecked(side.back_rank(), file as u8),
                    Some(Piece::new(*piece_type, side)),
                );
                board.set(
                    Square::new_unchecked(side.pawn_rank(), file as u8),
                    Some(Piece::new(PieceType::Pawn, side)),
                );
            }
        }

        board
    }

    /// 获取指定格子的棋子
    pub fn get(&self, sq: Square) -> Option<Piece> {
        if sq.is_valid() {
            self.squares[sq.rank as usize][sq.file as usize]
        } else {
            None
        }
    }

    /// 设置指定格子的棋子
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        if sq.is_valid() {
            self.squares[sq.rank as usize][sq.file as usize] = piece;
        }
    }

    /// 清空指定格子
    pub fn clear(&mut self, sq: Square) {
        self.set(sq, None);
    }

    /// 移动棋子（不检查规则），返回目标格原有的棋子
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.get(from);
        let captured = self.get(to);
        self.set(from, None);
        self.set(to, piece);
        captured
    }

    /// 获取指定阵营的所有棋子位置
    pub fn pieces(&self, side: Side) -> Vec<(Square, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.side == side)
            .collect()
    }

    /// 获取所有棋子，按行号、列号升序
    pub fn all_pieces(&self) -> Vec<(Square, Piece)> {
        let mut result = Vec::new();
        for rank in 0..BOARD_SIZE {
            for file in 0..BOARD_SIZE {
                let sq = Square::new_unchecked(rank as u8, file as u8);
                if let Some(piece) = self.get(sq) {
                    result.push((sq, piece));
                }
            }
        }
        result
    }

    /// 输出文本棋盘：每行 8 个以空格分隔的符号，空格子为 `.`
    pub fn render(&self) -> String {
        TextBoard::to_string(self)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}
