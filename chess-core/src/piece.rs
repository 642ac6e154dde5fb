//! 棋子与格子定义

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    BLACK_BACK_RANK, BLACK_PAWN_RANK, BOARD_SIZE, FILE_NAMES, RANK_NAMES,
    WHITE_BACK_RANK, WHITE_PAWN_RANK,
};
use crate::error::ChessError;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    /// 王
    King,
    /// 后
    Queen,
    /// 车
    Rook,
    /// 象
    Bishop,
    /// 马
    Knight,
    /// 兵
    Pawn,
}

impl PieceType {
    /// 兵升变可选的棋子，按生成顺序排列
    pub const PROMOTION_CHOICES: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    /// 获取 FEN 字符（白方大写，黑方小写）
    pub fn to_fen_char(&self, side: Side) -> char {
        let c = match self {
            PieceType::King => 'k',
            PieceType::Queen => 'q',
            PieceType::Rook => 'r',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            PieceType::Pawn => 'p',
        };
        match side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<(PieceType, Side)> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        let piece_type = match c.to_ascii_lowercase() {
            'k' => PieceType::King,
            'q' => PieceType::Queen,
            'r' => PieceType::Rook,
            'b' => PieceType::Bishop,
            'n' => PieceType::Knight,
            'p' => PieceType::Pawn,
            _ => return None,
        };
        Some((piece_type, side))
    }

    /// 记谱用的大写字母，兵没有字母
    pub fn notation_letter(&self) -> Option<char> {
        match self {
            PieceType::Pawn => None,
            other => Some(other.to_fen_char(Side::White)),
        }
    }

    /// 从记谱字母解析（只接受大写 K Q R B N）
    pub fn from_notation_letter(c: char) -> Option<PieceType> {
        match c {
            'K' => Some(PieceType::King),
            'Q' => Some(PieceType::Queen),
            'R' => Some(PieceType::Rook),
            'B' => Some(PieceType::Bishop),
            'N' => Some(PieceType::Knight),
            _ => None,
        }
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 白方（先手，内部行号大的一侧）
    White,
    /// 黑方（后手，内部行号 0 的一侧）
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Side> {
        match c {
            'w' | 'W' => Some(Side::White),
            'b' | 'B' => Some(Side::Black),
            _ => None,
        }
    }

    /// 兵前进方向上的行号增量
    pub fn forward(&self) -> i8 {
        match self {
            Side::White => -1,
            Side::Black => 1,
        }
    }

    /// 底线所在行
    pub fn back_rank(&self) -> u8 {
        match self {
            Side::White => WHITE_BACK_RANK,
            Side::Black => BLACK_BACK_RANK,
        }
    }

    /// 兵的初始行
    pub fn pawn_rank(&self) -> u8 {
        match self {
            Side::White => WHITE_PAWN_RANK,
            Side::Black => BLACK_PAWN_RANK,
        }
    }

    /// 兵的升变行（对方底线）
    pub fn promotion_rank(&self) -> u8 {
        self.opponent().back_rank()
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub side: Side,
}

impl Piece {
    /// 创建新棋子
    pub fn new(piece_type: PieceType, side: Side) -> Self {
        Self { piece_type, side }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        self.piece_type.to_fen_char(self.side)
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Piece> {
        PieceType::from_fen_char(c).map(|(piece_type, side)| Piece { piece_type, side })
    }
}

/// 棋盘格子
///
/// `rank` 为内部行号（0 = 第 8 横线），`file` 为列号（0 = a 线）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    /// 行 (0-7)
    pub rank: u8,
    /// 列 (0-7)
    pub file: u8,
}

impl Square {
    /// 创建新格子
    pub fn new(rank: u8, file: u8) -> Option<Self> {
        if (rank as usize) < BOARD_SIZE && (file as usize) < BOARD_SIZE {
            Some(Self { rank, file })
        } else {
            None
        }
    }

    /// 创建新格子（不检查边界，内部使用）
    pub const fn new_unchecked(rank: u8, file: u8) -> Self {
        Self { rank, file }
    }

    /// 检查格子是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.rank as usize) < BOARD_SIZE && (self.file as usize) < BOARD_SIZE
    }

    /// 获取偏移后的格子，越界返回 None
    pub fn offset(&self, dr: i8, df: i8) -> Option<Square> {
        let rank = self.rank as i8 + dr;
        let file = self.file as i8 + df;
        if rank >= 0 && (rank as usize) < BOARD_SIZE && file >= 0 && (file as usize) < BOARD_SIZE
        {
            Some(Square {
                rank: rank as u8,
                file: file as u8,
            })
        } else {
            None
        }
    }


    /// 格子名称，如 `e4`
    pub fn name(&self) -> String {
        format!(
            "{}{}",
            FILE_NAMES[self.file as usize], RANK_NAMES[self.rank as usize]
        )
    }

    /// 从格子名称解析
    pub fn from_name(name: &str) -> Result<Self, ChessError> {
        let invalid = || ChessError::InvalidSquare {
            name: name.to_string(),
        };

        let mut chars = name.chars();
        let (Some(f), Some(r), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };

        let file = FILE_NAMES.iter().position(|&c| c == f).ok_or_else(invalid)?;
        let rank = RANK_NAMES.iter().position(|&c| c == r).ok_or_else(invalid)?;
        Ok(Square::new_unchecked(rank as u8, file as u8))
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_name(s)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
