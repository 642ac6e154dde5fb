//! 棋盘常量定义
//!
//! 内部行号 0 对应第 8 横线（黑方底线），行号 7 对应第 1 横线（白方底线）。

/// 棋盘边长（行数与列数相同）
pub const BOARD_SIZE: usize = 8;

/// 白方底线所在行
pub const WHITE_BACK_RANK: u8 = 7;

/// 黑方底线所在行
pub const BLACK_BACK_RANK: u8 = 0;

/// 白兵初始行
pub const WHITE_PAWN_RANK: u8 = 6;

/// 黑兵初始行
pub const BLACK_PAWN_RANK: u8 = 1;

/// 王的初始列（e 线）
pub const KING_START_FILE: u8 = 4;

/// 短易位后王所在列（g 线）
pub const KINGSIDE_KING_FILE: u8 = 6;

/// 长易位后王所在列（c 线）
pub const QUEENSIDE_KING_FILE: u8 = 2;

/// 短易位车的初始列（h 线）
pub const KINGSIDE_ROOK_FILE: u8 = 7;

/// 长易位车的初始列（a 线）
pub const QUEENSIDE_ROOK_FILE: u8 = 0;

/// 列名，按内部列号排列
pub const FILE_NAMES: [char; BOARD_SIZE] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// 横线名，按内部行号排列（行 0 = 第 8 横线）
pub const RANK_NAMES: [char; BOARD_SIZE] = ['8', '7', '6', '5', '4', '3', '2', '1'];
