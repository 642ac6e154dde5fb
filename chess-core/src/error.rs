//! 错误类型定义

use thiserror::Error;

/// 棋局错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// 无效的 FEN 字符串
    #[error("Invalid FEN: {reason}")]
    InvalidFen { reason: String },

    /// 无效的文本棋盘
    #[error("Invalid text board: {reason}")]
    InvalidBoardText { reason: String },

    /// 无效的格子名称
    #[error("Invalid square name: {name:?}")]
    InvalidSquare { name: String },

    /// 记谱找不到对应走法
    #[error("No move matches {notation:?}")]
    NoMatchingMove { notation: String },

    /// 记谱对应多个走法
    #[error("Move {notation:?} is ambiguous ({candidates} candidates)")]
    AmbiguousMove { notation: String, candidates: usize },
}

impl ChessError {
    /// 是否为输入格式错误（FEN、文本棋盘、格子名称）
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            ChessError::InvalidFen { .. }
                | ChessError::InvalidBoardText { .. }
                | ChessError::InvalidSquare { .. }
        )
    }

    /// 是否为走法查找失败
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            ChessError::NoMatchingMove { .. } | ChessError::AmbiguousMove { .. }
        )
    }
}

/// 棋局操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
