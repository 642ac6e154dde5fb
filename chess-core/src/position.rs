//! 完整局面状态（棋盘、走子方、易位权、过路兵、步数、历史）

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Board;
use crate::constants::{
    KINGSIDE_KING_FILE, KINGSIDE_ROOK_FILE, QUEENSIDE_ROOK_FILE,
};
use crate::error::Result;
use crate::fen::Fen;
use crate::moves::{Move, MoveGenerator};
use crate::notation::Notation;
use crate::piece::{Piece, PieceType, Side, Square};
use crate::text_board::{TextBoard, TextBoardOptions};

/// 单方的易位权
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WingRights {
    /// 短易位（王翼）
    pub kingside: bool,
    /// 长易位（后翼）
    pub queenside: bool,
}

impl WingRights {
    pub const BOTH: WingRights = WingRights {
        kingside: true,
        queenside: true,
    };
}

/// 双方的易位权
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white: WingRights,
    pub black: WingRights,
}

impl CastlingRights {
    /// 双方都保留全部易位权
    pub fn all() -> Self {
        Self {
            white: WingRights::BOTH,
            black: WingRights::BOTH,
        }
    }

    /// 没有任何易位权
    pub fn none() -> Self {
        Self::default()
    }

    /// 获取指定阵营的易位权
    pub fn for_side(&self, side: Side) -> WingRights {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    fn for_side_mut(&mut self, side: Side) -> &mut WingRights {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }

    /// 解析 FEN 易位字段（`-`、`KQkq`、`K` 等），出现其他字符时返回 None
    pub fn from_fen(text: &str) -> Option<Self> {
        if text == "-" {
            return Some(Self::none());
        }
        if text.is_empty() {
            return None;
        }

        let mut rights = Self::none();
        for c in text.chars() {
            match c {
                'K' => rights.white.kingside = true,
                'Q' => rights.white.queenside = true,
                'k' => rights.black.kingside = true,
                'q' => rights.black.queenside = true,
                _ => return None,
            }
        }
        Some(rights)
    }

    /// 转换为 FEN 易位字段
    pub fn to_fen(&self) -> String {
        let mut text = String::with_capacity(4);
        if self.white.kingside {
            text.push('K');
        }
        if self.white.queenside {
            text.push('Q');
        }
        if self.black.kingside {
            text.push('k');
        }
        if self.black.queenside {
            text.push('q');
        }
        if text.is_empty() {
            text.push('-');
        }
        text
    }

    /// 角上的格子有子离开或被吃时，取消对应的易位权
    fn revoke_for_corner(&mut self, sq: Square) {
        for side in [Side::White, Side::Black] {
            if sq.rank != side.back_rank() {
                continue;
            }
            if sq.file == KINGSIDE_ROOK_FILE {
                self.for_side_mut(side).kingside = false;
            } else if sq.file == QUEENSIDE_ROOK_FILE {
                self.for_side_mut(side).queenside = false;
            }
        }
    }
}

/// 历史记录：走法及走之前无法从局面推回的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub mv: Move,
    pub castling_rights: CastlingRights,
    pub en_passant_target: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

/// 走法列表查询结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveList {
    /// 代数记谱字符串
    Notation(Vec<String>),
    /// 完整走法记录
    Verbose(Vec<Move>),
}

impl MoveList {
    pub fn len(&self) -> usize {
        match self {
            MoveList::Notation(list) => list.len(),
            MoveList::Verbose(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 局面
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// 棋盘
    pub board: Board,
    /// 当前走子方
    pub side_to_move: Side,
    /// 易位权
    pub castling_rights: CastlingRights,
    /// 吃过路兵目标格
    pub en_passant_target: Option<Square>,
    /// 半回合计数（吃子或动兵后清零）
    pub halfmove_clock: u32,
    /// 完整回合数（黑方走完后 +1）
    pub fullmove_number: u32,
    /// 已走步的历史，用于悔棋
    history: Vec<HistoryEntry>,
}

impl Position {
    /// 创建初始局面
    pub fn initial() -> Self {
        Self::from_board(Board::initial(), Side::White, CastlingRights::all())
    }

    /// 创建空棋盘局面（无易位权，白方先走）
    pub fn empty() -> Self {
        Self::from_board(Board::empty(), Side::White, CastlingRights::none())
    }

    /// 从棋盘创建局面
    pub fn from_board(board: Board, side_to_move: Side, castling_rights: CastlingRights) -> Self {
        Self {
            board,
            side_to_move,
            castling_rights,
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
        }
    }

    /// 载入 FEN，失败时局面保持不变
    pub fn load_fen(&mut self, fen: &str) -> Result<()> {
        *self = Fen::parse(fen)?;
        Ok(())
    }

    /// 载入文本棋盘
    ///
    /// 选项中未给出的字段保持原值；步数与过路兵格不变，历史清空。
    /// 任何部分解析失败时局面保持不变。
    pub fn load_text_board(&mut self, text: &str, options: &TextBoardOptions) -> Result<()> {
        let board = TextBoard::parse(text)?;
        let castling_rights = options.castling_rights()?;

        self.board = board;
        if let Some(side) = options.side_to_move {
            self.side_to_move = side;
        }
        if let Some(rights) = castling_rights {
            self.castling_rights = rights;
        }
        self.history.clear();
        Ok(())
    }

    /// 输出文本棋盘
    pub fn render(&self) -> String {
        self.board.render()
    }

    /// 转换为 FEN
    pub fn to_fen(&self) -> String {
        Fen::to_string(self)
    }

    /// 按格子名称查询棋子
    pub fn get_by_name(&self, name: &str) -> Result<Option<Piece>> {
        Ok(self.board.get(Square::from_name(name)?))
    }

    /// 历史记录（最早的在前）
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// 伪合法走法的代数记谱
    pub fn moves(&self) -> Vec<String> {
        self.moves_verbose()
            .iter()
            .map(Notation::to_algebraic)
            .collect()
    }

    /// 伪合法走法的完整记录
    pub fn moves_verbose(&self) -> Vec<Move> {
        MoveGenerator::generate_pseudo_legal(self)
    }

    /// 按 `verbose` 选择返回记谱或完整记录
    pub fn list_moves(&self, verbose: bool) -> MoveList {
        if verbose {
            MoveList::Verbose(self.moves_verbose())
        } else {
            MoveList::Notation(self.moves())
        }
    }

    /// 按记谱查找走法并执行
    pub fn play(&mut self, notation: &str) -> Result<Move> {
        let mv = Notation::find_move(self, notation)?;
        self.apply_move(mv);
        Ok(mv)
    }

    /// 执行走法（不检查合法性）
    pub fn apply_move(&mut self, mv: Move) {
        self.history.push(HistoryEntry {
            mv,
            castling_rights: self.castling_rights,
            en_passant_target: self.en_passant_target,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        });

        let side = mv.piece.side;
        if mv.is_castling {
            self.board.move_piece(mv.from, mv.to);
            let (rook_from, rook_to) = Self::castling_rook_squares(&mv);
            if self.board.get(rook_from) == Some(Piece::new(PieceType::Rook, side)) {
                self.board.move_piece(rook_from, rook_to);
            }
        } else if mv.is_en_passant {
            self.board.move_piece(mv.from, mv.to);
            self.board.clear(Square::new_unchecked(mv.from.rank, mv.to.file));
        } else if let Some(promotion) = mv.promotion {
            self.board.clear(mv.from);
            self.board.set(mv.to, Some(Piece::new(promotion, side)));
        } else {
            self.board.move_piece(mv.from, mv.to);
        }

        if mv.piece.piece_type == PieceType::King {
            *self.castling_rights.for_side_mut(side) = WingRights::default();
        }
        self.castling_rights.revoke_for_corner(mv.from);
        self.castling_rights.revoke_for_corner(mv.to);

        let is_pawn = mv.piece.piece_type == PieceType::Pawn;
        self.en_passant_target = if is_pawn && mv.from.rank.abs_diff(mv.to.rank) == 2 {
            Some(Square::new_unchecked((mv.from.rank + mv.to.rank) / 2, mv.from.file))
        } else {
            None
        };

        if is_pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if self.side_to_move == Side::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = self.side_to_move.opponent();

        debug!(%mv, side = ?side, "applied move");
    }

    /// 悔棋：撤销最后一步，历史为空时返回 None
    pub fn undo(&mut self) -> Option<Move> {
        let entry = self.history.pop()?;
        let mv = entry.mv;
        let side = mv.piece.side;

        if mv.is_castling {
            self.board.move_piece(mv.to, mv.from);
            let (rook_from, rook_to) = Self::castling_rook_squares(&mv);
            if self.board.get(rook_to) == Some(Piece::new(PieceType::Rook, side)) {
                self.board.move_piece(rook_to, rook_from);
            }
        } else if mv.is_en_passant {
            self.board.move_piece(mv.to, mv.from);
            self.board
                .set(Square::new_unchecked(mv.from.rank, mv.to.file), mv.captured);
        } else {
            // 升变时 mv.piece 仍是兵
            self.board.set(mv.from, Some(mv.piece));
            self.board.set(mv.to, mv.captured);
        }

        self.castling_rights = entry.castling_rights;
        self.en_passant_target = entry.en_passant_target;
        self.halfmove_clock = entry.halfmove_clock;
        self.fullmove_number = entry.fullmove_number;
        self.side_to_move = self.side_to_move.opponent();

        debug!(%mv, "undid move");
        Some(mv)
    }

    /// 易位时车的起止格
    fn castling_rook_squares(mv: &Move) -> (Square, Square) {
        let rank = mv.from.rank;
        if mv.to.file == KINGSIDE_KING_FILE {
            (
                Square::new_unchecked(rank, KINGSIDE_ROOK_FILE),
                Square::new_unchecked(rank, KINGSIDE_KING_FILE - 1),
            )
        } else {
            (
                Square::new_unchecked(rank, QUEENSIDE_ROOK_FILE),
                Square::new_unchecked(rank, mv.to.file + 1),
            )
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}
