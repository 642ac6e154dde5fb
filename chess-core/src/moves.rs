//! 走法生成
//!
//! 只生成伪合法走法：遵守各棋子的走法与占位规则，但不检查走后己方王是否被将军。
//! 易位例外：王所在格、经过格和目标格受攻击时不生成易位。

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Board;
use crate::constants::KING_START_FILE;
use crate::piece::{Piece, PieceType, Side, Square};
use crate::position::Position;

/// 八个方向：北、东北、东、东南、南、西南、西、西北（北 = 行号减小）
const KING_DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// 车的四个直线方向：北、东、南、西
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// 象的四个斜线方向：东北、东南、西南、西北
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, 1), (1, 1), (1, -1), (-1, -1)];

/// 马的八个跳跃偏移
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-1, -2),
    (-2, 1),
    (-1, 2),
    (2, 1),
    (1, 2),
    (2, -1),
    (1, -2),
];

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 走动的棋子
    pub piece: Piece,
    /// 起始格
    pub from: Square,
    /// 目标格
    pub to: Square,
    /// 是否为易位
    pub is_castling: bool,
    /// 是否为吃过路兵
    pub is_en_passant: bool,
    /// 升变后的棋子类型
    pub promotion: Option<PieceType>,
    /// 被吃的棋子（如果有）
    pub captured: Option<Piece>,
}

impl Move {
    /// 创建普通走法
    pub fn new(piece: Piece, from: Square, to: Square) -> Self {
        Self {
            piece,
            from,
            to,
            is_castling: false,
            is_en_passant: false,
            promotion: None,
            captured: None,
        }
    }

    /// 创建带吃子的走法
    pub fn with_capture(piece: Piece, from: Square, to: Square, captured: Piece) -> Self {
        Self {
            captured: Some(captured),
            ..Self::new(piece, from, to)
        }
    }

    /// 创建易位走法（只记录王的移动）
    pub fn castling(king: Piece, from: Square, to: Square) -> Self {
        Self {
            is_castling: true,
            ..Self::new(king, from, to)
        }
    }

    /// 创建吃过路兵走法，`captured` 是目标格旁边被吃掉的兵
    pub fn en_passant(pawn: Piece, from: Square, to: Square, captured: Piece) -> Self {
        Self {
            is_en_passant: true,
            ..Self::with_capture(pawn, from, to, captured)
        }
    }

    /// 设置升变
    pub fn with_promotion(self, piece_type: PieceType) -> Self {
        Self {
            promotion: Some(piece_type),
            ..self
        }
    }

    /// 是否吃子
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.to_fen_char(Side::Black))?;
        }
        Ok(())
    }
}

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成走子方的所有伪合法走法（不考虑将军）
    pub fn generate_pseudo_legal(position: &Position) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);

        for (from, piece) in position.board.pieces(position.side_to_move) {
            Self::generate_piece_moves(position, from, piece, &mut moves);
        }

        debug!(
            side = ?position.side_to_move,
            count = moves.len(),
            "generated pseudo-legal moves"
        );
        moves
    }

    /// 生成指定棋子的所有伪合法走法
    pub fn generate_piece_moves(position: &Position, from: Square, piece: Piece, moves: &mut Vec<Move>) {
        let board = &position.board;
        match piece.piece_type {
            PieceType::King => Self::generate_king_moves(position, from, piece, moves),
            PieceType::Queen => Self::generate_sliding_moves(board, from, piece, &KING_DIRECTIONS, moves),
            PieceType::Rook => Self::generate_sliding_moves(board, from, piece, &ROOK_DIRECTIONS, moves),
            PieceType::Bishop => Self::generate_sliding_moves(board, from, piece, &BISHOP_DIRECTIONS, moves),
            PieceType::Knight => Self::generate_knight_moves(board, from, piece, moves),
            PieceType::Pawn => Self::generate_pawn_moves(position, from, piece, moves),
        }
    }

    /// 生成王的走法（含易位）
    fn generate_king_moves(position: &Position, from: Square, piece: Piece, moves: &mut Vec<Move>) {
        for (dr, df) in KING_DIRECTIONS {
            if let Some(to) = from.offset(dr, df) {
                Self::try_add_move(&position.board, from, to, piece, moves);
            }
        }

        Self::generate_castling_moves(position, from, piece, moves);
    }

    /// 生成易位走法
    ///
    /// 需要对应的易位权、王在初始格、王与目标之间无子，且王经过的格子都不受攻击。
    /// 不检查车是否在角上，易位权本身被视为可信。
    fn generate_castling_moves(position: &Position, from: Square, piece: Piece, moves: &mut Vec<Move>) {
        let side = piece.side;
        if from != Square::new_unchecked(side.back_rank(), KING_START_FILE) {
            return;
        }

        let rights = position.castling_rights.for_side(side);
        if rights.kingside {
            Self::try_add_castling(&position.board, from, piece, 1, moves);
        }
        if rights.queenside {
            Self::try_add_castling(&position.board, from, piece, -1, moves);
        }
    }

    /// 尝试添加一个方向的易位（1 = 短易位，-1 = 长易位）
    fn try_add_castling(board: &Board, from: Square, king: Piece, direction: i8, moves: &mut Vec<Move>) {
        let Some(transit) = from.offset(0, direction) else {
            return;
        };
        let Some(to) = transit.offset(0, direction) else {
            return;
        };

        if board.get(transit).is_some() || board.get(to).is_some() {
            return;
        }

        // 长易位时车还要经过 b 线
        if direction < 0 {
            if let Some(rook_path) = to.offset(0, direction) {
                if board.get(rook_path).is_some() {
                    return;
                }
            }
        }

        let opponent = king.side.opponent();
        if [from, transit, to]
            .into_iter()
            .any(|sq| Self::is_square_attacked(board, sq, opponent))
        {
            return;
        }

        moves.push(Move::castling(king, from, to));
    }

    /// 生成马的走法
    fn generate_knight_moves(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Move>) {
        for (dr, df) in KNIGHT_OFFSETS {
            if let Some(to) = from.offset(dr, df) {
                Self::try_add_move(board, from, to, piece, moves);
            }
        }
    }

    /// 生成远程棋子（车、象、后）的走法
    fn generate_sliding_moves(
        board: &Board,
        from: Square,
        piece: Piece,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, df) in directions {
            let mut current = from;
            while let Some(to) = current.offset(dr, df) {
                if let Some(target) = board.get(to) {
                    // 遇到棋子
                    if target.side != piece.side {
                        moves.push(Move::with_capture(piece, from, to, target));
                    }
                    break;
                }
                moves.push(Move::new(piece, from, to));
                current = to;
            }
        }
    }

    /// 生成兵的走法：前进一格、初始行前进两格、斜吃、吃过路兵，到达底线时升变
    fn generate_pawn_moves(position: &Position, from: Square, piece: Piece, moves: &mut Vec<Move>) {
        let board = &position.board;
        let side = piece.side;
        let forward = side.forward();

        if let Some(one) = from.offset(forward, 0) {
            if board.get(one).is_none() {
                Self::push_pawn_move(Move::new(piece, from, one), moves);

                if from.rank == side.pawn_rank() {
                    if let Some(two) = one.offset(forward, 0) {
                        if board.get(two).is_none() {
                            moves.push(Move::new(piece, from, two));
                        }
                    }
                }
            }
        }

        for df in [-1i8, 1i8] {
            let Some(to) = from.offset(forward, df) else {
                continue;
            };

            match board.get(to) {
                Some(target) if target.side != side => {
                    Self::push_pawn_move(Move::with_capture(piece, from, to, target), moves);
                }
                Some(_) => {}
                None if position.en_passant_target == Some(to) => {
                    // 被吃的兵在同一行、目标列
                    let victim_sq = Square::new_unchecked(from.rank, to.file);
                    if let Some(victim) = board.get(victim_sq) {
                        if victim.piece_type == PieceType::Pawn && victim.side != side {
                            moves.push(Move::en_passant(piece, from, to, victim));
                        }
                    }
                }
                None => {}
            }
        }
    }

    /// 添加兵的走法，到达升变行时按后、车、象、马展开
    fn push_pawn_move(mv: Move, moves: &mut Vec<Move>) {
        if mv.to.rank == mv.piece.side.promotion_rank() {
            for piece_type in PieceType::PROMOTION_CHOICES {
                moves.push(mv.with_promotion(piece_type));
            }
        } else {
            moves.push(mv);
        }
    }

    /// 尝试添加走法（检查目标格是否可以移动）
    fn try_add_move(board: &Board, from: Square, to: Square, piece: Piece, moves: &mut Vec<Move>) {
        if let Some(target) = board.get(to) {
            if target.side != piece.side {
                moves.push(Move::with_capture(piece, from, to, target));
            }
        } else {
            moves.push(Move::new(piece, from, to));
        }
    }

    /// 检查格子是否受到指定阵营攻击
    pub fn is_square_attacked(board: &Board, target: Square, by: Side) -> bool {
        let attacker_is = |sq: Option<Square>, piece_type: PieceType| {
            sq.and_then(|sq| board.get(sq))
                .is_some_and(|p| p.side == by && p.piece_type == piece_type)
        };

        // 兵：攻击方的兵站在目标格的"后方"斜角
        let behind = -by.forward();
        if [-1i8, 1i8]
            .into_iter()
            .any(|df| attacker_is(target.offset(behind, df), PieceType::Pawn))
        {
            return true;
        }

        if KNIGHT_OFFSETS
            .iter()
            .any(|&(dr, df)| attacker_is(target.offset(dr, df), PieceType::Knight))
        {
            return true;
        }

        if KING_DIRECTIONS
            .iter()
            .any(|&(dr, df)| attacker_is(target.offset(dr, df), PieceType::King))
        {
            return true;
        }

        Self::ray_attacked(board, target, by, &ROOK_DIRECTIONS, PieceType::Rook)
            || Self::ray_attacked(board, target, by, &BISHOP_DIRECTIONS, PieceType::Bishop)
    }

    /// 沿射线查找第一个棋子，是攻击方的同类远程棋子或后则受攻击
    fn ray_attacked(
        board: &Board,
        target: Square,
        by: Side,
        directions: &[(i8, i8)],
        slider: PieceType,
    ) -> bool {
        directions.iter().any(|&(dr, df)| {
            let mut current = target;
            while let Some(next) = current.offset(dr, df) {
                if let Some(piece) = board.get(next) {
                    return piece.side == by
                        && (piece.piece_type == slider || piece.piece_type == PieceType::Queen);
                }
                current = next;
            }
            false
        })
    }
}
