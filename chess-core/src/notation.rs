//! 代数记谱法
//!
//! 格式：`[棋子字母][x][目标格]`，兵不写字母，吃子时写 `x`。
//! - 易位：`O-O`（短易位）、`O-O-O`（长易位）
//! - 兵吃子带起始列：`exd5`
//! - 升变：`e8=Q`
//!
//! 不输出将军与将死后缀。解析只是在伪合法走法中做尽力匹配，不是完整的记谱解析器。

use tracing::warn;

use crate::constants::{FILE_NAMES, KINGSIDE_KING_FILE, QUEENSIDE_KING_FILE, RANK_NAMES};
use crate::error::{ChessError, Result};
use crate::moves::{Move, MoveGenerator};
use crate::piece::{PieceType, Square};
use crate::position::Position;

/// 解析时忽略的尾部符号
const ANNOTATION_SUFFIXES: [char; 4] = ['+', '#', '!', '?'];

/// 代数记谱
pub struct Notation;

impl Notation {
    /// 将走法转换为代数记谱（不做消歧义）
    pub fn to_algebraic(mv: &Move) -> String {
        if mv.is_castling {
            return Self::castling_notation(mv).to_string();
        }
        Self::render(mv, "")
    }

    /// 将走法转换为代数记谱，同类棋子能到达同一格时补上起始列/行
    ///
    /// `moves` 是当前局面生成的走法列表。
    pub fn to_algebraic_with_disambiguation(mv: &Move, moves: &[Move]) -> String {
        if mv.is_castling || mv.piece.piece_type == PieceType::Pawn {
            return Self::to_algebraic(mv);
        }

        let rivals: Vec<&Move> = moves
            .iter()
            .filter(|m| {
                m.to == mv.to && m.from != mv.from && m.piece == mv.piece && !m.is_castling
            })
            .collect();

        if rivals.is_empty() {
            return Self::to_algebraic(mv);
        }

        let file = FILE_NAMES[mv.from.file as usize];
        let rank = RANK_NAMES[mv.from.rank as usize];
        let same_file = rivals.iter().any(|m| m.from.file == mv.from.file);
        let same_rank = rivals.iter().any(|m| m.from.rank == mv.from.rank);

        let prefix = match (same_file, same_rank) {
            (false, _) => file.to_string(),
            (true, false) => rank.to_string(),
            (true, true) => format!("{}{}", file, rank),
        };

        Self::render(mv, &prefix)
    }

    /// 在当前局面的伪合法走法中查找与记谱对应的走法
    pub fn find_move(position: &Position, notation: &str) -> Result<Move> {
        let candidates = MoveGenerator::generate_pseudo_legal(position);
        let text = notation.trim().trim_end_matches(ANNOTATION_SUFFIXES);

        let matches: Vec<Move> = match text {
            "O-O" | "0-0" => Self::castling_candidates(&candidates, KINGSIDE_KING_FILE),
            "O-O-O" | "0-0-0" => Self::castling_candidates(&candidates, QUEENSIDE_KING_FILE),
            _ => match Self::split_target(text) {
                Some((piece_type, target, promotion)) => candidates
                    .iter()
                    .filter(|m| {
                        !m.is_castling
                            && m.to == target
                            && m.piece.piece_type == piece_type
                            && (promotion.is_none() || m.promotion == promotion)
                    })
                    .copied()
                    .collect(),
                None => Vec::new(),
            },
        };

        match matches.as_slice() {
            [] => {
                warn!(notation, "no move matches notation");
                Err(ChessError::NoMatchingMove {
                    notation: notation.to_string(),
                })
            }
            [mv] => Ok(*mv),
            _ => {
                // 多个候选时按完整记谱精确匹配
                let exact: Vec<&Move> = matches
                    .iter()
                    .filter(|m| {
                        Self::to_algebraic(m) == text
                            || Self::to_algebraic_with_disambiguation(m, &candidates) == text
                    })
                    .collect();

                if let [mv] = exact.as_slice() {
                    return Ok(**mv);
                }

                warn!(notation, candidates = matches.len(), "ambiguous notation");
                Err(ChessError::AmbiguousMove {
                    notation: notation.to_string(),
                    candidates: matches.len(),
                })
            }
        }
    }

    /// 易位记谱
    fn castling_notation(mv: &Move) -> &'static str {
        if mv.to.file == KINGSIDE_KING_FILE {
            "O-O"
        } else {
            "O-O-O"
        }
    }

    /// 组装非易位走法的记谱
    fn render(mv: &Move, disambiguation: &str) -> String {
        let mut text = String::with_capacity(8);

        match mv.piece.piece_type.notation_letter() {
            Some(letter) => {
                text.push(letter);
                text.push_str(disambiguation);
            }
            None if mv.is_capture() => text.push(FILE_NAMES[mv.from.file as usize]),
            None => {}
        }

        if mv.is_capture() {
            text.push('x');
        }
        text.push_str(&mv.to.name());

        if let Some(letter) = mv.promotion.and_then(|p| p.notation_letter()) {
            text.push('=');
            text.push(letter);
        }

        text
    }

    fn castling_candidates(candidates: &[Move], king_file: u8) -> Vec<Move> {
        candidates
            .iter()
            .filter(|m| m.is_castling && m.to.file == king_file)
            .copied()
            .collect()
    }

    /// 拆出棋子类型、目标格和升变类型
    fn split_target(text: &str) -> Option<(PieceType, Square, Option<PieceType>)> {
        if !text.is_ascii() {
            return None;
        }

        let (body, promotion) = match text.split_once('=') {
            Some((body, suffix)) => {
                let mut chars = suffix.chars();
                match (chars.next().and_then(PieceType::from_notation_letter), chars.next()) {
                    (Some(piece_type), None) if piece_type != PieceType::King => {
                        (body, Some(piece_type))
                    }
                    _ => return None,
                }
            }
            None => (text, None),
        };

        if body.len() < 2 {
            return None;
        }
        let target = Square::from_name(&body[body.len() - 2..]).ok()?;
        let piece_type = body
            .chars()
            .next()
            .and_then(PieceType::from_notation_letter)
            .unwrap_or(PieceType::Pawn);

        Some((piece_type, target, promotion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;
    use crate::piece::{Piece, Side};
    use crate::text_board::TextBoardOptions;

    fn sq(name: &str) -> Square {
        Square::from_name(name).unwrap()
    }

    fn sorted_moves(position: &Position, prefix: &str) -> Vec<String> {
        let mut moves: Vec<String> = position
            .moves()
            .into_iter()
            .filter(|m| m.starts_with(prefix))
            .collect();
        moves.sort();
        moves
    }

    #[test]
    fn test_piece_notation() {
        let knight = Piece::new(PieceType::Knight, Side::White);
        let mv = Move::new(knight, sq("g1"), sq("f3"));
        assert_eq!(Notation::to_algebraic(&mv), "Nf3");

        let rook = Piece::new(PieceType::Rook, Side::Black);
        let captured = Piece::new(PieceType::Bishop, Side::White);
        let mv = Move::with_capture(rook, sq("e8"), sq("e2"), captured);
        assert_eq!(Notation::to_algebraic(&mv), "Rxe2");
    }

    #[test]
    fn test_pawn_notation() {
        let pawn = Piece::new(PieceType::Pawn, Side::White);
        assert_eq!(Notation::to_algebraic(&Move::new(pawn, sq("e2"), sq("e4"))), "e4");

        let victim = Piece::new(PieceType::Pawn, Side::Black);
        let mv = Move::with_capture(pawn, sq("e4"), sq("d5"), victim);
        assert_eq!(Notation::to_algebraic(&mv), "exd5");

        let mv = Move::new(pawn, sq("a7"), sq("a8")).with_promotion(PieceType::Queen);
        assert_eq!(Notation::to_algebraic(&mv), "a8=Q");
    }

    #[test]
    fn test_castling_notation() {
        let king = Piece::new(PieceType::King, Side::White);
        assert_eq!(Notation::to_algebraic(&Move::castling(king, sq("e1"), sq("g1"))), "O-O");
        assert_eq!(Notation::to_algebraic(&Move::castling(king, sq("e1"), sq("c1"))), "O-O-O");
    }

    #[test]
    fn test_king_moves_by_notation() {
        let mut position = Position::initial();
        position
            .load_text_board(
                "
. . . . . . k .
. . . . . . . .
. . . . . . . .
. . . . . P P P
. . . . . P K P
. . . . . b b .
. . . . . . . .
. . . . . . . .",
                &TextBoardOptions::default().with_side_to_move(Side::White),
            )
            .unwrap();

        assert_eq!(sorted_moves(&position, "K"), vec!["Kh3", "Kxf3", "Kxg3"]);
    }

    #[test]
    fn test_castling_in_move_list() {
        let mut position = Position::empty();
        let text = "
. . . . k . . .
. . . . . . . .
. . . . . . . .
. . . . . . . .
. . . . . . . .
. . . . . . . .
. . . P P P . .
R . . . K . . R";
        position
            .load_text_board(
                text,
                &TextBoardOptions::default()
                    .with_side_to_move(Side::White)
                    .with_castling("KQ"),
            )
            .unwrap();

        let moves = position.moves();
        assert!(moves.contains(&"O-O".to_string()));
        assert!(moves.contains(&"O-O-O".to_string()));

        position
            .load_text_board(text, &TextBoardOptions::default().with_castling("Q"))
            .unwrap();
        let moves = position.moves();
        assert!(!moves.contains(&"O-O".to_string()));
        assert!(moves.contains(&"O-O-O".to_string()));
    }

    #[test]
    fn test_disambiguation_by_file() {
        let position = Fen::parse("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1").unwrap();
        let moves = position.moves_verbose();

        let from_b1 = moves
            .iter()
            .find(|m| m.from == sq("b1") && m.to == sq("d2"))
            .unwrap();
        assert_eq!(Notation::to_algebraic(from_b1), "Nd2");
        assert_eq!(Notation::to_algebraic_with_disambiguation(from_b1, &moves), "Nbd2");
    }

    #[test]
    fn test_disambiguation_by_rank() {
        let position = Fen::parse("R3k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let moves = position.moves_verbose();

        let from_a1 = moves
            .iter()
            .find(|m| m.from == sq("a1") && m.to == sq("a4"))
            .unwrap();
        assert_eq!(Notation::to_algebraic_with_disambiguation(from_a1, &moves), "R1a4");
    }

    #[test]
    fn test_disambiguation_by_file_and_rank() {
        let position = Fen::parse("4k3/8/8/8/Q2Q4/8/8/Q3K3 w - - 0 1").unwrap();
        let moves = position.moves_verbose();

        let from_a4 = moves
            .iter()
            .find(|m| m.from == sq("a4") && m.to == sq("d1"))
            .unwrap();
        assert_eq!(Notation::to_algebraic_with_disambiguation(from_a4, &moves), "Qa4d1");
    }

    #[test]
    fn test_no_disambiguation_needed() {
        let position = Position::initial();
        let moves = position.moves_verbose();
        let mv = moves
            .iter()
            .find(|m| m.to == sq("f3") && m.piece.piece_type == PieceType::Knight)
            .unwrap();
        assert_eq!(Notation::to_algebraic_with_disambiguation(mv, &moves), "Nf3");
    }

    #[test]
    fn test_find_move() {
        let position = Position::initial();

        let mv = Notation::find_move(&position, "Nc3").unwrap();
        assert_eq!(mv.from, sq("b1"));

        let mv = Notation::find_move(&position, "e4").unwrap();
        assert_eq!(mv.from, sq("e2"));

        // 尾部注释符号被忽略
        let mv = Notation::find_move(&position, "d4+!").unwrap();
        assert_eq!(mv.to, sq("d4"));
    }

    #[test]
    fn test_find_move_failures() {
        let position = Position::initial();

        let err = Notation::find_move(&position, "Qh5").unwrap_err();
        assert!(matches!(err, ChessError::NoMatchingMove { .. }));
        assert!(err.is_lookup_failure());

        assert!(Notation::find_move(&position, "").is_err());
        assert!(Notation::find_move(&position, "zz").is_err());
        assert!(Notation::find_move(&position, "O-O").is_err());
        assert!(Notation::find_move(&position, "e4=Q").is_err());
        assert!(Notation::find_move(&position, "é4").is_err());
    }

    #[test]
    fn test_find_move_ambiguous() {
        let position = Fen::parse("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1").unwrap();

        let err = Notation::find_move(&position, "Nd2").unwrap_err();
        assert_eq!(
            err,
            ChessError::AmbiguousMove {
                notation: "Nd2".to_string(),
                candidates: 2,
            }
        );

        let mv = Notation::find_move(&position, "Nfd2").unwrap();
        assert_eq!(mv.from, sq("f1"));
    }

    #[test]
    fn test_find_pawn_capture_by_file() {
        let position = Fen::parse("4k3/8/8/3p4/2P1P3/8/8/4K3 w - - 0 1").unwrap();

        let mv = Notation::find_move(&position, "cxd5").unwrap();
        assert_eq!(mv.from, sq("c4"));

        let err = Notation::find_move(&position, "xd5").unwrap_err();
        assert!(matches!(err, ChessError::AmbiguousMove { .. }));
    }

    #[test]
    fn test_find_promotion() {
        let position = Fen::parse("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();

        let mv = Notation::find_move(&position, "a8=R").unwrap();
        assert_eq!(mv.promotion, Some(PieceType::Rook));

        // 不写升变类型时有四个候选
        let err = Notation::find_move(&position, "a8").unwrap_err();
        assert!(matches!(err, ChessError::AmbiguousMove { candidates: 4, .. }));
    }
}
