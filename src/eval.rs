//! 局面评估
//!
//! 所有分数以白方为正（厘兵）。各项对黑白对称，颜色镜像后取反。

use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::board::Board;
use crate::types::{
    coords, square_at, BitBoard, ChessMove, Color, ColorExt, Piece, PieceExt, Score, Square,
    MATE_SCORE,
};

/// 被将军一方的惩罚
pub const CHECK_PENALTY: Score = 50;

/// 开发罚分只在前若干回合生效
pub const DEVELOPMENT_MOVES: u32 = 10;
pub const UNDEVELOPED_PENALTY: Score = 15;

pub const CASTLING_RIGHT_BONUS: Score = 10;
pub const CASTLED_BONUS: Score = 40;
pub const PAWN_SHIELD_BONUS: Score = 10;
pub const CENTER_KING_PENALTY: Score = 30;

pub const DOUBLED_PAWN_PENALTY: Score = 15;
pub const ISOLATED_PAWN_PENALTY: Score = 12;
pub const PASSED_PAWN_BONUS: Score = 10;

lazy_static! {
    /// d4/e4/d5/e5
    static ref CORE: BitBoard = region(3, 4);
    /// c3-f6 的 16 格
    static ref CENTER: BitBoard = region(2, 5);
    /// [颜色][兵所在格]：前方本列与相邻两列，有敌兵则不是通路兵
    static ref PASSED_SPANS: [[BitBoard; 64]; 2] = build_passed_spans();
    /// [颜色][王所在格]：王前两行、左右各一列的护卫兵位置
    static ref PAWN_SHIELDS: [[BitBoard; 64]; 2] = build_pawn_shields();
}

fn region(lo: i8, hi: i8) -> BitBoard {
    let mut mask = BitBoard::EMPTY;
    for rank in lo..=hi {
        for file in lo..=hi {
            if let Some(sq) = square_at(rank, file) {
                mask |= sq.bitboard();
            }
        }
    }
    mask
}

#[inline]
fn forward(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

#[inline]
fn home_rank(color: Color) -> i8 {
    match color {
        Color::White => 0,
        Color::Black => 7,
    }
}

fn build_passed_spans() -> [[BitBoard; 64]; 2] {
    let mut spans = [[BitBoard::EMPTY; 64]; 2];
    for color in [Color::White, Color::Black] {
        for sq in Square::ALL {
            let (rank, file) = coords(sq);
            let mut mask = BitBoard::EMPTY;
            let mut r = rank + forward(color);
            while (0..8).contains(&r) {
                for f in file - 1..=file + 1 {
                    if let Some(target) = square_at(r, f) {
                        mask |= target.bitboard();
                    }
                }
                r += forward(color);
            }
            spans[color as usize][sq as usize] = mask;
        }
    }
    spans
}

fn build_pawn_shields() -> [[BitBoard; 64]; 2] {
    let mut shields = [[BitBoard::EMPTY; 64]; 2];
    for color in [Color::White, Color::Black] {
        for sq in Square::ALL {
            let (rank, file) = coords(sq);
            let mut mask = BitBoard::EMPTY;
            for step in 1..=2 {
                for df in -1..=1 {
                    if let Some(target) = square_at(rank + step * forward(color), file + df) {
                        mask |= target.bitboard();
                    }
                }
            }
            shields[color as usize][sq as usize] = mask;
        }
    }
    shields
}

/// 中心 4 格奖励（按棋子类型）
fn core_bonus(kind: Piece) -> Score {
    match kind {
        Piece::Pawn => 20,
        Piece::Knight => 15,
        Piece::Bishop => 10,
        Piece::Rook | Piece::Queen => 5,
        Piece::King => 0,
    }
}

/// 扩展中心（c3-f6 除去中心 4 格）奖励
fn ring_bonus(kind: Piece) -> Score {
    match kind {
        Piece::Pawn => 10,
        Piece::Knight => 8,
        Piece::Bishop => 5,
        Piece::Rook | Piece::Queen => 2,
        Piece::King => 0,
    }
}

/// 评估明细（白方为正）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvalDetail {
    pub material: Score,
    pub center: Score,
    pub development: Score,
    pub king_safety: Score,
    pub pawn_structure: Score,
    pub check: Score,
    pub mobility: Score,
    /// 终局（将杀/和棋）时为 true，此时各分项均为 0
    pub terminal: bool,
    pub total: Score,
}

/// 纯子力评估
pub fn evaluate_material(board: &Board) -> Score {
    board
        .pieces()
        .map(|(_, color, piece)| color.sign() * piece.value())
        .sum()
}

/// 中心控制
pub fn evaluate_center(board: &Board) -> Score {
    board
        .pieces()
        .filter(|(sq, _, _)| CENTER.has(*sq))
        .map(|(sq, color, piece)| {
            let bonus = if CORE.has(sq) {
                core_bonus(piece)
            } else {
                ring_bonus(piece)
            };
            color.sign() * bonus
        })
        .sum()
}

/// 开局阶段马、象未出动的罚分
pub fn evaluate_development(board: &Board) -> Score {
    if board.fullmove_number() > DEVELOPMENT_MOVES {
        return 0;
    }
    const HOMES: [(i8, Piece); 4] = [
        (1, Piece::Knight),
        (6, Piece::Knight),
        (2, Piece::Bishop),
        (5, Piece::Bishop),
    ];
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        for (file, kind) in HOMES {
            let on_home = square_at(home_rank(color), file)
                .and_then(|sq| board.piece_at(sq))
                .is_some_and(|p| p == (color, kind));
            if on_home {
                score -= color.sign() * UNDEVELOPED_PENALTY;
            }
        }
    }
    score
}

/// 王的安全
pub fn evaluate_king_safety(board: &Board) -> Score {
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let mut side = board.castling_count(color) * CASTLING_RIGHT_BONUS;

        let king = board.king_square(color);
        let (rank, file) = coords(king);
        let castled = rank == home_rank(color) && (file <= 2 || file >= 6);
        if castled {
            side += CASTLED_BONUS;
            let shield = board.pieces_of(color, Piece::Pawn)
                & PAWN_SHIELDS[color as usize][king as usize];
            side += PAWN_SHIELD_BONUS * shield.len() as Score;
        }
        if CENTER.has(king) {
            side -= CENTER_KING_PENALTY;
        }

        score += color.sign() * side;
    }
    score
}

/// 兵形：叠兵、孤兵、通路兵
pub fn evaluate_pawn_structure(board: &Board) -> Score {
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let own = board.pieces_of(color, Piece::Pawn);
        let enemy = board.pieces_of(!color, Piece::Pawn);

        let mut files = [0 as Score; 8];
        for sq in own {
            files[sq.file() as usize] += 1;
        }

        let mut side = 0;
        for &count in files.iter() {
            if count > 1 {
                side -= DOUBLED_PAWN_PENALTY * (count - 1);
            }
        }

        for sq in own {
            let file = sq.file() as usize;
            let left = if file > 0 { files[file - 1] } else { 0 };
            let right = if file < 7 { files[file + 1] } else { 0 };
            if left == 0 && right == 0 {
                side -= ISOLATED_PAWN_PENALTY;
            }

            if (enemy & PASSED_SPANS[color as usize][sq as usize]).is_empty() {
                let (rank, _) = coords(sq);
                let advancement = match color {
                    Color::White => rank,
                    Color::Black => 7 - rank,
                };
                side += PASSED_PAWN_BONUS * advancement as Score;
            }
        }

        score += color.sign() * side;
    }
    score
}

/// 带分项的完整评估
pub fn evaluate_detailed(board: &Board) -> EvalDetail {
    let moves = board.legal_moves();
    let in_check = board.is_check();
    let sign = board.side_to_move().sign();

    if moves.is_empty() {
        // 走棋方被将杀则对其不利；逼和为 0
        let total = if in_check { -sign * MATE_SCORE } else { 0 };
        return EvalDetail {
            terminal: true,
            total,
            ..Default::default()
        };
    }
    if board.is_insufficient_material() {
        return EvalDetail {
            terminal: true,
            ..Default::default()
        };
    }

    let mut detail = EvalDetail {
        material: evaluate_material(board),
        center: evaluate_center(board),
        development: evaluate_development(board),
        king_safety: evaluate_king_safety(board),
        pawn_structure: evaluate_pawn_structure(board),
        check: if in_check { -sign * CHECK_PENALTY } else { 0 },
        mobility: sign * moves.len() as Score,
        terminal: false,
        total: 0,
    };
    detail.total = detail.material
        + detail.center
        + detail.development
        + detail.king_safety
        + detail.pawn_structure
        + detail.check
        + detail.mobility;
    detail
}

/// 局面评估（白方为正）
#[inline]
pub fn evaluate(board: &Board) -> Score {
    evaluate_detailed(board).total
}

/// 对每个合法走法做一层评估
pub fn score_moves(board: &Board) -> Vec<(ChessMove, Score)> {
    let mut scratch = board.clone();
    board
        .legal_moves()
        .into_iter()
        .map(|mv| {
            let child = scratch.scoped_move(mv);
            (mv, evaluate(&child))
        })
        .collect()
}

/// 一层贪心选择：白方取最大、黑方取最小，并列时随机选择
pub fn best_move_material<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<ChessMove> {
    let scored = score_moves(board);
    let sign = board.side_to_move().sign();
    let best = scored.iter().map(|&(_, s)| s * sign).max()?;
    let tied: Vec<ChessMove> = scored
        .iter()
        .filter(|&&(_, s)| s * sign == best)
        .map(|&(mv, _)| mv)
        .collect();
    tied.choose(rng).copied()
}
