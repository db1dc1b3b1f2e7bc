//! 走法排序
//!
//! 排序只影响剪枝效率，不影响搜索结果。

use crate::board::Board;
use crate::types::{ChessMove, PieceExt, Score};

pub const CHECK_PRIORITY: Score = 50;
pub const PROMOTION_PRIORITY: Score = 900;

/// 走法优先级（越大越先搜索）
///
/// 吃子按 MVV-LVA：被吃子序号 × 100 − 攻击子序号；将军 +50；升变 +900。
pub fn move_priority(board: &Board, mv: &ChessMove) -> Score {
    let mut priority = 0;

    if let Some(victim) = board.captured_piece(mv) {
        priority += victim.ordinal() * 100;
        if let Some((_, attacker)) = board.piece_at(mv.from) {
            priority -= attacker.ordinal();
        }
    }

    if board.gives_check(mv) {
        priority += CHECK_PRIORITY;
    }

    if mv.promotion.is_some() {
        priority += PROMOTION_PRIORITY;
    }

    priority
}

/// 按优先级降序排列（稳定排序，同分保持生成顺序）
pub fn order_moves(board: &Board, moves: Vec<ChessMove>) -> Vec<ChessMove> {
    let mut keyed: Vec<(ChessMove, Score)> = moves
        .into_iter()
        .map(|mv| (mv, move_priority(board, &mv)))
        .collect();
    keyed.sort_by(|a, b| b.1.cmp(&a.1));
    keyed.into_iter().map(|(mv, _)| mv).collect()
}
