//! 静态搜索（Quiescence Search）
//!
//! 在主搜索深度用尽后，只继续搜索吃子、升变和将军，避免在交换中途停止评估。
//! 剪枝时把返回值截断到窗口边界（fail-hard），和主搜索的 fail-soft 不同。

use super::minimax::AlphaBeta;
use super::ordering::order_moves;
use crate::board::Board;
use crate::eval::evaluate;
use crate::types::{ChessMove, Score};

/// 默认静态搜索深度上限
pub const DEFAULT_QUIESCENCE_DEPTH: u32 = 10;

/// 已收集到这么多吃子/升变后不再加入将军走法
pub const MAX_NOISY_FOR_CHECKS: usize = 5;

/// 生成"嘈杂"走法：吃子、升变，以及在数量较少时的将军，按优先级排序
pub fn noisy_moves(board: &Board) -> Vec<ChessMove> {
    let mut noisy = Vec::new();
    for mv in board.legal_moves() {
        if board.is_capture(&mv) || mv.promotion.is_some() {
            noisy.push(mv);
        } else if noisy.len() < MAX_NOISY_FOR_CHECKS && board.gives_check(&mv) {
            noisy.push(mv);
        }
    }
    order_moves(board, noisy)
}

impl AlphaBeta {
    /// 静态搜索
    ///
    /// 先用当前局面评估值（stand-pat）作为边界，再只搜索嘈杂走法。
    /// `qdepth` 为 0 或没有嘈杂走法时直接返回 stand-pat。
    pub fn quiescence(
        &mut self,
        board: &mut Board,
        qdepth: u32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> Score {
        self.stats.qnodes += 1;

        let stand_pat = evaluate(board);
        if qdepth == 0 {
            return stand_pat;
        }

        if maximizing {
            if stand_pat >= beta {
                return beta;
            }
            alpha = alpha.max(stand_pat);
        } else {
            if stand_pat <= alpha {
                return alpha;
            }
            beta = beta.min(stand_pat);
        }

        let noisy = noisy_moves(board);
        if noisy.is_empty() {
            return stand_pat;
        }

        for mv in noisy {
            let score = {
                let mut child = board.scoped_move(mv);
                self.quiescence(&mut child, qdepth - 1, alpha, beta, !maximizing)
            };

            if maximizing {
                if score >= beta {
                    return beta;
                }
                alpha = alpha.max(score);
            } else {
                if score <= alpha {
                    return alpha;
                }
                beta = beta.min(score);
            }
        }

        if maximizing {
            alpha
        } else {
            beta
        }
    }
}
