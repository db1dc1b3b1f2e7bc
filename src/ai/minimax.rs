//! Minimax 搜索（Alpha-Beta 剪枝）
//!
//! 白方为最大化一方，分数始终以白方为正。内部节点 fail-soft：返回找到的真实最好值，
//! 不截断到窗口；叶子交给静态搜索。

use log::{debug, trace};
use serde::Serialize;

use super::ordering::order_moves;
use super::quiescence::DEFAULT_QUIESCENCE_DEPTH;
use super::{sort_and_truncate, AIConfig, AIStrategy, ScoredMove};
use crate::board::Board;
use crate::error::{EngineError, Result};
use crate::eval::evaluate;
use crate::types::{ChessMove, Color, ColorExt, GameResult, Score, SCORE_INFINITY};

/// 搜索统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// 主搜索节点数
    pub nodes: u64,
    /// 静态搜索节点数
    pub qnodes: u64,
}

/// 根节点搜索结果
#[derive(Debug, Clone, PartialEq)]
pub struct RootResult {
    pub best_move: ChessMove,
    /// 只有一个合法走法时不搜索，没有分数
    pub best_score: Option<Score>,
    /// 每个根走法的分数（按搜索顺序）；被剪枝兄弟节点的分数只是边界
    pub move_scores: Vec<(ChessMove, Score)>,
}

/// Alpha-Beta 搜索器
#[derive(Debug, Clone)]
pub struct AlphaBeta {
    depth: u32,
    quiescence_depth: u32,
    pub(super) stats: SearchStats,
}

impl AlphaBeta {
    pub fn new(depth: u32, quiescence_depth: u32) -> Result<Self> {
        if depth < 1 {
            return Err(EngineError::InvalidConfig(format!(
                "depth must be >= 1, got {}",
                depth
            )));
        }
        Ok(AlphaBeta {
            depth,
            quiescence_depth,
            stats: SearchStats::default(),
        })
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Alpha-Beta 递归
    ///
    /// 终局直接评估；深度用尽进入静态搜索。`beta <= alpha` 时停止搜索剩余兄弟。
    pub fn minimax(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> Score {
        self.stats.nodes += 1;

        let moves = board.legal_moves();
        if board.game_result(Some(&moves)) != GameResult::Ongoing {
            return evaluate(board);
        }
        if depth == 0 {
            return self.quiescence(board, self.quiescence_depth, alpha, beta, maximizing);
        }

        let ordered = order_moves(board, moves);

        if maximizing {
            let mut max_eval = -SCORE_INFINITY;
            for mv in ordered {
                let eval = {
                    let mut child = board.scoped_move(mv);
                    self.minimax(&mut child, depth - 1, alpha, beta, false)
                };
                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            max_eval
        } else {
            let mut min_eval = SCORE_INFINITY;
            for mv in ordered {
                let eval = {
                    let mut child = board.scoped_move(mv);
                    self.minimax(&mut child, depth - 1, alpha, beta, true)
                };
                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            min_eval
        }
    }

    /// 根节点搜索
    ///
    /// 没有合法走法返回 None；只有一个合法走法时直接返回，不搜索。
    /// 同分时保留排序后最先出现的走法。
    pub fn search_root(&mut self, board: &mut Board) -> Option<RootResult> {
        self.stats = SearchStats::default();

        let moves = board.legal_moves();
        match moves.len() {
            0 => return None,
            1 => {
                return Some(RootResult {
                    best_move: moves[0],
                    best_score: None,
                    move_scores: Vec::new(),
                })
            }
            _ => {}
        }

        let maximizing = board.side_to_move() == Color::White;
        let mut alpha = -SCORE_INFINITY;
        let mut beta = SCORE_INFINITY;
        let mut best: Option<(ChessMove, Score)> = None;
        let mut move_scores = Vec::with_capacity(moves.len());

        for mv in order_moves(board, moves) {
            let score = {
                let mut child = board.scoped_move(mv);
                self.minimax(&mut child, self.depth - 1, alpha, beta, !maximizing)
            };
            trace!("  {}: {}", mv, score);
            move_scores.push((mv, score));

            let improved = match best {
                None => true,
                Some((_, best_score)) if maximizing => score > best_score,
                Some((_, best_score)) => score < best_score,
            };
            if improved {
                best = Some((mv, score));
            }

            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
        }

        let (best_move, best_score) = best?;
        debug!(
            "minimax depth {}: best {} score {} (nodes {}, qnodes {})",
            self.depth, best_move, best_score, self.stats.nodes, self.stats.qnodes
        );
        Some(RootResult {
            best_move,
            best_score: Some(best_score),
            move_scores,
        })
    }
}

/// 用 Alpha-Beta 搜索选择最佳走法
///
/// 不修改调用方的棋盘；`depth < 1` 返回配置错误；没有合法走法时返回 `Ok(None)`。
pub fn best_move_minimax(board: &Board, depth: u32) -> Result<Option<ChessMove>> {
    let mut searcher = AlphaBeta::new(depth, DEFAULT_QUIESCENCE_DEPTH)?;
    let mut scratch = board.clone();
    Ok(searcher.search_root(&mut scratch).map(|r| r.best_move))
}

/// Minimax AI
pub struct MinimaxAI {
    depth: u32,
    quiescence_depth: u32,
}

impl MinimaxAI {
    pub fn new(config: &AIConfig) -> Result<Self> {
        config.validate()?;
        Ok(MinimaxAI {
            depth: config.depth,
            quiescence_depth: config.quiescence_depth,
        })
    }
}

impl AIStrategy for MinimaxAI {
    fn select_moves(&self, board: &Board, n: usize) -> Vec<ScoredMove> {
        let Ok(mut searcher) = AlphaBeta::new(self.depth, self.quiescence_depth) else {
            return Vec::new();
        };
        let mut scratch = board.clone();
        let Some(result) = searcher.search_root(&mut scratch) else {
            return Vec::new();
        };

        if result.move_scores.is_empty() {
            return vec![ScoredMove {
                mv: result.best_move,
                score: 0.0,
            }];
        }

        // 转换为走棋方视角，分数越大越好
        let sign = board.side_to_move().sign();
        let mut scored: Vec<ScoredMove> = result
            .move_scores
            .into_iter()
            .map(|(mv, score)| ScoredMove {
                mv,
                score: (sign * score) as f64,
            })
            .collect();
        sort_and_truncate(&mut scored, n);
        scored
    }

    fn select_best_move(&self, board: &Board) -> Option<ChessMove> {
        let mut searcher = AlphaBeta::new(self.depth, self.quiescence_depth).ok()?;
        let mut scratch = board.clone();
        searcher.search_root(&mut scratch).map(|r| r.best_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions;
    use crate::types::MATE_SCORE;

    /// 不剪枝的完整 minimax，叶子用全窗口静态搜索
    fn full_minimax(ab: &mut AlphaBeta, board: &mut Board, depth: u32, maximizing: bool) -> Score {
        let moves = board.legal_moves();
        if board.game_result(Some(&moves)) != GameResult::Ongoing {
            return evaluate(board);
        }
        if depth == 0 {
            return ab.quiescence(
                board,
                DEFAULT_QUIESCENCE_DEPTH,
                -SCORE_INFINITY,
                SCORE_INFINITY,
                maximizing,
            );
        }
        let values = moves.into_iter().map(|mv| {
            let mut child = board.scoped_move(mv);
            full_minimax(ab, &mut child, depth - 1, !maximizing)
        });
        let values: Vec<Score> = values.collect();
        if maximizing {
            values.into_iter().max().unwrap_or(-SCORE_INFINITY)
        } else {
            values.into_iter().min().unwrap_or(SCORE_INFINITY)
        }
    }

    #[test]
    fn test_back_rank_mate() {
        for depth in [2, 3] {
            let board = Board::from_fen(test_positions::BACK_RANK_MATE).unwrap();
            let mv = best_move_minimax(&board, depth).unwrap().unwrap();
            assert_eq!(mv.to_string(), "e1e8", "depth {}", depth);
        }
    }

    #[test]
    fn test_mate_in_one_both_colors() {
        let board = Board::from_fen(test_positions::SCHOLAR_MATE).unwrap();
        assert_eq!(best_move_minimax(&board, 1).unwrap().unwrap().to_string(), "h5f7");

        let board = Board::from_fen(test_positions::FOOLS_MATE).unwrap();
        assert_eq!(best_move_minimax(&board, 1).unwrap().unwrap().to_string(), "d8h4");
    }

    #[test]
    fn test_only_move_without_search() {
        let mut board = Board::from_fen(test_positions::ONLY_MOVE).unwrap();
        for depth in 1..=4 {
            let mut ab = AlphaBeta::new(depth, DEFAULT_QUIESCENCE_DEPTH).unwrap();
            let result = ab.search_root(&mut board).unwrap();
            assert_eq!(result.best_move.to_string(), "h3g1");
            assert_eq!(result.best_score, None);
            assert_eq!(ab.stats(), SearchStats::default());
        }
    }

    #[test]
    fn test_no_moves() {
        let board = Board::from_fen(test_positions::STALEMATE).unwrap();
        assert_eq!(best_move_minimax(&board, 2).unwrap(), None);
    }

    #[test]
    fn test_invalid_depth() {
        let board = Board::start();
        assert!(matches!(
            best_move_minimax(&board, 0),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_pruning_preserves_value() {
        let mut checked = 0;
        for &(fen, depth) in test_positions::PRUNING_SAMPLES {
            let mut board = Board::from_fen(fen).unwrap();
            let maximizing = board.side_to_move() == Color::White;

            let mut ab = AlphaBeta::new(depth, DEFAULT_QUIESCENCE_DEPTH).unwrap();
            let pruned = ab.minimax(&mut board, depth, -SCORE_INFINITY, SCORE_INFINITY, maximizing);
            let mut reference = AlphaBeta::new(depth, DEFAULT_QUIESCENCE_DEPTH).unwrap();
            let full = full_minimax(&mut reference, &mut board, depth, maximizing);

            assert_eq!(pruned, full, "{} depth {}", fen, depth);
            assert_eq!(board.to_fen(), fen);
            checked += 1;
        }
        assert!(checked >= 20);
    }

    #[test]
    fn test_interior_nodes_fail_soft() {
        // 窄窗口下返回真实的将杀分，不截断到窗口边界
        let mut board = Board::from_fen(test_positions::BACK_RANK_MATE).unwrap();
        let mut ab = AlphaBeta::new(1, DEFAULT_QUIESCENCE_DEPTH).unwrap();
        assert_eq!(ab.minimax(&mut board, 1, -100, 100, true), MATE_SCORE);

        let mut board = Board::from_fen(test_positions::BACK_RANK_MATE_BLACK).unwrap();
        assert_eq!(ab.minimax(&mut board, 1, -100, 100, false), -MATE_SCORE);

        // 同一窗口下静态搜索截断到边界
        let mut board = Board::from_fen(test_positions::BACK_RANK_MATE).unwrap();
        assert_eq!(
            ab.quiescence(&mut board, DEFAULT_QUIESCENCE_DEPTH, -100, 100, true),
            100
        );
    }

    #[test]
    fn test_root_choice_matches_root_value() {
        // 黑方可以用车换白后
        let mut board = Board::from_fen("4k3/8/8/8/8/8/3Q3K/3r4 b - - 0 1").unwrap();
        let mut ab = AlphaBeta::new(2, DEFAULT_QUIESCENCE_DEPTH).unwrap();
        let result = ab.search_root(&mut board).unwrap();
        let value = ab.minimax(&mut board, 2, -SCORE_INFINITY, SCORE_INFINITY, false);
        assert_eq!(result.best_score, Some(value));
        assert_eq!(result.best_move.to_string(), "d1d2");
    }

    #[test]
    fn test_position_unchanged() {
        for fen in test_positions::SAMPLE_POSITIONS.iter().take(6) {
            let mut board = Board::from_fen(fen).unwrap();
            let before = board.clone();
            let mut ab = AlphaBeta::new(2, DEFAULT_QUIESCENCE_DEPTH).unwrap();
            ab.search_root(&mut board);
            assert_eq!(board, before);
            assert_eq!(board.to_fen(), *fen);
        }
    }

    #[test]
    fn test_strategy_scores_from_mover_view() {
        let config = AIConfig {
            depth: 1,
            ..Default::default()
        };
        let ai = MinimaxAI::new(&config).unwrap();
        let board = Board::from_fen(test_positions::FOOLS_MATE).unwrap();
        let moves = ai.select_moves(&board, 3);
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[0].mv.to_string(), "d8h4");
        assert_eq!(moves[0].score, MATE_SCORE as f64);
    }
}
