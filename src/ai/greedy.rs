//! 贪婪 AI 策略（一层评估）

use super::{sort_and_truncate, AIConfig, AIStrategy, ScoredMove};
use crate::board::Board;
use crate::eval::{best_move_material, score_moves};
use crate::types::{ChessMove, ColorExt};
use rand::prelude::*;

/// 贪婪 AI - 评估每个走法之后的局面，取对走棋方最有利的
pub struct GreedyAI {
    rng: StdRng,
}

impl GreedyAI {
    pub fn new(config: &AIConfig) -> Self {
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        GreedyAI { rng }
    }
}

impl AIStrategy for GreedyAI {
    fn select_moves(&self, board: &Board, n: usize) -> Vec<ScoredMove> {
        let sign = board.side_to_move().sign();
        let mut scored: Vec<ScoredMove> = score_moves(board)
            .into_iter()
            .map(|(mv, score)| ScoredMove {
                mv,
                score: (sign * score) as f64,
            })
            .collect();
        sort_and_truncate(&mut scored, n);
        scored
    }

    /// 并列最佳时随机选择
    fn select_best_move(&self, board: &Board) -> Option<ChessMove> {
        let mut rng = self.rng.clone();
        best_move_material(board, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_preference() {
        let board = Board::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let ai = GreedyAI::new(&AIConfig {
            seed: Some(1),
            ..Default::default()
        });
        let moves = ai.select_moves(&board, 3);
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[0].mv.to_string(), "e4d5");
        assert_eq!(ai.select_best_move(&board).unwrap().to_string(), "e4d5");
    }

    #[test]
    fn test_same_seed_same_choice() {
        let board = Board::start();
        let config = AIConfig {
            seed: Some(99),
            ..Default::default()
        };
        let a = GreedyAI::new(&config).select_best_move(&board);
        let b = GreedyAI::new(&config).select_best_move(&board);
        assert!(a.is_some());
        assert_eq!(a, b);
    }
}
