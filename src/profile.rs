//! 搜索性能分析
//!
//! 统计各深度的节点数、耗时与有效分支因子，并估计 Alpha-Beta 剪掉的节点比例。

use log::debug;
use serde::Serialize;
use std::time::Instant;

use crate::ai::quiescence::DEFAULT_QUIESCENCE_DEPTH;
use crate::ai::AlphaBeta;
use crate::board::Board;
use crate::error::{EngineError, Result};
use crate::types::{Color, SCORE_INFINITY};

/// 单个深度的分析结果
#[derive(Debug, Clone, Serialize)]
pub struct DepthProfile {
    pub depth: u32,
    pub best_move: Option<String>,
    pub nodes: u64,
    pub qnodes: u64,
    pub elapsed_ms: f64,
    pub nodes_per_sec: f64,
    /// nodes^(1/depth)
    pub branching_factor: f64,
}

/// 剪枝效果估计
#[derive(Debug, Clone, Serialize)]
pub struct PruningEstimate {
    pub legal_moves: usize,
    pub depth: u32,
    pub nodes_searched: u64,
    /// 不剪枝时的近似节点数 legal_moves^depth
    pub theoretical_nodes: u64,
    pub pruning_pct: f64,
}

/// 在多个深度上搜索同一局面
pub fn profile_position(board: &Board, depths: &[u32]) -> Result<Vec<DepthProfile>> {
    let mut profiles = Vec::with_capacity(depths.len());

    for &depth in depths {
        let mut searcher = AlphaBeta::new(depth, DEFAULT_QUIESCENCE_DEPTH)?;
        let mut scratch = board.clone();

        let start = Instant::now();
        let result = searcher.search_root(&mut scratch);
        let elapsed = start.elapsed().as_secs_f64();

        let stats = searcher.stats();
        let profile = DepthProfile {
            depth: searcher.depth(),
            best_move: result.map(|r| r.best_move.to_string()),
            nodes: stats.nodes,
            qnodes: stats.qnodes,
            elapsed_ms: elapsed * 1000.0,
            nodes_per_sec: if elapsed > 0.0 {
                stats.nodes as f64 / elapsed
            } else {
                0.0
            },
            branching_factor: (stats.nodes as f64).powf(1.0 / searcher.depth() as f64),
        };
        debug!(
            "depth {}: {:?} nodes {} qnodes {} ({:.1}ms)",
            profile.depth, profile.best_move, profile.nodes, profile.qnodes, profile.elapsed_ms
        );
        profiles.push(profile);
    }

    Ok(profiles)
}

/// 对比 Alpha-Beta 实际搜索节点数与不剪枝的理论值
pub fn estimate_pruning(board: &Board, depth: u32) -> Result<PruningEstimate> {
    let mut searcher = AlphaBeta::new(depth, DEFAULT_QUIESCENCE_DEPTH)?;
    let legal_moves = board.legal_moves().len();
    if legal_moves == 0 {
        return Err(EngineError::InvalidMove(format!(
            "no legal moves in {}",
            board
        )));
    }

    let mut scratch = board.clone();
    let maximizing = board.side_to_move() == Color::White;
    searcher.minimax(&mut scratch, depth, -SCORE_INFINITY, SCORE_INFINITY, maximizing);

    let nodes_searched = searcher.stats().nodes;
    let theoretical_nodes = (legal_moves as u64).saturating_pow(depth);
    let pruning_pct = (1.0 - nodes_searched as f64 / theoretical_nodes as f64) * 100.0;

    Ok(PruningEstimate {
        legal_moves,
        depth,
        nodes_searched,
        theoretical_nodes,
        pruning_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions;

    #[test]
    fn test_profile_depths() {
        let board = Board::from_fen(test_positions::ITALIAN).unwrap();
        let profiles = profile_position(&board, &[1, 2]).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].depth, 1);
        assert_eq!(profiles[1].depth, 2);
        assert!(profiles.iter().all(|p| p.best_move.is_some()));
        // 深度 1：根节点的每个子节点各一次
        assert_eq!(profiles[0].nodes, board.legal_moves().len() as u64);
        assert!(profiles[1].nodes > profiles[0].nodes);
        assert!(profiles[1].branching_factor > 1.0);
    }

    #[test]
    fn test_profile_finds_mate() {
        let board = Board::from_fen(test_positions::BACK_RANK_MATE).unwrap();
        let profiles = profile_position(&board, &[1]).unwrap();
        assert_eq!(profiles[0].best_move.as_deref(), Some("e1e8"));
        assert!(profile_position(&board, &[0]).is_err());
    }

    #[test]
    fn test_pruning_estimate() {
        let board = Board::from_fen(test_positions::ITALIAN).unwrap();
        let estimate = estimate_pruning(&board, 3).unwrap();
        let legal = board.legal_moves().len() as u64;
        assert_eq!(estimate.legal_moves as u64, legal);
        assert_eq!(estimate.theoretical_nodes, legal * legal * legal);
        assert!(estimate.nodes_searched < estimate.theoretical_nodes);
        assert!(estimate.pruning_pct > 0.0 && estimate.pruning_pct < 100.0);
    }

    #[test]
    fn test_pruning_estimate_without_moves() {
        let board = Board::from_fen(test_positions::STALEMATE).unwrap();
        assert!(estimate_pruning(&board, 2).is_err());
    }
}
