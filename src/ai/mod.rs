//! AI 策略模块
//!
//! 提供贪婪（一层评估）、Alpha-Beta 与 MCTS 三种走法选择策略

mod greedy;
pub mod mcts;
pub mod minimax;
pub mod ordering;
pub mod quiescence;

pub use greedy::GreedyAI;
pub use mcts::{best_move_mcts, search_tree, MCTSAI, MctsConfig, MctsTree};
pub use minimax::{best_move_minimax, AlphaBeta, MinimaxAI, RootResult, SearchStats};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::board::Board;
use crate::error::{EngineError, Result};
use crate::types::ChessMove;

/// 可用策略
pub const AVAILABLE_STRATEGIES: &[&str] = &["material", "minimax", "mcts"];

/// 默认策略
pub const DEFAULT_STRATEGY: &str = "minimax";

/// AI 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AIConfig {
    /// 搜索深度
    pub depth: u32,
    /// 静态搜索深度上限
    pub quiescence_depth: u32,
    /// MCTS 模拟次数
    pub simulations: u32,
    /// UCT 探索常数
    pub exploration_constant: f64,
    /// MCTS 是否使用评估函数引导的模拟
    pub guided_rollout: bool,
    pub random_rollout_cap: u32,
    pub guided_rollout_cap: u32,
    /// 随机种子
    pub seed: Option<u64>,
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig {
            depth: 3,
            quiescence_depth: quiescence::DEFAULT_QUIESCENCE_DEPTH,
            simulations: mcts::DEFAULT_SIMULATIONS,
            exploration_constant: mcts::DEFAULT_EXPLORATION,
            guided_rollout: true,
            random_rollout_cap: mcts::DEFAULT_RANDOM_ROLLOUT_CAP,
            guided_rollout_cap: mcts::DEFAULT_GUIDED_ROLLOUT_CAP,
            seed: None,
        }
    }
}

impl AIConfig {
    /// 检查参数，不做静默修正
    pub fn validate(&self) -> Result<()> {
        if self.depth < 1 {
            return Err(EngineError::InvalidConfig(format!(
                "depth must be >= 1, got {}",
                self.depth
            )));
        }
        MctsConfig::from_ai_config(self).validate()
    }
}

/// 走法评分（走棋方视角，越大越好）
#[derive(Debug, Clone)]
pub struct ScoredMove {
    pub mv: ChessMove,
    pub score: f64,
}

/// AI 策略接口
pub trait AIStrategy {
    /// 选择走法（返回带评分的走法列表）
    fn select_moves(&self, board: &Board, n: usize) -> Vec<ScoredMove>;

    /// 选择最佳走法
    fn select_best_move(&self, board: &Board) -> Option<ChessMove> {
        self.select_moves(board, 1).first().map(|sm| sm.mv)
    }
}

/// 排序辅助函数（稳定排序）
pub(crate) fn sort_and_truncate(scored: &mut Vec<ScoredMove>, n: usize) {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(n);
}

/// AI 引擎 - 统一的 AI 接口
pub struct AIEngine {
    strategy: Box<dyn AIStrategy>,
}

impl AIEngine {
    /// 创建贪婪 AI
    pub fn material(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(GreedyAI::new(config)),
        }
    }

    /// 创建 Alpha-Beta AI
    pub fn minimax(config: &AIConfig) -> Result<Self> {
        Ok(AIEngine {
            strategy: Box::new(MinimaxAI::new(config)?),
        })
    }

    /// 创建 MCTS AI
    pub fn mcts(config: &AIConfig) -> Result<Self> {
        Ok(AIEngine {
            strategy: Box::new(MCTSAI::new(config)?),
        })
    }

    /// 从策略名称创建
    pub fn from_strategy(name: &str, config: &AIConfig) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "material" | "greedy" => Ok(Self::material(config)),
            "minimax" | "alphabeta" => Self::minimax(config),
            "mcts" | "montecarlo" => Self::mcts(config),
            _ => Err(EngineError::UnknownStrategy(
                name.to_string(),
                AVAILABLE_STRATEGIES.join(", "),
            )),
        }
    }

    pub fn select_moves(&self, board: &Board, n: usize) -> Vec<ScoredMove> {
        self.strategy.select_moves(board, n)
    }

    pub fn select_best_move(&self, board: &Board) -> Option<ChessMove> {
        self.strategy.select_best_move(board)
    }

    /// 从 FEN 选择走法（返回带评分的 UCI 走法）
    pub fn select_moves_fen(&self, fen: &str, n: usize) -> Result<Vec<(String, f64)>> {
        let board = Board::from_fen(fen)?;
        Ok(self
            .strategy
            .select_moves(&board, n)
            .into_iter()
            .map(|sm| (sm.mv.to_string(), sm.score))
            .collect())
    }

    /// 从 FEN 选择最佳走法
    pub fn select_best_move_fen(&self, fen: &str) -> Result<Option<String>> {
        let board = Board::from_fen(fen)?;
        Ok(self.strategy.select_best_move(&board).map(|m| m.to_string()))
    }
}

impl AIStrategy for AIEngine {
    fn select_moves(&self, board: &Board, n: usize) -> Vec<ScoredMove> {
        self.strategy.select_moves(board, n)
    }

    fn select_best_move(&self, board: &Board) -> Option<ChessMove> {
        self.strategy.select_best_move(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions;

    #[test]
    fn test_default_config_is_valid() {
        let config = AIConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.depth, 3);
        assert_eq!(config.quiescence_depth, 10);
        assert_eq!(config.simulations, 200);
        assert!(config.guided_rollout);
    }

    #[test]
    fn test_invalid_config() {
        for config in [
            AIConfig {
                depth: 0,
                ..Default::default()
            },
            AIConfig {
                simulations: 0,
                ..Default::default()
            },
            AIConfig {
                exploration_constant: 0.0,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                config.validate(),
                Err(EngineError::InvalidConfig(_))
            ));
            assert!(AIEngine::from_strategy("minimax", &config).is_err());
        }
    }

    #[test]
    fn test_config_json() {
        let config: AIConfig =
            serde_json::from_str(r#"{"depth": 2, "simulations": 50, "seed": 7}"#).unwrap();
        assert_eq!(config.depth, 2);
        assert_eq!(config.simulations, 50);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.quiescence_depth, 10);

        let text = serde_json::to_string(&config).unwrap();
        let back: AIConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_all_strategies_from_name() {
        let config = AIConfig::default();
        for name in AVAILABLE_STRATEGIES.iter().chain(["greedy", "alphabeta", "MCTS"].iter()) {
            assert!(
                AIEngine::from_strategy(name, &config).is_ok(),
                "Failed to create strategy: {}",
                name
            );
        }
        assert!(matches!(
            AIEngine::from_strategy("random", &config),
            Err(EngineError::UnknownStrategy(_, _))
        ));
    }

    #[test]
    fn test_mate_through_engine() {
        let config = AIConfig {
            depth: 2,
            simulations: 200,
            guided_rollout_cap: 4,
            seed: Some(1),
            ..Default::default()
        };
        for name in ["material", "minimax", "mcts"] {
            let ai = AIEngine::from_strategy(name, &config).unwrap();
            let best = ai
                .select_best_move_fen(test_positions::BACK_RANK_MATE)
                .unwrap();
            assert_eq!(best.as_deref(), Some("e1e8"), "strategy {}", name);
        }
    }

    #[test]
    fn test_select_moves_fen() {
        let config = AIConfig {
            depth: 1,
            ..Default::default()
        };
        let ai = AIEngine::from_strategy("minimax", &config).unwrap();
        let moves = ai.select_moves_fen(crate::fen::START_FEN, 5).unwrap();
        assert_eq!(moves.len(), 5);

        assert!(matches!(
            ai.select_moves_fen("not a fen", 1),
            Err(EngineError::InvalidFen(_))
        ));
        assert_eq!(
            ai.select_best_move_fen(test_positions::STALEMATE).unwrap(),
            None
        );
    }
}
