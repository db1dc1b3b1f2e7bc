//! 战术题库
//!
//! 按类别分组的测试局面（一步杀、两步杀、战术、送子、开局、残局），
//! 用任意策略求解并按类别统计解出率。

use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

use crate::ai::{AIConfig, AIEngine};
use crate::board::Board;
use crate::error::Result;
use crate::test_positions;

/// 一道战术题
#[derive(Debug, Clone, Copy)]
pub struct TacticalPuzzle {
    pub name: &'static str,
    pub fen: &'static str,
    /// 可接受的最佳走法（任一即可）
    pub best_moves: &'static [&'static str],
    pub category: &'static str,
    /// 建议搜索深度
    pub depth: u32,
    pub description: &'static str,
}

pub const MATE_IN_1: &str = "mate_in_1";
pub const MATE_IN_2: &str = "mate_in_2";
pub const TACTICS: &str = "tactics";
pub const HANGING: &str = "hanging";
pub const OPENING: &str = "opening";
pub const ENDGAME: &str = "endgame";

/// 所有类别（按输出顺序）
pub const CATEGORIES: &[&str] = &[MATE_IN_1, MATE_IN_2, TACTICS, HANGING, OPENING, ENDGAME];

pub const PUZZLES: &[TacticalPuzzle] = &[
    // ========================================
    // 一步杀
    // ========================================
    TacticalPuzzle {
        name: "Back Rank Mate",
        fen: test_positions::BACK_RANK_MATE,
        best_moves: &["e1e8"],
        category: MATE_IN_1,
        depth: 2,
        description: "车沉底，兵挡住了王的退路",
    },
    TacticalPuzzle {
        name: "Back Rank Mate (Black)",
        fen: test_positions::BACK_RANK_MATE_BLACK,
        best_moves: &["e8e1"],
        category: MATE_IN_1,
        depth: 2,
        description: "黑方车沉底",
    },
    TacticalPuzzle {
        name: "Scholar's Mate",
        fen: test_positions::SCHOLAR_MATE,
        best_moves: &["h5f7"],
        category: MATE_IN_1,
        depth: 2,
        description: "后吃 f7，象保护",
    },
    TacticalPuzzle {
        name: "Fool's Mate",
        fen: test_positions::FOOLS_MATE,
        best_moves: &["d8h4"],
        category: MATE_IN_1,
        depth: 2,
        description: "白方 f、g 兵走开后后斜线将杀",
    },
    TacticalPuzzle {
        name: "Queen on g7",
        fen: "1r3rk1/p4ppp/1pn1p3/q7/8/1PQ1P3/PB3PPP/R4RK1 w - - 0 1",
        best_moves: &["c3g7"],
        category: MATE_IN_1,
        depth: 2,
        description: "后吃 g7，b2 象沿大斜线保护",
    },
    TacticalPuzzle {
        name: "Queen Takes Rook",
        fen: "3r2k1/5ppp/8/8/8/8/5PPP/3QR1K1 w - - 0 1",
        best_moves: &["d1d8"],
        category: MATE_IN_1,
        depth: 2,
        description: "后吃底线车同时将杀",
    },
    // ========================================
    // 两步杀
    // ========================================
    TacticalPuzzle {
        name: "Rook Ladder",
        fen: "6k1/8/8/8/8/8/R7/1R4K1 w - - 0 1",
        best_moves: &["a2a7", "b1b7"],
        category: MATE_IN_2,
        depth: 3,
        description: "双车封锁第 7 行，下一步沉底",
    },
    // ========================================
    // 战术
    // ========================================
    TacticalPuzzle {
        name: "Knight Fork",
        fen: "r3k3/8/8/3N4/8/8/8/4K3 w - - 0 1",
        best_moves: &["d5c7"],
        category: TACTICS,
        depth: 3,
        description: "马将军同时捉车",
    },
    // ========================================
    // 送子
    // ========================================
    TacticalPuzzle {
        name: "Free Queen",
        fen: "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1",
        best_moves: &["e4d5"],
        category: HANGING,
        depth: 1,
        description: "兵吃无保护的后",
    },
    TacticalPuzzle {
        name: "Free Rook",
        fen: "4k3/8/8/8/3r4/8/8/3RK3 w - - 0 1",
        best_moves: &["d1d4"],
        category: HANGING,
        depth: 1,
        description: "车吃无保护的车",
    },
    // ========================================
    // 开局
    // ========================================
    TacticalPuzzle {
        name: "Opening Move",
        fen: test_positions::START,
        best_moves: &["e2e4", "d2d4", "g1f3", "c2c4", "b1c3"],
        category: OPENING,
        depth: 2,
        description: "占中或出子",
    },
    TacticalPuzzle {
        name: "Reply to e4",
        fen: "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
        best_moves: &["g8f6", "b8c6", "e7e5", "d7d5", "c7c5"],
        category: OPENING,
        depth: 2,
        description: "常见的应对",
    },
    TacticalPuzzle {
        name: "Castle Early",
        fen: "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/3P1N2/PPP2PPP/RNBQK2R w KQkq - 0 1",
        best_moves: &["e1g1"],
        category: OPENING,
        depth: 2,
        description: "出子完成后短易位",
    },
    // ========================================
    // 残局
    // ========================================
    TacticalPuzzle {
        name: "Pawn Race",
        fen: "8/p7/8/8/8/8/7P/k5K1 w - - 0 1",
        best_moves: &["h2h4"],
        category: ENDGAME,
        depth: 3,
        description: "兵冲两格",
    },
    TacticalPuzzle {
        name: "Queen and King Mate",
        fen: "7k/8/6K1/8/8/8/8/1Q6 w - - 0 1",
        best_moves: &["b1b8", "b1h7"],
        category: ENDGAME,
        depth: 2,
        description: "王后配合将杀",
    },
];

/// 单题结果
#[derive(Debug, Clone, Serialize)]
pub struct PuzzleOutcome {
    pub name: &'static str,
    pub category: &'static str,
    pub depth: u32,
    /// 引擎给出的走法，没有合法走法时为 None
    pub found: Option<String>,
    pub solved: bool,
    pub elapsed_ms: f64,
}

/// 类别统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    pub solved: usize,
    pub total: usize,
}

/// 题库运行结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    pub strategy: String,
    pub outcomes: Vec<PuzzleOutcome>,
    pub by_category: BTreeMap<&'static str, CategoryTally>,
}

impl SuiteReport {
    pub fn solved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.solved).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// 解出率（百分比）
    pub fn success_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.solved() as f64 * 100.0 / self.total() as f64
        }
    }
}

/// 按类别筛选题目，`categories` 为空表示全部
pub fn select_puzzles<'a>(
    categories: &'a [&'a str],
) -> impl Iterator<Item = &'static TacticalPuzzle> + 'a {
    PUZZLES
        .iter()
        .filter(move |p| categories.is_empty() || categories.contains(&p.category))
}

/// 用给定策略求解一道题
///
/// `depth` 为 None 时使用题目建议深度。
pub fn run_puzzle(
    puzzle: &'static TacticalPuzzle,
    strategy: &str,
    config: &AIConfig,
    depth: Option<u32>,
) -> Result<PuzzleOutcome> {
    let depth = depth.unwrap_or(puzzle.depth);
    let board = Board::from_fen(puzzle.fen)?;
    let engine = AIEngine::from_strategy(
        strategy,
        &AIConfig {
            depth,
            ..config.clone()
        },
    )?;

    let start = Instant::now();
    let found = engine.select_best_move(&board).map(|mv| mv.to_string());
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let solved = found
        .as_deref()
        .is_some_and(|mv| puzzle.best_moves.contains(&mv));
    debug!(
        "{} [{}] depth {}: {:?} ({})",
        puzzle.name,
        puzzle.category,
        depth,
        found,
        if solved { "solved" } else { "failed" }
    );

    Ok(PuzzleOutcome {
        name: puzzle.name,
        category: puzzle.category,
        depth,
        found,
        solved,
        elapsed_ms,
    })
}

/// 运行题库
pub fn run_suite(
    strategy: &str,
    config: &AIConfig,
    categories: &[&str],
    depth: Option<u32>,
) -> Result<SuiteReport> {
    let mut report = SuiteReport {
        strategy: strategy.to_string(),
        ..Default::default()
    };

    for puzzle in select_puzzles(categories) {
        let outcome = run_puzzle(puzzle, strategy, config, depth)?;
        let tally = report.by_category.entry(puzzle.category).or_default();
        tally.total += 1;
        if outcome.solved {
            tally.solved += 1;
        }
        report.outcomes.push(outcome);
    }

    info!(
        "tactical suite ({}): {}/{} solved ({:.1}%)",
        strategy,
        report.solved(),
        report.total(),
        report.success_rate()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_puzzles_are_valid() {
        for puzzle in PUZZLES {
            let board = Board::from_fen(puzzle.fen)
                .unwrap_or_else(|e| panic!("{}: {}", puzzle.name, e));
            assert!(!board.is_game_over(), "{} is already over", puzzle.name);
            assert!(CATEGORIES.contains(&puzzle.category), "{}", puzzle.name);
            for mv in puzzle.best_moves {
                assert!(
                    board.parse_move(mv).is_ok(),
                    "{}: {} is not legal",
                    puzzle.name,
                    mv
                );
            }
        }
    }

    #[test]
    fn test_mate_puzzles_deliver_mate() {
        for puzzle in select_puzzles(&[MATE_IN_1]) {
            let board = Board::from_fen(puzzle.fen).unwrap();
            for mv in puzzle.best_moves {
                let mut after = board.clone();
                after.push_uci(mv).unwrap();
                assert!(after.is_checkmate(), "{}: {}", puzzle.name, mv);
            }
        }
    }

    #[test]
    fn test_minimax_solves_mates() {
        let config = AIConfig::default();
        let report = run_suite("minimax", &config, &[MATE_IN_1], Some(1)).unwrap();
        assert_eq!(report.total(), 6);
        assert_eq!(report.solved(), report.total(), "{:?}", report.outcomes);

        let report = run_suite("minimax", &config, &[MATE_IN_2], None).unwrap();
        assert_eq!(report.solved(), 1, "{:?}", report.outcomes);
    }

    #[test]
    fn test_hanging_pieces_with_material() {
        let report = run_suite("material", &AIConfig::default(), &[HANGING], None).unwrap();
        assert_eq!(report.by_category[HANGING], CategoryTally { solved: 2, total: 2 });
        assert_eq!(report.success_rate(), 100.0);
    }

    #[test]
    fn test_category_filter() {
        assert_eq!(select_puzzles(&[]).count(), PUZZLES.len());
        assert_eq!(select_puzzles(&[OPENING]).count(), 3);
        assert_eq!(select_puzzles(&["nothing"]).count(), 0);

        let report = run_suite("minimax", &AIConfig::default(), &["nothing"], None).unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(report.success_rate(), 0.0);
    }

    #[test]
    fn test_unknown_strategy() {
        assert!(matches!(
            run_suite("random", &AIConfig::default(), &[MATE_IN_1], None),
            Err(EngineError::UnknownStrategy(_, _))
        ));
    }
}
