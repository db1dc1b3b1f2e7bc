//! Chess AI Engine
//!
//! 国际象棋走法选择引擎 - 局面评估、Alpha-Beta + 静态搜索、UCT 蒙特卡洛树搜索

pub mod ai;
pub mod board;
pub mod error;
pub mod eval;
pub mod fen;
pub mod profile;
pub mod tactics;
pub mod test_positions;
pub mod tournament;
pub mod types;

pub use ai::{
    best_move_mcts, best_move_minimax, AIConfig, AIEngine, AIStrategy, MctsConfig, ScoredMove,
    AVAILABLE_STRATEGIES, DEFAULT_STRATEGY,
};
pub use board::{get_legal_moves_from_fen, Board, MoveGuard};
pub use error::{EngineError, Result};
pub use eval::{best_move_material, evaluate, evaluate_detailed, evaluate_material, EvalDetail};
pub use fen::{mirror_fen, split_fen, FenFields, START_FEN};
pub use profile::{estimate_pruning, profile_position, DepthProfile, PruningEstimate};
pub use tactics::{run_suite, SuiteReport, TacticalPuzzle, PUZZLES};
pub use tournament::{play_game, run_tournament, EndReason, TournamentReport};
pub use types::{
    BitBoard, CastlingSide, ChessMove, Color, ColorExt, GameResult, Piece, PieceExt, Score,
    Square, MATE_SCORE, SCORE_INFINITY,
};
