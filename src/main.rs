//! Chess AI CLI
//!
//! 命令行界面，用于测试 AI

use chess_ai::{
    evaluate_detailed, get_legal_moves_from_fen, AIConfig, AIEngine, Board, ColorExt,
    DEFAULT_STRATEGY,
};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "chess-ai")]
#[command(about = "Chess AI Engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 获取合法走法
    Moves {
        /// FEN 字符串
        #[arg(long)]
        fen: String,
    },

    /// 评估局面分数（白方为正）
    Eval {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 选择最佳走法
    Best {
        /// FEN 字符串
        #[arg(long)]
        fen: String,

        /// AI 策略 (material, minimax, mcts)
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        strategy: String,

        /// 搜索深度
        #[arg(long)]
        depth: Option<u32>,

        /// MCTS 模拟次数
        #[arg(long)]
        simulations: Option<u32>,

        /// UCT 探索常数
        #[arg(long)]
        exploration: Option<f64>,

        /// MCTS 使用随机模拟（默认为评估引导）
        #[arg(long)]
        random_rollout: bool,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 返回的走法数量
        #[arg(long, default_value = "1")]
        n: usize,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize, Deserialize)]
struct MoveResult {
    #[serde(rename = "move")]
    mv: String,
    score: f64,
}

#[derive(Serialize, Deserialize)]
struct MovesResponse {
    moves: Vec<MoveResult>,
    total: usize,
    elapsed_ms: f64,
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(e))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { fen } => match get_legal_moves_from_fen(&fen) {
            Ok(moves) => {
                println!("Legal moves ({}):", moves.len());
                for mv in &moves {
                    println!("  {}", mv);
                }
            }
            Err(e) => fail(e),
        },

        Commands::Eval { fen, json } => {
            let board = Board::from_fen(&fen).unwrap_or_else(|e| fail(e));
            let detail = evaluate_detailed(&board);

            if json {
                println!("{}", to_json(&detail));
            } else {
                println!(
                    "局面评估 (白方视角, {} 走棋): {}",
                    board.side_to_move().name(),
                    detail.total
                );
                println!("  material:       {}", detail.material);
                println!("  center:         {}", detail.center);
                println!("  development:    {}", detail.development);
                println!("  king_safety:    {}", detail.king_safety);
                println!("  pawn_structure: {}", detail.pawn_structure);
                println!("  check:          {}", detail.check);
                println!("  mobility:       {}", detail.mobility);
            }
        }

        Commands::Best {
            fen,
            strategy,
            depth,
            simulations,
            exploration,
            random_rollout,
            seed,
            n,
            json,
        } => {
            let defaults = AIConfig::default();
            let config = AIConfig {
                depth: depth.unwrap_or(defaults.depth),
                simulations: simulations.unwrap_or(defaults.simulations),
                exploration_constant: exploration.unwrap_or(defaults.exploration_constant),
                guided_rollout: !random_rollout,
                seed,
                ..defaults
            };

            let ai = AIEngine::from_strategy(&strategy, &config).unwrap_or_else(|e| fail(e));

            let start = Instant::now();
            let moves = ai.select_moves_fen(&fen, n).unwrap_or_else(|e| fail(e));
            let elapsed = start.elapsed().as_secs_f64();

            if json {
                let response = MovesResponse {
                    total: moves.len(),
                    moves: moves
                        .into_iter()
                        .map(|(mv, score)| MoveResult { mv, score })
                        .collect(),
                    elapsed_ms: elapsed * 1000.0,
                };
                println!("{}", to_json(&response));
            } else if moves.is_empty() {
                println!("No legal moves (game over)");
            } else {
                println!("Best moves (strategy={}):", strategy);
                for (mv, score) in moves {
                    println!("  {} (score: {:.2})", mv, score);
                }
                println!("\nTime: {:.3}s", elapsed);
            }
        }
    }
}
