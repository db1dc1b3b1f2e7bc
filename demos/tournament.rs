//! 引擎对弈
//!
//! cargo run --release --example tournament -- --player1 minimax --player2 random --games 10

use chess_ai::tournament::{run_tournament, DEFAULT_MAX_PLIES};
use chess_ai::{AIConfig, AIEngine, AIStrategy, Board, ScoredMove, START_FEN};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::cell::RefCell;

#[derive(Parser)]
#[command(name = "tournament", about = "两个策略轮流执白对弈")]
struct Args {
    /// 第一个策略 (material, minimax, mcts, random)
    #[arg(long, default_value = "minimax")]
    player1: String,

    /// 第二个策略
    #[arg(long, default_value = "random")]
    player2: String,

    /// 对局数
    #[arg(long, default_value = "10")]
    games: u32,

    /// 每局最多半回合数
    #[arg(long, default_value_t = DEFAULT_MAX_PLIES)]
    max_plies: u32,

    /// 搜索深度
    #[arg(long, default_value = "2")]
    depth: u32,

    /// MCTS 模拟次数
    #[arg(long, default_value = "100")]
    simulations: u32,

    /// 起始局面
    #[arg(long, default_value = START_FEN)]
    fen: String,

    /// 随机种子
    #[arg(long, default_value = "42")]
    seed: u64,

    /// JSON 输出
    #[arg(long)]
    json: bool,
}

/// 随机走子（基准对手）
struct RandomPlayer {
    rng: RefCell<StdRng>,
}

impl AIStrategy for RandomPlayer {
    fn select_moves(&self, board: &Board, n: usize) -> Vec<ScoredMove> {
        let mut moves = board.legal_moves();
        moves.shuffle(&mut *self.rng.borrow_mut());
        moves
            .into_iter()
            .take(n)
            .map(|mv| ScoredMove { mv, score: 0.0 })
            .collect()
    }
}

fn player(name: &str, config: &AIConfig) -> Box<dyn AIStrategy> {
    if name == "random" {
        return Box::new(RandomPlayer {
            rng: RefCell::new(StdRng::seed_from_u64(config.seed.unwrap_or(0))),
        });
    }
    match AIEngine::from_strategy(name, config) {
        Ok(engine) => Box::new(engine),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let start = match Board::from_fen(&args.fen) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let config = AIConfig {
        depth: args.depth,
        simulations: args.simulations,
        seed: Some(args.seed),
        ..Default::default()
    };
    let p1 = player(&args.player1, &config);
    let p2 = player(&args.player2, &config);

    let report = run_tournament(
        (args.player1.as_str(), p1.as_ref()),
        (args.player2.as_str(), p2.as_ref()),
        &start,
        args.games,
        args.max_plies,
    );

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error: {}", e),
        }
        return;
    }

    println!("═══════════════════════════════════════════════");
    println!("对弈结果: {} vs {}", report.player1, report.player2);
    println!("═══════════════════════════════════════════════");
    for (i, game) in report.games.iter().enumerate() {
        println!(
            "  第 {:>2} 局: {} (W) vs {} (B): {:<7} {} ({} plies)",
            i + 1,
            game.white,
            game.black,
            game.result,
            game.reason,
            game.plies
        );
    }
    println!();
    println!(
        "{}: 胜 {} 负 {} 和 {}，得分 {:.1}/{}",
        report.player1,
        report.player1_wins,
        report.player2_wins,
        report.draws,
        report.player1_score(),
        args.games
    );
    println!(
        "{}: 胜 {} 负 {} 和 {}，得分 {:.1}/{}",
        report.player2,
        report.player2_wins,
        report.player1_wins,
        report.draws,
        report.player2_score(),
        args.games
    );
    println!("平均对局长度: {:.1} plies", report.average_plies());
    for (reason, count) in &report.reasons {
        println!("  {}: {}", reason, count);
    }
}
