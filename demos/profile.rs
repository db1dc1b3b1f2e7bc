//! 搜索性能分析
//!
//! cargo run --release --example profile -- --max-depth 4

use chess_ai::{estimate_pruning, profile_position, test_positions, Board};
use clap::Parser;

#[derive(Parser)]
#[command(name = "profile", about = "统计节点数、分支因子与剪枝效果")]
struct Args {
    /// 只分析这个局面（默认分析一组标准局面）
    #[arg(long)]
    fen: Option<String>,

    /// 最大搜索深度
    #[arg(long, default_value = "3")]
    max_depth: u32,

    /// 估计剪枝效果使用的深度
    #[arg(long, default_value = "3")]
    pruning_depth: u32,
}

const POSITIONS: &[(&str, &str)] = &[
    ("Starting Position", test_positions::START),
    ("Italian", test_positions::ITALIAN),
    ("Kiwipete", test_positions::KIWIPETE),
    ("Rook Endgame", test_positions::ROOK_ENDGAME),
    ("Scholar's Mate", test_positions::SCHOLAR_MATE),
];

fn main() {
    env_logger::init();
    let args = Args::parse();

    let positions: Vec<(&str, &str)> = match &args.fen {
        Some(fen) => vec![("Custom", fen.as_str())],
        None => POSITIONS.to_vec(),
    };
    let depths: Vec<u32> = (1..=args.max_depth).collect();

    let mut branching = Vec::new();
    for (name, fen) in positions {
        let board = match Board::from_fen(fen) {
            Ok(board) => board,
            Err(e) => {
                eprintln!("Error: {}: {}", name, e);
                std::process::exit(1);
            }
        };

        println!("═══════════════════════════════════════════════");
        println!("{} ({} 个合法走法)", name, board.legal_moves().len());
        println!("FEN: {}", fen);
        println!("═══════════════════════════════════════════════");

        match profile_position(&board, &depths) {
            Ok(profiles) => {
                for p in &profiles {
                    println!(
                        "  深度 {}: {:<6} nodes {:>9} qnodes {:>9} {:>9.1}ms {:>10.0} n/s 分支 {:.2}",
                        p.depth,
                        p.best_move.as_deref().unwrap_or("-"),
                        p.nodes,
                        p.qnodes,
                        p.elapsed_ms,
                        p.nodes_per_sec,
                        p.branching_factor
                    );
                }
                if let Some(last) = profiles.last() {
                    branching.push(last.branching_factor);
                }
            }
            Err(e) => eprintln!("  Error: {}", e),
        }

        match estimate_pruning(&board, args.pruning_depth) {
            Ok(est) => println!(
                "  剪枝 (深度 {}): 搜索 {} / 理论 {}，剪掉 {:.1}%",
                est.depth, est.nodes_searched, est.theoretical_nodes, est.pruning_pct
            ),
            Err(e) => println!("  剪枝: {}", e),
        }
        println!();
    }

    if !branching.is_empty() {
        let avg = branching.iter().sum::<f64>() / branching.len() as f64;
        println!("平均有效分支因子 (深度 {}): {:.2}", args.max_depth, avg);
    }
}
