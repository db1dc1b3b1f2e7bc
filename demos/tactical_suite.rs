//! 战术题库测试
//!
//! cargo run --release --example tactical_suite -- --strategy minimax --category mate_in_1

use chess_ai::tactics::{run_suite, CATEGORIES};
use chess_ai::{AIConfig, DEFAULT_STRATEGY};
use clap::Parser;

#[derive(Parser)]
#[command(name = "tactical_suite", about = "按类别运行战术题库")]
struct Args {
    /// AI 策略 (material, minimax, mcts)
    #[arg(long, default_value = DEFAULT_STRATEGY)]
    strategy: String,

    /// 只运行指定类别（可重复）
    #[arg(long)]
    category: Vec<String>,

    /// 搜索深度（默认使用每道题的建议深度）
    #[arg(long)]
    depth: Option<u32>,

    /// MCTS 模拟次数
    #[arg(long)]
    simulations: Option<u32>,

    /// 随机种子
    #[arg(long)]
    seed: Option<u64>,

    /// JSON 输出
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let defaults = AIConfig::default();
    let config = AIConfig {
        simulations: args.simulations.unwrap_or(defaults.simulations),
        seed: args.seed,
        ..defaults
    };
    let categories: Vec<&str> = args.category.iter().map(String::as_str).collect();

    let report = match run_suite(&args.strategy, &config, &categories, args.depth) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error: {}", e),
        }
        return;
    }

    println!("═══════════════════════════════════════════════");
    println!("战术题库 (strategy={})", report.strategy);
    println!("═══════════════════════════════════════════════");
    for outcome in &report.outcomes {
        println!(
            "  {} [{}] {:<26} depth {} -> {:<6} {:>8.1}ms",
            if outcome.solved { "✓" } else { "✗" },
            outcome.category,
            outcome.name,
            outcome.depth,
            outcome.found.as_deref().unwrap_or("-"),
            outcome.elapsed_ms
        );
    }

    println!();
    for category in CATEGORIES {
        if let Some(tally) = report.by_category.get(category) {
            println!("  {:<10} {}/{}", category, tally.solved, tally.total);
        }
    }
    println!(
        "\n总计: {}/{} ({:.1}%)",
        report.solved(),
        report.total(),
        report.success_rate()
    );
}
