//! 引擎对弈
//!
//! 两个策略轮流执白对弈若干局，统计胜负和与结束原因。

use log::{debug, info};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::ai::AIStrategy;
use crate::board::Board;
use crate::types::{Color, ColorExt, GameResult};

/// 默认每局最多半回合数
pub const DEFAULT_MAX_PLIES: u32 = 200;

/// 对局结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    Repetition,
    MoveLimit,
    /// 走棋方给不出合法走法，判负
    IllegalMove,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EndReason::Checkmate => "checkmate",
            EndReason::Stalemate => "stalemate",
            EndReason::InsufficientMaterial => "insufficient material",
            EndReason::SeventyFiveMoves => "75-move rule",
            EndReason::Repetition => "threefold repetition",
            EndReason::MoveLimit => "move limit",
            EndReason::IllegalMove => "illegal move",
        };
        write!(f, "{}", s)
    }
}

/// 单局记录
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    pub result: &'static str,
    pub reason: EndReason,
    pub plies: u32,
    pub moves: Vec<String>,
    pub final_fen: String,
}

/// 重复局面的键：棋子、走棋方、易位权、过路兵格
fn position_key(board: &Board) -> String {
    board
        .to_fen()
        .split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}

fn win_for(color: Color) -> GameResult {
    match color {
        Color::White => GameResult::WhiteWin,
        Color::Black => GameResult::BlackWin,
    }
}

/// 下一局
///
/// 每方必须返回合法走法，否则判负。局面重复三次或达到 `max_plies` 判和。
pub fn play_game(
    white: &dyn AIStrategy,
    black: &dyn AIStrategy,
    start: &Board,
    max_plies: u32,
) -> (GameResult, EndReason, Vec<String>, Board) {
    let mut board = start.clone();
    let mut moves = Vec::new();
    let mut seen: HashMap<String, u32> = HashMap::new();
    seen.insert(position_key(&board), 1);

    loop {
        let legal = board.legal_moves();
        let result = board.game_result(Some(&legal));
        if result != GameResult::Ongoing {
            let reason = if board.is_checkmate() {
                EndReason::Checkmate
            } else if legal.is_empty() {
                EndReason::Stalemate
            } else if board.is_insufficient_material() {
                EndReason::InsufficientMaterial
            } else {
                EndReason::SeventyFiveMoves
            };
            return (result, reason, moves, board);
        }
        if moves.len() as u32 >= max_plies {
            return (GameResult::Draw, EndReason::MoveLimit, moves, board);
        }

        let mover = board.side_to_move();
        let player = match mover {
            Color::White => white,
            Color::Black => black,
        };
        let mv = match player.select_best_move(&board) {
            Some(mv) if legal.contains(&mv) => mv,
            other => {
                debug!("{} returned {:?}, forfeits", mover.name(), other);
                return (win_for(!mover), EndReason::IllegalMove, moves, board);
            }
        };

        board.make_move(&mv);
        moves.push(mv.to_string());

        let count = seen.entry(position_key(&board)).or_insert(0);
        *count += 1;
        if *count >= 3 {
            return (GameResult::Draw, EndReason::Repetition, moves, board);
        }
    }
}

/// 对弈统计
#[derive(Debug, Clone, Default, Serialize)]
pub struct TournamentReport {
    pub player1: String,
    pub player2: String,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub draws: u32,
    pub total_plies: u32,
    pub reasons: BTreeMap<EndReason, u32>,
    pub games: Vec<GameRecord>,
}

impl TournamentReport {
    /// 胜一局 1 分，和一局 0.5 分
    pub fn player1_score(&self) -> f64 {
        self.player1_wins as f64 + self.draws as f64 * 0.5
    }

    pub fn player2_score(&self) -> f64 {
        self.player2_wins as f64 + self.draws as f64 * 0.5
    }

    pub fn average_plies(&self) -> f64 {
        if self.games.is_empty() {
            0.0
        } else {
            self.total_plies as f64 / self.games.len() as f64
        }
    }
}

/// 两个策略对弈 `games` 局，偶数局 player1 执白
pub fn run_tournament(
    player1: (&str, &dyn AIStrategy),
    player2: (&str, &dyn AIStrategy),
    start: &Board,
    games: u32,
    max_plies: u32,
) -> TournamentReport {
    let (name1, ai1) = player1;
    let (name2, ai2) = player2;
    let mut report = TournamentReport {
        player1: name1.to_string(),
        player2: name2.to_string(),
        ..Default::default()
    };

    for game in 0..games {
        let player1_white = game % 2 == 0;
        let (white, black, white_name, black_name) = if player1_white {
            (ai1, ai2, name1, name2)
        } else {
            (ai2, ai1, name2, name1)
        };

        let (result, reason, moves, final_board) = play_game(white, black, start, max_plies);

        match (result, player1_white) {
            (GameResult::WhiteWin, true) | (GameResult::BlackWin, false) => {
                report.player1_wins += 1
            }
            (GameResult::WhiteWin, false) | (GameResult::BlackWin, true) => {
                report.player2_wins += 1
            }
            _ => report.draws += 1,
        }
        *report.reasons.entry(reason).or_insert(0) += 1;
        report.total_plies += moves.len() as u32;

        info!(
            "game {}/{}: {} (W) vs {} (B): {} ({}, {} plies)",
            game + 1,
            games,
            white_name,
            black_name,
            result.score_str(),
            reason,
            moves.len()
        );

        report.games.push(GameRecord {
            white: white_name.to_string(),
            black: black_name.to_string(),
            result: result.score_str(),
            reason,
            plies: moves.len() as u32,
            moves,
            final_fen: final_board.to_fen(),
        });
    }

    info!(
        "{} {:.1} - {:.1} {} ({} draws)",
        name1,
        report.player1_score(),
        report.player2_score(),
        name2,
        report.draws
    );
    report
}
