//! FEN 字段处理
//!
//! 格式: `<棋盘> <回合> <易位权> <吃过路兵格> [<半回合计数> <回合数>]`
//!
//! 棋盘本身交给 `cozy_chess` 解析；这里负责字段切分、计数字段（缺省按 `0 1`）、
//! 吃过路兵格与走棋方是否匹配，以及颜色镜像。

use crate::error::{EngineError, Result};
use crate::types::{Color, Rank, Square};

/// 标准初始局面
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// `cozy_chess` 的半回合计数上限
const COZY_HALFMOVE_LIMIT: u32 = 100;

fn invalid(msg: String) -> EngineError {
    EngineError::InvalidFen(msg)
}

/// 切分后的 FEN 字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenFields<'a> {
    pub placement: &'a str,
    pub turn: Color,
    pub castling: &'a str,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenFields<'_> {
    /// 生成交给 `cozy_chess` 的 6 字段 FEN
    ///
    /// 半回合计数截到 100（75 回合规则由 Board 自己计数）。
    pub fn to_cozy_fen(&self, with_en_passant: bool) -> String {
        let ep = match self.en_passant {
            Some(sq) if with_en_passant => sq.to_string(),
            _ => "-".to_string(),
        };
        format!(
            "{} {} {} {} {} {}",
            self.placement,
            turn_char(self.turn),
            self.castling,
            ep,
            self.halfmove_clock.min(COZY_HALFMOVE_LIMIT),
            self.fullmove_number.min(u16::MAX as u32)
        )
    }
}

fn turn_char(color: Color) -> char {
    match color {
        Color::White => 'w',
        Color::Black => 'b',
    }
}

/// 切分并检查 FEN 字段（棋盘部分只检查行数）
pub fn split_fen(fen: &str) -> Result<FenFields<'_>> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 4 && parts.len() != 6 {
        return Err(invalid(format!(
            "expected '<board> <turn> <castling> <ep> [<halfmove> <fullmove>]', got: {}",
            fen
        )));
    }

    let ranks = parts[0].split('/').count();
    if ranks != 8 {
        return Err(invalid(format!("expected 8 ranks, got {}", ranks)));
    }

    let turn = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(invalid(format!("invalid turn: {}", other))),
    };

    let en_passant = match parts[3] {
        "-" => None,
        s => {
            let sq: Square = s
                .parse()
                .map_err(|_| invalid(format!("invalid en passant square: {}", s)))?;
            // 白方走棋时过路格在第 6 行，黑方走棋时在第 3 行
            let expected = match turn {
                Color::White => Rank::Sixth,
                Color::Black => Rank::Third,
            };
            if sq.rank() != expected {
                return Err(invalid(format!(
                    "en passant square {} does not match side to move",
                    s
                )));
            }
            Some(sq)
        }
    };

    let (halfmove_clock, fullmove_number) = if parts.len() == 6 {
        let half = parts[4]
            .parse::<u32>()
            .map_err(|_| invalid(format!("invalid halfmove clock: {}", parts[4])))?;
        let full = parts[5]
            .parse::<u32>()
            .map_err(|_| invalid(format!("invalid fullmove number: {}", parts[5])))?;
        (half, full.max(1))
    } else {
        (0, 1)
    };

    Ok(FenFields {
        placement: parts[0],
        turn,
        castling: parts[2],
        en_passant,
        halfmove_clock,
        fullmove_number,
    })
}

/// 颜色镜像：上下翻转、大小写互换、走棋方互换，计数字段不变
pub fn mirror_fen(fen: &str) -> Result<String> {
    let fields = split_fen(fen)?;

    let placement: Vec<String> = fields
        .placement
        .split('/')
        .rev()
        .map(swap_case)
        .collect();

    let castling = if fields.castling == "-" {
        "-".to_string()
    } else {
        // 互换后按 KQkq 的顺序排列
        let swapped = swap_case(fields.castling);
        let upper: String = swapped.chars().filter(|c| c.is_ascii_uppercase()).collect();
        let lower: String = swapped.chars().filter(|c| c.is_ascii_lowercase()).collect();
        format!("{}{}", upper, lower)
    };

    let en_passant = match fields.en_passant {
        Some(sq) => sq.flip_rank().to_string(),
        None => "-".to_string(),
    };

    Ok(format!(
        "{} {} {} {} {} {}",
        placement.join("/"),
        turn_char(!fields.turn),
        castling,
        en_passant,
        fields.halfmove_clock,
        fields.fullmove_number
    ))
}

fn swap_case(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect()
}
