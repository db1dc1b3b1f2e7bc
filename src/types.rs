//! 国际象棋核心类型定义
//!
//! 棋子、颜色、格子与走法直接使用 `cozy_chess` 的类型，这里只补充搜索和评估需要的
//! 分数类型与扩展方法。

pub use cozy_chess::{BitBoard, Color, File, Move as ChessMove, Piece, Rank, Square};

/// 评估分数（厘兵，白方为正）
pub type Score = i32;

/// 将杀分数
pub const MATE_SCORE: Score = 100_000;

/// 搜索窗口的无穷值（大于任何评估分数）
pub const SCORE_INFINITY: Score = 1_000_000;

/// 颜色扩展
pub trait ColorExt {
    /// 白方 +1，黑方 -1
    fn sign(self) -> Score;
    /// 小写名称，用于输出
    fn name(self) -> &'static str;
}

impl ColorExt for Color {
    #[inline]
    fn sign(self) -> Score {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

/// 棋子价值扩展
pub trait PieceExt {
    /// 子力价值（厘兵），王不计
    fn value(self) -> Score;
    /// 序号（兵=1 … 王=6），用于 MVV-LVA
    fn ordinal(self) -> Score;
}

impl PieceExt for Piece {
    #[inline]
    fn value(self) -> Score {
        match self {
            Piece::Pawn => 100,
            Piece::Knight => 300,
            Piece::Bishop => 300,
            Piece::Rook => 500,
            Piece::Queen => 900,
            Piece::King => 0,
        }
    }

    #[inline]
    fn ordinal(self) -> Score {
        match self {
            Piece::Pawn => 1,
            Piece::Knight => 2,
            Piece::Bishop => 3,
            Piece::Rook => 4,
            Piece::Queen => 5,
            Piece::King => 6,
        }
    }
}

/// 格子的行、列下标（0-7），行 0 是白方底线
#[inline]
pub fn coords(sq: Square) -> (i8, i8) {
    (sq.rank() as i8, sq.file() as i8)
}

/// 从行、列下标构造格子，越界返回 None
#[inline]
pub fn square_at(rank: i8, file: i8) -> Option<Square> {
    if (0..8).contains(&rank) && (0..8).contains(&file) {
        Some(Square::new(
            File::index(file as usize),
            Rank::index(rank as usize),
        ))
    } else {
        None
    }
}

/// 是否为浅色格
#[inline]
pub fn is_light(sq: Square) -> bool {
    let (rank, file) = coords(sq);
    (rank + file) % 2 == 1
}

/// 易位方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

/// 游戏结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Ongoing,
    WhiteWin,
    BlackWin,
    Draw,
}

impl GameResult {
    /// PGN 风格的比分
    pub fn score_str(&self) -> &'static str {
        match self {
            GameResult::WhiteWin => "1-0",
            GameResult::BlackWin => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Ongoing => "*",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_coords() {
        assert_eq!(coords(Square::A1), (0, 0));
        assert_eq!(coords(Square::E4), (3, 4));
        assert_eq!(square_at(7, 7), Some(Square::H8));
        assert_eq!(square_at(8, 0), None);
        assert_eq!(square_at(0, -1), None);
        assert!(!is_light(Square::A1));
        assert!(is_light(Square::H1));
    }

    #[test]
    fn test_move_uci() {
        let m: ChessMove = "e2e4".parse().unwrap();
        assert_eq!(m.from, Square::E2);
        assert_eq!(m.to, Square::E4);
        assert!(m.promotion.is_none());
        assert_eq!(m.to_string(), "e2e4");

        let m: ChessMove = "a7a8q".parse().unwrap();
        assert_eq!(m.promotion, Some(Piece::Queen));
        assert_eq!(m.to_string(), "a7a8q");

        assert!("e2".parse::<ChessMove>().is_err());
    }

    #[test]
    fn test_piece_values() {
        assert_eq!(Piece::Pawn.value(), 100);
        assert_eq!(Piece::Knight.value(), Piece::Bishop.value());
        assert_eq!(Piece::King.value(), 0);
        assert!(Piece::Queen.ordinal() > Piece::Rook.ordinal());
        assert_eq!(Color::Black.sign(), -1);
        assert_eq!(GameResult::Draw.score_str(), "1/2-1/2");
    }
}
