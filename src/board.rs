//! 棋盘
//!
//! 规则（走法生成、合法性、将军）由 `cozy_chess` 提供。这里包一层薄适配：
//! 标准 UCI 易位写法（e1g1）、75 回合规则计数、可撤销走法 [`MoveGuard`]，
//! 以及搜索和评估需要的查询。

use std::fmt;
use std::ops::{Deref, DerefMut};

use cozy_chess::{
    get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves,
};

use crate::error::{EngineError, Result};
use crate::fen::{mirror_fen, split_fen};
use crate::types::{
    is_light, BitBoard, CastlingSide, ChessMove, Color, File, GameResult, Piece, Rank, Square,
};

/// 半回合计数达到该值判和（75 回合规则）
pub const SEVENTYFIVE_MOVE_PLIES: u32 = 150;

/// 撤销走法所需的快照
#[derive(Clone)]
pub struct Undo {
    inner: cozy_chess::Board,
    halfmove_clock: u32,
    fullmove_number: u32,
}

/// 棋盘
#[derive(Clone)]
pub struct Board {
    inner: cozy_chess::Board,
    /// `cozy_chess` 的计数在 100 截止，这里自己计数
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for Board {
    fn default() -> Self {
        Board::start()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Board) -> bool {
        self.to_fen() == other.to_fen()
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl Board {
    /// 标准初始局面
    pub fn start() -> Board {
        Board {
            inner: cozy_chess::Board::default(),
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// 从 FEN 字符串创建棋盘
    ///
    /// 没有己方兵可以吃的过路格会被忽略。
    pub fn from_fen(fen: &str) -> Result<Board> {
        let fields = split_fen(fen)?;
        let parse = |with_en_passant: bool| {
            cozy_chess::Board::from_fen(&fields.to_cozy_fen(with_en_passant), false)
                .map_err(|e| EngineError::InvalidFen(format!("{:?}: {}", e, fen)))
        };

        let mut inner = parse(false)?;
        if let Some(ep) = fields.en_passant {
            let capturers = get_pawn_attacks(ep, !fields.turn)
                & inner.colors(fields.turn)
                & inner.pieces(Piece::Pawn);
            if !capturers.is_empty() {
                inner = parse(true)?;
            }
        }

        let board = Board {
            inner,
            halfmove_clock: fields.halfmove_clock,
            fullmove_number: fields.fullmove_number,
        };

        // 不该走棋的一方不能处于被将军状态
        let waiting = !board.side_to_move();
        if board.is_square_attacked(board.king_square(waiting), board.side_to_move()) {
            return Err(EngineError::InvalidFen(format!(
                "{:?} is in check but it is not their turn",
                waiting
            )));
        }

        Ok(board)
    }

    /// 生成 FEN 字符串
    pub fn to_fen(&self) -> String {
        let cozy = self.inner.to_string();
        let head: Vec<&str> = cozy.split_whitespace().take(4).collect();
        format!(
            "{} {} {}",
            head.join(" "),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// 当前走棋方
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.inner.side_to_move()
    }

    pub fn castling_rights(&self, color: Color, side: CastlingSide) -> bool {
        let rights = self.inner.castle_rights(color);
        match side {
            CastlingSide::KingSide => rights.short.is_some(),
            CastlingSide::QueenSide => rights.long.is_some(),
        }
    }

    /// 一方保留的易位权数量
    pub fn castling_count(&self, color: Color) -> i32 {
        let rights = self.inner.castle_rights(color);
        rights.short.is_some() as i32 + rights.long.is_some() as i32
    }

    /// 吃过路兵的目标格
    pub fn en_passant(&self) -> Option<Square> {
        let rank = match self.side_to_move() {
            Color::White => Rank::Sixth,
            Color::Black => Rank::Third,
        };
        self.inner.en_passant().map(|file| Square::new(file, rank))
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// 获取某格的棋子
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        Some((self.inner.color_on(sq)?, self.inner.piece_on(sq)?))
    }

    /// 一方某类棋子的位棋盘
    #[inline]
    pub fn pieces_of(&self, color: Color, piece: Piece) -> BitBoard {
        self.inner.colors(color) & self.inner.pieces(piece)
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.inner.king(color)
    }

    /// 遍历所有棋子（a1 到 h8）
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Color, Piece)> + '_ {
        self.inner
            .occupied()
            .into_iter()
            .filter_map(move |sq| self.piece_at(sq).map(|(color, piece)| (sq, color, piece)))
    }

    /// 标准写法转换为 `cozy_chess` 的易位写法（王走到己方车上）
    fn to_cozy_move(&self, mv: &ChessMove) -> ChessMove {
        let is_king = self.inner.piece_on(mv.from) == Some(Piece::King);
        let (from_file, to_file) = (mv.from.file() as i8, mv.to.file() as i8);
        if !is_king || mv.from.rank() != mv.to.rank() || (to_file - from_file).abs() != 2 {
            return *mv;
        }
        let rights = self.inner.castle_rights(self.side_to_move());
        let rook_file = if to_file > from_file {
            rights.short.unwrap_or(File::H)
        } else {
            rights.long.unwrap_or(File::A)
        };
        ChessMove {
            from: mv.from,
            to: Square::new(rook_file, mv.from.rank()),
            promotion: None,
        }
    }

    /// `cozy_chess` 的易位写法转换为标准写法（王走到 g/c 列）
    fn from_cozy_move(&self, mv: ChessMove) -> ChessMove {
        let us = self.side_to_move();
        let castles = self.inner.piece_on(mv.from) == Some(Piece::King)
            && self.inner.colors(us).has(mv.to);
        if !castles {
            return mv;
        }
        let file = if mv.to.file() as i8 > mv.from.file() as i8 {
            File::G
        } else {
            File::C
        };
        ChessMove {
            from: mv.from,
            to: Square::new(file, mv.from.rank()),
            promotion: None,
        }
    }

    /// 执行走法，返回撤销快照
    ///
    /// `mv` 必须是当前局面的合法走法；不合法时棋盘不变。
    pub fn make_move(&mut self, mv: &ChessMove) -> Undo {
        let undo = Undo {
            inner: self.inner.clone(),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        };

        let resets_clock =
            self.is_capture(mv) || self.inner.piece_on(mv.from) == Some(Piece::Pawn);
        let mover = self.side_to_move();
        let cozy_move = self.to_cozy_move(mv);
        let played = self.inner.try_play(cozy_move);
        debug_assert!(played.is_ok(), "illegal move {} in {}", mv, self.to_fen());

        if played.is_ok() {
            if resets_clock {
                self.halfmove_clock = 0;
            } else {
                self.halfmove_clock += 1;
            }
            if mover == Color::Black {
                self.fullmove_number += 1;
            }
        }
        undo
    }

    /// 撤销走法（恢复快照）
    pub fn undo_move(&mut self, undo: Undo) {
        self.inner = undo.inner;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
    }

    /// 执行走法并返回守卫，守卫离开作用域时自动撤销
    pub fn scoped_move(&mut self, mv: ChessMove) -> MoveGuard<'_> {
        let undo = self.make_move(&mv);
        MoveGuard {
            board: self,
            undo: Some(undo),
        }
    }

    /// 检测某格是否被某方攻击
    fn is_square_attacked(&self, target: Square, attacker: Color) -> bool {
        let board = &self.inner;
        let occupied = board.occupied();
        let theirs = board.colors(attacker);
        let queens = board.pieces(Piece::Queen);

        let attackers = (get_pawn_attacks(target, !attacker) & board.pieces(Piece::Pawn))
            | (get_knight_moves(target) & board.pieces(Piece::Knight))
            | (get_king_moves(target) & board.pieces(Piece::King))
            | (get_bishop_moves(target, occupied) & (board.pieces(Piece::Bishop) | queens))
            | (get_rook_moves(target, occupied) & (board.pieces(Piece::Rook) | queens));
        !(attackers & theirs).is_empty()
    }

    /// 当前走棋方是否被将军
    #[inline]
    pub fn is_check(&self) -> bool {
        !self.inner.checkers().is_empty()
    }

    /// 获取当前走棋方的所有合法走法
    ///
    /// 顺序由 `cozy_chess` 决定且固定；易位用标准写法（e1g1）。
    pub fn legal_moves(&self) -> Vec<ChessMove> {
        let mut moves = Vec::with_capacity(64);
        self.inner.generate_moves(|piece_moves| {
            for mv in piece_moves {
                moves.push(self.from_cozy_move(mv));
            }
            false
        });
        moves
    }

    /// 解析 UCI 走法并检查合法性
    pub fn parse_move(&self, uci: &str) -> Result<ChessMove> {
        let mv: ChessMove = uci
            .trim()
            .parse()
            .map_err(|_| EngineError::InvalidMove(uci.to_string()))?;
        if self.legal_moves().contains(&mv) {
            Ok(mv)
        } else {
            Err(EngineError::InvalidMove(format!(
                "{} is not legal in {}",
                uci,
                self.to_fen()
            )))
        }
    }

    /// 执行 UCI 走法（检查合法性）
    pub fn push_uci(&mut self, uci: &str) -> Result<ChessMove> {
        let mv = self.parse_move(uci)?;
        self.make_move(&mv);
        Ok(mv)
    }

    /// 是否吃子（含吃过路兵）
    pub fn is_capture(&self, mv: &ChessMove) -> bool {
        self.captured_piece(mv).is_some()
    }

    /// 走法吃掉的棋子类型
    pub fn captured_piece(&self, mv: &ChessMove) -> Option<Piece> {
        let them = !self.side_to_move();
        if self.inner.colors(them).has(mv.to) {
            return self.inner.piece_on(mv.to);
        }
        // 兵斜走到空格只能是吃过路兵
        let pawn_diagonal = self.inner.piece_on(mv.from) == Some(Piece::Pawn)
            && mv.from.file() != mv.to.file()
            && self.inner.piece_on(mv.to).is_none();
        pawn_diagonal.then_some(Piece::Pawn)
    }

    /// 走法是否将军
    pub fn gives_check(&self, mv: &ChessMove) -> bool {
        let mut next = self.inner.clone();
        next.try_play(self.to_cozy_move(mv)).is_ok() && !next.checkers().is_empty()
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    /// 双方子力都不足以将杀
    ///
    /// 没有兵、车、后，并且轻子总数不超过一个，或者只剩同色格的象。
    pub fn is_insufficient_material(&self) -> bool {
        let board = &self.inner;
        let heavy =
            board.pieces(Piece::Pawn) | board.pieces(Piece::Rook) | board.pieces(Piece::Queen);
        if !heavy.is_empty() {
            return false;
        }
        let knights = board.pieces(Piece::Knight);
        let bishops = board.pieces(Piece::Bishop);
        if (knights | bishops).len() <= 1 {
            return true;
        }
        let light = bishops.into_iter().filter(|&sq| is_light(sq)).count();
        knights.is_empty() && (light == 0 || light == bishops.len() as usize)
    }

    pub fn is_seventyfive_moves(&self) -> bool {
        self.halfmove_clock >= SEVENTYFIVE_MOVE_PLIES
    }

    pub fn is_game_over(&self) -> bool {
        self.game_result(None) != GameResult::Ongoing
    }

    /// 判断游戏结果（可复用已生成的合法走法）
    pub fn game_result(&self, legal_moves: Option<&[ChessMove]>) -> GameResult {
        let no_moves = match legal_moves {
            Some(m) => m.is_empty(),
            None => self.legal_moves().is_empty(),
        };

        if no_moves {
            if self.is_check() {
                match self.side_to_move() {
                    Color::White => GameResult::BlackWin,
                    Color::Black => GameResult::WhiteWin,
                }
            } else {
                GameResult::Draw
            }
        } else if self.is_insufficient_material() || self.is_seventyfive_moves() {
            GameResult::Draw
        } else {
            GameResult::Ongoing
        }
    }

    /// 颜色镜像：上下翻转、黑白互换、走棋方互换
    pub fn mirrored(&self) -> Result<Board> {
        Board::from_fen(&mirror_fen(&self.to_fen())?)
    }
}

/// 已执行走法的守卫，drop 时撤销走法
///
/// 剪枝提前返回、`break` 与 panic 展开都会经过 drop。
pub struct MoveGuard<'a> {
    board: &'a mut Board,
    undo: Option<Undo>,
}

impl Deref for MoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            self.board.undo_move(undo);
        }
    }
}

/// 从 FEN 获取所有合法走法（UCI 字符串）
pub fn get_legal_moves_from_fen(fen: &str) -> Result<Vec<String>> {
    let board = Board::from_fen(fen)?;
    Ok(board.legal_moves().iter().map(|m| m.to_string()).collect())
}
