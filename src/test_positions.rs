//! 测试局面库
//!
//! 按类别整理的国际象棋 FEN 局面，供单元测试和基准测试使用

// =============================================================================
// 基础局面
// =============================================================================

/// 初始局面
pub const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Kiwipete（走法生成常用测试局面）
pub const KIWIPETE: &str =
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// 初始局面缺少 h2 兵
pub const MISSING_H2_PAWN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPP1/RNBQKBNR w KQkq - 0 1";

// =============================================================================
// 杀棋与终局
// =============================================================================

/// 底线杀：白车 e1e8 一步杀
pub const BACK_RANK_MATE: &str = "6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1";

/// 底线杀（黑方）：黑车 e8e1 一步杀
pub const BACK_RANK_MATE_BLACK: &str = "4r1k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1";

/// 学者杀：白后 h5f7 一步杀
pub const SCHOLAR_MATE: &str =
    "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 1";

/// 愚人杀：黑后 d8h4 一步杀
pub const FOOLS_MATE: &str = "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2";

/// 黑方无子可动（逼和）
pub const STALEMATE: &str = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1";

/// 白方被车将军，唯一应着 Ng1
pub const ONLY_MOVE: &str = "7k/8/8/8/8/7N/6PP/r6K w - - 0 1";

// =============================================================================
// 残局与中局
// =============================================================================

/// 马兵残局
pub const KNIGHT_ENDGAME: &str = "8/5kp1/8/3n4/8/2N5/4KP2/8 w - - 0 1";

/// 王兵对王
pub const KING_PAWN: &str = "8/8/4k3/8/2P5/8/4K3/8 w - - 0 1";

/// 白方可以王车易位
pub const CASTLING_READY: &str = "4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1";

/// 双方都保留两侧易位权
pub const CASTLING_BOTH: &str = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";

/// 可吃过路兵（f5）
pub const EN_PASSANT: &str = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";

/// 车兵残局（perft 第 3 号局面）
pub const ROOK_ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

/// 意大利开局，双方已易位
pub const ITALIAN: &str =
    "r1bq1rk1/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1 w - - 6 5";

// =============================================================================
// 分组
// =============================================================================

/// 综合局面（前 6 个在 2 层搜索下很快）
pub const SAMPLE_POSITIONS: &[&str] = &[
    START,
    BACK_RANK_MATE,
    KNIGHT_ENDGAME,
    KING_PAWN,
    CASTLING_READY,
    ONLY_MOVE,
    SCHOLAR_MATE,
    FOOLS_MATE,
    KIWIPETE,
    EN_PASSANT,
    ROOK_ENDGAME,
    ITALIAN,
];

/// 剪枝对比用局面与搜索深度
pub const PRUNING_SAMPLES: &[(&str, u32)] = &[
    (BACK_RANK_MATE, 3),
    (BACK_RANK_MATE_BLACK, 3),
    (KING_PAWN, 3),
    ("8/8/8/4k3/8/8/3PK3/8 b - - 0 1", 3),
    (ONLY_MOVE, 3),
    (STALEMATE, 2),
    ("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", 3),
    ("8/5k2/8/8/8/8/1R6/4K3 w - - 0 1", 2),
    ("r3k3/8/8/8/8/8/8/4K2R w K - 0 1", 2),
    ("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", 2),
    ("8/8/4k3/8/8/3KN3/8/8 w - - 0 1", 2),
    (KNIGHT_ENDGAME, 2),
    (ROOK_ENDGAME, 2),
    ("8/P6k/8/8/8/8/8/K7 w - - 0 1", 3),
    ("4k3/8/8/8/8/8/8/4K2R w K - 0 1", 3),
    (START, 1),
    (SCHOLAR_MATE, 1),
    (FOOLS_MATE, 1),
    (EN_PASSANT, 1),
    (ITALIAN, 1),
    ("4rrk1/pp3ppp/8/8/8/8/PP3PPP/3RR1K1 w - - 0 1", 2),
];
