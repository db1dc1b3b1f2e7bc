//! MCTS AI 策略（UCT）
//!
//! 每次决策建一棵新树，节点存放在数组中，父子关系用下标表示，决策完成后整棵树丢弃。
//!
//! 节点的 `total_value` 以该节点自己的走棋方为视角；父节点选择子节点时取子节点平均值的相反数。

use log::{debug, trace};
use rand::prelude::*;

use super::{AIConfig, AIStrategy, ScoredMove};
use crate::board::Board;
use crate::error::{EngineError, Result};
use crate::eval::evaluate;
use crate::types::{ChessMove, Color, ColorExt, GameResult, Score};

/// 默认探索常数 √2
pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::SQRT_2;
pub const DEFAULT_SIMULATIONS: u32 = 200;
pub const DEFAULT_RANDOM_ROLLOUT_CAP: u32 = 200;
pub const DEFAULT_GUIDED_ROLLOUT_CAP: u32 = 50;

/// 评估值映射到 [-1, 1] 的缩放
const ROLLOUT_EVAL_SCALE: f64 = 1000.0;

/// MCTS 配置
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    pub simulations: u32,
    pub exploration_constant: f64,
    /// true 使用评估函数引导的模拟，false 使用随机模拟
    pub guided_rollout: bool,
    pub random_rollout_cap: u32,
    pub guided_rollout_cap: u32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            simulations: DEFAULT_SIMULATIONS,
            exploration_constant: DEFAULT_EXPLORATION,
            guided_rollout: true,
            random_rollout_cap: DEFAULT_RANDOM_ROLLOUT_CAP,
            guided_rollout_cap: DEFAULT_GUIDED_ROLLOUT_CAP,
        }
    }
}

impl MctsConfig {
    pub fn new(simulations: u32, guided_rollout: bool, exploration_constant: f64) -> Self {
        MctsConfig {
            simulations,
            exploration_constant,
            guided_rollout,
            ..Default::default()
        }
    }

    pub fn from_ai_config(config: &AIConfig) -> Self {
        MctsConfig {
            simulations: config.simulations,
            exploration_constant: config.exploration_constant,
            guided_rollout: config.guided_rollout,
            random_rollout_cap: config.random_rollout_cap,
            guided_rollout_cap: config.guided_rollout_cap,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulations < 1 {
            return Err(EngineError::InvalidConfig(
                "simulations must be >= 1".to_string(),
            ));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "exploration constant must be positive, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }
}

/// 把白方视角的结果转换为 `side` 的视角
#[inline]
pub fn value_for_side(white_value: f64, side: Color) -> f64 {
    match side {
        Color::White => white_value,
        Color::Black => -white_value,
    }
}

/// 树节点
#[derive(Debug, Clone)]
pub struct MctsNode {
    pub board: Board,
    /// 到达该节点的走法（根为 None）
    pub mv: Option<ChessMove>,
    pub parent: Option<usize>,
    /// (走法, 子节点下标)，按创建顺序
    pub children: Vec<(ChessMove, usize)>,
    /// 尚未展开的走法（创建时打乱，从尾部取）
    pub untried: Vec<ChessMove>,
    pub visits: u32,
    /// 以该节点走棋方为视角的累计值
    pub total_value: f64,
    pub terminal: bool,
}

impl MctsNode {
    /// 平均值（该节点走棋方视角）
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_value / self.visits as f64
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }
}

/// 数组存储的搜索树
#[derive(Debug, Clone)]
pub struct MctsTree {
    nodes: Vec<MctsNode>,
}

impl MctsTree {
    /// 以当前局面为根建树；有合法走法的根节点不视为终局
    pub fn new<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Self {
        let mut tree = MctsTree { nodes: Vec::new() };
        tree.add_node(board.clone(), None, None, rng);
        tree
    }

    fn add_node<R: Rng + ?Sized>(
        &mut self,
        board: Board,
        parent: Option<usize>,
        mv: Option<ChessMove>,
        rng: &mut R,
    ) -> usize {
        let mut moves = board.legal_moves();
        let terminal = if parent.is_none() {
            moves.is_empty()
        } else {
            board.game_result(Some(&moves)) != GameResult::Ongoing
        };
        if terminal {
            moves.clear();
        }
        moves.shuffle(rng);

        self.nodes.push(MctsNode {
            board,
            mv,
            parent,
            children: Vec::new(),
            untried: moves,
            visits: 0,
            total_value: 0.0,
            terminal,
        });
        self.nodes.len() - 1
    }

    pub fn root(&self) -> &MctsNode {
        &self.nodes[0]
    }

    pub fn node(&self, idx: usize) -> &MctsNode {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &[MctsNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// UCT 选择子节点
    ///
    /// 子节点按父节点走棋方的视角打分：-Q(child) + C·√(ln N(parent) / N(child))。
    /// 未访问的子节点为 +∞；同分取先创建的。
    pub fn select_child(&self, idx: usize, exploration: f64) -> Option<usize> {
        let node = &self.nodes[idx];
        let ln_parent = (node.visits as f64).ln();

        let mut best: Option<(usize, f64)> = None;
        for &(_, child_idx) in &node.children {
            let child = &self.nodes[child_idx];
            let uct = if child.visits == 0 {
                f64::INFINITY
            } else {
                -child.mean_value() + exploration * (ln_parent / child.visits as f64).sqrt()
            };
            if best.map_or(true, |(_, b)| uct > b) {
                best = Some((child_idx, uct));
            }
        }
        best.map(|(child_idx, _)| child_idx)
    }

    /// 展开一个未尝试的走法，返回新子节点下标
    pub fn expand<R: Rng + ?Sized>(&mut self, idx: usize, rng: &mut R) -> Option<usize> {
        let mv = self.nodes[idx].untried.pop()?;
        let mut board = self.nodes[idx].board.clone();
        board.make_move(&mv);
        let child_idx = self.add_node(board, Some(idx), Some(mv), rng);
        self.nodes[idx].children.push((mv, child_idx));
        Some(child_idx)
    }

    /// 反向传播
    ///
    /// 起点的值由起点自己的走棋方决定，之后每上一层取反，直到根节点。
    pub fn backpropagate(&mut self, start: usize, white_value: f64) {
        let mut value = value_for_side(white_value, self.nodes[start].side_to_move());
        let mut current = Some(start);
        while let Some(idx) = current {
            let node = &mut self.nodes[idx];
            node.visits += 1;
            node.total_value += value;
            value = -value;
            current = node.parent;
        }
    }

    /// 访问次数最多的根子节点；同分取先创建的
    pub fn most_visited_child(&self) -> Option<&MctsNode> {
        let mut best: Option<&MctsNode> = None;
        for &(_, child_idx) in &self.root().children {
            let child = &self.nodes[child_idx];
            if best.map_or(true, |b| child.visits > b.visits) {
                best = Some(child);
            }
        }
        best
    }

    pub fn best_move(&self) -> Option<ChessMove> {
        self.most_visited_child().and_then(|n| n.mv)
    }
}

/// 对局结果（白方视角），未结束返回 None
fn outcome_value(board: &Board, moves: &[ChessMove]) -> Option<f64> {
    match board.game_result(Some(moves)) {
        GameResult::WhiteWin => Some(1.0),
        GameResult::BlackWin => Some(-1.0),
        GameResult::Draw => Some(0.0),
        GameResult::Ongoing => None,
    }
}

/// 随机模拟：随机走到终局或步数上限，将杀 ±1，其他 0
pub fn random_rollout<R: Rng + ?Sized>(board: &Board, cap: u32, rng: &mut R) -> f64 {
    let mut sim = board.clone();
    let mut moves = sim.legal_moves();
    let mut plies = 0;

    while plies < cap && outcome_value(&sim, &moves).is_none() {
        let Some(&mv) = moves.choose(rng) else {
            break;
        };
        sim.make_move(&mv);
        moves = sim.legal_moves();
        plies += 1;
    }

    match sim.game_result(Some(&moves)) {
        GameResult::WhiteWin => 1.0,
        GameResult::BlackWin => -1.0,
        _ => 0.0,
    }
}

/// 引导模拟：每步选对走棋方最有利的一层评估走法
///
/// 将杀 ±1，其他终局 0；到达步数上限时返回 clamp(评估 / 1000, -1, 1)。
pub fn guided_rollout(board: &Board, cap: u32) -> f64 {
    let mut sim = board.clone();
    let mut moves = sim.legal_moves();
    let mut plies = 0;

    while plies < cap && outcome_value(&sim, &moves).is_none() {
        let sign = sim.side_to_move().sign();
        let mut best: Option<(ChessMove, Score)> = None;
        for &mv in &moves {
            let score = {
                let child = sim.scoped_move(mv);
                sign * evaluate(&child)
            };
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((mv, score));
            }
        }
        let Some((mv, _)) = best else {
            break;
        };
        sim.make_move(&mv);
        moves = sim.legal_moves();
        plies += 1;
    }

    outcome_value(&sim, &moves)
        .unwrap_or_else(|| (evaluate(&sim) as f64 / ROLLOUT_EVAL_SCALE).clamp(-1.0, 1.0))
}

/// 运行 MCTS，返回整棵树
pub fn search_tree<R: Rng + ?Sized>(
    board: &Board,
    config: &MctsConfig,
    rng: &mut R,
) -> Result<MctsTree> {
    config.validate()?;
    let mut tree = MctsTree::new(board, rng);

    for _ in 0..config.simulations {
        // 选择
        let mut idx = 0;
        while tree.nodes[idx].is_fully_expanded() && !tree.nodes[idx].terminal {
            match tree.select_child(idx, config.exploration_constant) {
                Some(next) => idx = next,
                None => break,
            }
        }

        // 展开
        if !tree.nodes[idx].terminal {
            if let Some(child) = tree.expand(idx, rng) {
                idx = child;
            }
        }

        // 模拟
        let start = &tree.nodes[idx].board;
        let white_value = if config.guided_rollout {
            guided_rollout(start, config.guided_rollout_cap)
        } else {
            random_rollout(start, config.random_rollout_cap, rng)
        };

        // 反向传播
        tree.backpropagate(idx, white_value);
    }

    debug!(
        "mcts: {} simulations, {} nodes, root value {:.3}",
        config.simulations,
        tree.len(),
        tree.root().mean_value()
    );
    for &(mv, child_idx) in &tree.root().children {
        let child = tree.node(child_idx);
        trace!("  {}: {} visits, value {:+.3}", mv, child.visits, -child.mean_value());
    }

    Ok(tree)
}

/// 用 MCTS 选择走法（访问次数最多的根子节点）
///
/// 不修改调用方的棋盘；没有合法走法时返回 `Ok(None)`。
pub fn best_move_mcts<R: Rng + ?Sized>(
    board: &Board,
    config: &MctsConfig,
    rng: &mut R,
) -> Result<Option<ChessMove>> {
    config.validate()?;
    if board.legal_moves().is_empty() {
        return Ok(None);
    }
    Ok(search_tree(board, config, rng)?.best_move())
}

/// MCTS AI - Monte Carlo Tree Search (UCT)
pub struct MCTSAI {
    config: MctsConfig,
    rng: StdRng,
}

impl MCTSAI {
    pub fn new(config: &AIConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Ok(MCTSAI {
            config: MctsConfig::from_ai_config(config),
            rng,
        })
    }
}

impl AIStrategy for MCTSAI {
    fn select_moves(&self, board: &Board, n: usize) -> Vec<ScoredMove> {
        let mut rng = self.rng.clone();
        if board.legal_moves().is_empty() {
            return Vec::new();
        }
        let Ok(tree) = search_tree(board, &self.config, &mut rng) else {
            return Vec::new();
        };

        // 按访问次数排序，分数为访问次数
        let mut children: Vec<&MctsNode> = tree
            .root()
            .children
            .iter()
            .map(|&(_, idx)| tree.node(idx))
            .collect();
        children.sort_by(|a, b| b.visits.cmp(&a.visits));

        children
            .into_iter()
            .take(n)
            .filter_map(|child| {
                child.mv.map(|mv| ScoredMove {
                    mv,
                    score: child.visits as f64,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions;

    fn small_config(simulations: u32) -> MctsConfig {
        MctsConfig {
            simulations,
            guided_rollout_cap: 4,
            ..Default::default()
        }
    }

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn test_value_for_side() {
        assert_eq!(value_for_side(1.0, Color::White), 1.0);
        assert_eq!(value_for_side(1.0, Color::Black), -1.0);
        assert_eq!(value_for_side(-0.25, Color::Black), 0.25);
        assert_eq!(value_for_side(0.0, Color::Black), 0.0);
    }

    #[test]
    fn test_backpropagate_uses_start_side() {
        let b = Board::start();
        let mut rng = StdRng::seed_from_u64(1);
        let mut tree = MctsTree::new(&b, &mut rng);
        let child = tree.expand(0, &mut rng).unwrap();
        let grandchild = tree.expand(child, &mut rng).unwrap();

        // 白方视角 +1，起点 grandchild 轮到白方
        tree.backpropagate(grandchild, 1.0);
        assert_eq!(tree.node(grandchild).total_value, 1.0);
        assert_eq!(tree.node(child).total_value, -1.0);
        assert_eq!(tree.root().total_value, 1.0);

        // 起点 child 轮到黑方
        tree.backpropagate(child, 1.0);
        assert_eq!(tree.node(child).total_value, -2.0);
        assert_eq!(tree.root().total_value, 2.0);
        assert_eq!(tree.root().visits, 2);
        assert_eq!(tree.node(grandchild).visits, 1);
    }

    /// 10 个种子中找到杀着的次数
    fn mate_hits(fen: &str, mate: &str, config: &MctsConfig) -> usize {
        let b = board(fen);
        (0..10)
            .filter(|&seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let mv = best_move_mcts(&b, config, &mut rng).unwrap().unwrap();
                mv.to_string() == mate
            })
            .count()
    }

    #[test]
    fn test_finds_mate_in_one() {
        let hits = mate_hits(test_positions::BACK_RANK_MATE, "e1e8", &small_config(300));
        assert!(hits >= 9, "found mate in {} of 10 trials", hits);
    }

    #[test]
    fn test_finds_mate_in_one_for_black() {
        let hits = mate_hits(test_positions::BACK_RANK_MATE_BLACK, "e8e1", &small_config(300));
        assert!(hits >= 9, "found mate in {} of 10 trials", hits);
    }

    #[test]
    fn test_finds_mate_in_one_with_default_rollout_caps() {
        let config = MctsConfig {
            simulations: 300,
            ..Default::default()
        };
        assert_eq!(config.guided_rollout_cap, DEFAULT_GUIDED_ROLLOUT_CAP);
        for (fen, mate) in [
            (test_positions::BACK_RANK_MATE, "e1e8"),
            (test_positions::SCHOLAR_MATE, "h5f7"),
        ] {
            let hits = mate_hits(fen, mate, &config);
            assert!(hits >= 9, "{}: found mate in {} of 10 trials", fen, hits);
        }
    }

    #[test]
    fn test_mating_child_value_perspective() {
        let b = board(test_positions::BACK_RANK_MATE);
        let mut rng = StdRng::seed_from_u64(3);
        let tree = search_tree(&b, &small_config(100), &mut rng).unwrap();
        let (_, mate_idx) = tree
            .root()
            .children
            .iter()
            .copied()
            .find(|(mv, _)| mv.to_string() == "e1e8")
            .unwrap();
        let mate = tree.node(mate_idx);
        assert!(mate.terminal);
        assert!(mate.visits > 0);
        // 被将杀的黑方视角恒为 -1
        assert_eq!(mate.mean_value(), -1.0);
    }

    #[test]
    fn test_tree_statistics() {
        for (fen, guided) in [
            (test_positions::BACK_RANK_MATE, true),
            (test_positions::KNIGHT_ENDGAME, true),
            (crate::fen::START_FEN, false),
        ] {
            let b = board(fen);
            let config = MctsConfig {
                simulations: 60,
                guided_rollout: guided,
                random_rollout_cap: 30,
                guided_rollout_cap: 3,
                ..Default::default()
            };
            let mut rng = StdRng::seed_from_u64(11);
            let tree = search_tree(&b, &config, &mut rng).unwrap();

            assert_eq!(tree.root().visits, config.simulations);
            for node in tree.nodes() {
                if node.visits > 0 {
                    let q = node.mean_value();
                    assert!((-1.0..=1.0).contains(&q), "{} mean {}", fen, q);
                }
                let child_visits: u32 = node
                    .children
                    .iter()
                    .map(|&(_, idx)| tree.node(idx).visits)
                    .sum();
                assert!(child_visits <= node.visits);
            }
        }
    }

    #[test]
    fn test_position_unchanged() {
        let b = board(test_positions::SCHOLAR_MATE);
        let before = b.to_fen();
        let mut rng = StdRng::seed_from_u64(5);
        let config = MctsConfig {
            simulations: 40,
            guided_rollout: false,
            random_rollout_cap: 20,
            ..Default::default()
        };
        assert!(best_move_mcts(&b, &config, &mut rng).unwrap().is_some());
        assert_eq!(b.to_fen(), before);
    }

    #[test]
    fn test_no_moves_and_only_move() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = small_config(20);
        let b = board(test_positions::STALEMATE);
        assert_eq!(best_move_mcts(&b, &config, &mut rng).unwrap(), None);

        let b = board(test_positions::ONLY_MOVE);
        let mv = best_move_mcts(&b, &config, &mut rng).unwrap().unwrap();
        assert_eq!(mv.to_string(), "h3g1");
    }

    #[test]
    fn test_drawn_root_still_searches() {
        // 子力不足，但根节点有合法走法
        let b = board("8/8/4k3/8/8/3KN3/8/8 w - - 0 1");
        let mut rng = StdRng::seed_from_u64(0);
        let mv = best_move_mcts(&b, &small_config(30), &mut rng).unwrap();
        assert!(mv.is_some());
    }

    #[test]
    fn test_invalid_config() {
        let b = Board::start();
        let mut rng = StdRng::seed_from_u64(0);
        for config in [
            MctsConfig::new(0, true, 1.4),
            MctsConfig::new(10, true, 0.0),
            MctsConfig::new(10, true, -1.0),
            MctsConfig::new(10, true, f64::NAN),
        ] {
            assert!(matches!(
                best_move_mcts(&b, &config, &mut rng),
                Err(EngineError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_seeded_search_is_reproducible() {
        let b = board(test_positions::KNIGHT_ENDGAME);
        let config = small_config(50);
        let first = best_move_mcts(&b, &config, &mut StdRng::seed_from_u64(9)).unwrap();
        let second = best_move_mcts(&b, &config, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rollouts_on_terminal_positions() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut mated = board(test_positions::BACK_RANK_MATE);
        mated.push_uci("e1e8").unwrap();
        assert_eq!(random_rollout(&mated, 10, &mut rng), 1.0);
        assert_eq!(guided_rollout(&mated, 10), 1.0);

        let stalemate = board(test_positions::STALEMATE);
        assert_eq!(random_rollout(&stalemate, 10, &mut rng), 0.0);
        assert_eq!(guided_rollout(&stalemate, 10), 0.0);

        // 上限为 0 时直接按评估截断
        let up_rook = board(test_positions::BACK_RANK_MATE);
        let expected = (evaluate(&up_rook) as f64 / 1000.0).clamp(-1.0, 1.0);
        assert_eq!(guided_rollout(&up_rook, 0), expected);
    }

    #[test]
    fn test_strategy_orders_by_visits() {
        let config = AIConfig {
            simulations: 60,
            guided_rollout_cap: 3,
            seed: Some(42),
            ..Default::default()
        };
        let ai = MCTSAI::new(&config).unwrap();
        let b = board(test_positions::BACK_RANK_MATE);
        let moves = ai.select_moves(&b, 3);
        assert_eq!(moves.len(), 3);
        assert!(moves[0].score >= moves[1].score);
        assert!(moves[1].score >= moves[2].score);
    }
}
