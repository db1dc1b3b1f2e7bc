//! 错误类型
//!
//! 没有合法走法不是错误，由各搜索返回 `None` 表示

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// 调用方提供的局面无法解析或不合法
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    /// 走法字符串无法解析或在当前局面不合法
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// 搜索参数不合法（深度、模拟次数、探索常数）
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown strategy: {0}. Available: {1}")]
    UnknownStrategy(String, String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
