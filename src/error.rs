//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("节点不存在: {0}")]
    NodeNotFound(String),

    #[error("参数无效: {0}")]
    InvalidArgument(String),

    #[error("边 {from} -> {to} 的权重为负: {weight}")]
    NegativeWeight {
        from: String,
        to: String,
        weight: f64,
    },

    #[error("第 {line} 行解析错误: {reason}")]
    Parse { line: usize, reason: String },

    #[error("矩阵无效: {0}")]
    InvalidMatrix(String),

    #[error("线性规划求解失败: {0}")]
    LpFailure(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// 以节点的 Debug 表示构造 `NodeNotFound`
    pub fn node_not_found<N: std::fmt::Debug>(node: &N) -> Self {
        Error::NodeNotFound(format!("{:?}", node))
    }
}
