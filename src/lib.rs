//! ORGraph - 运筹学图算法教学引擎
//!
//! 逐步记录执行过程的经典算法实现：
//! - 最小生成树（Kruskal、Prim）
//! - 最短路径（Dijkstra、Floyd-Warshall）
//! - 最大流与最小割（Ford-Fulkerson）
//! - 零和博弈与一般线性规划的建模（求解器由调用方提供）

pub mod algorithm;
pub mod cli;
pub mod error;
pub mod graph;
pub mod input;
pub mod lp;

// 重导出常用类型
pub use error::{Error, Result};
pub use graph::{Graph, NodeId, NodeLabel, WeightedEdge};
pub use input::{load_edge_file, parse_edge_list, EdgeList};
pub use lp::game::ZeroSumGame;
pub use lp::{LinearProgram, LinearProgramSolver, LpSolution};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
