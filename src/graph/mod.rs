//! 图核心模块
//!
//! 定义节点标识、带权边和邻接映射图

mod edge;
mod graph;
mod node;

pub use edge::{Weight, WeightedEdge};
pub use graph::Graph;
pub use node::{NodeId, NodeLabel};
