//! 图算法模块
//!
//! 包含最小生成树、最短路径和最大流算法。每个算法都返回带完整执行轨迹的结果结构。

mod dijkstra;
mod floyd_warshall;
mod max_flow;
mod mst;
pub mod union_find;

pub use dijkstra::{dijkstra, DijkstraResult, DijkstraStep, Relaxation};
pub use floyd_warshall::{
    floyd_warshall, reconstruct_path, route, FloydWarshallResult, FloydWarshallStep,
    MatrixChange, MatrixSnapshot, Route,
};
pub use max_flow::{
    ford_fulkerson, AugmentingPath, FlowStep, FordFulkerson, MaxFlowResult, PathEdge,
};
pub use mst::{
    kruskal, prim, KruskalResult, KruskalStep, MstResult, PrimResult, PrimStep, RejectReason,
};
pub use union_find::UnionFind;
