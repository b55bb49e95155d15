//! 最大流算法
//!
//! Ford-Fulkerson：在显式残量图上用贪心 DFS 找增广路径
//! （每个节点优先尝试残量最大的邻居），结束后从源点 BFS 求最小割。

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, WeightedEdge};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet, VecDeque};
use tracing::{debug, info};

/// 残量图：节点 -> (邻居 -> 残量)
type Residual<N> = IndexMap<N, IndexMap<N, f64>>;

/// 增广路径及其流量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentingPath<N> {
    pub nodes: Vec<N>,
    pub flow: f64,
}

/// 增广前路径上一条边的残量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathEdge<N> {
    pub from: N,
    pub to: N,
    /// 正向残量
    pub residual: f64,
    /// 反向残量
    pub reverse_residual: f64,
}

/// 每次搜索记录一步
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlowStep<N> {
    /// 找到增广路径
    PathFound {
        iteration: usize,
        path: Vec<N>,
        edges: Vec<PathEdge<N>>,
        bottleneck: f64,
        cumulative_flow: f64,
        /// DFS 访问顺序
        explored: Vec<N>,
    },
    /// 没有增广路径，算法结束
    NoPath {
        iteration: usize,
        explored: Vec<N>,
        cumulative_flow: f64,
    },
}

/// 最大流结果
#[derive(Debug, Clone, Serialize)]
pub struct MaxFlowResult<N> {
    pub source: N,
    pub sink: N,
    /// 最大流量值
    pub value: f64,
    /// 依次使用的增广路径
    pub paths: Vec<AugmentingPath<N>>,
    /// 最终残量图中从源点可达的节点（最小割的源侧）
    pub reachable: BTreeSet<N>,
    /// 从源侧指向汇侧的原图边
    pub cut_edges: Vec<WeightedEdge<N>>,
    /// 割容量，等于最大流量
    pub cut_capacity: f64,
    /// 原图每条边上的流量（只列正流量）
    pub edge_flows: Vec<WeightedEdge<N>>,
    pub trace: Vec<FlowStep<N>>,
}

/// Ford-Fulkerson 最大流算法
pub struct FordFulkerson<'a, N: NodeId> {
    graph: &'a Graph<N>,
}

impl<'a, N: NodeId> FordFulkerson<'a, N> {
    /// 创建算法实例
    pub fn new(graph: &'a Graph<N>) -> Self {
        Self { graph }
    }

    /// 计算从 source 到 sink 的最大流
    pub fn max_flow(&self, source: &N, sink: &N) -> Result<MaxFlowResult<N>> {
        if !self.graph.contains(source) {
            return Err(Error::node_not_found(source));
        }
        if !self.graph.contains(sink) {
            return Err(Error::node_not_found(sink));
        }
        if source == sink {
            return Err(Error::InvalidArgument(format!(
                "源点与汇点相同: {:?}",
                source
            )));
        }

        let mut residual = self.build_residual();
        let mut value = 0.0;
        let mut paths = Vec::new();
        let mut trace = Vec::new();

        loop {
            let iteration = trace.len() + 1;
            let (path, explored) = self.greedy_dfs(source, sink, &residual);

            let Some(path) = path else {
                debug!(iteration, explored = explored.len(), "no augmenting path");
                trace.push(FlowStep::NoPath {
                    iteration,
                    explored,
                    cumulative_flow: value,
                });
                break;
            };

            // 增广前记录残量并计算瓶颈
            let edges: Vec<PathEdge<N>> = path
                .windows(2)
                .map(|pair| PathEdge {
                    from: pair[0].clone(),
                    to: pair[1].clone(),
                    residual: residual_of(&residual, &pair[0], &pair[1]),
                    reverse_residual: residual_of(&residual, &pair[1], &pair[0]),
                })
                .collect();
            let bottleneck = edges
                .iter()
                .map(|e| e.residual)
                .fold(f64::INFINITY, f64::min);

            // 沿路径增广
            for pair in path.windows(2) {
                let (u, v) = (&pair[0], &pair[1]);
                *residual
                    .entry(u.clone())
                    .or_default()
                    .entry(v.clone())
                    .or_insert(0.0) -= bottleneck;
                *residual
                    .entry(v.clone())
                    .or_default()
                    .entry(u.clone())
                    .or_insert(0.0) += bottleneck;
            }
            value += bottleneck;

            debug!(iteration, path = ?path, bottleneck, total = value, "augmented");
            paths.push(AugmentingPath {
                nodes: path.clone(),
                flow: bottleneck,
            });
            trace.push(FlowStep::PathFound {
                iteration,
                path,
                edges,
                bottleneck,
                cumulative_flow: value,
                explored,
            });
        }

        let reachable = self.find_source_side(source, &residual);
        let cut_edges: Vec<WeightedEdge<N>> = self
            .graph
            .edges()
            .into_iter()
            .filter(|e| reachable.contains(&e.from) && !reachable.contains(&e.to))
            .collect();
        let cut_capacity = cut_edges.iter().map(|e| e.weight).sum();

        let edge_flows = self
            .graph
            .edges()
            .into_iter()
            .filter_map(|e| {
                let flow = e.weight - residual_of(&residual, &e.from, &e.to);
                (flow > 0.0).then(|| WeightedEdge::new(e.from, e.to, flow))
            })
            .collect();

        info!(
            source = ?source,
            sink = ?sink,
            value,
            cut_capacity,
            paths = paths.len(),
            "ford-fulkerson finished"
        );

        Ok(MaxFlowResult {
            source: source.clone(),
            sink: sink.clone(),
            value,
            paths,
            reachable,
            cut_edges,
            cut_capacity,
            edge_flows,
            trace,
        })
    }

    /// 构建残量图：正向为容量，反向缺省为 0（已声明的反向边保持自身容量）
    fn build_residual(&self) -> Residual<N> {
        let mut residual: Residual<N> = IndexMap::new();
        for node in self.graph.nodes() {
            residual.entry(node.clone()).or_default();
        }
        for u in self.graph.nodes() {
            for (v, cap) in self.graph.neighbors(u) {
                residual.entry(u.clone()).or_default().insert(v.clone(), cap);
                residual
                    .entry(v.clone())
                    .or_default()
                    .entry(u.clone())
                    .or_insert(0.0);
            }
        }
        residual
    }

    /// 贪心 DFS 找增广路径，同时返回访问顺序
    fn greedy_dfs(&self, source: &N, sink: &N, residual: &Residual<N>) -> (Option<Vec<N>>, Vec<N>) {
        let mut visited = HashSet::new();
        let mut explored = Vec::new();
        let mut path = Vec::new();

        if dfs_visit(source, sink, residual, &mut visited, &mut explored, &mut path) {
            (Some(path), explored)
        } else {
            (None, explored)
        }
    }

    /// 最小割的源侧：残量为正的边上 BFS
    fn find_source_side(&self, source: &N, residual: &Residual<N>) -> BTreeSet<N> {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();

        visited.insert(source.clone());
        queue.push_back(source.clone());

        while let Some(u) = queue.pop_front() {
            if let Some(neighbors) = residual.get(&u) {
                for (v, &cap) in neighbors {
                    if cap > 0.0 && !visited.contains(v) {
                        visited.insert(v.clone());
                        queue.push_back(v.clone());
                    }
                }
            }
        }

        visited
    }
}

/// 在 graph 上计算 source -> sink 的最大流
pub fn ford_fulkerson<N: NodeId>(
    graph: &Graph<N>,
    source: &N,
    sink: &N,
) -> Result<MaxFlowResult<N>> {
    FordFulkerson::new(graph).max_flow(source, sink)
}

fn residual_of<N: NodeId>(residual: &Residual<N>, u: &N, v: &N) -> f64 {
    residual
        .get(u)
        .and_then(|nbrs| nbrs.get(v))
        .copied()
        .unwrap_or(0.0)
}

fn dfs_visit<N: NodeId>(
    current: &N,
    sink: &N,
    residual: &Residual<N>,
    visited: &mut HashSet<N>,
    explored: &mut Vec<N>,
    path: &mut Vec<N>,
) -> bool {
    visited.insert(current.clone());
    explored.push(current.clone());
    path.push(current.clone());

    if current == sink {
        return true;
    }

    // 残量降序，等量保持残量图中的插入顺序
    let mut candidates: Vec<(&N, f64)> = residual
        .get(current)
        .into_iter()
        .flat_map(|nbrs| nbrs.iter())
        .filter(|(v, &cap)| cap > 0.0 && !visited.contains(*v))
        .map(|(v, &cap)| (v, cap))
        .collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (next, _) in candidates {
        if !visited.contains(next) && dfs_visit(next, sink, residual, visited, explored, path) {
            return true;
        }
    }

    // 回溯
    path.pop();
    false
}
