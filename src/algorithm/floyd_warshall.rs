//! Floyd-Warshall 全源最短路径
//!
//! 维护距离矩阵 D 与前驱矩阵 P，P[i][j] 是当前最优 i→j 路径上 j 的前一个节点。
//! 路径从终点沿固定的起点行向回追溯，不需要额外的后继矩阵。
//!
//! 初始化时没有直连边的 P[i][j] 也填 i（占位），只有结合 D[i][j] 有限才有意义；
//! 路径重建先检查距离，不可达时直接返回空路径。

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, WeightedEdge};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, info};

/// 距离矩阵与前驱矩阵的快照
#[derive(Debug, Clone, Serialize)]
pub struct MatrixSnapshot<N> {
    pub distances: Vec<Vec<f64>>,
    pub predecessors: Vec<Vec<Option<N>>>,
}

/// 一轮中被改进的 (i, j)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixChange<N> {
    pub origin: N,
    pub destination: N,
    pub previous: f64,
    pub updated: f64,
    /// 带来改进的中间节点
    pub via: N,
}

/// 以第 k 个节点为中间节点的一轮
#[derive(Debug, Clone, Serialize)]
pub struct FloydWarshallStep<N> {
    /// 轮次（从 1 开始）
    pub k: usize,
    pub intermediate: N,
    /// 本轮结束后的距离矩阵
    pub distances: Vec<Vec<f64>>,
    /// 本轮结束后的前驱矩阵
    pub predecessors: Vec<Vec<Option<N>>>,
    pub changes: Vec<MatrixChange<N>>,
}

/// Floyd-Warshall 结果
///
/// 序列化为 JSON 时，不可达的 ∞ 距离输出为 `null`。
#[derive(Debug, Clone, Serialize)]
pub struct FloydWarshallResult<N> {
    /// 排序后的节点，矩阵下标与之对应
    pub nodes: Vec<N>,
    /// 节点 -> 下标
    pub index: IndexMap<N, usize>,
    pub distances: Vec<Vec<f64>>,
    pub predecessors: Vec<Vec<Option<N>>>,
    /// 初始化后、第一轮之前的矩阵
    pub initial: MatrixSnapshot<N>,
    pub trace: Vec<FloydWarshallStep<N>>,
}

/// 一条查询出的路线
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route<N> {
    pub path: Vec<N>,
    pub distance: f64,
    /// 逐段距离（取自距离矩阵）
    pub segments: Vec<WeightedEdge<N>>,
}

impl<N: NodeId> FloydWarshallResult<N> {
    /// 节点在矩阵中的下标
    pub fn index_of(&self, node: &N) -> Result<usize> {
        self.index
            .get(node)
            .copied()
            .ok_or_else(|| Error::node_not_found(node))
    }

    /// origin -> destination 的最短距离
    pub fn distance(&self, origin: &N, destination: &N) -> Result<f64> {
        Ok(self.distances[self.index_of(origin)?][self.index_of(destination)?])
    }

    /// P[origin][destination]
    pub fn predecessor(&self, origin: &N, destination: &N) -> Result<Option<&N>> {
        let i = self.index_of(origin)?;
        let j = self.index_of(destination)?;
        Ok(self.predecessors[i][j].as_ref())
    }
}

/// 全源最短路径
pub fn floyd_warshall<N: NodeId>(graph: &Graph<N>) -> FloydWarshallResult<N> {
    let nodes: Vec<N> = graph.sorted_nodes();
    let n = nodes.len();
    let index: IndexMap<N, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.clone(), i))
        .collect();

    let mut dist = vec![vec![f64::INFINITY; n]; n];
    let mut pred: Vec<Vec<Option<N>>> = vec![vec![None; n]; n];
    for i in 0..n {
        dist[i][i] = 0.0;
        for j in 0..n {
            if i == j {
                continue;
            }
            if let Some(w) = graph.weight(&nodes[i], &nodes[j]) {
                dist[i][j] = w;
            }
            // 无直连边时同样填 i（占位）
            pred[i][j] = Some(nodes[i].clone());
        }
    }

    let initial = MatrixSnapshot {
        distances: dist.clone(),
        predecessors: pred.clone(),
    };

    let mut trace = Vec::with_capacity(n);
    for k in 0..n {
        let mut changes = Vec::new();
        for i in 0..n {
            if !dist[i][k].is_finite() {
                continue;
            }
            for j in 0..n {
                if !dist[k][j].is_finite() {
                    continue;
                }
                let through_k = dist[i][k] + dist[k][j];
                if through_k < dist[i][j] {
                    changes.push(MatrixChange {
                        origin: nodes[i].clone(),
                        destination: nodes[j].clone(),
                        previous: dist[i][j],
                        updated: through_k,
                        via: nodes[k].clone(),
                    });
                    dist[i][j] = through_k;
                    // j 的前驱沿用 k -> j 子路径上的前驱
                    let inherited = pred[k][j].clone();
                    pred[i][j] = inherited;
                }
            }
        }

        debug!(k = k + 1, via = ?nodes[k], changes = changes.len(), "floyd-warshall round");
        trace.push(FloydWarshallStep {
            k: k + 1,
            intermediate: nodes[k].clone(),
            distances: dist.clone(),
            predecessors: pred.clone(),
            changes,
        });
    }

    info!(nodes = n, "floyd-warshall finished");
    FloydWarshallResult {
        nodes,
        index,
        distances: dist,
        predecessors: pred,
        initial,
        trace,
    }
}

/// 由前驱矩阵重建 origin -> destination 的路径
///
/// 从终点出发，反复取 P[origin][current] 作为前驱并插到路径前端，直到回到起点。
/// 前驱等于当前节点或步数超过节点数时视为无法重建，返回空路径。
pub fn reconstruct_path<N: NodeId>(
    result: &FloydWarshallResult<N>,
    origin: &N,
    destination: &N,
) -> Result<Vec<N>> {
    let o = result.index_of(origin)?;
    let d = result.index_of(destination)?;

    if o == d {
        return Ok(vec![origin.clone()]);
    }
    if !result.distances[o][d].is_finite() {
        return Ok(Vec::new());
    }

    let mut path = VecDeque::new();
    path.push_back(destination.clone());
    let mut current = d;

    while current != o {
        let Some(prev) = result.predecessors[o][current].as_ref() else {
            return Ok(Vec::new());
        };
        let p = result.index_of(prev)?;
        if p == current {
            return Ok(Vec::new());
        }
        path.push_front(prev.clone());
        current = p;

        if path.len() > result.nodes.len() {
            return Ok(Vec::new());
        }
    }

    Ok(path.into())
}

/// 点到点路线查询：路径、总距离和逐段距离；不可达返回 None
pub fn route<N: NodeId>(
    result: &FloydWarshallResult<N>,
    origin: &N,
    destination: &N,
) -> Result<Option<Route<N>>> {
    let distance = result.distance(origin, destination)?;
    if !distance.is_finite() {
        return Ok(None);
    }

    let path = reconstruct_path(result, origin, destination)?;
    if path.is_empty() {
        return Ok(None);
    }

    let mut segments = Vec::with_capacity(path.len().saturating_sub(1));
    for pair in path.windows(2) {
        let w = result.distance(&pair[0], &pair[1])?;
        segments.push(WeightedEdge::new(pair[0].clone(), pair[1].clone(), w));
    }

    Ok(Some(Route {
        path,
        distance,
        segments,
    }))
}
