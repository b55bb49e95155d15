//! 最小生成树
//!
//! Kruskal（边排序 + 并查集）与 Prim（优先队列扩展前沿），
//! 两者都逐步记录迭代过程，供界面回放。

use super::union_find::UnionFind;
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, Weight, WeightedEdge};
use indexmap::IndexMap;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};
use std::fmt;
use tracing::{debug, info};

/// 最小生成树结果
///
/// 图不连通时得到的是生成森林（Kruskal）或只覆盖起点所在分量的树（Prim），
/// 调用方用 [`MstResult::is_spanning`] 判断是否覆盖全部节点。
#[derive(Debug, Clone, Serialize)]
pub struct MstResult<N, S> {
    /// 选中的边（按选中顺序）
    pub edges: Vec<WeightedEdge<N>>,
    /// 总权重
    pub total_weight: f64,
    /// 迭代记录
    pub trace: Vec<S>,
}

impl<N, S> MstResult<N, S> {
    /// 是否恰好有 n-1 条边
    pub fn is_spanning(&self, node_count: usize) -> bool {
        node_count == 0 || self.edges.len() == node_count - 1
    }
}

pub type KruskalResult<N> = MstResult<N, KruskalStep<N>>;
pub type PrimResult<N> = MstResult<N, PrimStep<N>>;

/// Kruskal 的一步：处理一条边
#[derive(Debug, Clone, Serialize)]
pub struct KruskalStep<N> {
    /// 迭代序号（从 1 开始）
    pub iteration: usize,
    /// 当前处理的边
    pub edge: WeightedEdge<N>,
    /// 是否加入生成树
    pub accepted: bool,
    /// 合并前 u 所在集合的代表节点
    pub root_u: N,
    /// 合并前 v 所在集合的代表节点
    pub root_v: N,
    /// 到目前为止的生成树
    pub mst_so_far: Vec<WeightedEdge<N>>,
    /// 累计权重
    pub cumulative_weight: f64,
}

/// Prim 拒绝候选边的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// 终点已在树中
    AlreadyVisited,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::AlreadyVisited => write!(f, "节点已访问"),
        }
    }
}

/// Prim 的一步
///
/// `iteration` 按出队次数编号，接受和拒绝各占一个编号（从 1 开始，0 是 `Initial`）。
/// 只在接受时递增的编号方式会让被拒绝的步骤与前一次接受同号，这里不采用。
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrimStep<N> {
    /// 初始状态：起点与初始候选边
    Initial {
        start: N,
        frontier: Vec<WeightedEdge<N>>,
    },
    /// 候选边被接受
    Accepted {
        iteration: usize,
        edge: WeightedEdge<N>,
        visited: BTreeSet<N>,
        mst_so_far: Vec<WeightedEdge<N>>,
        total_weight: f64,
        /// 新加入队列的候选边
        new_frontier: Vec<WeightedEdge<N>>,
    },
    /// 候选边被拒绝
    Rejected {
        iteration: usize,
        edge: WeightedEdge<N>,
        reason: RejectReason,
        visited: BTreeSet<N>,
        mst_so_far: Vec<WeightedEdge<N>>,
        total_weight: f64,
    },
}

/// Kruskal 最小生成树
///
/// 边按权重升序稳定排序（等权按输入顺序）。处理完所有边才结束，
/// 即使已经选够 n-1 条，以保证迭代记录完整。
pub fn kruskal<N: NodeId>(
    edges: &[WeightedEdge<N>],
    node_count: usize,
) -> Result<KruskalResult<N>> {
    // 本次调用内的稠密编号，按首次出现顺序分配
    let mut dense: IndexMap<N, usize> = IndexMap::new();
    for edge in edges {
        for node in [&edge.from, &edge.to] {
            let next = dense.len();
            dense.entry(node.clone()).or_insert(next);
        }
    }
    if dense.len() > node_count {
        return Err(Error::InvalidArgument(format!(
            "边列表包含 {} 个不同节点，超过给定的节点数 {}",
            dense.len(),
            node_count
        )));
    }
    let labels: Vec<N> = dense.keys().cloned().collect();

    let mut sorted: Vec<&WeightedEdge<N>> = edges.iter().collect();
    sorted.sort_by(|a, b| a.weight.total_cmp(&b.weight));

    let mut uf = UnionFind::new(node_count);
    let mut mst = Vec::new();
    let mut total_weight = 0.0;
    let mut trace = Vec::with_capacity(sorted.len());

    for (i, edge) in sorted.into_iter().enumerate() {
        let u = dense[&edge.from];
        let v = dense[&edge.to];
        let root_u = uf.find(u);
        let root_v = uf.find(v);

        let accepted = uf.union(u, v);
        if accepted {
            mst.push(edge.clone());
            total_weight += edge.weight;
        }
        debug!(
            iteration = i + 1,
            from = ?edge.from,
            to = ?edge.to,
            weight = edge.weight,
            accepted,
            "kruskal step"
        );

        trace.push(KruskalStep {
            iteration: i + 1,
            edge: edge.clone(),
            accepted,
            root_u: labels[root_u].clone(),
            root_v: labels[root_v].clone(),
            mst_so_far: mst.clone(),
            cumulative_weight: total_weight,
        });
    }

    info!(edges = mst.len(), total_weight, "kruskal finished");
    Ok(MstResult {
        edges: mst,
        total_weight,
        trace,
    })
}

/// Prim 最小生成树
///
/// 优先队列元素为 (权重, 起点, 终点)，等权时按节点自然顺序出队。
pub fn prim<N: NodeId>(graph: &Graph<N>, start: &N) -> Result<PrimResult<N>> {
    if !graph.contains(start) {
        return Err(Error::node_not_found(start));
    }

    let mut visited = BTreeSet::new();
    visited.insert(start.clone());

    let mut heap = BinaryHeap::new();
    for (v, w) in graph.neighbors(start) {
        heap.push(Reverse((Weight(w), start.clone(), v.clone())));
    }

    let mut frontier: Vec<WeightedEdge<N>> = heap
        .iter()
        .map(|Reverse((w, u, v))| WeightedEdge::new(u.clone(), v.clone(), w.0))
        .collect();
    frontier.sort_by(|a, b| {
        a.weight
            .total_cmp(&b.weight)
            .then_with(|| a.from.cmp(&b.from))
            .then_with(|| a.to.cmp(&b.to))
    });

    let mut trace = vec![PrimStep::Initial {
        start: start.clone(),
        frontier,
    }];
    let mut mst = Vec::new();
    let mut total_weight = 0.0;
    let mut iteration = 0;

    while visited.len() < graph.node_count() {
        let Some(Reverse((Weight(w), u, v))) = heap.pop() else {
            break;
        };
        iteration += 1;
        let edge = WeightedEdge::new(u, v.clone(), w);

        if visited.contains(&v) {
            debug!(iteration, from = ?edge.from, to = ?edge.to, "prim rejected: already visited");
            trace.push(PrimStep::Rejected {
                iteration,
                edge,
                reason: RejectReason::AlreadyVisited,
                visited: visited.clone(),
                mst_so_far: mst.clone(),
                total_weight,
            });
            continue;
        }

        visited.insert(v.clone());
        mst.push(edge.clone());
        total_weight += w;

        let mut new_frontier = Vec::new();
        for (next, next_w) in graph.neighbors(&v) {
            if !visited.contains(next) {
                heap.push(Reverse((Weight(next_w), v.clone(), next.clone())));
                new_frontier.push(WeightedEdge::new(v.clone(), next.clone(), next_w));
            }
        }
        debug!(iteration, from = ?edge.from, to = ?edge.to, weight = w, "prim accepted");

        trace.push(PrimStep::Accepted {
            iteration,
            edge,
            visited: visited.clone(),
            mst_so_far: mst.clone(),
            total_weight,
            new_frontier,
        });
    }

    info!(
        edges = mst.len(),
        total_weight,
        reached = visited.len(),
        nodes = graph.node_count(),
        "prim finished"
    );
    Ok(MstResult {
        edges: mst,
        total_weight,
        trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classroom_edges() -> Vec<WeightedEdge<&'static str>> {
        vec![
            WeightedEdge::new("A", "B", 4.0),
            WeightedEdge::new("A", "C", 3.0),
            WeightedEdge::new("B", "C", 1.0),
            WeightedEdge::new("B", "D", 2.0),
            WeightedEdge::new("C", "D", 4.0),
        ]
    }

    fn classroom_graph() -> Graph<&'static str> {
        Graph::from_undirected_edges(
            classroom_edges()
                .into_iter()
                .map(|e| (e.from, e.to, e.weight)),
        )
    }

    #[test]
    fn test_kruskal_classroom_example() {
        let result = kruskal(&classroom_edges(), 4).unwrap();

        let chosen: Vec<(&str, &str, f64)> = result
            .edges
            .iter()
            .map(|e| (e.from, e.to, e.weight))
            .collect();
        assert_eq!(chosen, vec![("B", "C", 1.0), ("B", "D", 2.0), ("A", "C", 3.0)]);
        assert_eq!(result.total_weight, 6.0);
        assert!(result.is_spanning(4));
    }

    #[test]
    fn test_kruskal_trace_covers_every_edge() {
        let result = kruskal(&classroom_edges(), 4).unwrap();

        // 选够 3 条边后仍继续处理剩余的边
        assert_eq!(result.trace.len(), 5);
        let decisions: Vec<(&str, &str, bool)> = result
            .trace
            .iter()
            .map(|s| (s.edge.from, s.edge.to, s.accepted))
            .collect();
        assert_eq!(
            decisions,
            vec![
                ("B", "C", true),
                ("B", "D", true),
                ("A", "C", true),
                ("A", "B", false),
                ("C", "D", false),
            ]
        );

        let last = result.trace.last().unwrap();
        assert_eq!(last.cumulative_weight, result.total_weight);
        assert_eq!(last.mst_so_far.len(), 3);
        // 被拒绝的边两端根相同
        assert_eq!(result.trace[3].root_u, result.trace[3].root_v);
        assert_eq!(result.trace[0].root_u, "B");
        assert_eq!(result.trace[0].root_v, "C");
    }

    #[test]
    fn test_kruskal_stable_tie_break() {
        let edges = vec![
            WeightedEdge::new(1, 2, 1.0),
            WeightedEdge::new(3, 4, 1.0),
            WeightedEdge::new(2, 3, 1.0),
        ];
        let result = kruskal(&edges, 4).unwrap();
        let order: Vec<(i32, i32)> = result
            .trace
            .iter()
            .map(|s| (s.edge.from, s.edge.to))
            .collect();
        assert_eq!(order, vec![(1, 2), (3, 4), (2, 3)]);
    }

    #[test]
    fn test_kruskal_forest_on_disconnected_input() {
        let edges = vec![WeightedEdge::new(0, 1, 2.0), WeightedEdge::new(2, 3, 5.0)];
        // 节点 4 是孤立点
        let result = kruskal(&edges, 5).unwrap();
        assert_eq!(result.edges.len(), 2);
        assert_eq!(result.total_weight, 7.0);
        assert!(!result.is_spanning(5));
    }

    #[test]
    fn test_kruskal_rejects_too_many_nodes() {
        let edges = vec![WeightedEdge::new(0, 1, 1.0), WeightedEdge::new(1, 2, 1.0)];
        assert!(matches!(kruskal(&edges, 2), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_prim_classroom_example() {
        let result = prim(&classroom_graph(), &"A").unwrap();

        assert_eq!(result.total_weight, 6.0);
        assert_eq!(result.edges.len(), 3);
        assert_eq!(result.edges[0], WeightedEdge::new("A", "C", 3.0));
        assert_eq!(result.edges[1], WeightedEdge::new("C", "B", 1.0));
        assert_eq!(result.edges[2], WeightedEdge::new("B", "D", 2.0));

        match &result.trace[0] {
            PrimStep::Initial { start, frontier } => {
                assert_eq!(*start, "A");
                assert_eq!(frontier.len(), 2);
                assert_eq!(frontier[0].weight, 3.0);
            }
            other => panic!("expected initial step, got {:?}", other),
        }
    }

    #[test]
    fn test_prim_records_rejections() {
        let graph = Graph::from_undirected_edges(vec![
            ("A", "B", 1.0),
            ("A", "C", 2.0),
            ("B", "C", 1.0),
            ("C", "D", 5.0),
        ]);
        let result = prim(&graph, &"A").unwrap();

        assert_eq!(result.total_weight, 7.0);
        assert_eq!(result.trace.len(), 5);
        match &result.trace[3] {
            PrimStep::Rejected {
                iteration,
                edge,
                reason,
                ..
            } => {
                assert_eq!(*iteration, 3);
                assert_eq!((edge.from, edge.to), ("A", "C"));
                assert_eq!(*reason, RejectReason::AlreadyVisited);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        match &result.trace[4] {
            PrimStep::Accepted { new_frontier, visited, .. } => {
                assert!(new_frontier.is_empty());
                assert_eq!(visited.len(), 4);
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_prim_numbers_every_pop() {
        let graph = Graph::from_undirected_edges(vec![
            ("A", "B", 1.0),
            ("A", "C", 2.0),
            ("B", "C", 1.0),
            ("C", "D", 5.0),
        ]);
        let result = prim(&graph, &"A").unwrap();

        let numbers: Vec<(usize, bool)> = result
            .trace
            .iter()
            .filter_map(|step| match step {
                PrimStep::Initial { .. } => None,
                PrimStep::Accepted { iteration, .. } => Some((*iteration, true)),
                PrimStep::Rejected { iteration, .. } => Some((*iteration, false)),
            })
            .collect();
        // 被拒绝的第 3 步有自己的编号，之后的接受是第 4 步
        assert_eq!(numbers, vec![(1, true), (2, true), (3, false), (4, true)]);
    }

    #[test]
    fn test_prim_missing_start() {
        let err = prim(&classroom_graph(), &"Z").unwrap_err();
        assert!(matches!(err, Error::NodeNotFound(_)));
    }

    #[test]
    fn test_prim_stops_on_disconnected_graph() {
        let graph = Graph::from_undirected_edges(vec![(1, 2, 1.0), (3, 4, 1.0)]);
        let result = prim(&graph, &1).unwrap();
        assert_eq!(result.edges.len(), 1);
        assert!(!result.is_spanning(graph.node_count()));
    }

    #[test]
    fn test_kruskal_and_prim_agree_on_weight() {
        let kruskal_result = kruskal(&classroom_edges(), 4).unwrap();
        for start in ["A", "B", "C", "D"] {
            let prim_result = prim(&classroom_graph(), &start).unwrap();
            assert_eq!(prim_result.total_weight, kruskal_result.total_weight);
        }
    }
}
