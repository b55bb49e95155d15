//! Dijkstra 单源最短路径
//!
//! 二叉堆 + 惰性删除：过期的队列元素在出队时丢弃，而不是在入队时去重。
//! 要求边权非负，负权时结果未定义（调用方用 `Graph::ensure_non_negative` 检查）。

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, Weight};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use tracing::{debug, info};

/// 一次松弛
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relaxation<N> {
    /// 被更新的邻居
    pub neighbor: N,
    /// 更新前的距离
    pub previous: f64,
    /// 更新后的距离
    pub updated: f64,
    /// 使用的边权
    pub edge_weight: f64,
}

/// 每确定一个节点记录一步
#[derive(Debug, Clone, Serialize)]
pub struct DijkstraStep<N> {
    pub iteration: usize,
    /// 本步确定的节点
    pub node: N,
    /// 该节点的最终距离
    pub distance: f64,
    /// 本步应用的松弛
    pub relaxations: Vec<Relaxation<N>>,
    /// 已确定的节点
    pub visited: BTreeSet<N>,
    /// 本步结束时的距离表
    pub distances: BTreeMap<N, f64>,
}

/// Dijkstra 结果
#[derive(Debug, Clone, Serialize)]
pub struct DijkstraResult<N> {
    pub source: N,
    /// 距离表，不可达为 +∞
    pub distances: BTreeMap<N, f64>,
    /// 前驱表，源点和不可达节点为 None
    pub predecessors: BTreeMap<N, Option<N>>,
    pub trace: Vec<DijkstraStep<N>>,
}

impl<N: NodeId> DijkstraResult<N> {
    /// 到目标的距离
    pub fn distance_to(&self, target: &N) -> Result<f64> {
        self.distances
            .get(target)
            .copied()
            .ok_or_else(|| Error::node_not_found(target))
    }

    /// 沿前驱回溯出路径；不可达时返回空序列
    pub fn path_to(&self, target: &N) -> Result<Vec<N>> {
        let mut current = match self.predecessors.get(target) {
            None => return Err(Error::node_not_found(target)),
            Some(None) if *target != self.source => return Ok(Vec::new()),
            Some(_) => Some(target.clone()),
        };

        let mut path = Vec::new();
        while let Some(node) = current {
            current = self.predecessors.get(&node).cloned().flatten();
            path.push(node);
        }
        path.reverse();
        Ok(path)
    }

    /// 可达节点数（含源点）
    pub fn reachable_count(&self) -> usize {
        self.distances.values().filter(|d| d.is_finite()).count()
    }
}

/// 从 `source` 出发的单源最短路径
pub fn dijkstra<N: NodeId>(graph: &Graph<N>, source: &N) -> Result<DijkstraResult<N>> {
    if !graph.contains(source) {
        return Err(Error::node_not_found(source));
    }

    let mut distances: BTreeMap<N, f64> = graph
        .nodes()
        .map(|node| (node.clone(), f64::INFINITY))
        .collect();
    let mut predecessors: BTreeMap<N, Option<N>> =
        graph.nodes().map(|node| (node.clone(), None)).collect();
    distances.insert(source.clone(), 0.0);

    let mut visited = BTreeSet::new();
    let mut heap = BinaryHeap::new();
    heap.push(Reverse((Weight(0.0), source.clone())));
    let mut trace = Vec::new();

    while let Some(Reverse((Weight(dist), node))) = heap.pop() {
        if visited.contains(&node) {
            continue;
        }
        visited.insert(node.clone());

        let mut relaxations = Vec::new();
        for (neighbor, weight) in graph.neighbors(&node) {
            if visited.contains(neighbor) {
                continue;
            }
            let candidate = dist + weight;
            let previous = distances.get(neighbor).copied().unwrap_or(f64::INFINITY);
            if candidate < previous {
                distances.insert(neighbor.clone(), candidate);
                predecessors.insert(neighbor.clone(), Some(node.clone()));
                heap.push(Reverse((Weight(candidate), neighbor.clone())));
                relaxations.push(Relaxation {
                    neighbor: neighbor.clone(),
                    previous,
                    updated: candidate,
                    edge_weight: weight,
                });
            }
        }

        debug!(
            iteration = trace.len() + 1,
            node = ?node,
            distance = dist,
            relaxed = relaxations.len(),
            "dijkstra settled node"
        );
        trace.push(DijkstraStep {
            iteration: trace.len() + 1,
            node,
            distance: dist,
            relaxations,
            visited: visited.clone(),
            distances: distances.clone(),
        });
    }

    info!(source = ?source, settled = visited.len(), "dijkstra finished");
    Ok(DijkstraResult {
        source: source.clone(),
        distances,
        predecessors,
        trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directed_example() -> Graph<i32> {
        Graph::from_directed_edges(vec![
            (1, 2, 5.0),
            (1, 3, 1.0),
            (3, 1, 1.0),
            (2, 4, 7.0),
            (3, 4, 4.0),
        ])
    }

    #[test]
    fn test_directed_example() {
        let result = dijkstra(&directed_example(), &1).unwrap();

        assert_eq!(result.distance_to(&1).unwrap(), 0.0);
        assert_eq!(result.distance_to(&2).unwrap(), 5.0);
        assert_eq!(result.distance_to(&3).unwrap(), 1.0);
        assert_eq!(result.distance_to(&4).unwrap(), 5.0);
        assert_eq!(result.path_to(&4).unwrap(), vec![1, 3, 4]);
        assert_eq!(result.path_to(&1).unwrap(), vec![1]);
    }

    #[test]
    fn test_trace_one_step_per_settled_node() {
        let result = dijkstra(&directed_example(), &1).unwrap();

        assert_eq!(result.trace.len(), 4);
        let order: Vec<i32> = result.trace.iter().map(|s| s.node).collect();
        assert_eq!(order, vec![1, 3, 2, 4]);

        let first = &result.trace[0];
        assert_eq!(first.distance, 0.0);
        assert_eq!(
            first.relaxations,
            vec![
                Relaxation {
                    neighbor: 2,
                    previous: f64::INFINITY,
                    updated: 5.0,
                    edge_weight: 5.0,
                },
                Relaxation {
                    neighbor: 3,
                    previous: f64::INFINITY,
                    updated: 1.0,
                    edge_weight: 1.0,
                },
            ]
        );
        // 节点 3 -> 4 把距离从 ∞ 降到 5，之后 2 -> 4 (12) 不再改进
        assert_eq!(result.trace[1].relaxations.len(), 1);
        assert!(result.trace[2].relaxations.is_empty());
    }

    #[test]
    fn test_path_weights_match_distances() {
        let graph = Graph::from_undirected_edges(vec![
            ("A", "B", 4.0),
            ("A", "C", 3.0),
            ("B", "C", 1.0),
            ("B", "D", 2.0),
            ("C", "D", 4.0),
        ]);
        let result = dijkstra(&graph, &"A").unwrap();

        for node in graph.nodes() {
            let path = result.path_to(node).unwrap();
            let sum: f64 = path
                .windows(2)
                .map(|pair| graph.weight(&pair[0], &pair[1]).unwrap())
                .sum();
            assert_eq!(sum, result.distance_to(node).unwrap());
        }
    }

    #[test]
    fn test_unreachable_node() {
        let mut graph = directed_example();
        graph.add_node(9);
        let result = dijkstra(&graph, &1).unwrap();

        assert!(result.distance_to(&9).unwrap().is_infinite());
        assert!(result.path_to(&9).unwrap().is_empty());
        assert_eq!(result.reachable_count(), 4);
    }

    #[test]
    fn test_missing_source_and_target() {
        let graph = directed_example();
        assert!(matches!(dijkstra(&graph, &42), Err(Error::NodeNotFound(_))));

        let result = dijkstra(&graph, &1).unwrap();
        assert!(matches!(result.path_to(&42), Err(Error::NodeNotFound(_))));
        assert!(result.distance_to(&42).is_err());
    }

    #[test]
    fn test_stale_queue_entries_are_skipped() {
        // 1 -> 3 先以 10 入队，随后经 2 降为 3，旧元素出队时被丢弃
        let graph = Graph::from_directed_edges(vec![(1, 3, 10.0), (1, 2, 1.0), (2, 3, 2.0)]);
        let result = dijkstra(&graph, &1).unwrap();

        assert_eq!(result.trace.len(), 3);
        assert_eq!(result.distance_to(&3).unwrap(), 3.0);
        assert_eq!(result.path_to(&3).unwrap(), vec![1, 2, 3]);
        let relaxed = &result.trace[1].relaxations[0];
        assert_eq!((relaxed.previous, relaxed.updated), (10.0, 3.0));
    }
}
