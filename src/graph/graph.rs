//! 图数据结构
//!
//! 邻接映射表示：节点 -> (邻居 -> 权重)。保留插入顺序，迭代结果确定。

use super::edge::WeightedEdge;
use super::node::NodeId;
use crate::error::{Error, Result};
use indexmap::IndexMap;

/// 邻接映射图
///
/// 没有出边的节点仍作为键存在，映射到空邻居表。
#[derive(Debug, Clone)]
pub struct Graph<N: NodeId> {
    adjacency: IndexMap<N, IndexMap<N, f64>>,
}

impl<N: NodeId> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId> Graph<N> {
    /// 创建空图
    pub fn new() -> Self {
        Self {
            adjacency: IndexMap::new(),
        }
    }

    /// 由有向边序列构建
    pub fn from_directed_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N, f64)>,
    {
        let mut graph = Self::new();
        for (u, v, w) in edges {
            graph.add_edge(u, v, w);
        }
        graph
    }

    /// 由无向边序列构建（每条边展开为两个方向）
    pub fn from_undirected_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N, f64)>,
    {
        let mut graph = Self::new();
        for (u, v, w) in edges {
            graph.add_undirected_edge(u, v, w);
        }
        graph
    }

    // ==================== 节点操作 ====================

    /// 添加节点（已存在时不做任何事）
    pub fn add_node(&mut self, node: N) {
        self.adjacency.entry(node).or_default();
    }

    /// 节点是否存在
    pub fn contains(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    /// 按插入顺序遍历节点
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.adjacency.keys()
    }

    /// 排序后的节点列表
    pub fn sorted_nodes(&self) -> Vec<N> {
        let mut nodes: Vec<N> = self.adjacency.keys().cloned().collect();
        nodes.sort();
        nodes
    }

    /// 节点数量
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    // ==================== 边操作 ====================

    /// 添加有向边 u -> v，两个端点都会成为键；重复添加时覆盖权重
    pub fn add_edge(&mut self, from: N, to: N, weight: f64) {
        self.adjacency
            .entry(from)
            .or_default()
            .insert(to.clone(), weight);
        self.add_node(to);
    }

    /// 添加无向边（两条等权有向边）
    pub fn add_undirected_edge(&mut self, u: N, v: N, weight: f64) {
        self.add_edge(u.clone(), v.clone(), weight);
        self.add_edge(v, u, weight);
    }

    /// 边 u -> v 的权重
    pub fn weight(&self, from: &N, to: &N) -> Option<f64> {
        self.adjacency.get(from)?.get(to).copied()
    }

    /// 出边邻居；不存在的节点视为没有邻居
    pub fn neighbors<'a>(&'a self, node: &N) -> impl Iterator<Item = (&'a N, f64)> + 'a {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|nbrs| nbrs.iter().map(|(v, &w)| (v, w)))
    }

    /// 出度
    pub fn out_degree(&self, node: &N) -> usize {
        self.adjacency.get(node).map_or(0, |nbrs| nbrs.len())
    }

    /// 有向边数量
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|nbrs| nbrs.len()).sum()
    }

    /// 所有有向边（插入顺序）
    pub fn edges(&self) -> Vec<WeightedEdge<N>> {
        self.adjacency
            .iter()
            .flat_map(|(u, nbrs)| {
                nbrs.iter()
                    .map(move |(v, &w)| WeightedEdge::new(u.clone(), v.clone(), w))
            })
            .collect()
    }

    /// 是否每条边都有对称的等权反向边
    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().all(|(u, nbrs)| {
            nbrs.iter()
                .all(|(v, &w)| self.weight(v, u).map_or(false, |back| back == w))
        })
    }

    /// 校验所有权重非负（Dijkstra 的前置条件，由调用方检查）
    pub fn ensure_non_negative(&self) -> Result<()> {
        for (u, nbrs) in &self.adjacency {
            for (v, &w) in nbrs {
                if w < 0.0 {
                    return Err(Error::NegativeWeight {
                        from: format!("{:?}", u),
                        to: format!("{:?}", v),
                        weight: w,
                    });
                }
            }
        }
        Ok(())
    }
}
