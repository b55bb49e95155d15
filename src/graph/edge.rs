//! 边定义
//!
//! 带权有向边，以及可全序比较的权重键

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// 带权边（有序端点对 + 浮点权重）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge<N> {
    /// 起点
    pub from: N,
    /// 终点
    pub to: N,
    /// 权重（容量、距离或费用）
    pub weight: f64,
}

impl<N> WeightedEdge<N> {
    /// 创建新边
    pub fn new(from: N, to: N, weight: f64) -> Self {
        Self { from, to, weight }
    }

    /// 以元组形式返回
    pub fn as_tuple(&self) -> (&N, &N, f64) {
        (&self.from, &self.to, self.weight)
    }
}

impl<N: fmt::Display> fmt::Display for WeightedEdge<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.from, self.to, self.weight)
    }
}

impl<N> From<(N, N, f64)> for WeightedEdge<N> {
    fn from((from, to, weight): (N, N, f64)) -> Self {
        Self::new(from, to, weight)
    }
}

/// 权重排序键
///
/// `f64` 只有偏序，优先队列需要全序；这里用 `total_cmp`。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weight(pub f64);

impl PartialEq for Weight {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Weight {}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Weight {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    #[test]
    fn test_weight_total_order() {
        assert!(Weight(1.0) < Weight(2.5));
        assert_eq!(Weight(3.0), Weight(3.0));
        assert!(Weight(f64::INFINITY) > Weight(1e300));
    }

    #[test]
    fn test_weight_in_min_heap() {
        let mut heap = BinaryHeap::new();
        for w in [4.0, 1.0, 3.0, 2.0] {
            heap.push(Reverse((Weight(w), "x")));
        }
        let order: Vec<f64> =
            std::iter::from_fn(|| heap.pop().map(|Reverse((w, _))| w.0)).collect();
        assert_eq!(order, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_edge_display() {
        let edge = WeightedEdge::new("A", "B", 4.0);
        assert_eq!(edge.to_string(), "A - B (4)");
        assert_eq!(edge.as_tuple(), (&"A", &"B", 4.0));
    }
}
