//! 并查集
//!
//! Kruskal 用来判断加入一条边是否会成环。路径压缩 + 按秩合并。

/// 稠密编号 `[0, n)` 上的不相交集合
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    /// 创建 n 个单元素集合
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// 元素个数
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// 查找代表元，并把沿途节点直接指向根
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        root
    }

    /// 合并两个集合；已在同一集合时返回 false
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let mut rx = self.find(x);
        let mut ry = self.find(y);

        if rx == ry {
            return false;
        }

        // 低秩的根挂到高秩的根下
        if self.rank[rx] < self.rank[ry] {
            std::mem::swap(&mut rx, &mut ry);
        }
        self.parent[ry] = rx;
        if self.rank[rx] == self.rank[ry] {
            self.rank[rx] += 1;
        }

        true
    }

    /// 两个元素是否已连通
    pub fn connected(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    /// 当前集合数
    pub fn set_count(&mut self) -> usize {
        (0..self.len()).filter(|&x| self.find(x) == x).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut uf = UnionFind::new(4);
        assert_eq!(uf.len(), 4);
        for i in 0..4 {
            assert_eq!(uf.find(i), i);
        }
        assert_eq!(uf.set_count(), 4);
    }

    #[test]
    fn test_union_reports_cycle() {
        let mut uf = UnionFind::new(3);
        assert!(uf.union(0, 1));
        assert!(uf.union(1, 2));
        // 0-2 已连通，再合并即成环
        assert!(!uf.union(0, 2));
        assert!(uf.connected(0, 2));
        assert_eq!(uf.set_count(), 1);
    }

    #[test]
    fn test_union_by_rank_keeps_higher_root() {
        let mut uf = UnionFind::new(4);
        uf.union(0, 1); // 秩相同，0 成为根
        assert_eq!(uf.find(1), 0);

        uf.union(2, 0); // 2 秩为 0，挂到 0 下
        assert_eq!(uf.find(2), 0);
        assert_eq!(uf.find(3), 3);
    }

    #[test]
    fn test_path_compression() {
        let mut uf = UnionFind::new(5);
        // 手工构造链 4 -> 3 -> 2 -> 1 -> 0
        uf.parent = vec![0, 0, 1, 2, 3];
        assert_eq!(uf.find(4), 0);
        assert_eq!(uf.parent, vec![0, 0, 0, 0, 0]);
    }
}
