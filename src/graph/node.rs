//! 节点标识
//!
//! 引擎只依赖相等、哈希和全序，不区分数字与文本标识

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

/// 引擎可接受的节点标识
pub trait NodeId: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T: Clone + Eq + Hash + Ord + fmt::Debug> NodeId for T {}

/// 用户输入中的节点标签（整数或文本）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeLabel {
    Int(i64),
    Text(String),
}

impl NodeLabel {
    /// 能解析为整数的记号视为整数，其余视为文本
    pub fn parse(token: &str) -> Self {
        match token.parse::<i64>() {
            Ok(n) => NodeLabel::Int(n),
            Err(_) => NodeLabel::Text(token.to_string()),
        }
    }
}

impl Ord for NodeLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (NodeLabel::Int(a), NodeLabel::Int(b)) => a.cmp(b),
            (NodeLabel::Text(a), NodeLabel::Text(b)) => a.cmp(b),
            // 整数排在文本之前
            (NodeLabel::Int(_), NodeLabel::Text(_)) => Ordering::Less,
            (NodeLabel::Text(_), NodeLabel::Int(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for NodeLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeLabel::Int(n) => write!(f, "{}", n),
            NodeLabel::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for NodeLabel {
    fn from(n: i64) -> Self {
        NodeLabel::Int(n)
    }
}

impl From<&str> for NodeLabel {
    fn from(s: &str) -> Self {
        NodeLabel::parse(s)
    }
}

// 序列化为原始值，便于作为 JSON 对象的键
impl Serialize for NodeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            NodeLabel::Int(n) => serializer.serialize_i64(*n),
            NodeLabel::Text(s) => serializer.serialize_str(s),
        }
    }
}
