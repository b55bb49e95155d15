//! 文本输入解析
//!
//! 支持三种输入：
//! - 边列表：每行 `u v 权重 [->|<->|<>]`，`#` 开头为注释
//! - 收益矩阵：每行一组数字
//! - 线性规划：目标函数一行，约束每行 `a₁ … aₙ (<=|>=|=) b`

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeLabel, WeightedEdge};
use crate::lp::LinearProgram;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// 一行边定义
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeEntry {
    pub from: NodeLabel,
    pub to: NodeLabel,
    pub weight: f64,
    /// 是否同时加入反向边
    pub bidirectional: bool,
}

/// 解析后的边列表，保持输入顺序
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EdgeList {
    entries: Vec<EdgeEntry>,
}

impl EdgeList {
    pub fn entries(&self) -> &[EdgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 构建邻接表，双向边加入两个方向
    pub fn to_graph(&self) -> Graph<NodeLabel> {
        let mut graph = Graph::new();
        for entry in &self.entries {
            if entry.bidirectional {
                graph.add_undirected_edge(entry.from.clone(), entry.to.clone(), entry.weight);
            } else {
                graph.add_edge(entry.from.clone(), entry.to.clone(), entry.weight);
            }
        }
        graph
    }

    /// 忽略方向，每行展开为一条无向边（最小生成树的输入）
    pub fn to_undirected_graph(&self) -> Graph<NodeLabel> {
        Graph::from_undirected_edges(
            self.entries
                .iter()
                .map(|e| (e.from.clone(), e.to.clone(), e.weight)),
        )
    }

    /// 每行一条边，按输入顺序（Kruskal 的输入）
    pub fn edges(&self) -> Vec<WeightedEdge<NodeLabel>> {
        self.entries
            .iter()
            .map(|e| WeightedEdge::new(e.from.clone(), e.to.clone(), e.weight))
            .collect()
    }

    /// 排序去重后的节点
    pub fn nodes(&self) -> Vec<NodeLabel> {
        self.entries
            .iter()
            .flat_map(|e| [e.from.clone(), e.to.clone()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }
}

/// 解析一行边定义
///
/// 空行和注释返回 `Ok(None)`。`line` 只用于错误信息。
pub fn parse_edge_line(text: &str, line: usize, directed: bool) -> Result<Option<EdgeEntry>> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(Error::Parse {
            line,
            reason: format!("需要 `节点 节点 权重`，只有 {} 项", parts.len()),
        });
    }

    let weight: f64 = parts[2].parse().map_err(|_| Error::Parse {
        line,
        reason: format!("权重不是数字: {}", parts[2]),
    })?;

    let bidirectional = match parts.get(3) {
        None => !directed,
        Some(&"->") => false,
        Some(&"<->") | Some(&"<>") => true,
        Some(other) => {
            return Err(Error::Parse {
                line,
                reason: format!("未知的方向标记: {}", other),
            })
        }
    };

    Ok(Some(EdgeEntry {
        from: NodeLabel::parse(parts[0]),
        to: NodeLabel::parse(parts[1]),
        weight,
        bidirectional,
    }))
}

/// 解析整段边列表，`directed` 为没有方向标记时的默认值
pub fn parse_edge_list(text: &str, directed: bool) -> Result<EdgeList> {
    let mut entries = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(entry) = parse_edge_line(line, i + 1, directed)? {
            entries.push(entry);
        }
    }
    debug!(edges = entries.len(), directed, "parsed edge list");
    Ok(EdgeList { entries })
}

/// 从文件读取边列表
pub fn load_edge_file<P: AsRef<Path>>(path: P, directed: bool) -> Result<EdgeList> {
    let text = fs::read_to_string(path)?;
    parse_edge_list(&text, directed)
}

/// 解析数字行，跳过空行和注释
fn parse_number_rows(text: &str) -> Result<Vec<(usize, Vec<f64>)>> {
    let mut rows = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row = trimmed
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| Error::Parse {
                    line: i + 1,
                    reason: format!("不是数字: {}", token),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push((i + 1, row));
    }
    Ok(rows)
}

/// 解析收益矩阵，拒绝空矩阵和行长不一致的矩阵
pub fn parse_payoff_matrix(text: &str) -> Result<Vec<Vec<f64>>> {
    let rows = parse_number_rows(text)?;
    let Some((_, first)) = rows.first() else {
        return Err(Error::InvalidMatrix("收益矩阵为空".to_string()));
    };
    let width = first.len();
    if let Some((line, row)) = rows.iter().find(|(_, row)| row.len() != width) {
        return Err(Error::Parse {
            line: *line,
            reason: format!("该行有 {} 列，第一行有 {} 列", row.len(), width),
        });
    }
    Ok(rows.into_iter().map(|(_, row)| row).collect())
}

/// 目标方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Objective {
    #[default]
    Minimize,
    Maximize,
}

/// 变量类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariableKind {
    #[default]
    Continuous,
    Integer,
    Binary,
}

/// 解析一般线性规划
///
/// 最大化问题把目标系数取负转成最小化，`>=` 约束取负转成 `<=`。
/// 所有变量非负，二元变量额外上界为 1。
pub fn parse_linear_program(
    objective: &str,
    constraints: &str,
    sense: Objective,
    kind: VariableKind,
) -> Result<LinearProgram> {
    let mut coefficients = objective
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| Error::InvalidArgument(format!("目标函数系数不是数字: {}", token)))
        })
        .collect::<Result<Vec<f64>>>()?;
    if coefficients.is_empty() {
        return Err(Error::InvalidArgument("目标函数为空".to_string()));
    }
    if sense == Objective::Maximize {
        coefficients.iter_mut().for_each(|c| *c = -*c);
    }
    let n = coefficients.len();
    let mut lp = LinearProgram::new(coefficients);

    for (i, line) in constraints.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() != n + 2 {
            return Err(Error::Parse {
                line: i + 1,
                reason: format!("约束应为 {} 个系数、关系符和右端项", n),
            });
        }

        let row = parts[..n]
            .iter()
            .map(|token| {
                token.parse::<f64>().map_err(|_| Error::Parse {
                    line: i + 1,
                    reason: format!("系数不是数字: {}", token),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        let rhs: f64 = parts[n + 1].parse().map_err(|_| Error::Parse {
            line: i + 1,
            reason: format!("右端项不是数字: {}", parts[n + 1]),
        })?;

        match parts[n] {
            "<=" => lp.add_upper_bound(row, rhs),
            ">=" => lp.add_lower_bound(row, rhs),
            "=" => lp.add_equality(row, rhs),
            other => {
                return Err(Error::Parse {
                    line: i + 1,
                    reason: format!("关系符应为 <=、>= 或 =，实际为 {}", other),
                })
            }
        }
    }

    match kind {
        VariableKind::Continuous => {}
        VariableKind::Integer => lp.integrality = Some(vec![true; n]),
        VariableKind::Binary => {
            lp.bounds = vec![(Some(0.0), Some(1.0)); n];
            lp.integrality = Some(vec![true; n]);
        }
    }

    lp.validate()?;
    Ok(lp)
}
