//! 结果打印器
//!
//! 把算法结果和执行轨迹渲染成表格文本

use crate::algorithm::{
    DijkstraResult, FloydWarshallResult, FlowStep, KruskalResult, MatrixSnapshot, MaxFlowResult,
    PrimResult, PrimStep, Route,
};
use crate::graph::{NodeId, WeightedEdge};
use crate::lp::game::{pure_strategy_payoffs, Advantage, GameSolution, ZeroSumGame};
use crate::lp::LinearProgram;
use prettytable::{format, row, Cell, Row, Table};
use std::fmt::Display;

/// 打印选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterOptions {
    /// 小数位数
    pub precision: usize,
    /// 是否输出逐步轨迹
    pub show_trace: bool,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            precision: 2,
            show_trace: true,
        }
    }
}

/// 结果打印器
#[derive(Debug, Clone, Default)]
pub struct Printer {
    options: PrinterOptions,
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table
}

fn join<N: Display>(nodes: &[N], sep: &str) -> String {
    nodes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

impl Printer {
    pub fn new(options: PrinterOptions) -> Self {
        Self { options }
    }

    /// 数值格式化，无穷大显示为 ∞
    pub fn number(&self, value: f64) -> String {
        if value.is_infinite() {
            let symbol = if value > 0.0 { "∞" } else { "-∞" };
            symbol.to_string()
        } else {
            format!("{:.*}", self.options.precision, value)
        }
    }

    fn edge<N: Display>(&self, edge: &WeightedEdge<N>) -> String {
        format!("{} - {} ({})", edge.from, edge.to, self.number(edge.weight))
    }

    fn edge_table<N: Display>(&self, edges: &[WeightedEdge<N>]) -> Table {
        let mut table = new_table();
        table.set_titles(row!["#", "起点", "终点", "权重"]);
        for (i, e) in edges.iter().enumerate() {
            table.add_row(row![i + 1, e.from, e.to, self.number(e.weight)]);
        }
        table
    }

    /// Kruskal 结果
    pub fn format_kruskal<N: NodeId + Display>(
        &self,
        result: &KruskalResult<N>,
        node_count: usize,
    ) -> String {
        let mut output = String::from("Kruskal 最小生成树\n");

        if self.options.show_trace {
            let mut table = new_table();
            table.set_titles(row!["迭代", "边", "根(u)", "根(v)", "结果", "累计权重"]);
            for step in &result.trace {
                table.add_row(row![
                    step.iteration,
                    self.edge(&step.edge),
                    step.root_u,
                    step.root_v,
                    if step.accepted { "接受" } else { "拒绝 (成环)" },
                    self.number(step.cumulative_weight)
                ]);
            }
            output.push_str(&table.to_string());
        }

        output.push_str(&self.edge_table(&result.edges).to_string());
        output.push_str(&self.mst_summary(result.edges.len(), result.total_weight, node_count));
        output
    }

    /// Prim 结果
    pub fn format_prim<N: NodeId + Display>(
        &self,
        result: &PrimResult<N>,
        node_count: usize,
    ) -> String {
        let mut output = String::from("Prim 最小生成树\n");

        if self.options.show_trace {
            let mut table = new_table();
            table.set_titles(row!["迭代", "边", "结果", "已访问", "累计权重"]);
            for step in &result.trace {
                match step {
                    PrimStep::Initial { start, frontier } => {
                        table.add_row(row![
                            0,
                            format!("起点 {}", start),
                            format!("候选边 {} 条", frontier.len()),
                            start,
                            self.number(0.0)
                        ]);
                    }
                    PrimStep::Accepted {
                        iteration,
                        edge,
                        visited,
                        total_weight,
                        ..
                    } => {
                        table.add_row(row![
                            iteration,
                            self.edge(edge),
                            "接受",
                            join(&visited.iter().collect::<Vec<_>>(), ", "),
                            self.number(*total_weight)
                        ]);
                    }
                    PrimStep::Rejected {
                        iteration,
                        edge,
                        reason,
                        visited,
                        total_weight,
                        ..
                    } => {
                        table.add_row(row![
                            iteration,
                            self.edge(edge),
                            format!("拒绝 ({})", reason),
                            join(&visited.iter().collect::<Vec<_>>(), ", "),
                            self.number(*total_weight)
                        ]);
                    }
                }
            }
            output.push_str(&table.to_string());
        }

        output.push_str(&self.edge_table(&result.edges).to_string());
        output.push_str(&self.mst_summary(result.edges.len(), result.total_weight, node_count));
        output
    }

    fn mst_summary(&self, edges: usize, total: f64, node_count: usize) -> String {
        let mut table = new_table();
        table.set_titles(row!["属性", "值"]);
        table.add_row(row!["边数", edges]);
        table.add_row(row!["总权重", self.number(total)]);
        table.add_row(row![
            "生成树",
            if node_count > 0 && edges + 1 == node_count {
                "是"
            } else {
                "否 (图不连通，得到生成森林)"
            }
        ]);
        table.to_string()
    }

    /// Dijkstra 结果
    pub fn format_dijkstra<N: NodeId + Display>(&self, result: &DijkstraResult<N>) -> String {
        let mut output = format!("Dijkstra 最短路径，源点 {}\n", result.source);

        if self.options.show_trace {
            let mut table = new_table();
            table.set_titles(row!["迭代", "确定节点", "距离", "松弛"]);
            for step in &result.trace {
                let relaxed = step
                    .relaxations
                    .iter()
                    .map(|r| {
                        format!(
                            "{}: {} -> {}",
                            r.neighbor,
                            self.number(r.previous),
                            self.number(r.updated)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                table.add_row(row![step.iteration, step.node, self.number(step.distance), relaxed]);
            }
            output.push_str(&table.to_string());
        }

        let mut table = new_table();
        table.set_titles(row!["节点", "距离", "前驱", "路径"]);
        for (node, &distance) in &result.distances {
            let predecessor = result
                .predecessors
                .get(node)
                .cloned()
                .flatten()
                .map_or_else(|| "-".to_string(), |p| p.to_string());
            let path = result
                .path_to(node)
                .map(|p| if p.is_empty() { "不可达".to_string() } else { join(&p, " -> ") })
                .unwrap_or_default();
            table.add_row(row![node, self.number(distance), predecessor, path]);
        }
        output.push_str(&table.to_string());
        output
    }

    fn matrix_table<N: Display, T, F>(&self, nodes: &[N], matrix: &[Vec<T>], cell: F) -> Table
    where
        F: Fn(&T) -> String,
    {
        let mut table = new_table();
        let mut titles = vec![Cell::new("")];
        titles.extend(nodes.iter().map(|n| Cell::new(&n.to_string())));
        table.set_titles(Row::new(titles));

        for (i, values) in matrix.iter().enumerate() {
            let mut cells = vec![Cell::new(&nodes[i].to_string())];
            cells.extend(values.iter().map(|v| Cell::new(&cell(v))));
            table.add_row(Row::new(cells));
        }
        table
    }

    fn snapshot<N: NodeId + Display>(&self, nodes: &[N], snapshot: &MatrixSnapshot<N>) -> String {
        let d = self.matrix_table(nodes, &snapshot.distances, |v| self.number(*v));
        let p = self.matrix_table(nodes, &snapshot.predecessors, |v: &Option<N>| {
            v.as_ref().map_or_else(|| "-".to_string(), |n| n.to_string())
        });
        format!("D:\n{}P:\n{}", d, p)
    }

    /// Floyd-Warshall 结果
    pub fn format_floyd_warshall<N: NodeId + Display>(
        &self,
        result: &FloydWarshallResult<N>,
    ) -> String {
        let mut output = String::from("Floyd-Warshall 全源最短路径\n");

        if self.options.show_trace {
            output.push_str("初始矩阵 (k = 0)\n");
            output.push_str(&self.snapshot(&result.nodes, &result.initial));
            for step in &result.trace {
                output.push_str(&format!(
                    "迭代 k = {}，中间节点 {}，更新 {} 处\n",
                    step.k,
                    step.intermediate,
                    step.changes.len()
                ));
                for change in &step.changes {
                    output.push_str(&format!(
                        "  D[{}][{}]: {} -> {} (经 {})\n",
                        change.origin,
                        change.destination,
                        self.number(change.previous),
                        self.number(change.updated),
                        change.via
                    ));
                }
            }
        }

        output.push_str("最终矩阵\n");
        output.push_str(&self.snapshot(
            &result.nodes,
            &MatrixSnapshot {
                distances: result.distances.clone(),
                predecessors: result.predecessors.clone(),
            },
        ));
        output
    }

    /// 单条路线
    pub fn format_route<N: NodeId + Display>(
        &self,
        origin: &N,
        destination: &N,
        route: Option<&Route<N>>,
    ) -> String {
        let Some(route) = route else {
            return format!("{} 到 {} 不可达\n", origin, destination);
        };

        let mut table = new_table();
        table.set_titles(row!["段", "从", "到", "距离"]);
        for (i, segment) in route.segments.iter().enumerate() {
            table.add_row(row![i + 1, segment.from, segment.to, self.number(segment.weight)]);
        }
        format!(
            "路径: {}\n{}总距离: {}\n",
            join(&route.path, " -> "),
            table,
            self.number(route.distance)
        )
    }

    /// 最大流结果
    pub fn format_max_flow<N: NodeId + Display>(&self, result: &MaxFlowResult<N>) -> String {
        let mut output = format!("Ford-Fulkerson 最大流: {} -> {}\n", result.source, result.sink);

        if self.options.show_trace {
            let mut table = new_table();
            table.set_titles(row!["迭代", "增广路径", "残量", "瓶颈", "累计流量", "访问顺序"]);
            for step in &result.trace {
                match step {
                    FlowStep::PathFound {
                        iteration,
                        path,
                        edges,
                        bottleneck,
                        cumulative_flow,
                        explored,
                    } => {
                        let residuals = edges
                            .iter()
                            .map(|e| format!("{}->{}: {}", e.from, e.to, self.number(e.residual)))
                            .collect::<Vec<_>>()
                            .join("\n");
                        table.add_row(row![
                            iteration,
                            join(path, " -> "),
                            residuals,
                            self.number(*bottleneck),
                            self.number(*cumulative_flow),
                            join(explored, ", ")
                        ]);
                    }
                    FlowStep::NoPath {
                        iteration,
                        explored,
                        cumulative_flow,
                    } => {
                        table.add_row(row![
                            iteration,
                            "无增广路径",
                            "",
                            "",
                            self.number(*cumulative_flow),
                            join(explored, ", ")
                        ]);
                    }
                }
            }
            output.push_str(&table.to_string());
        }

        output.push_str("最小割:\n");
        output.push_str(&self.edge_table(&result.cut_edges).to_string());

        let reachable: Vec<&N> = result.reachable.iter().collect();
        let mut table = new_table();
        table.set_titles(row!["属性", "值"]);
        table.add_row(row!["最大流量", self.number(result.value)]);
        table.add_row(row!["割容量", self.number(result.cut_capacity)]);
        table.add_row(row!["源侧节点", join(&reachable, ", ")]);
        table.add_row(row!["增广路径数", result.paths.len()]);
        output.push_str(&table.to_string());
        output
    }

    /// 线性规划的代数形式
    pub fn format_linear_program(&self, program: &LinearProgram) -> String {
        let term = |coefficients: &[f64]| {
            coefficients
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{}·x{}", self.number(*c), i + 1))
                .collect::<Vec<_>>()
                .join(" + ")
        };

        let mut output = format!("min {}\n", term(&program.objective));
        for (row, b) in program.a_ub.iter().zip(&program.b_ub) {
            output.push_str(&format!("  {} <= {}\n", term(row), self.number(*b)));
        }
        for (row, b) in program.a_eq.iter().zip(&program.b_eq) {
            output.push_str(&format!("  {} = {}\n", term(row), self.number(*b)));
        }
        for (i, (lower, upper)) in program.bounds.iter().enumerate() {
            let lower = lower.map_or_else(|| "-∞".to_string(), |v| self.number(v));
            let upper = upper.map_or_else(|| "∞".to_string(), |v| self.number(v));
            output.push_str(&format!("  {} <= x{} <= {}\n", lower, i + 1, upper));
        }
        output
    }

    /// 零和博弈：收益矩阵、鞍点和两个玩家的规划
    pub fn format_game(&self, game: &ZeroSumGame) -> String {
        let mut table = new_table();
        let mut titles = vec![Cell::new("A \\ B")];
        titles.extend((1..=game.columns()).map(|j| Cell::new(&format!("B{}", j))));
        table.set_titles(Row::new(titles));
        for (i, values) in game.payoff().iter().enumerate() {
            let mut cells = vec![Cell::new(&format!("A{}", i + 1))];
            cells.extend(values.iter().map(|v| Cell::new(&self.number(*v))));
            table.add_row(Row::new(cells));
        }

        let mut output = format!("收益矩阵 (行玩家视角):\n{}", table);
        match game.saddle_point() {
            Some(point) => output.push_str(&format!(
                "鞍点: A{} / B{}，博弈值 {}\n",
                point.row + 1,
                point.column + 1,
                self.number(point.value)
            )),
            None => output.push_str("没有纯策略鞍点，需要混合策略\n"),
        }
        output.push_str("行玩家规划:\n");
        output.push_str(&self.format_linear_program(&game.row_player_program()));
        output.push_str("列玩家规划:\n");
        output.push_str(&self.format_linear_program(&game.column_player_program()));
        output
    }

    /// 零和博弈的混合策略解
    pub fn format_game_solution(&self, game: &ZeroSumGame, solution: &GameSolution) -> String {
        let mut table = new_table();
        table.set_titles(row!["策略", "概率", "对 B 最优策略的期望收益"]);
        let payoffs = pure_strategy_payoffs(game, solution);
        for (i, (p, payoff)) in solution.row_strategy.iter().zip(&payoffs).enumerate() {
            table.add_row(row![format!("A{}", i + 1), self.number(*p), self.number(*payoff)]);
        }
        for (j, q) in solution.column_strategy.iter().enumerate() {
            table.add_row(row![format!("B{}", j + 1), self.number(*q), ""]);
        }

        let verdict = match solution.advantage() {
            Advantage::RowPlayer => "博弈对行玩家 A 有利",
            Advantage::ColumnPlayer => "博弈对列玩家 B 有利",
            Advantage::Fair => "博弈公平",
        };
        format!("{}博弈值: {}\n{}\n", table, self.number(solution.value), verdict)
    }
}
