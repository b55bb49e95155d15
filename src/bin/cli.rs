//! ORGraph CLI 工具
//!
//! 读取边列表或收益矩阵，运行一个算法并打印结果和执行轨迹

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use orgraph::algorithm::{
    dijkstra, floyd_warshall, ford_fulkerson, kruskal, prim, route, FloydWarshallResult, Route,
};
use orgraph::cli::{Printer, PrinterOptions};
use orgraph::graph::NodeLabel;
use orgraph::input::{self, EdgeList, Objective, VariableKind};
use orgraph::lp::game::{GameSolution, SaddlePoint, ZeroSumGame};
use orgraph::lp::LinearProgram;
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "orgraph-cli")]
#[command(about = "运筹学图算法教学工具", version)]
struct Cli {
    /// 输入文件，缺省时读标准输入
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// 没有方向标记的边按有向边处理（最小生成树总是按无向图处理）
    #[arg(short, long, global = true)]
    directed: bool,

    /// 以 JSON 输出完整结果
    #[arg(long, global = true)]
    json: bool,

    /// 不输出逐步轨迹
    #[arg(long, global = true)]
    no_trace: bool,

    /// 小数位数
    #[arg(long, global = true, default_value = "2")]
    precision: usize,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Kruskal 最小生成树
    Kruskal,

    /// Prim 最小生成树
    Prim {
        /// 起点，缺省为最小的节点
        #[arg(short, long)]
        start: Option<String>,
    },

    /// Dijkstra 单源最短路径
    Dijkstra {
        /// 源点
        #[arg(short, long)]
        source: String,
    },

    /// Floyd-Warshall 全源最短路径
    Floyd {
        /// 查询路线的起点
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// 查询路线的终点
        #[arg(long, requires = "from")]
        to: Option<String>,
    },

    /// Ford-Fulkerson 最大流（边总是有向）
    Maxflow {
        /// 源点
        #[arg(short, long)]
        source: String,

        /// 汇点
        #[arg(short = 't', long)]
        sink: String,
    },

    /// 零和博弈：鞍点与两个玩家的线性规划
    Game,

    /// 一般线性规划：输入为约束，每行 `a₁ … aₙ (<=|>=|=) b`
    Lp {
        /// 目标函数系数，空格分隔
        #[arg(short, long)]
        objective: String,

        /// 最大化（缺省最小化）
        #[arg(long)]
        maximize: bool,

        /// 变量类型
        #[arg(long, value_enum, default_value = "continuous")]
        kind: Kind,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Continuous,
    Integer,
    Binary,
}

impl From<Kind> for VariableKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Continuous => VariableKind::Continuous,
            Kind::Integer => VariableKind::Integer,
            Kind::Binary => VariableKind::Binary,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "orgraph=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let text = read_input(cli.input.as_ref())?;
    let printer = Printer::new(PrinterOptions {
        precision: cli.precision,
        show_trace: !cli.no_trace,
    });

    match &cli.command {
        Commands::Kruskal => {
            let edges = parse_edges(&text, false)?;
            let result = kruskal(&edges.edges(), edges.node_count())?;
            emit(&cli, &result, || printer.format_kruskal(&result, edges.node_count()))?;
        }
        Commands::Prim { start } => {
            let edges = parse_edges(&text, false)?;
            let start = match start {
                Some(label) => NodeLabel::parse(label),
                None => match edges.nodes().into_iter().next() {
                    Some(first) => first,
                    None => bail!("输入中没有边"),
                },
            };
            let result = prim(&edges.to_undirected_graph(), &start)?;
            emit(&cli, &result, || printer.format_prim(&result, edges.node_count()))?;
        }
        Commands::Dijkstra { source } => {
            let graph = parse_edges(&text, cli.directed)?.to_graph();
            if let Err(e) = graph.ensure_non_negative() {
                warn!(error = %e, "dijkstra rejected negative weight");
                return Err(e.into());
            }
            let result = dijkstra(&graph, &NodeLabel::parse(source))?;
            emit(&cli, &result, || printer.format_dijkstra(&result))?;
        }
        Commands::Floyd { from, to } => {
            let graph = parse_edges(&text, cli.directed)?.to_graph();
            let result = floyd_warshall(&graph);
            let query = match (from, to) {
                (Some(from), Some(to)) => {
                    let (origin, destination) = (NodeLabel::parse(from), NodeLabel::parse(to));
                    let found = route(&result, &origin, &destination)?;
                    Some((origin, destination, found))
                }
                _ => None,
            };

            let report = FloydReport {
                result: &result,
                route: query.as_ref().and_then(|(_, _, found)| found.as_ref()),
            };
            emit(&cli, &report, || {
                let mut out = printer.format_floyd_warshall(&result);
                if let Some((origin, destination, found)) = &query {
                    out.push_str(&printer.format_route(origin, destination, found.as_ref()));
                }
                out
            })?;
        }
        Commands::Maxflow { source, sink } => {
            let graph = parse_edges(&text, true)?.to_graph();
            let (source, sink) = (NodeLabel::parse(source), NodeLabel::parse(sink));
            let result = ford_fulkerson(&graph, &source, &sink)?;
            emit(&cli, &result, || printer.format_max_flow(&result))?;
        }
        Commands::Game => {
            let game = ZeroSumGame::new(input::parse_payoff_matrix(&text)?)?;
            let solution = game.pure_solution();
            if cli.json {
                let report = GameReport {
                    game: &game,
                    saddle_point: game.saddle_point(),
                    solution: solution.as_ref(),
                    row_program: game.row_player_program(),
                    column_program: game.column_player_program(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", printer.format_game(&game));
                match &solution {
                    Some(solution) => print!("{}", printer.format_game_solution(&game, solution)),
                    None => println!("(混合策略需要外部线性规划求解器)"),
                }
            }
        }
        Commands::Lp {
            objective,
            maximize,
            kind,
        } => {
            let sense = if *maximize {
                Objective::Maximize
            } else {
                Objective::Minimize
            };
            let program = input::parse_linear_program(objective, &text, sense, (*kind).into())?;
            emit(&cli, &program, || printer.format_linear_program(&program))?;
        }
    }

    Ok(())
}

/// `floyd --json` 的输出：矩阵和可选的路线放在同一个文档里
#[derive(Serialize)]
struct FloydReport<'a> {
    result: &'a FloydWarshallResult<NodeLabel>,
    route: Option<&'a Route<NodeLabel>>,
}

#[derive(Serialize)]
struct GameReport<'a> {
    game: &'a ZeroSumGame,
    saddle_point: Option<SaddlePoint>,
    solution: Option<&'a GameSolution>,
    row_program: LinearProgram,
    column_program: LinearProgram,
}

fn read_input(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("无法读取输入文件 {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("无法读取标准输入")?;
            Ok(text)
        }
    }
}

fn parse_edges(text: &str, directed: bool) -> anyhow::Result<EdgeList> {
    let edges = input::parse_edge_list(text, directed)?;
    if edges.is_empty() {
        bail!("输入中没有边");
    }
    info!(edges = edges.len(), nodes = edges.node_count(), "loaded edge list");
    Ok(edges)
}

/// JSON 模式输出序列化结果，否则输出表格
fn emit<T, F>(cli: &Cli, value: &T, render: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    if cli.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", render());
    }
    Ok(())
}
