//! 两人零和博弈
//!
//! 行玩家 A 最大化收益，列玩家 B 最小化 A 的收益。
//! 两个玩家的最优混合策略分别由一个线性规划给出。

use super::{LinearProgram, LinearProgramSolver, LpSolution};
use crate::error::{Error, Result};
use serde::Serialize;
use tracing::{debug, info};

/// 判断博弈偏向时使用的阈值
const FAIRNESS_EPSILON: f64 = 0.01;

/// 零和博弈（收益矩阵 m × n，以行玩家视角）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZeroSumGame {
    payoff: Vec<Vec<f64>>,
}

/// 纯策略鞍点
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SaddlePoint {
    pub row: usize,
    pub column: usize,
    pub value: f64,
}

/// 博弈偏向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Advantage {
    RowPlayer,
    ColumnPlayer,
    Fair,
}

/// 两个玩家的最优混合策略
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSolution {
    pub row_strategy: Vec<f64>,
    pub column_strategy: Vec<f64>,
    /// 博弈值（行玩家的期望收益）
    pub value: f64,
    pub row_iterations: usize,
    pub column_iterations: usize,
}

impl GameSolution {
    pub fn advantage(&self) -> Advantage {
        if self.value > FAIRNESS_EPSILON {
            Advantage::RowPlayer
        } else if self.value < -FAIRNESS_EPSILON {
            Advantage::ColumnPlayer
        } else {
            Advantage::Fair
        }
    }
}

impl ZeroSumGame {
    /// 从收益矩阵创建，矩阵必须非空且每行长度相同
    pub fn new(payoff: Vec<Vec<f64>>) -> Result<Self> {
        let Some(first) = payoff.first() else {
            return Err(Error::InvalidMatrix("收益矩阵为空".to_string()));
        };
        let n = first.len();
        if n == 0 {
            return Err(Error::InvalidMatrix("收益矩阵没有列".to_string()));
        }
        if let Some((i, row)) = payoff.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(Error::InvalidMatrix(format!(
                "第 {} 行有 {} 列，应为 {}",
                i + 1,
                row.len(),
                n
            )));
        }
        Ok(Self { payoff })
    }

    pub fn payoff(&self) -> &[Vec<f64>] {
        &self.payoff
    }

    /// 行数（行玩家策略数）
    pub fn rows(&self) -> usize {
        self.payoff.len()
    }

    /// 列数（列玩家策略数）
    pub fn columns(&self) -> usize {
        self.payoff[0].len()
    }

    /// 行玩家的规划
    ///
    /// 变量 p₁..pₘ, v；min −v；每列 j：v − Σᵢ aᵢⱼ pᵢ ≤ 0；Σ pᵢ = 1；v 无界。
    pub fn row_player_program(&self) -> LinearProgram {
        let (m, n) = (self.rows(), self.columns());
        let mut objective = vec![0.0; m + 1];
        objective[m] = -1.0;

        let mut lp = LinearProgram::new(objective);
        for j in 0..n {
            let mut row: Vec<f64> = (0..m).map(|i| -self.payoff[i][j]).collect();
            row.push(1.0);
            lp.add_upper_bound(row, 0.0);
        }

        let mut sum = vec![1.0; m];
        sum.push(0.0);
        lp.add_equality(sum, 1.0);
        lp.bounds[m] = (None, None);
        lp
    }

    /// 列玩家的规划
    ///
    /// 变量 q₁..qₙ, v；min v；每行 i：Σⱼ aᵢⱼ qⱼ − v ≤ 0；Σ qⱼ = 1；v 无界。
    pub fn column_player_program(&self) -> LinearProgram {
        let (m, n) = (self.rows(), self.columns());
        let mut objective = vec![0.0; n + 1];
        objective[n] = 1.0;

        let mut lp = LinearProgram::new(objective);
        for i in 0..m {
            let mut row = self.payoff[i].clone();
            row.push(-1.0);
            lp.add_upper_bound(row, 0.0);
        }

        let mut sum = vec![1.0; n];
        sum.push(0.0);
        lp.add_equality(sum, 1.0);
        lp.bounds[n] = (None, None);
        lp
    }

    /// 纯策略鞍点：所在行的最小值且所在列的最大值
    pub fn saddle_point(&self) -> Option<SaddlePoint> {
        let (m, n) = (self.rows(), self.columns());
        for i in 0..m {
            for j in 0..n {
                let value = self.payoff[i][j];
                let row_min = self.payoff[i].iter().all(|&x| value <= x);
                let column_max = (0..m).all(|k| value >= self.payoff[k][j]);
                if row_min && column_max {
                    return Some(SaddlePoint { row: i, column: j, value });
                }
            }
        }
        None
    }

    /// 有鞍点时不需要线性规划：双方各取鞍点所在的纯策略
    pub fn pure_solution(&self) -> Option<GameSolution> {
        let point = self.saddle_point()?;
        let mut row_strategy = vec![0.0; self.rows()];
        let mut column_strategy = vec![0.0; self.columns()];
        row_strategy[point.row] = 1.0;
        column_strategy[point.column] = 1.0;
        Some(GameSolution {
            row_strategy,
            column_strategy,
            value: point.value,
            row_iterations: 0,
            column_iterations: 0,
        })
    }

    /// 求解两个玩家的最优策略，任一规划失败都返回错误
    pub fn solve<S: LinearProgramSolver + ?Sized>(&self, solver: &S) -> Result<GameSolution> {
        let (m, n) = (self.rows(), self.columns());

        let row = checked_solve(solver, &self.row_player_program(), "行玩家")?;
        let column = checked_solve(solver, &self.column_player_program(), "列玩家")?;

        let value = row.x[m];
        debug!(
            row_value = value,
            column_value = column.x[n],
            "zero-sum game programs solved"
        );

        let solution = GameSolution {
            row_strategy: row.x[..m].to_vec(),
            column_strategy: column.x[..n].to_vec(),
            value,
            row_iterations: row.iterations,
            column_iterations: column.iterations,
        };
        info!(value, advantage = ?solution.advantage(), "zero-sum game solved");
        Ok(solution)
    }
}

fn checked_solve<S: LinearProgramSolver + ?Sized>(
    solver: &S,
    program: &LinearProgram,
    player: &str,
) -> Result<LpSolution> {
    program.validate()?;
    let solution = solver.solve(program).into_result().map_err(|e| match e {
        Error::LpFailure(message) => Error::LpFailure(format!("{}规划: {}", player, message)),
        other => other,
    })?;
    if solution.x.len() != program.num_vars() {
        return Err(Error::LpFailure(format!(
            "{}规划返回 {} 个变量，应为 {}",
            player,
            solution.x.len(),
            program.num_vars()
        )));
    }
    Ok(solution)
}

/// 每个行策略对列玩家最优策略的期望收益
pub fn pure_strategy_payoffs(game: &ZeroSumGame, solution: &GameSolution) -> Vec<f64> {
    game.payoff()
        .iter()
        .map(|row| {
            row.iter()
                .zip(&solution.column_strategy)
                .map(|(a, q)| a * q)
                .sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matching_pennies() -> ZeroSumGame {
        ZeroSumGame::new(vec![vec![1.0, -1.0], vec![-1.0, 1.0]]).unwrap()
    }

    fn ok(x: Vec<f64>, iterations: usize) -> LpSolution {
        LpSolution {
            success: true,
            objective_value: 0.0,
            x,
            iterations,
            message: "Optimization terminated successfully.".to_string(),
        }
    }

    /// 按目标函数最后一项的符号区分两个规划
    fn scripted_solver(
        row: LpSolution,
        column: LpSolution,
    ) -> impl Fn(&LinearProgram) -> LpSolution {
        move |lp: &LinearProgram| {
            if lp.objective[lp.num_vars() - 1] < 0.0 {
                row.clone()
            } else {
                column.clone()
            }
        }
    }

    #[test]
    fn test_rejects_bad_matrices() {
        assert!(matches!(ZeroSumGame::new(Vec::new()), Err(Error::InvalidMatrix(_))));
        assert!(ZeroSumGame::new(vec![Vec::new()]).is_err());
        assert!(ZeroSumGame::new(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn test_row_player_formulation() {
        let game = ZeroSumGame::new(vec![vec![3.0, -1.0, 2.0], vec![0.0, 4.0, 1.0]]).unwrap();
        let lp = game.row_player_program();

        assert_eq!(lp.objective, vec![0.0, 0.0, -1.0]);
        // 每列一条约束，m + 1 个变量
        assert_eq!(lp.a_ub.len(), 3);
        assert!(lp.a_ub.iter().all(|row| row.len() == 3));
        assert_eq!(lp.a_ub[0], vec![-3.0, 0.0, 1.0]);
        assert_eq!(lp.b_ub, vec![0.0; 3]);
        assert_eq!(lp.a_eq, vec![vec![1.0, 1.0, 0.0]]);
        assert_eq!(lp.b_eq, vec![1.0]);
        assert_eq!(lp.bounds[0], (Some(0.0), None));
        assert_eq!(lp.bounds[1], (Some(0.0), None));
        assert_eq!(lp.bounds[2], (None, None));
        assert!(lp.validate().is_ok());
    }

    #[test]
    fn test_column_player_formulation() {
        let game = ZeroSumGame::new(vec![vec![3.0, -1.0, 2.0], vec![0.0, 4.0, 1.0]]).unwrap();
        let lp = game.column_player_program();

        assert_eq!(lp.objective, vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(lp.a_ub.len(), 2);
        assert_eq!(lp.a_ub[1], vec![0.0, 4.0, 1.0, -1.0]);
        assert_eq!(lp.a_eq, vec![vec![1.0, 1.0, 1.0, 0.0]]);
        assert_eq!(lp.bounds[3], (None, None));
    }

    #[test]
    fn test_saddle_point() {
        let game = ZeroSumGame::new(vec![
            vec![4.0, 2.0, 5.0],
            vec![1.0, 0.0, 3.0],
            vec![6.0, 1.0, 2.0],
        ])
        .unwrap();
        assert_eq!(
            game.saddle_point(),
            Some(SaddlePoint {
                row: 0,
                column: 1,
                value: 2.0,
            })
        );
        assert_eq!(matching_pennies().saddle_point(), None);
    }

    #[test]
    fn test_pure_solution_from_saddle_point() {
        let game = ZeroSumGame::new(vec![
            vec![4.0, 2.0, 5.0],
            vec![1.0, 0.0, 3.0],
            vec![6.0, 1.0, 2.0],
        ])
        .unwrap();
        let solution = game.pure_solution().unwrap();

        assert_eq!(solution.row_strategy, vec![1.0, 0.0, 0.0]);
        assert_eq!(solution.column_strategy, vec![0.0, 1.0, 0.0]);
        assert_eq!(solution.value, 2.0);
        assert_eq!(solution.advantage(), Advantage::RowPlayer);
        // 对 B 的纯策略 B2，A1 的期望收益就是博弈值
        assert_eq!(pure_strategy_payoffs(&game, &solution), vec![2.0, 0.0, 1.0]);

        assert!(matching_pennies().pure_solution().is_none());
    }

    #[test]
    fn test_solve_with_scripted_solver() {
        let solver = scripted_solver(ok(vec![0.5, 0.5, 0.0], 4), ok(vec![0.5, 0.5, 0.0], 3));
        let game = matching_pennies();
        let solution = game.solve(&solver).unwrap();

        assert_eq!(solution.row_strategy, vec![0.5, 0.5]);
        assert_eq!(solution.column_strategy, vec![0.5, 0.5]);
        assert_eq!(solution.value, 0.0);
        assert_eq!((solution.row_iterations, solution.column_iterations), (4, 3));
        assert_eq!(solution.advantage(), Advantage::Fair);
        assert_eq!(pure_strategy_payoffs(&game, &solution), vec![0.0, 0.0]);
    }

    #[test]
    fn test_failed_program_is_error() {
        let failed = LpSolution {
            success: false,
            x: Vec::new(),
            objective_value: 0.0,
            iterations: 0,
            message: "The problem is infeasible.".to_string(),
        };

        let solver = scripted_solver(failed.clone(), ok(vec![0.5, 0.5, 0.0], 1));
        match matching_pennies().solve(&solver) {
            Err(Error::LpFailure(message)) => {
                assert_eq!(message, "行玩家规划: The problem is infeasible.")
            }
            other => panic!("expected LpFailure, got {:?}", other),
        }

        // 列玩家失败同样报错，不会返回缺失的策略
        let solver = scripted_solver(ok(vec![0.5, 0.5, 0.0], 1), failed);
        assert!(matches!(matching_pennies().solve(&solver), Err(Error::LpFailure(_))));
    }

    #[test]
    fn test_wrong_solution_length_is_error() {
        let solver = scripted_solver(ok(vec![1.0], 1), ok(vec![0.5, 0.5, 0.0], 1));
        assert!(matches!(matching_pennies().solve(&solver), Err(Error::LpFailure(_))));
    }

    #[test]
    fn test_advantage_thresholds() {
        let mut solution = GameSolution {
            row_strategy: vec![1.0],
            column_strategy: vec![1.0],
            value: 0.5,
            row_iterations: 0,
            column_iterations: 0,
        };
        assert_eq!(solution.advantage(), Advantage::RowPlayer);
        solution.value = -0.5;
        assert_eq!(solution.advantage(), Advantage::ColumnPlayer);
        solution.value = 0.005;
        assert_eq!(solution.advantage(), Advantage::Fair);
    }
}
