//! 线性规划接口
//!
//! 本模块只描述问题和结果，求解器由调用方通过 `LinearProgramSolver` 提供。
//! 约定为最小化问题：min cᵀx，s.t. A_ub·x ≤ b_ub，A_eq·x = b_eq，bounds。

pub mod game;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 变量上下界，`None` 表示无界
pub type Bound = (Option<f64>, Option<f64>);

/// 线性规划问题（最小化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearProgram {
    /// 目标函数系数
    pub objective: Vec<f64>,
    /// 不等式约束矩阵（≤）
    pub a_ub: Vec<Vec<f64>>,
    pub b_ub: Vec<f64>,
    /// 等式约束矩阵
    pub a_eq: Vec<Vec<f64>>,
    pub b_eq: Vec<f64>,
    /// 每个变量的上下界
    pub bounds: Vec<Bound>,
    /// 整数约束标记，`None` 表示全部连续
    pub integrality: Option<Vec<bool>>,
}

impl LinearProgram {
    /// 创建问题，所有变量默认非负
    pub fn new(objective: Vec<f64>) -> Self {
        let n = objective.len();
        Self {
            objective,
            a_ub: Vec::new(),
            b_ub: Vec::new(),
            a_eq: Vec::new(),
            b_eq: Vec::new(),
            bounds: vec![(Some(0.0), None); n],
            integrality: None,
        }
    }

    /// 变量个数
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// 添加 ≤ 约束
    pub fn add_upper_bound(&mut self, row: Vec<f64>, rhs: f64) {
        self.a_ub.push(row);
        self.b_ub.push(rhs);
    }

    /// 添加 ≥ 约束（两边取负转成 ≤）
    pub fn add_lower_bound(&mut self, row: Vec<f64>, rhs: f64) {
        self.a_ub.push(row.into_iter().map(|x| -x).collect());
        self.b_ub.push(-rhs);
    }

    /// 添加等式约束
    pub fn add_equality(&mut self, row: Vec<f64>, rhs: f64) {
        self.a_eq.push(row);
        self.b_eq.push(rhs);
    }

    /// 检查各部分维度是否一致
    pub fn validate(&self) -> Result<()> {
        let n = self.num_vars();
        if n == 0 {
            return Err(Error::InvalidArgument("目标函数没有变量".to_string()));
        }
        if self.a_ub.len() != self.b_ub.len() {
            return Err(Error::InvalidArgument(format!(
                "不等式约束有 {} 行，右端项有 {} 个",
                self.a_ub.len(),
                self.b_ub.len()
            )));
        }
        if self.a_eq.len() != self.b_eq.len() {
            return Err(Error::InvalidArgument(format!(
                "等式约束有 {} 行，右端项有 {} 个",
                self.a_eq.len(),
                self.b_eq.len()
            )));
        }
        for (i, row) in self.a_ub.iter().chain(self.a_eq.iter()).enumerate() {
            if row.len() != n {
                return Err(Error::InvalidArgument(format!(
                    "第 {} 条约束有 {} 个系数，应为 {}",
                    i + 1,
                    row.len(),
                    n
                )));
            }
        }
        if self.bounds.len() != n {
            return Err(Error::InvalidArgument(format!(
                "变量界有 {} 个，应为 {}",
                self.bounds.len(),
                n
            )));
        }
        if let Some(flags) = &self.integrality {
            if flags.len() != n {
                return Err(Error::InvalidArgument(format!(
                    "整数标记有 {} 个，应为 {}",
                    flags.len(),
                    n
                )));
            }
        }
        Ok(())
    }
}

/// 求解结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpSolution {
    pub success: bool,
    /// 最优解
    pub x: Vec<f64>,
    /// 最优目标值（按最小化问题）
    pub objective_value: f64,
    pub iterations: usize,
    /// 求解器给出的状态描述
    pub message: String,
}

impl LpSolution {
    /// 失败的求解转成错误，避免把空结果当成零解
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(Error::LpFailure(self.message))
        }
    }
}

/// 外部线性规划求解器
pub trait LinearProgramSolver {
    fn solve(&self, program: &LinearProgram) -> LpSolution;
}

impl<F> LinearProgramSolver for F
where
    F: Fn(&LinearProgram) -> LpSolution,
{
    fn solve(&self, program: &LinearProgram) -> LpSolution {
        self(program)
    }
}
