// ==========================================
// 外呼预测生成系统 - 周矩阵
// ==========================================
// 红线: 任何周矩阵恒为 7 天 × 96 区间
// 反序列化时校验形状，构造后不可改变维度
// ==========================================

use crate::domain::types::{DAYS_PER_WEEK, INTERVALS_PER_DAY};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 矩阵形状错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixShapeError {
    #[error("矩阵天数错误: 期望 7，实际 {0}")]
    DayCount(usize),

    #[error("区间数错误 (第 {day} 天): 期望 96，实际 {len}")]
    IntervalCount { day: usize, len: usize },

    #[error("日汇总长度错误: 期望 7，实际 {0}")]
    TotalsLength(usize),
}

// ==========================================
// WeekMatrix - 7×96 周矩阵
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct WeekMatrix {
    days: Vec<Vec<f64>>,
}

impl WeekMatrix {
    /// 全零矩阵
    pub fn zeros() -> Self {
        Self {
            days: vec![vec![0.0; INTERVALS_PER_DAY]; DAYS_PER_WEEK],
        }
    }

    /// 从行数据构造（校验形状）
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixShapeError> {
        if rows.len() != DAYS_PER_WEEK {
            return Err(MatrixShapeError::DayCount(rows.len()));
        }
        for (day, row) in rows.iter().enumerate() {
            if row.len() != INTERVALS_PER_DAY {
                return Err(MatrixShapeError::IntervalCount {
                    day,
                    len: row.len(),
                });
            }
        }
        Ok(Self { days: rows })
    }

    /// 按单元格函数构造
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let days = (0..DAYS_PER_WEEK)
            .map(|d| (0..INTERVALS_PER_DAY).map(|i| f(d, i)).collect())
            .collect();
        Self { days }
    }

    pub fn get(&self, day: usize, interval: usize) -> f64 {
        self.days[day][interval]
    }

    pub fn set(&mut self, day: usize, interval: usize, value: f64) {
        self.days[day][interval] = value;
    }

    /// 累加（不覆盖）
    pub fn add(&mut self, day: usize, interval: usize, value: f64) {
        self.days[day][interval] += value;
    }

    pub fn day(&self, day: usize) -> &[f64] {
        &self.days[day]
    }

    /// 单日可变切片（长度固定）
    pub fn day_mut(&mut self, day: usize) -> &mut [f64] {
        &mut self.days[day]
    }

    /// 替换单日数据
    pub fn set_day(&mut self, day: usize, values: Vec<f64>) -> Result<(), MatrixShapeError> {
        if values.len() != INTERVALS_PER_DAY {
            return Err(MatrixShapeError::IntervalCount {
                day,
                len: values.len(),
            });
        }
        self.days[day] = values;
        Ok(())
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.days
    }

    /// 逐单元格变换
    pub fn map<F>(&self, mut f: F) -> WeekMatrix
    where
        F: FnMut(f64) -> f64,
    {
        Self::from_fn(|d, i| f(self.days[d][i]))
    }

    /// 与另一矩阵逐单元格组合
    pub fn zip_with<F>(&self, other: &WeekMatrix, mut f: F) -> WeekMatrix
    where
        F: FnMut(f64, f64) -> f64,
    {
        Self::from_fn(|d, i| f(self.days[d][i], other.days[d][i]))
    }

    /// 与另一矩阵逐单元格相加
    pub fn accumulate(&mut self, other: &WeekMatrix) {
        for (row, other_row) in self.days.iter_mut().zip(other.days.iter()) {
            for (cell, value) in row.iter_mut().zip(other_row.iter()) {
                *cell += value;
            }
        }
    }

    /// 全部单元格之和
    pub fn sum(&self) -> f64 {
        self.days.iter().map(|row| row.iter().sum::<f64>()).sum()
    }

    /// 是否存在非零单元格
    pub fn has_non_zero(&self) -> bool {
        self.days.iter().flatten().any(|v| *v != 0.0)
    }
}

impl Default for WeekMatrix {
    fn default() -> Self {
        Self::zeros()
    }
}

impl TryFrom<Vec<Vec<f64>>> for WeekMatrix {
    type Error = MatrixShapeError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        WeekMatrix::from_rows(rows)
    }
}

impl From<WeekMatrix> for Vec<Vec<f64>> {
    fn from(matrix: WeekMatrix) -> Self {
        matrix.days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_shape() {
        let m = WeekMatrix::zeros();
        assert_eq!(m.rows().len(), DAYS_PER_WEEK);
        assert!(m.rows().iter().all(|r| r.len() == INTERVALS_PER_DAY));
        assert_eq!(m.sum(), 0.0);
        assert!(!m.has_non_zero());
    }

    #[test]
    fn test_from_rows_rejects_bad_shape() {
        let err = WeekMatrix::from_rows(vec![vec![0.0; 96]; 6]).unwrap_err();
        assert_eq!(err, MatrixShapeError::DayCount(6));

        let mut rows = vec![vec![0.0; 96]; 7];
        rows[3] = vec![0.0; 95];
        let err = WeekMatrix::from_rows(rows).unwrap_err();
        assert_eq!(err, MatrixShapeError::IntervalCount { day: 3, len: 95 });
    }

    #[test]
    fn test_add_accumulates() {
        let mut m = WeekMatrix::zeros();
        m.add(1, 0, 5.0);
        m.add(1, 0, 2.5);
        assert_eq!(m.get(1, 0), 7.5);
    }

    #[test]
    fn test_set_day_keeps_shape() {
        let mut m = WeekMatrix::zeros();
        assert!(m.set_day(0, vec![1.0; 10]).is_err());
        assert!(m.set_day(0, vec![1.0; 96]).is_ok());
        assert_eq!(m.sum(), 96.0);
    }

    #[test]
    fn test_serde_validates_shape() {
        let bad = serde_json::to_string(&vec![vec![0.0; 96]; 3]).unwrap();
        assert!(serde_json::from_str::<WeekMatrix>(&bad).is_err());

        let mut m = WeekMatrix::zeros();
        m.set(6, 95, 1.25);
        let json = serde_json::to_string(&m).unwrap();
        let back: WeekMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(6, 95), 1.25);
    }
}
