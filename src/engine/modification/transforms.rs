// ==========================================
// 外呼预测生成系统 - 活动窗口变换
// ==========================================
// 职责: 平滑、趋势线、拉平、截断、削峰填谷，以及总量守恒与按日缩放
// 红线: 只改动活动窗口（首个到末个非零值之间）内的非零位置
// 红线: 窗口为空时返回 EmptyWindow，绝不对长度 0 做除法
// ==========================================

use crate::domain::matrix::{MatrixShapeError, WeekMatrix};
use crate::domain::types::{ModificationKind, DAYS_PER_WEEK};
use crate::engine::error::{ForecastError, ForecastResult};
use std::ops::RangeInclusive;

// ==========================================
// 拉平取值方式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlattenFill {
    /// 每个非零位置取窗口总量（现行行为）
    WindowTotal,
    /// 每个非零位置取窗口总量 / 非零位置数
    WindowAverage,
}

/// 拉平时采用的取值方式
pub const FLATTEN_FILL: FlattenFill = FlattenFill::WindowTotal;

/// 截断的默认百分比
pub const DEFAULT_CLIP_PERCENT: f64 = 0.1;

// ==========================================
// 活动窗口
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow {
    /// 首个非零下标
    pub start: usize,
    /// 末个非零下标（含）
    pub end: usize,
}

impl ActiveWindow {
    /// 窗口宽度（至少为 1）
    pub fn width(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn range(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// 提取活动窗口；没有非零值时返回 None
pub fn extract_subrange(data: &[f64]) -> Option<ActiveWindow> {
    let start = data.iter().position(|v| *v != 0.0)?;
    let end = data.iter().rposition(|v| *v != 0.0)?;
    Some(ActiveWindow { start, end })
}

fn require_window(data: &[f64]) -> ForecastResult<ActiveWindow> {
    extract_subrange(data).ok_or(ForecastError::EmptyWindow)
}

// ==========================================
// 变换
// ==========================================

/// 窗口变换（不含重置）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Smooth,
    Trendline,
    Flatten,
    Clip { percent: f64 },
    Normalize,
}

impl Transform {
    /// 由修改操作得到变换；重置没有对应变换
    pub fn from_kind(kind: ModificationKind) -> Option<Transform> {
        match kind {
            ModificationKind::Smooth => Some(Transform::Smooth),
            ModificationKind::Trendline => Some(Transform::Trendline),
            ModificationKind::Flatten => Some(Transform::Flatten),
            ModificationKind::Clip { percent } => Some(Transform::Clip { percent }),
            ModificationKind::Normalize => Some(Transform::Normalize),
            ModificationKind::Reset => None,
        }
    }

    pub fn apply(&self, data: &[f64]) -> ForecastResult<Vec<f64>> {
        match self {
            Transform::Smooth => smooth(data),
            Transform::Trendline => trendline(data),
            Transform::Flatten => flatten(data),
            Transform::Clip { percent } => clip(data, *percent),
            Transform::Normalize => normalize(data),
        }
    }
}

/// 平滑：窗口内三点移动平均（窗口两端为两点），结果不小于 0
///
/// 原值为 0 的位置保持 0；邻居取变换前的值
pub fn smooth(data: &[f64]) -> ForecastResult<Vec<f64>> {
    let window = require_window(data)?;
    let mut result = data.to_vec();
    if window.width() == 1 {
        return Ok(result);
    }

    let sub = &data[window.range()];
    let last = sub.len() - 1;
    for (i, value) in sub.iter().enumerate() {
        if *value == 0.0 {
            continue;
        }
        let averaged = if i == 0 {
            (value + sub[1]) / 2.0
        } else if i == last {
            (sub[i - 1] + value) / 2.0
        } else {
            (sub[i - 1] + value + sub[i + 1]) / 3.0
        };
        result[window.start + i] = averaged.max(0.0);
    }
    Ok(result)
}

/// 最小二乘拟合结果 y = slope·x + intercept
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
}

impl Regression {
    pub fn at(&self, x: usize) -> f64 {
        self.slope * x as f64 + self.intercept
    }
}

/// 对窗口内 (下标, 值) 做普通最小二乘
///
/// 窗口只有一个点时斜率为 0，截距为该点的值
pub fn linear_regression(data: &[f64], window: ActiveWindow) -> Regression {
    let n = window.width() as f64;
    let (mut x_sum, mut y_sum, mut xy_sum, mut x_sq_sum) = (0.0, 0.0, 0.0, 0.0);
    for i in window.range() {
        let x = i as f64;
        let y = data[i];
        x_sum += x;
        y_sum += y;
        xy_sum += x * y;
        x_sq_sum += x * x;
    }

    let denominator = n * x_sq_sum - x_sum * x_sum;
    let slope = if denominator == 0.0 {
        0.0
    } else {
        (n * xy_sum - x_sum * y_sum) / denominator
    };
    Regression {
        slope,
        intercept: (y_sum - slope * x_sum) / n,
    }
}

/// 趋势线：非零位置替换为拟合值
pub fn trendline(data: &[f64]) -> ForecastResult<Vec<f64>> {
    let window = require_window(data)?;
    let fit = linear_regression(data, window);
    let mut result = data.to_vec();
    for i in window.range() {
        if data[i] != 0.0 {
            result[i] = fit.at(i);
        }
    }
    Ok(result)
}

/// 拉平（按 FLATTEN_FILL）
pub fn flatten(data: &[f64]) -> ForecastResult<Vec<f64>> {
    flatten_with(data, FLATTEN_FILL)
}

/// 拉平：非零位置替换为同一常数
pub fn flatten_with(data: &[f64], fill: FlattenFill) -> ForecastResult<Vec<f64>> {
    let window = require_window(data)?;
    let sub = &data[window.range()];
    let total: f64 = sub.iter().sum();
    let constant = match fill {
        FlattenFill::WindowTotal => total,
        FlattenFill::WindowAverage => {
            let non_zero = sub.iter().filter(|v| **v != 0.0).count();
            total / non_zero as f64
        }
    };
    Ok(map_non_zero(data, window, |_| constant))
}

/// 动态截断：钳制到 [min + p·range, max − p·range]
///
/// 极值只取窗口内的非零值；百分比限定在 [0, 0.5]，非有限值按默认百分比处理
pub fn clip(data: &[f64], percent: f64) -> ForecastResult<Vec<f64>> {
    let window = require_window(data)?;
    let percent = if percent.is_finite() {
        percent.clamp(0.0, 0.5)
    } else {
        DEFAULT_CLIP_PERCENT
    };

    let values: Vec<f64> = data[window.range()].iter().copied().filter(|v| *v != 0.0).collect();
    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let min = values.iter().copied().fold(f64::MAX, f64::min);
    let range = max - min;
    let lower = min + percent * range;
    let upper = (max - percent * range).max(lower);
    Ok(map_non_zero(data, window, |v| v.clamp(lower, upper)))
}

/// IQR 削峰填谷：钳制到 [max(0, q1 − 1.5·iqr), q3 + 1.5·iqr]
pub fn normalize(data: &[f64]) -> ForecastResult<Vec<f64>> {
    let window = require_window(data)?;
    let mut sorted: Vec<f64> = data[window.range()].iter().copied().filter(|v| *v != 0.0).collect();
    sorted.sort_by(f64::total_cmp);

    let q1 = sorted[sorted.len() / 4];
    let q3 = sorted[sorted.len() * 3 / 4];
    let iqr = q3 - q1;
    let upper = q3 + 1.5 * iqr;
    let lower = (q1 - 1.5 * iqr).max(0.0).min(upper);
    Ok(map_non_zero(data, window, |v| v.clamp(lower, upper)))
}

fn map_non_zero<F>(data: &[f64], window: ActiveWindow, mut f: F) -> Vec<f64>
where
    F: FnMut(f64) -> f64,
{
    let mut result = data.to_vec();
    for i in window.range() {
        if data[i] != 0.0 {
            result[i] = f(data[i]);
        }
    }
    result
}

// ==========================================
// 总量守恒与按日缩放
// ==========================================

/// 等比缩放使总量回到 original_sum；变换后总量为 0 时原样返回
pub fn maintain_original_sum(values: &[f64], original_sum: f64) -> Vec<f64> {
    let modified_sum: f64 = values.iter().sum();
    if modified_sum == 0.0 {
        return values.to_vec();
    }
    values
        .iter()
        .map(|v| v * original_sum / modified_sum)
        .collect()
}

/// 按新的日汇总等比缩放每天的 96 区间；原日汇总为 0 的天保持不变
pub fn scale_by_day(original: &WeekMatrix, modified_totals: &[f64]) -> ForecastResult<WeekMatrix> {
    if modified_totals.len() != DAYS_PER_WEEK {
        return Err(MatrixShapeError::TotalsLength(modified_totals.len()).into());
    }

    let mut scaled = original.clone();
    for (day, target) in modified_totals.iter().enumerate() {
        let original_total: f64 = original.day(day).iter().sum();
        if original_total == 0.0 {
            continue;
        }
        for value in scaled.day_mut(day).iter_mut() {
            *value = *value * target / original_total;
        }
    }
    Ok(scaled)
}
