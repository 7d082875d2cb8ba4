// ==========================================
// 外呼预测生成系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 计算错误只让单次调用失败，不得改动已有状态
// ==========================================

use crate::domain::matrix::MatrixShapeError;
use thiserror::Error;

/// 预测引擎错误类型
#[derive(Error, Debug)]
pub enum ForecastError {
    // ===== 计算错误 =====
    #[error("活动窗口为空: 所选范围内没有非零值")]
    EmptyWindow,

    #[error(transparent)]
    Shape(#[from] MatrixShapeError),

    // ===== 输入错误 =====
    #[error("规划组不存在: {0}")]
    PlanningGroupNotFound(String),

    #[error("规划组尚无预测数据: {0}")]
    ForecastMissing(String),

    #[error("尚未生成预测")]
    NoForecastGenerated,

    #[error("无效的日序号: {0}（有效范围 0-6）")]
    InvalidDay(usize),

    #[error("区间解析失败: {value} ({message})")]
    IntervalParse { value: String, message: String },

    #[error("无效的星期名称: {0}")]
    InvalidWeekday(String),

    #[error("准备步骤 {step} 缺少前置数据: {missing}")]
    PreparationOrder { step: String, missing: String },

    // ===== 外部协作方错误 =====
    #[error("历史数据查询失败: {0}")]
    Query(String),

    #[error("配置读取失败 (key: {key}): {message}")]
    Config { key: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ForecastResult<T> = Result<T, ForecastError>;
