// ==========================================
// 外呼预测生成系统 - API层错误类型
// ==========================================
// 职责: 将引擎层错误转换为面向用户的错误消息
// 红线: 每个错误都必须带有明确原因
// ==========================================

use crate::engine::error::ForecastError;
use crate::engine::import_job::ImportJobError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("尚未生成预测，请先执行预测生成")]
    ForecastNotGenerated,

    // ==========================================
    // 计算错误
    // ==========================================
    #[error("预测计算失败: {0}")]
    ComputationError(String),

    // ==========================================
    // 外部协作方错误
    // ==========================================
    #[error("历史数据查询失败: {0}")]
    QueryError(String),

    #[error("预测导入失败: {0}")]
    ImportError(String),

    #[error("功能未配置: {0}")]
    NotConfigured(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ForecastError 转换
// ==========================================
impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::PlanningGroupNotFound(id) => {
                ApiError::NotFound(format!("规划组(id={})不存在", id))
            }
            ForecastError::ForecastMissing(id) => {
                ApiError::NotFound(format!("规划组(id={})没有预测数据", id))
            }
            ForecastError::NoForecastGenerated => ApiError::ForecastNotGenerated,
            err @ (ForecastError::InvalidDay(_)
            | ForecastError::InvalidWeekday(_)
            | ForecastError::IntervalParse { .. }) => ApiError::InvalidInput(err.to_string()),
            err @ (ForecastError::EmptyWindow
            | ForecastError::Shape(_)
            | ForecastError::PreparationOrder { .. }) => ApiError::ComputationError(err.to_string()),
            ForecastError::Query(msg) => ApiError::QueryError(msg),
            err @ ForecastError::Config { .. } => ApiError::ConfigError(err.to_string()),
            ForecastError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportJobError 转换
// ==========================================
impl From<ImportJobError> for ApiError {
    fn from(err: ImportJobError) -> Self {
        match err {
            err @ ImportJobError::Config { .. } => ApiError::ConfigError(err.to_string()),
            err => ApiError::ImportError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
