// ==========================================
// 外呼预测生成系统 - 核心库
// ==========================================
// 职责: 基于历史外呼数据生成短期预测，支持人工修改并导入劳动力管理平台
// 系统定位: 决策支持（人工最终控制权）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 聚合、计算、修改、导入
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态与上报
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DayScope, ForecastMode, ImportStepKind, MetricSelection, ModificationKind, StepStatus};

// 领域实体
pub use domain::{
    ForecastData, ForecastSession, ForecastSource, ImportJob, ModificationRequest, ModificationSnapshot,
    PlanningGroupForecast, WeekMatrix,
};

// 引擎
pub use engine::{
    ForecastComputer, ForecastGenerator, ImportJobRunner, IntervalAggregator, ModificationEngine,
};

// API
pub use api::{ApiError, ApiResult, ForecastApi, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "外呼预测生成系统";
