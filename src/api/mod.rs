// ==========================================
// 外呼预测生成系统 - API 层
// ==========================================
// 职责: 提供面向界面的业务接口
// ==========================================

pub mod error;
pub mod forecast_api;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use forecast_api::{ForecastApi, ForecastView, IntervalView, PlanningGroupSummary};
pub use import_api::ImportApi;
