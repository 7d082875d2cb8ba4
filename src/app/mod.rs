// ==========================================
// 外呼预测生成系统 - 应用层
// ==========================================
// 职责: 组装配置、会话与 API，提供状态/错误上报实现
// ==========================================

pub mod reporter;
pub mod state;

// 重导出
pub use reporter::{ChannelEventSink, LoggingEventSink};
pub use state::{get_default_config_path, AppState};
