// ==========================================
// 外呼预测生成系统 - 预测导入任务
// ==========================================
// 职责: 订阅通知 → 准备导入文件 → 生成上传地址 → 上传 → 提交导入
// 输入: 修改预测 + 配置 + 外部传输/通知客户端
// 输出: ImportJob（各步骤状态、预测 ID 与链接）
// 红线: 单步失败只上报并标记，后续步骤照常尝试
// 红线: 订阅失败时整个导入终止，不执行后续步骤
// ==========================================

mod error;
pub mod payload;
mod runner;
pub mod transport;


pub use error::{ImportJobError, ImportJobResult};
pub use payload::{ImportBody, PayloadBuilder, PlanningGroupPayload, PreparedPayload};
pub use runner::ImportJobRunner;
pub use transport::{
    forecast_url, import_topic_id, ImportResponse, ImportResultRef, ImportStatus, Notification,
    NotificationClient, TransportResult, UploadUrlResponse, WfmImportClient,
};
