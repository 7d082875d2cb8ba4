// ==========================================
// 外呼预测生成系统 - 预测导入 API
// ==========================================
// 职责: 将会话中的修改预测导入劳动力管理平台
// 红线: 必须先生成预测才能导入
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::import_job::ImportJob;
use crate::domain::session::ForecastSession;
use crate::engine::events::OptionalEventSink;
use crate::engine::import_job::{ImportJobRunner, Notification, NotificationClient, WfmImportClient};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

// ==========================================
// ImportApi - 预测导入 API
// ==========================================
pub struct ImportApi {
    runner: ImportJobRunner<ConfigManager, dyn WfmImportClient, dyn NotificationClient>,
}

impl ImportApi {
    pub fn new(
        config: Arc<ConfigManager>,
        wfm: Arc<dyn WfmImportClient>,
        notifications: Arc<dyn NotificationClient>,
        sink: OptionalEventSink,
    ) -> Self {
        Self {
            runner: ImportJobRunner::new(config, wfm, notifications, sink),
        }
    }

    /// 导入修改预测
    ///
    /// # 参数
    /// - session: 会话状态（只读）
    /// - inbox: 通知通道投递的导入通知
    ///
    /// # 返回
    /// - Ok(ImportJob): 终态作业（成功或某些步骤失败）
    /// - Err(ApiError): 未生成预测或配置错误
    pub async fn import_forecast(
        &self,
        session: &ForecastSession,
        inbox: &mut UnboundedReceiver<Notification>,
    ) -> ApiResult<ImportJob> {
        if !session.has_forecast() {
            return Err(ApiError::ForecastNotGenerated);
        }
        let job = self.runner.run(session.modified(), inbox).await?;
        info!(job_id = %job.job_id, outcome = ?job.outcome, "导入请求已处理");
        Ok(job)
    }
}
