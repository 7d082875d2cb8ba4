// ==========================================
// 外呼预测生成系统 - 导入任务状态机
// ==========================================
// 职责: 严格顺序执行 5 个导入步骤，上报步骤状态与错误
// 完成路径: 同步（Complete 直接携带预测 ID）/ 异步（Processing + operationId 等待通知）
// 红线: 仅处理 operationId 与当前任务一致的导入主题通知
// 红线: 订阅成功后，任何终态都要断开通知通道
// ==========================================

use super::error::{ImportJobError, ImportJobResult};
use super::payload::{PayloadBuilder, PreparedPayload};
use super::transport::{
    forecast_url, import_topic_id, ImportResultRef, ImportStatus, Notification, NotificationClient,
    UploadUrlResponse, WfmImportClient,
};
use crate::config::ForecastConfigReader;
use crate::domain::forecast::PlanningGroupForecast;
use crate::domain::import_job::{ImportJob, ImportOutcome};
use crate::domain::types::{ImportStepKind, StepStatus};
use crate::engine::events::{OptionalEventSink, StatusEvent};
use crate::i18n::t;
use chrono::Weekday;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, instrument, warn};

/// 单次导入所需的配置
#[derive(Debug, Clone)]
struct ImportSettings {
    business_unit_id: String,
    week_id: String,
    start_day: Weekday,
    description: String,
    channel_id: String,
    import_topic: String,
    region: String,
}

// ==========================================
// ImportJobRunner - 导入任务执行器
// ==========================================
pub struct ImportJobRunner<C, W, N>
where
    C: ForecastConfigReader + ?Sized,
    W: WfmImportClient + ?Sized,
    N: NotificationClient + ?Sized,
{
    config: Arc<C>,
    wfm: Arc<W>,
    notifications: Arc<N>,
    payload: PayloadBuilder,
    sink: OptionalEventSink,
}

impl<C, W, N> ImportJobRunner<C, W, N>
where
    C: ForecastConfigReader + ?Sized,
    W: WfmImportClient + ?Sized,
    N: NotificationClient + ?Sized,
{
    pub fn new(config: Arc<C>, wfm: Arc<W>, notifications: Arc<N>, sink: OptionalEventSink) -> Self {
        Self {
            config,
            wfm,
            notifications,
            payload: PayloadBuilder::new(),
            sink,
        }
    }

    /// 执行一次导入
    ///
    /// # 参数
    /// - `groups`: 修改预测
    /// - `inbox`: 通知通道投递的导入通知
    ///
    /// # 返回
    /// 终态的 ImportJob；仅配置读取失败时返回 Err（此时所有步骤均上报为失败）
    #[instrument(skip(self, groups, inbox), fields(groups = groups.len()))]
    pub async fn run(
        &self,
        groups: &[PlanningGroupForecast],
        inbox: &mut UnboundedReceiver<Notification>,
    ) -> ImportJobResult<ImportJob> {
        for kind in ImportStepKind::ALL {
            self.sink.step(kind, StepStatus::Pending);
        }
        let settings = match self.load_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                error!("导入配置读取失败: {}", e);
                for kind in ImportStepKind::ALL {
                    self.sink.step(kind, StepStatus::Failed);
                }
                self.sink.report_error(t("import.error.config"), e.to_string());
                return Err(e);
            }
        };
        let mut job = ImportJob::new(&settings.business_unit_id, &settings.week_id);
        info!(job_id = %job.job_id, week = %settings.week_id, "导入任务开始");

        // ==========================================
        // 步骤1: 订阅导入通知
        // ==========================================
        let topics = vec![import_topic_id(&settings.business_unit_id, &settings.import_topic)];
        if let Err(e) = self.notifications.subscribe(&settings.channel_id, &topics).await {
            self.fail_step(&mut job, ImportStepKind::Subscribe, ImportJobError::Subscription(e.to_string()));
            // 订阅失败即整体放弃，后续步骤不再执行
            for kind in &ImportStepKind::ALL[1..] {
                job.set_step_status(*kind, StepStatus::Failed);
                self.sink.step(*kind, StepStatus::Failed);
            }
            job.outcome = ImportOutcome::Failed;
            return Ok(job);
        }
        self.succeed_step(&mut job, ImportStepKind::Subscribe);

        // ==========================================
        // 步骤2: 准备导入文件
        // ==========================================
        let payload = match self.payload.prepare(groups, settings.start_day, &settings.description) {
            Ok(payload) => {
                self.succeed_step(&mut job, ImportStepKind::PrepareBody);
                Some(payload)
            }
            Err(e) => {
                self.fail_step(&mut job, ImportStepKind::PrepareBody, e);
                None
            }
        };

        // ==========================================
        // 步骤3: 生成上传地址（文件缺失时按 0 字节申请）
        // ==========================================
        let content_length = payload.as_ref().map_or(0, |p| p.content_length);
        let upload = match self
            .wfm
            .generate_upload_url(&settings.business_unit_id, &settings.week_id, content_length)
            .await
        {
            Ok(upload) => {
                job.upload_key = Some(upload.upload_key.clone());
                self.succeed_step(&mut job, ImportStepKind::GenerateUploadUrl);
                Some(upload)
            }
            Err(e) => {
                self.fail_step(&mut job, ImportStepKind::GenerateUploadUrl, transport(ImportStepKind::GenerateUploadUrl, e));
                None
            }
        };

        // ==========================================
        // 步骤4: 上传文件
        // ==========================================
        match self.upload(upload.as_ref(), payload.as_ref()).await {
            Ok(()) => self.succeed_step(&mut job, ImportStepKind::UploadFile),
            Err(e) => self.fail_step(&mut job, ImportStepKind::UploadFile, e),
        }

        // ==========================================
        // 步骤5: 提交导入
        // ==========================================
        match self.import(&mut job, &settings, upload.as_ref(), inbox).await {
            Ok(result) => self.complete(&mut job, &settings, result),
            Err(e) => self.fail_step(&mut job, ImportStepKind::ImportForecast, e),
        }

        job.outcome = if job.step_status(ImportStepKind::ImportForecast) == StepStatus::Success {
            ImportOutcome::Completed
        } else {
            ImportOutcome::Failed
        };
        self.disconnect().await;

        info!(
            job_id = %job.job_id,
            outcome = ?job.outcome,
            failed_steps = job.failed_steps().len(),
            "导入任务结束"
        );
        Ok(job)
    }

    async fn load_settings(&self) -> ImportJobResult<ImportSettings> {
        let week_start = self
            .config
            .get_week_start()
            .await
            .map_err(|e| config_error("week_start", e))?;

        Ok(ImportSettings {
            business_unit_id: self
                .config
                .get_business_unit_id()
                .await
                .map_err(|e| config_error("business_unit_id", e))?,
            week_id: week_start.format("%Y-%m-%d").to_string(),
            start_day: self
                .config
                .get_start_day_of_week()
                .await
                .map_err(|e| config_error("start_day_of_week", e))?,
            description: self
                .config
                .get_description()
                .await
                .map_err(|e| config_error("description", e))?,
            channel_id: self
                .config
                .get_channel_id()
                .await
                .map_err(|e| config_error("channel_id", e))?,
            import_topic: self
                .config
                .get_import_topic()
                .await
                .map_err(|e| config_error("import_topic", e))?,
            region: self
                .config
                .get_region()
                .await
                .map_err(|e| config_error("region", e))?,
        })
    }

    async fn upload(
        &self,
        upload: Option<&UploadUrlResponse>,
        payload: Option<&PreparedPayload>,
    ) -> ImportJobResult<()> {
        let upload = upload.ok_or(ImportJobError::MissingUploadUrl)?;
        let payload = payload.ok_or(ImportJobError::MissingPayload)?;
        self.wfm
            .upload_file(&upload.url, &upload.headers, &payload.gzip)
            .await
            .map_err(|e| transport(ImportStepKind::UploadFile, e))
    }

    async fn import(
        &self,
        job: &mut ImportJob,
        settings: &ImportSettings,
        upload: Option<&UploadUrlResponse>,
        inbox: &mut UnboundedReceiver<Notification>,
    ) -> ImportJobResult<ImportResultRef> {
        let upload_key = upload
            .map(|u| u.upload_key.as_str())
            .ok_or(ImportJobError::MissingUploadKey)?;
        let response = self
            .wfm
            .import_forecast(&settings.business_unit_id, &settings.week_id, upload_key)
            .await
            .map_err(|e| transport(ImportStepKind::ImportForecast, e))?;

        match response.status {
            ImportStatus::Complete => {
                info!("导入同步完成");
                response.result.ok_or(ImportJobError::MissingResult)
            }
            ImportStatus::Processing => {
                let operation_id = response.operation_id.ok_or_else(|| {
                    ImportJobError::UnexpectedStatus("Processing（缺少 operationId）".to_string())
                })?;
                info!(operation_id = %operation_id, "导入处理中，等待完成通知");
                job.operation_id = Some(operation_id.clone());
                self.await_notification(&settings.import_topic, &operation_id, inbox).await
            }
            ImportStatus::Error => Err(ImportJobError::ImportFailed(
                "导入请求返回 Error 状态".to_string(),
            )),
            ImportStatus::Unknown => Err(ImportJobError::UnexpectedStatus(response.status.to_string())),
        }
    }

    /// 等待与当前任务匹配的完成通知
    async fn await_notification(
        &self,
        import_topic: &str,
        operation_id: &str,
        inbox: &mut UnboundedReceiver<Notification>,
    ) -> ImportJobResult<ImportResultRef> {
        while let Some(notification) = inbox.recv().await {
            if notification.is_heartbeat() {
                continue;
            }
            if !notification.matches(import_topic, operation_id) {
                debug!(topic = %notification.topic_name, "忽略无关通知");
                continue;
            }
            let Some(body) = notification.event_body.as_ref() else {
                continue;
            };

            match body.status {
                ImportStatus::Complete => {
                    return body.result.clone().ok_or(ImportJobError::MissingResult);
                }
                ImportStatus::Error => {
                    let message = notification.user_message().unwrap_or("未知错误");
                    return Err(ImportJobError::ImportFailed(message.to_string()));
                }
                other => debug!(status = %other, "导入状态更新"),
            }
        }
        Err(ImportJobError::ChannelClosed)
    }

    fn complete(&self, job: &mut ImportJob, settings: &ImportSettings, result: ImportResultRef) {
        let url = forecast_url(
            &settings.region,
            &settings.business_unit_id,
            &settings.week_id,
            &result.id,
        );
        info!(forecast_id = %result.id, "预测导入完成");
        job.forecast_id = Some(result.id.clone());
        job.forecast_url = Some(url.clone());
        self.succeed_step(job, ImportStepKind::ImportForecast);
        self.sink.publish(StatusEvent::ImportCompleted {
            forecast_id: result.id,
            forecast_url: url,
        });
    }

    async fn disconnect(&self) {
        if let Err(e) = self.notifications.disconnect().await {
            warn!("通知通道断开失败: {}", e);
        }
    }

    fn succeed_step(&self, job: &mut ImportJob, kind: ImportStepKind) {
        debug!(step = %kind, "步骤成功");
        job.set_step_status(kind, StepStatus::Success);
        self.sink.step(kind, StepStatus::Success);
    }

    fn fail_step(&self, job: &mut ImportJob, kind: ImportStepKind, err: ImportJobError) {
        error!(step = %kind, "导入步骤失败: {}", err);
        job.set_step_status(kind, StepStatus::Failed);
        job.error_message = Some(err.to_string());
        self.sink.step(kind, StepStatus::Failed);
        self.sink.report_error(t(failure_headline_key(kind)), err.to_string());
    }
}

/// 各步骤失败时的提示标题
pub(crate) fn failure_headline_key(kind: ImportStepKind) -> &'static str {
    match kind {
        ImportStepKind::Subscribe => "import.error.subscribe",
        ImportStepKind::PrepareBody => "import.error.prepare_body",
        ImportStepKind::GenerateUploadUrl => "import.error.generate_upload_url",
        ImportStepKind::UploadFile => "import.error.upload_file",
        ImportStepKind::ImportForecast => "import.error.import_forecast",
    }
}

fn transport(step: ImportStepKind, err: Box<dyn Error + Send + Sync>) -> ImportJobError {
    ImportJobError::Transport {
        step,
        message: err.to_string(),
    }
}

fn config_error(key: &str, err: Box<dyn Error + Send + Sync>) -> ImportJobError {
    ImportJobError::Config {
        key: key.to_string(),
        message: err.to_string(),
    }
}
