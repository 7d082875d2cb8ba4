// ==========================================
// 外呼预测生成系统 - 应用状态
// ==========================================
// 职责: 持有配置、会话状态与 API 实例，显式传递而非全局单例
// 红线: 生成、修改、导入按调用顺序串行（&mut self 保证）
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::api::{ApiError, ApiResult, ForecastApi, ForecastView, ImportApi};
use crate::config::{default_config_path, ConfigManager};
use crate::domain::forecast::PlanningGroupForecast;
use crate::domain::import_job::ImportJob;
use crate::domain::modification::{ModificationRequest, ModificationSnapshot};
use crate::domain::session::{ForecastSession, ForecastSource};
use crate::domain::types::DayScope;
use crate::engine::events::OptionalEventSink;
use crate::engine::generator::{GenerationSummary, QueryExecutor};
use crate::engine::import_job::{Notification, NotificationClient, WfmImportClient};

/// 应用状态
pub struct AppState {
    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 预测API
    pub forecast_api: Arc<ForecastApi>,

    /// 导入API（未注入导入客户端时为空）
    pub import_api: Option<Arc<ImportApi>>,

    session: ForecastSession,
    sink: OptionalEventSink,
}

impl AppState {
    pub fn new(config: Arc<ConfigManager>, executor: Arc<dyn QueryExecutor>, sink: OptionalEventSink) -> Self {
        tracing::info!("初始化应用状态");
        Self {
            forecast_api: Arc::new(ForecastApi::new(config.clone(), executor, sink.clone())),
            import_api: None,
            config,
            session: ForecastSession::new(),
            sink,
        }
    }

    /// 注入导入所需的外部客户端
    pub fn with_import_clients(
        mut self,
        wfm: Arc<dyn WfmImportClient>,
        notifications: Arc<dyn NotificationClient>,
    ) -> Self {
        self.import_api = Some(Arc::new(ImportApi::new(
            self.config.clone(),
            wfm,
            notifications,
            self.sink.clone(),
        )));
        self
    }

    pub fn session(&self) -> &ForecastSession {
        &self.session
    }

    /// 生成预测
    pub async fn generate(&mut self, planning_groups: Vec<PlanningGroupForecast>) -> ApiResult<GenerationSummary> {
        self.forecast_api.generate(&mut self.session, planning_groups).await
    }

    /// 修改预测
    pub fn modify(&mut self, request: &ModificationRequest) -> ApiResult<ModificationSnapshot> {
        self.forecast_api.modify(&mut self.session, request)
    }

    pub async fn view(&self, source: ForecastSource, planning_group_id: &str, day: DayScope) -> ApiResult<ForecastView> {
        self.forecast_api
            .get_view(&self.session, source, planning_group_id, day)
            .await
    }

    /// 导入修改预测
    pub async fn import(&self, inbox: &mut UnboundedReceiver<Notification>) -> ApiResult<ImportJob> {
        let api = self
            .import_api
            .as_ref()
            .ok_or_else(|| ApiError::NotConfigured("未注入导入客户端".to_string()))?;
        api.import_forecast(&self.session, inbox).await
    }
}

/// 获取默认配置文件路径
///
/// 环境变量 OUTBOUND_FORECAST_CONFIG 优先，其次为用户配置目录
pub fn get_default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("OUTBOUND_FORECAST_CONFIG") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    default_config_path()
}
