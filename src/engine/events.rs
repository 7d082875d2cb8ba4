// ==========================================
// 外呼预测生成系统 - 引擎层状态事件
// ==========================================
// 职责: 定义进度/步骤状态/错误上报 trait，实现依赖倒置
// 说明: Engine 层定义 trait，App 层实现适配器（日志、通道）
// ==========================================

use crate::domain::types::{ImportStepKind, StepStatus};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 错误报告（两段式：发生了什么 + 原因）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// 标题：什么失败了
    pub headline: String,
    /// 详情：为什么失败
    pub detail: String,
}

impl ErrorReport {
    pub fn new(headline: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            detail: detail.into(),
        }
    }
}

// ==========================================
// 状态事件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusEvent {
    /// 生成进度消息
    Progress { message: String },
    /// 导入步骤状态变化
    StepStatus {
        step: ImportStepKind,
        status: StepStatus,
    },
    /// 导入完成
    ImportCompleted {
        forecast_id: String,
        forecast_url: String,
    },
    /// 错误报告
    Error(ErrorReport),
}

impl StatusEvent {
    pub fn as_str(&self) -> &str {
        match self {
            StatusEvent::Progress { .. } => "Progress",
            StatusEvent::StepStatus { .. } => "StepStatus",
            StatusEvent::ImportCompleted { .. } => "ImportCompleted",
            StatusEvent::Error(_) => "Error",
        }
    }
}

// ==========================================
// 事件接收 Trait
// ==========================================

/// 状态事件接收者
///
/// Engine 层定义，App 层实现（LoggingEventSink / ChannelEventSink）
pub trait StatusEventSink: Send + Sync {
    fn publish(&self, event: StatusEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作接收者
#[derive(Debug, Clone, Default)]
pub struct NoOpEventSink;

impl StatusEventSink for NoOpEventSink {
    fn publish(&self, event: StatusEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!("NoOpEventSink: 跳过事件 - {}", event.as_str());
        Ok(())
    }
}

/// 可选的事件接收者包装
///
/// 上报失败只记录日志，不影响流水线
#[derive(Clone)]
pub struct OptionalEventSink {
    inner: Option<Arc<dyn StatusEventSink>>,
}

impl OptionalEventSink {
    pub fn with_sink(sink: Arc<dyn StatusEventSink>) -> Self {
        Self { inner: Some(sink) }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    pub fn publish(&self, event: StatusEvent) {
        match &self.inner {
            Some(sink) => {
                let kind = event.as_str().to_string();
                if let Err(e) = sink.publish(event) {
                    tracing::warn!("状态事件上报失败 - {}: {}", kind, e);
                }
            }
            None => {
                tracing::debug!("OptionalEventSink: 未配置接收者，跳过事件 - {}", event.as_str());
            }
        }
    }

    pub fn progress(&self, message: impl Into<String>) {
        self.publish(StatusEvent::Progress {
            message: message.into(),
        });
    }

    pub fn step(&self, step: ImportStepKind, status: StepStatus) {
        self.publish(StatusEvent::StepStatus { step, status });
    }

    pub fn report_error(&self, headline: impl Into<String>, detail: impl Into<String>) {
        self.publish(StatusEvent::Error(ErrorReport::new(headline, detail)));
    }
}

impl Default for OptionalEventSink {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<StatusEvent>>);

    impl StatusEventSink for Collect {
        fn publish(&self, event: StatusEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
            self.0.lock().unwrap().push(event);
            Ok(())
        }
    }

    struct Failing;

    impl StatusEventSink for Failing {
        fn publish(&self, _event: StatusEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
            Err("接收端已关闭".into())
        }
    }

    #[test]
    fn test_optional_sink_none() {
        let sink = OptionalEventSink::none();
        assert!(!sink.is_configured());
        sink.progress("构建查询");
    }

    #[test]
    fn test_optional_sink_forwards_events() {
        let collect = Arc::new(Collect::default());
        let sink = OptionalEventSink::with_sink(collect.clone());
        sink.step(ImportStepKind::Subscribe, StepStatus::Success);
        sink.report_error("导入失败", "网络错误");

        let events = collect.0.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            StatusEvent::Error(ErrorReport::new("导入失败", "网络错误"))
        );
    }

    #[test]
    fn test_failing_sink_does_not_panic() {
        let sink = OptionalEventSink::with_sink(Arc::new(Failing));
        sink.progress("x");
    }

    #[test]
    fn test_event_serialization_tag() {
        let json = serde_json::to_value(StatusEvent::StepStatus {
            step: ImportStepKind::UploadFile,
            status: StepStatus::Failed,
        })
        .unwrap();
        assert_eq!(json["type"], "STEP_STATUS");
        assert_eq!(json["step"], "UPLOAD_FILE");
        assert_eq!(json["status"], "failed");
    }
}
