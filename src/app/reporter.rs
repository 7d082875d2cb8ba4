// ==========================================
// 外呼预测生成系统 - 状态与错误上报
// ==========================================
// 职责: StatusEventSink 的应用层实现
// - LoggingEventSink: 写入日志（命令行）
// - ChannelEventSink: 投递到 mpsc 通道（界面订阅）
// ==========================================

use crate::engine::events::{StatusEvent, StatusEventSink};
use crate::i18n::t;
use std::error::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

/// 将状态事件写入日志
#[derive(Debug, Clone, Default)]
pub struct LoggingEventSink;

impl StatusEventSink for LoggingEventSink {
    fn publish(&self, event: StatusEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        match &event {
            StatusEvent::Progress { message } => info!("{}", message),
            StatusEvent::StepStatus { step, status } => {
                info!(step = %step, status = %status, "{}", t(step.i18n_key()))
            }
            StatusEvent::ImportCompleted {
                forecast_id,
                forecast_url,
            } => info!(forecast_id = %forecast_id, url = %forecast_url, "导入完成"),
            StatusEvent::Error(report) => error!(detail = %report.detail, "{}", report.headline),
        }
        Ok(())
    }
}

/// 将状态事件投递到通道
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: UnboundedSender<StatusEvent>,
}

impl ChannelEventSink {
    /// 创建接收者与对应的事件接收端
    pub fn new() -> (Self, UnboundedReceiver<StatusEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl StatusEventSink for ChannelEventSink {
    fn publish(&self, event: StatusEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.sender
            .send(event)
            .map_err(|e| Box::<dyn Error + Send + Sync>::from(format!("状态事件通道已关闭: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ImportStepKind, StepStatus};
    use crate::engine::events::OptionalEventSink;
    use std::sync::Arc;

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (sink, mut receiver) = ChannelEventSink::new();
        let sink = OptionalEventSink::with_sink(Arc::new(sink));

        sink.step(ImportStepKind::Subscribe, StepStatus::Success);
        sink.report_error("导入失败", "网络超时");

        assert_eq!(
            receiver.try_recv().unwrap(),
            StatusEvent::StepStatus {
                step: ImportStepKind::Subscribe,
                status: StepStatus::Success
            }
        );
        match receiver.try_recv().unwrap() {
            StatusEvent::Error(report) => {
                assert_eq!(report.headline, "导入失败");
                assert_eq!(report.detail, "网络超时");
            }
            other => panic!("意外事件: {:?}", other),
        }
    }

    #[test]
    fn test_channel_sink_closed_receiver_is_error() {
        let (sink, receiver) = ChannelEventSink::new();
        drop(receiver);
        assert!(sink
            .publish(StatusEvent::Progress {
                message: "x".to_string()
            })
            .is_err());
    }

    #[test]
    fn test_logging_sink_accepts_all_events() {
        let sink = LoggingEventSink;
        assert!(sink
            .publish(StatusEvent::Progress {
                message: "查询中".to_string()
            })
            .is_ok());
    }
}
