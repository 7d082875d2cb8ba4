// ==========================================
// Mock 传输/通知/上报实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use outbound_forecast::domain::types::{ImportStepKind, StepStatus};
use outbound_forecast::engine::events::{ErrorReport, StatusEvent, StatusEventSink};
use outbound_forecast::engine::import_job::{
    ImportResponse, ImportResultRef, ImportStatus, NotificationClient, TransportResult,
    UploadUrlResponse, WfmImportClient,
};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ==========================================
// MockWfmClient
// ==========================================

/// 可配置失败点的导入客户端，记录每次调用
pub struct MockWfmClient {
    fail_upload_url: bool,
    fail_upload: bool,
    import_response: Option<ImportResponse>,
    calls: Mutex<Vec<String>>,
    requested_lengths: Mutex<Vec<usize>>,
    uploaded_bytes: Mutex<Vec<usize>>,
}

impl MockWfmClient {
    fn with_response(import_response: Option<ImportResponse>) -> Self {
        Self {
            fail_upload_url: false,
            fail_upload: false,
            import_response,
            calls: Mutex::new(Vec::new()),
            requested_lengths: Mutex::new(Vec::new()),
            uploaded_bytes: Mutex::new(Vec::new()),
        }
    }

    /// 导入同步完成
    pub fn completing(forecast_id: &str) -> Self {
        Self::with_response(Some(ImportResponse {
            status: ImportStatus::Complete,
            operation_id: None,
            result: Some(ImportResultRef {
                id: forecast_id.to_string(),
                self_uri: None,
            }),
        }))
    }

    /// 导入异步处理
    pub fn processing(operation_id: &str) -> Self {
        Self::with_response(Some(ImportResponse {
            status: ImportStatus::Processing,
            operation_id: Some(operation_id.to_string()),
            result: None,
        }))
    }

    /// 导入请求本身失败
    pub fn failing_import() -> Self {
        Self::with_response(None)
    }

    pub fn responding(response: ImportResponse) -> Self {
        Self::with_response(Some(response))
    }

    pub fn failing_upload_url(mut self) -> Self {
        self.fail_upload_url = true;
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn requested_lengths(&self) -> Vec<usize> {
        self.requested_lengths.lock().unwrap().clone()
    }

    pub fn uploaded_bytes(&self) -> Vec<usize> {
        self.uploaded_bytes.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl WfmImportClient for MockWfmClient {
    async fn generate_upload_url(
        &self,
        _business_unit_id: &str,
        _week_id: &str,
        content_length: usize,
    ) -> TransportResult<UploadUrlResponse> {
        self.record("generate_upload_url");
        self.requested_lengths.lock().unwrap().push(content_length);
        if self.fail_upload_url {
            return Err("上传地址服务不可用".into());
        }
        let mut headers = BTreeMap::new();
        headers.insert("Content-Encoding".to_string(), "gzip".to_string());
        Ok(UploadUrlResponse {
            url: "https://upload.example.com/signed".to_string(),
            headers,
            upload_key: "upload-key-1".to_string(),
        })
    }

    async fn upload_file(
        &self,
        _url: &str,
        _headers: &BTreeMap<String, String>,
        payload: &[u8],
    ) -> TransportResult<()> {
        self.record("upload_file");
        if self.fail_upload {
            return Err("上传被拒绝".into());
        }
        self.uploaded_bytes.lock().unwrap().push(payload.len());
        Ok(())
    }

    async fn import_forecast(
        &self,
        _business_unit_id: &str,
        _week_id: &str,
        _upload_key: &str,
    ) -> TransportResult<ImportResponse> {
        self.record("import_forecast");
        self.import_response
            .clone()
            .ok_or_else(|| Box::<dyn Error + Send + Sync>::from("导入服务返回 500"))
    }
}

// ==========================================
// MockNotificationClient
// ==========================================

#[derive(Default)]
pub struct MockNotificationClient {
    fail_subscribe: bool,
    subscribed_topics: Mutex<Vec<String>>,
    disconnects: AtomicUsize,
}

impl MockNotificationClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_subscribe: true,
            ..Self::default()
        }
    }

    pub fn subscribed_topics(&self) -> Vec<String> {
        self.subscribed_topics.lock().unwrap().clone()
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationClient for MockNotificationClient {
    async fn subscribe(&self, _channel_id: &str, topics: &[String]) -> TransportResult<()> {
        if self.fail_subscribe {
            return Err("通知通道未定义".into());
        }
        self.subscribed_topics.lock().unwrap().extend_from_slice(topics);
        Ok(())
    }

    async fn disconnect(&self) -> TransportResult<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ==========================================
// RecordingSink - 记录全部状态事件
// ==========================================

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<StatusEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<ErrorReport> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                StatusEvent::Error(report) => Some(report),
                _ => None,
            })
            .collect()
    }

    /// 某个步骤最后一次上报的状态
    pub fn last_status(&self, kind: ImportStepKind) -> Option<StepStatus> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                StatusEvent::StepStatus { step, status } if step == kind => Some(status),
                _ => None,
            })
            .last()
    }
}

impl StatusEventSink for RecordingSink {
    fn publish(&self, event: StatusEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
