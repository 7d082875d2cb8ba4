// ==========================================
// 外呼预测生成系统 - 导入任务错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::ImportStepKind;
use thiserror::Error;

/// 导入任务错误类型
#[derive(Error, Debug)]
pub enum ImportJobError {
    // ===== 订阅 =====
    #[error("通知订阅失败: {0}")]
    Subscription(String),

    // ===== 导入文件 =====
    #[error("导入文件序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("导入文件压缩失败: {0}")]
    Compress(#[from] std::io::Error),

    // ===== 外部调用 =====
    #[error("{step} 请求失败: {message}")]
    Transport { step: ImportStepKind, message: String },

    // ===== 前序步骤未产出 =====
    #[error("缺少上传地址: 生成上传地址步骤未成功")]
    MissingUploadUrl,

    #[error("缺少导入文件: 准备导入文件步骤未成功")]
    MissingPayload,

    #[error("缺少上传键: 生成上传地址步骤未成功")]
    MissingUploadKey,

    // ===== 导入结果 =====
    #[error("导入失败: {0}")]
    ImportFailed(String),

    #[error("导入返回了未预期的状态: {0}")]
    UnexpectedStatus(String),

    #[error("导入已完成但响应中缺少预测结果")]
    MissingResult,

    #[error("通知通道已关闭，未收到导入结果")]
    ChannelClosed,

    #[error("配置读取失败 (key: {key}): {message}")]
    Config { key: String, message: String },
}

/// Result 类型别名
pub type ImportJobResult<T> = Result<T, ImportJobError>;
