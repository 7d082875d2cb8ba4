// ==========================================
// 外呼预测生成系统 - 预测修改
// ==========================================
// 职责: 平滑、趋势线、拉平、截断、削峰填谷与重置
// 输入: 会话中的修改预测 + 修改请求
// 输出: 写回后的修改快照
// 红线: 生成预测作为重置基准，永不被修改
// ==========================================

mod core;
pub mod transforms;


pub use core::ModificationEngine;
pub use transforms::{
    extract_subrange, linear_regression, maintain_original_sum, scale_by_day, ActiveWindow,
    FlattenFill, Regression, Transform, DEFAULT_CLIP_PERCENT, FLATTEN_FILL,
};
