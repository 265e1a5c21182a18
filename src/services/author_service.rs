//! 作者服务能力 - 业务能力层
//!
//! 描述"我能向后端请求什么"，具体的传输由 `clients` 实现

use crate::error::AppResult;
use crate::models::{Candidate, InputRecord, ProcessResponse, ResolvedIdentity};
use async_trait::async_trait;

/// 后端的两个接口：搜索候选作者、处理选定作者
///
/// 返回 `Err` 表示传输失败或响应无法解析；
/// 业务上的失败（mismatch 等）通过 `ProcessResponse::status` 表达。
#[async_trait]
pub trait AuthorService: Send + Sync {
    /// 搜索候选作者，空列表表示没有匹配
    async fn search(&self, record: &InputRecord) -> AppResult<Vec<Candidate>>;

    /// 触发选定作者的下载与合并
    async fn process(
        &self,
        identity: &ResolvedIdentity,
        record: &InputRecord,
    ) -> AppResult<ProcessResponse>;
}
