//! 记录处理上下文
//!
//! 封装"我正在处理本批的第几位作者"这一信息

use std::fmt::Display;

/// 记录处理上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordCtx {
    /// 记录在本批中的序号（从1开始）
    pub record_index: usize,

    /// 本批有效记录总数
    pub total: usize,
}

impl RecordCtx {
    pub fn new(record_index: usize, total: usize) -> Self {
        Self {
            record_index,
            total,
        }
    }
}

impl Display for RecordCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[作者 {}/{}]", self.record_index, self.total)
    }
}
