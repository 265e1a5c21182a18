//! 批量作者处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **表单校验**：只接受三个字段都非空的槽位
//! 2. **严格顺序**：上一位作者进入终态后才开始下一位的搜索
//! 3. **触发控件**：整个批次期间禁用，结束后（无论成败）恢复
//! 4. **状态表**：批次开始时清空，之后只交给流程层更新
//!
//! 顺序执行同时保证了选择门任意时刻最多只有一个待确认的调用。

use crate::models::{collect_valid_records, labels, AuthorSlot, InputRecord, PipelineOutcome};
use crate::services::{RowLedger, StatusTable};
use crate::workflow::{RecordCtx, RecordFlow};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// 触发控件的启用状态
#[derive(Debug, Clone)]
pub struct TriggerControl {
    enabled: Arc<AtomicBool>,
}

impl TriggerControl {
    pub fn new() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// 禁用控件，守卫释放时重新启用
    pub fn disable(&self) -> BusyGuard {
        self.enabled.store(false, Ordering::SeqCst);
        BusyGuard {
            enabled: self.enabled.clone(),
        }
    }
}

impl Default for TriggerControl {
    fn default() -> Self {
        Self::new()
    }
}

/// 批次运行期间持有
#[must_use]
pub struct BusyGuard {
    enabled: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.enabled.store(true, Ordering::SeqCst);
    }
}

/// 批次处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchReport {
    /// 没有任何有效槽位
    MissingInput,
    /// 按输入顺序的每条记录结果
    Completed {
        results: Vec<(InputRecord, PipelineOutcome)>,
    },
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        match self {
            BatchReport::MissingInput => 0,
            BatchReport::Completed { results } => {
                results.iter().filter(|(_, o)| o.is_success()).count()
            }
        }
    }

    pub fn failed_count(&self) -> usize {
        match self {
            BatchReport::MissingInput => 0,
            BatchReport::Completed { results } => results.len() - self.success_count(),
        }
    }

    pub fn total(&self) -> usize {
        self.success_count() + self.failed_count()
    }
}

/// 批量处理器
pub struct BatchRunner<L: StatusTable = RowLedger> {
    flow: RecordFlow,
    ledger: L,
    trigger: TriggerControl,
    max_slots: usize,
}

impl BatchRunner<RowLedger> {
    pub fn new(flow: RecordFlow, max_slots: usize) -> Self {
        Self::with_ledger(flow, RowLedger::new(), max_slots)
    }
}

impl<L: StatusTable> BatchRunner<L> {
    pub fn with_ledger(flow: RecordFlow, ledger: L, max_slots: usize) -> Self {
        Self {
            flow,
            ledger,
            trigger: TriggerControl::new(),
            max_slots,
        }
    }

    /// 使用外部提供的触发控件
    pub fn with_trigger(mut self, trigger: TriggerControl) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// 控件句柄，可用于观察批次是否在运行
    pub fn trigger(&self) -> TriggerControl {
        self.trigger.clone()
    }

    /// 运行一个批次
    pub async fn run(&mut self, slots: &[AuthorSlot]) -> BatchReport {
        if slots.len() > self.max_slots {
            warn!(
                "⚠️ 表单有 {} 个槽位，只处理前 {} 个",
                slots.len(),
                self.max_slots
            );
        }

        let records = collect_valid_records(slots, self.max_slots);
        if records.is_empty() {
            warn!("⚠️ {}", labels::MISSING_INPUT);
            return BatchReport::MissingInput;
        }

        let _busy = self.trigger.disable();
        self.ledger.clear();
        log_batch_start(records.len());

        let total = records.len();
        let mut results = Vec::with_capacity(total);
        for (idx, record) in records.into_iter().enumerate() {
            let ctx = RecordCtx::new(idx + 1, total);
            let outcome = self.flow.run(&mut self.ledger, &record, &ctx).await;
            results.push((record, outcome));
        }

        let report = BatchReport::Completed { results };
        log_batch_complete(&report);
        report
    }
}

// ========== 日志辅助函数 ==========

fn log_batch_start(total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理 {} 位作者（逐个顺序执行）", total);
    info!("{}", "=".repeat(60));
}

fn log_batch_complete(report: &BatchReport) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 批次完成: 成功 {}/{}", report.success_count(), report.total());
    info!("{}", "─".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_reenables_trigger_on_drop() {
        let trigger = TriggerControl::new();
        assert!(trigger.is_enabled());
        {
            let _busy = trigger.disable();
            assert!(!trigger.is_enabled());
        }
        assert!(trigger.is_enabled());
    }

    #[test]
    fn report_counts() {
        let record = AuthorSlot::new("A", "B", "1").validate().unwrap();
        let report = BatchReport::Completed {
            results: vec![
                (
                    record.clone(),
                    PipelineOutcome::Success {
                        folder: "x".to_string(),
                    },
                ),
                (record.clone(), PipelineOutcome::Mismatch),
                (record, PipelineOutcome::ConnectionError),
            ],
        };
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failed_count(), 2);
        assert_eq!(report.total(), 3);
        assert_eq!(BatchReport::MissingInput.total(), 0);
    }
}
