//! 作者记录处理流程 - 流程层
//!
//! 核心职责：定义"一位作者"的完整处理流程
//!
//! 流程顺序：
//! 1. search → 无候选：结束
//! 2. 一个候选：自动确定；多个候选：挂起等待操作员选择
//! 3. process → success / mismatch / error
//!
//! 任何失败都在这里转换成终态行，不会向上传递。

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::{
    labels, Candidate, InputRecord, PipelineOutcome, ResolvedIdentity, StatusClass,
};
use crate::services::{AuthorService, ChoiceGate, RowKey, StatusTable};
use crate::workflow::record_ctx::RecordCtx;

/// 流程阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    SearchPending,
    NoMatch,
    AutoResolved,
    AwaitingChoice,
    ProcessPending,
    Terminal,
}

/// 作者记录处理流程
///
/// - 不持有状态表，由编排层按引用传入
/// - 只依赖业务能力（services）
pub struct RecordFlow {
    service: Arc<dyn AuthorService>,
    gate: Arc<dyn ChoiceGate>,
}

impl RecordFlow {
    pub fn new(service: Arc<dyn AuthorService>, gate: Arc<dyn ChoiceGate>) -> Self {
        Self { service, gate }
    }

    /// 处理一条记录，返回时行已处于终态
    pub async fn run<L: StatusTable + ?Sized>(
        &self,
        ledger: &mut L,
        record: &InputRecord,
        ctx: &RecordCtx,
    ) -> PipelineOutcome {
        info!("{} 👤 {}", ctx, record);
        let key = ledger.create_row(&record.full_name(), labels::SEARCHING);

        let outcome = self.drive(ledger, &key, record, ctx).await;

        enter(ctx, PipelineStage::Terminal);
        ledger.update_row(&key, &outcome.label(), outcome.status_class(), outcome.folder());
        match &outcome {
            PipelineOutcome::Success { folder } => info!("{} ✓ 处理完成: {}", ctx, folder),
            other => warn!("{} ⚠️ {}", ctx, other.label()),
        }

        outcome
    }

    async fn drive<L: StatusTable + ?Sized>(
        &self,
        ledger: &mut L,
        key: &RowKey,
        record: &InputRecord,
        ctx: &RecordCtx,
    ) -> PipelineOutcome {
        // ========== 阶段 1: 搜索候选作者 ==========
        enter(ctx, PipelineStage::SearchPending);
        let candidates = match self.service.search(record).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("{} ❌ 搜索请求失败: {}", ctx, e);
                return PipelineOutcome::ConnectionError;
            }
        };

        // ========== 阶段 2: 确定作者身份 ==========
        let identity = match self.resolve(ledger, key, candidates, ctx).await {
            Ok(Some(identity)) => identity,
            Ok(None) => return PipelineOutcome::NoCandidateFound,
            Err(outcome) => return outcome,
        };

        // ========== 阶段 3: 下载与合并 ==========
        enter(ctx, PipelineStage::ProcessPending);
        ledger.update_row(key, labels::PROCESSING, StatusClass::Loading, None);
        info!("{} 📤 处理作者: {} ({})", ctx, identity.display_name, identity.id);

        match self.service.process(&identity, record).await {
            Ok(response) => PipelineOutcome::from_process_response(response),
            Err(e) => {
                warn!("{} ❌ 处理请求失败: {}", ctx, e);
                PipelineOutcome::ConnectionError
            }
        }
    }

    async fn resolve<L: StatusTable + ?Sized>(
        &self,
        ledger: &mut L,
        key: &RowKey,
        mut candidates: Vec<Candidate>,
        ctx: &RecordCtx,
    ) -> Result<Option<ResolvedIdentity>, PipelineOutcome> {
        match candidates.len() {
            0 => {
                enter(ctx, PipelineStage::NoMatch);
                Ok(None)
            }
            1 => {
                enter(ctx, PipelineStage::AutoResolved);
                Ok(candidates.pop().map(ResolvedIdentity::from))
            }
            n => {
                enter(ctx, PipelineStage::AwaitingChoice);
                info!("{} 🔍 找到 {} 个候选作者，等待选择", ctx, n);
                ledger.update_row(key, labels::AWAITING_CHOICE, StatusClass::Loading, None);
                self.gate.choose(candidates).await.map(Some).map_err(|e| {
                    warn!("{} ❌ 作者选择失败: {}", ctx, e);
                    // 行上只显示固定文案，具体原因留在日志里
                    PipelineOutcome::Error {
                        message: Some(labels::CHOICE_FAILED.to_string()),
                    }
                })
            }
        }
    }
}

fn enter(ctx: &RecordCtx, stage: PipelineStage) {
    debug!("{} → {:?}", ctx, stage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult, GateError};
    use crate::models::{AuthorSlot, ProcessResponse};
    use crate::services::{disambiguation_gate, RowLedger};
    use async_trait::async_trait;
    use std::sync::Mutex;

    enum SearchScript {
        Candidates(Vec<Candidate>),
        Fail,
    }

    enum ProcessScript {
        Respond(ProcessResponse),
        Fail,
    }

    struct MockService {
        search: SearchScript,
        process: ProcessScript,
        process_calls: Mutex<Vec<ResolvedIdentity>>,
    }

    impl MockService {
        fn new(search: SearchScript, process: ProcessScript) -> Self {
            Self {
                search,
                process,
                process_calls: Mutex::new(Vec::new()),
            }
        }

        fn process_calls(&self) -> Vec<ResolvedIdentity> {
            self.process_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AuthorService for MockService {
        async fn search(&self, _record: &InputRecord) -> AppResult<Vec<Candidate>> {
            match &self.search {
                SearchScript::Candidates(c) => Ok(c.clone()),
                SearchScript::Fail => Err(AppError::api_bad_response("search_scopus", 500)),
            }
        }

        async fn process(
            &self,
            identity: &ResolvedIdentity,
            _record: &InputRecord,
        ) -> AppResult<ProcessResponse> {
            self.process_calls.lock().unwrap().push(identity.clone());
            match &self.process {
                ProcessScript::Respond(r) => Ok(r.clone()),
                ProcessScript::Fail => Err(AppError::api_bad_response("process_author", 502)),
            }
        }
    }

    struct MockGate {
        pick: usize,
        invocations: Mutex<Vec<Vec<Candidate>>>,
    }

    impl MockGate {
        fn picking(pick: usize) -> Self {
            Self {
                pick,
                invocations: Mutex::new(Vec::new()),
            }
        }

        fn invocations(&self) -> Vec<Vec<Candidate>> {
            self.invocations.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChoiceGate for MockGate {
        async fn choose(&self, candidates: Vec<Candidate>) -> Result<ResolvedIdentity, GateError> {
            self.invocations.lock().unwrap().push(candidates.clone());
            Ok(ResolvedIdentity::from(candidates[self.pick].clone()))
        }
    }

    /// 记录每一次行变更
    #[derive(Default)]
    struct RecordingLedger {
        inner: RowLedger,
        updates: Vec<(String, StatusClass)>,
    }

    impl StatusTable for RecordingLedger {
        fn create_row(&mut self, name: &str, status_label: &str) -> RowKey {
            self.updates.push((status_label.to_string(), StatusClass::Loading));
            self.inner.create_row(name, status_label)
        }

        fn update_row(
            &mut self,
            key: &RowKey,
            status_label: &str,
            class: StatusClass,
            folder: Option<&str>,
        ) {
            self.updates.push((status_label.to_string(), class));
            self.inner.update_row(key, status_label, class, folder);
        }

        fn clear(&mut self) {
            self.inner.clear();
        }
    }

    fn record() -> InputRecord {
        AuthorSlot::new("A", "B", "123").validate().unwrap()
    }

    fn abc() -> Vec<Candidate> {
        vec![
            Candidate::new("a", "A", "Uni A"),
            Candidate::new("b", "B", "Uni B"),
            Candidate::new("c", "C", "Uni C"),
        ]
    }

    fn flow(service: &Arc<MockService>, gate: &Arc<MockGate>) -> RecordFlow {
        RecordFlow::new(service.clone(), gate.clone())
    }

    #[tokio::test]
    async fn no_candidates_ends_with_error_and_no_process_call() {
        let service = Arc::new(MockService::new(
            SearchScript::Candidates(Vec::new()),
            ProcessScript::Respond(ProcessResponse::success("never")),
        ));
        let gate = Arc::new(MockGate::picking(0));
        let mut ledger = RowLedger::new();

        let outcome = flow(&service, &gate)
            .run(&mut ledger, &record(), &RecordCtx::new(1, 1))
            .await;

        assert_eq!(outcome, PipelineOutcome::NoCandidateFound);
        assert!(service.process_calls().is_empty());
        assert!(gate.invocations().is_empty());
        let row = &ledger.rows()[0];
        assert_eq!(row.name, "A B");
        assert_eq!(row.status_class, StatusClass::Error);
        assert_eq!(row.status_label, labels::NO_AUTHOR_FOUND);
    }

    #[tokio::test]
    async fn single_candidate_skips_the_gate() {
        let service = Arc::new(MockService::new(
            SearchScript::Candidates(vec![Candidate::new("9", "A B", "X")]),
            ProcessScript::Respond(ProcessResponse::success("out1")),
        ));
        let gate = Arc::new(MockGate::picking(0));
        let mut ledger = RowLedger::new();

        let outcome = flow(&service, &gate)
            .run(&mut ledger, &record(), &RecordCtx::new(1, 1))
            .await;

        assert!(gate.invocations().is_empty());
        assert_eq!(
            service.process_calls(),
            vec![ResolvedIdentity {
                id: "9".to_string(),
                display_name: "A B".to_string()
            }]
        );
        assert_eq!(
            outcome,
            PipelineOutcome::Success {
                folder: "out1".to_string()
            }
        );
        let row = &ledger.rows()[0];
        assert_eq!(row.status_class, StatusClass::Success);
        assert_eq!(row.retrieval_path().as_deref(), Some("/download/zip/out1"));
    }

    #[tokio::test]
    async fn multiple_candidates_go_through_the_gate_in_order() {
        let service = Arc::new(MockService::new(
            SearchScript::Candidates(abc()),
            ProcessScript::Respond(ProcessResponse::success("out-b")),
        ));
        let gate = Arc::new(MockGate::picking(1));
        let mut ledger = RecordingLedger::default();

        let outcome = flow(&service, &gate)
            .run(&mut ledger, &record(), &RecordCtx::new(1, 1))
            .await;

        assert_eq!(gate.invocations(), vec![abc()]);
        assert_eq!(service.process_calls()[0].id, "b");
        assert!(outcome.is_success());

        let labels_seen: Vec<&str> = ledger.updates.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(
            labels_seen,
            vec![
                labels::SEARCHING,
                labels::AWAITING_CHOICE,
                labels::PROCESSING,
                labels::COMPLETED
            ]
        );
        let terminal_updates = ledger.updates.iter().filter(|(_, c)| c.is_terminal()).count();
        assert_eq!(terminal_updates, 1);
    }

    #[tokio::test]
    async fn immediate_confirm_with_real_gate_resolves_first_candidate() {
        let service = Arc::new(MockService::new(
            SearchScript::Candidates(abc()),
            ProcessScript::Respond(ProcessResponse::success("out-a")),
        ));
        let (gate, mut operator) = disambiguation_gate::channel();
        let operator_task = tokio::spawn(async move {
            let prompt = operator.next_prompt().await.unwrap();
            operator.confirm(prompt.invocation).unwrap();
        });

        let flow = RecordFlow::new(service.clone(), Arc::new(gate));
        let mut ledger = RowLedger::new();
        let outcome = flow.run(&mut ledger, &record(), &RecordCtx::new(1, 1)).await;
        operator_task.await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(service.process_calls()[0].id, "a");
    }

    #[tokio::test]
    async fn search_failure_is_a_connection_error() {
        let service = Arc::new(MockService::new(
            SearchScript::Fail,
            ProcessScript::Respond(ProcessResponse::success("never")),
        ));
        let gate = Arc::new(MockGate::picking(0));
        let mut ledger = RowLedger::new();

        let outcome = flow(&service, &gate)
            .run(&mut ledger, &record(), &RecordCtx::new(1, 1))
            .await;

        assert_eq!(outcome, PipelineOutcome::ConnectionError);
        assert!(service.process_calls().is_empty());
        assert_eq!(ledger.rows()[0].status_label, labels::CONNECTION_ERROR);
    }

    #[tokio::test]
    async fn process_failure_is_a_connection_error() {
        let service = Arc::new(MockService::new(
            SearchScript::Candidates(vec![Candidate::new("9", "A B", "X")]),
            ProcessScript::Fail,
        ));
        let gate = Arc::new(MockGate::picking(0));
        let mut ledger = RowLedger::new();

        let outcome = flow(&service, &gate)
            .run(&mut ledger, &record(), &RecordCtx::new(1, 1))
            .await;

        assert_eq!(outcome, PipelineOutcome::ConnectionError);
        assert_eq!(ledger.rows()[0].status_class, StatusClass::Error);
    }

    #[tokio::test]
    async fn mismatch_and_service_error_rows_differ() {
        let gate = Arc::new(MockGate::picking(0));
        let single = || SearchScript::Candidates(vec![Candidate::new("9", "A B", "X")]);

        let mismatch = Arc::new(MockService::new(
            single(),
            ProcessScript::Respond(ProcessResponse::with_status("mismatch", None)),
        ));
        let failing = Arc::new(MockService::new(
            single(),
            ProcessScript::Respond(ProcessResponse::with_status("error", Some("X"))),
        ));

        let mut ledger = RowLedger::new();
        flow(&mismatch, &gate)
            .run(&mut ledger, &record(), &RecordCtx::new(1, 2))
            .await;
        flow(&failing, &gate)
            .run(&mut ledger, &record(), &RecordCtx::new(2, 2))
            .await;

        let rows = ledger.rows();
        assert_eq!(rows[0].status_label, labels::MISMATCH);
        assert_eq!(rows[1].status_label, "Errore: X");
        assert_ne!(rows[0].status_label, rows[1].status_label);
    }

    #[tokio::test]
    async fn gate_failure_shows_operator_label() {
        let service = Arc::new(MockService::new(
            SearchScript::Candidates(abc()),
            ProcessScript::Respond(ProcessResponse::success("never")),
        ));
        let (gate, operator) = disambiguation_gate::channel();
        drop(operator);

        let flow = RecordFlow::new(service.clone(), Arc::new(gate));
        let mut ledger = RowLedger::new();
        let outcome = flow.run(&mut ledger, &record(), &RecordCtx::new(1, 1)).await;

        assert_eq!(
            outcome,
            PipelineOutcome::Error {
                message: Some(labels::CHOICE_FAILED.to_string())
            }
        );
        assert!(service.process_calls().is_empty());
        let row = &ledger.rows()[0];
        assert_eq!(row.status_class, StatusClass::Error);
        assert_eq!(row.status_label, "Errore: Scelta autore non riuscita");
        assert!(!row.status_label.contains("操作员"));
    }
}
