//! 作者选择门 - 业务能力层
//!
//! 多个候选作者时，挂起调用方，直到操作员确认其中一个。
//!
//! ```text
//! RecordFlow ── choose(candidates) ──> DisambiguationGate ── ChoicePrompt ──> OperatorHandle
//!      ▲                                      │                                   │
//!      └────────── oneshot(Candidate) ◄───────┴──────── select / confirm ◄────────┘
//! ```
//!
//! 每次 `choose` 都会生成新的调用编号和新的一次性 responder，
//! 旧的 responder 直接丢弃，所以旧调用上的确认永远不会落到新调用上。

use crate::error::GateError;
use crate::models::{Candidate, ResolvedIdentity};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// 流程层看到的选择能力
#[async_trait]
pub trait ChoiceGate: Send + Sync {
    /// 挂起直到操作员确认；默认选中第一个候选
    async fn choose(&self, candidates: Vec<Candidate>) -> Result<ResolvedIdentity, GateError>;
}

/// 发给操作员的一次选择请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoicePrompt {
    pub invocation: u64,
    pub candidates: Vec<Candidate>,
}

impl ChoicePrompt {
    /// 预选项
    pub const DEFAULT_INDEX: usize = 0;
}

struct PendingChoice {
    invocation: u64,
    candidates: Vec<Candidate>,
    selected: usize,
    responder: oneshot::Sender<Candidate>,
}

#[derive(Default)]
struct GateState {
    next_invocation: u64,
    pending: Option<PendingChoice>,
}

type SharedState = Arc<Mutex<GateState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, GateState> {
    // 锁内没有会 panic 的逻辑，中毒时沿用内部数据
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 创建一对选择门与操作员句柄
pub fn channel() -> (DisambiguationGate, OperatorHandle) {
    let state: SharedState = Arc::new(Mutex::new(GateState::default()));
    let (prompt_tx, prompt_rx) = mpsc::unbounded_channel();
    (
        DisambiguationGate {
            state: state.clone(),
            prompts: prompt_tx,
        },
        OperatorHandle {
            state,
            prompts: prompt_rx,
        },
    )
}

/// 调用方一侧
#[derive(Clone)]
pub struct DisambiguationGate {
    state: SharedState,
    prompts: mpsc::UnboundedSender<ChoicePrompt>,
}

impl DisambiguationGate {
    /// 当前是否有等待确认的选择
    pub fn is_waiting(&self) -> bool {
        lock(&self.state).pending.is_some()
    }

    fn arm(&self, candidates: Vec<Candidate>) -> Result<oneshot::Receiver<Candidate>, GateError> {
        if candidates.is_empty() {
            return Err(GateError::NoCandidates);
        }

        let (responder, receiver) = oneshot::channel();
        let mut state = lock(&self.state);
        state.next_invocation += 1;
        let invocation = state.next_invocation;

        if let Some(stale) = state.pending.take() {
            debug!("丢弃未确认的选择 #{}", stale.invocation);
        }

        self.prompts
            .send(ChoicePrompt {
                invocation,
                candidates: candidates.clone(),
            })
            .map_err(|_| GateError::OperatorUnavailable)?;

        info!("⏸️ 等待操作员选择作者 #{} ({} 个候选)", invocation, candidates.len());
        state.pending = Some(PendingChoice {
            invocation,
            candidates,
            selected: ChoicePrompt::DEFAULT_INDEX,
            responder,
        });

        Ok(receiver)
    }
}

#[async_trait]
impl ChoiceGate for DisambiguationGate {
    async fn choose(&self, candidates: Vec<Candidate>) -> Result<ResolvedIdentity, GateError> {
        let receiver = self.arm(candidates)?;
        let chosen = receiver.await.map_err(|_| GateError::Superseded)?;
        Ok(ResolvedIdentity::from(chosen))
    }
}

/// 操作员一侧
pub struct OperatorHandle {
    state: SharedState,
    prompts: mpsc::UnboundedReceiver<ChoicePrompt>,
}

impl OperatorHandle {
    /// 等待下一次选择请求；选择门全部释放后返回 `None`
    pub async fn next_prompt(&mut self) -> Option<ChoicePrompt> {
        self.prompts.recv().await
    }

    /// 修改当前选中项
    pub fn select(&self, invocation: u64, index: usize) -> Result<(), GateError> {
        let mut state = lock(&self.state);
        let pending = current(&mut state, invocation)?;
        let max_index = pending.candidates.len() - 1;
        if index > max_index {
            return Err(GateError::IndexOutOfRange { index, max_index });
        }
        pending.selected = index;
        Ok(())
    }

    /// 确认选择，唤醒挂起的调用方
    pub fn confirm(&self, invocation: u64) -> Result<Candidate, GateError> {
        let mut state = lock(&self.state);
        current(&mut state, invocation)?;
        let pending = state.pending.take().ok_or(GateError::NoPendingChoice)?;
        drop(state);

        let chosen = pending.candidates[pending.selected].clone();
        info!("▶️ 操作员确认 #{}: {}", invocation, chosen);
        pending
            .responder
            .send(chosen.clone())
            .map_err(|_| GateError::Superseded)?;
        Ok(chosen)
    }
}

fn current(state: &mut GateState, invocation: u64) -> Result<&mut PendingChoice, GateError> {
    match state.pending.as_mut() {
        Some(pending) if pending.invocation == invocation => Ok(pending),
        Some(_) => Err(GateError::StaleInvocation { invocation }),
        None if invocation <= state.next_invocation => {
            Err(GateError::StaleInvocation { invocation })
        }
        None => Err(GateError::NoPendingChoice),
    }
}
