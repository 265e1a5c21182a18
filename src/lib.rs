//! # Author Batch
//!
//! 逐个处理作者：搜索 → （必要时）人工选择 → 下载合并 → 状态表
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure / Clients）
//! - `clients/` - 后端 HTTP 接口（`/search_scopus`、`/process_author`）
//! - `infrastructure/` - 持有终端，负责回答选择请求
//!
//! ### ② 业务能力层（Services）
//! - `AuthorService` - 搜索 / 处理能力
//! - `DisambiguationGate` - 挂起流程直到操作员确认
//! - `RowLedger` - 状态表
//!
//! ### ③ 流程层（Workflow）
//! - `RecordFlow` - 单个作者的流程编排（search → choose → process）
//!
//! ### ④ 编排层（Orchestration）
//! - `BatchRunner` - 表单校验、严格顺序执行、触发控件状态

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AuthorSlot, Candidate, InputRecord, PipelineOutcome, ResolvedIdentity};
pub use orchestrator::{BatchReport, BatchRunner, TriggerControl};
pub use services::{AuthorService, ChoiceGate, DisambiguationGate, RowLedger, StatusTable};
pub use workflow::RecordFlow;
