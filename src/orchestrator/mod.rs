//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! batch_runner (处理 Vec<AuthorSlot>)
//!     ↓
//! workflow::RecordFlow (处理单个作者)
//!     ↓
//! services (能力层：search / process / 选择门 / 状态表)
//!     ↓
//! clients / infrastructure (HTTP、终端)
//! ```
//!
//! 编排层只做调度和统计，不解释接口响应。

pub mod batch_runner;

pub use batch_runner::{BatchReport, BatchRunner, BusyGuard, TriggerControl};
