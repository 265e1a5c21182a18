//! 状态表 - 业务能力层
//!
//! 持有每条记录对应的显示行，只负责创建、更新、渲染

use crate::models::StatusClass;
use crate::utils::logging::truncate_text;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

static ROW_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// 行标识：创建时间（毫秒）+ 进程内单调序号
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    created_at_ms: i64,
    seq: u64,
}

impl RowKey {
    pub fn next() -> Self {
        Self {
            created_at_ms: chrono::Utc::now().timestamp_millis(),
            seq: ROW_SEQUENCE.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row-{}-{}", self.created_at_ms, self.seq)
    }
}

/// 表中的一行
#[derive(Debug, Clone)]
pub struct RowEntry {
    pub key: RowKey,
    pub name: String,
    pub status_label: String,
    pub status_class: StatusClass,
    pub artifact_folder: Option<String>,
}

impl RowEntry {
    /// 下载链接路径（仅成功行有）
    pub fn retrieval_path(&self) -> Option<String> {
        self.artifact_folder
            .as_ref()
            .map(|folder| format!("/download/zip/{}", folder))
    }

    /// 完整下载链接
    pub fn retrieval_url(&self, base_url: &str) -> Option<String> {
        let base = base_url.trim_end_matches('/');
        self.retrieval_path().map(|path| format!("{}{}", base, path))
    }
}

/// 流程层看到的状态表能力
pub trait StatusTable {
    /// 追加一行，状态为 loading
    fn create_row(&mut self, name: &str, status_label: &str) -> RowKey;

    /// 原地替换状态；`key` 不存在时什么也不做
    fn update_row(
        &mut self,
        key: &RowKey,
        status_label: &str,
        class: StatusClass,
        folder: Option<&str>,
    );

    /// 清空整张表（只在批次开始时调用）
    fn clear(&mut self);
}

/// 内存中的状态表
#[derive(Debug, Default)]
pub struct RowLedger {
    rows: Vec<RowEntry>,
}

impl RowLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[RowEntry] {
        &self.rows
    }

    pub fn get(&self, key: &RowKey) -> Option<&RowEntry> {
        self.rows.iter().find(|row| &row.key == key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 渲染为文本表格
    pub fn render(&self, base_url: &str) -> String {
        let mut out = format!("{:<32} | {:<40} | {}\n", "Autore", "Stato", "Download");
        out.push_str(&"-".repeat(90));
        out.push('\n');
        for row in &self.rows {
            let link = row
                .retrieval_url(base_url)
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "{:<32} | {:<40} | {}\n",
                truncate_text(&row.name, 30),
                truncate_text(&row.status_label, 38),
                link
            ));
        }
        out
    }
}

impl StatusTable for RowLedger {
    fn create_row(&mut self, name: &str, status_label: &str) -> RowKey {
        let key = RowKey::next();
        info!("📋 [{}] {} → {}", key, name, status_label);
        self.rows.push(RowEntry {
            key: key.clone(),
            name: name.to_string(),
            status_label: status_label.to_string(),
            status_class: StatusClass::Loading,
            artifact_folder: None,
        });
        key
    }

    fn update_row(
        &mut self,
        key: &RowKey,
        status_label: &str,
        class: StatusClass,
        folder: Option<&str>,
    ) {
        let Some(row) = self.rows.iter_mut().find(|row| &row.key == key) else {
            debug!("行 {} 不存在，忽略更新", key);
            return;
        };

        row.status_label = status_label.to_string();
        row.status_class = class;
        if let Some(folder) = folder {
            row.artifact_folder = Some(folder.to_string());
        }
        info!("📋 [{}] {} → {} ({})", key, row.name, status_label, class);
    }

    fn clear(&mut self) {
        self.rows.clear();
    }
}
