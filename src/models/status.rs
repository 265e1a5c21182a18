//! 行状态与流程结果

use crate::models::wire::ProcessResponse;
use std::fmt::Display;

/// 界面上显示的状态文案
pub mod labels {
    pub const SEARCHING: &str = "Ricerca autore in corso...";
    pub const AWAITING_CHOICE: &str = "Attesa scelta utente...";
    pub const PROCESSING: &str = "Download e Analisi in corso...";
    pub const COMPLETED: &str = "Completato";
    pub const NO_AUTHOR_FOUND: &str = "Nessun autore Scopus trovato";
    pub const MISMATCH: &str = "Errore: Autori non corrispondenti";
    pub const GENERIC_SERVER_ERROR: &str = "Server Error";
    pub const CONNECTION_ERROR: &str = "Errore di connessione";
    pub const MISSING_INPUT: &str = "Inserisci dati.";
    pub const CHOICE_FAILED: &str = "Scelta autore non riuscita";
}

/// 行的样式类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Loading,
    Success,
    Error,
}

impl StatusClass {
    pub fn is_terminal(self) -> bool {
        !matches!(self, StatusClass::Loading)
    }
}

impl Display for StatusClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            StatusClass::Loading => "loading",
            StatusClass::Success => "success",
            StatusClass::Error => "error",
        };
        f.write_str(text)
    }
}

/// 单条记录流程的最终结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// 处理完成，产物目录可下载
    Success { folder: String },
    /// 搜索没有返回任何候选
    NoCandidateFound,
    /// 后端判定两个数据源的作者不一致
    Mismatch,
    /// 后端返回其他非成功状态
    Error { message: Option<String> },
    /// 请求失败或响应无法解析
    ConnectionError,
}

impl PipelineOutcome {
    /// 解释处理接口的响应
    pub fn from_process_response(response: ProcessResponse) -> Self {
        match response.status.as_str() {
            "success" => match response.folder.filter(|f| !f.trim().is_empty()) {
                Some(folder) => PipelineOutcome::Success { folder },
                None => PipelineOutcome::Error { message: None },
            },
            "mismatch" => PipelineOutcome::Mismatch,
            _ => PipelineOutcome::Error {
                message: response.message.filter(|m| !m.is_empty()),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success { .. })
    }

    pub fn status_class(&self) -> StatusClass {
        if self.is_success() {
            StatusClass::Success
        } else {
            StatusClass::Error
        }
    }

    /// 终态行文案
    pub fn label(&self) -> String {
        match self {
            PipelineOutcome::Success { .. } => labels::COMPLETED.to_string(),
            PipelineOutcome::NoCandidateFound => labels::NO_AUTHOR_FOUND.to_string(),
            PipelineOutcome::Mismatch => labels::MISMATCH.to_string(),
            PipelineOutcome::Error { message } => format!(
                "Errore: {}",
                message.as_deref().unwrap_or(labels::GENERIC_SERVER_ERROR)
            ),
            PipelineOutcome::ConnectionError => labels::CONNECTION_ERROR.to_string(),
        }
    }

    pub fn folder(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Success { folder } => Some(folder),
            _ => None,
        }
    }
}
