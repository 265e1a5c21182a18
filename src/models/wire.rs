//! 后端接口的请求/响应结构
//!
//! 字段名与后端 JSON 保持一致，转换成领域类型在这里完成。

use crate::models::author::{Candidate, InputRecord, ResolvedIdentity};
use serde::{Deserialize, Deserializer, Serialize};

/// `POST /search_scopus` 请求体
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub nome: String,
    pub cognome: String,
    pub id: String,
}

impl From<&InputRecord> for SearchRequest {
    fn from(record: &InputRecord) -> Self {
        Self {
            nome: record.given_name().to_string(),
            cognome: record.family_name().to_string(),
            id: record.external_scholar_id().to_string(),
        }
    }
}

/// `POST /search_scopus` 响应体
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub candidates: Vec<WireCandidate>,
}

impl SearchResponse {
    /// 按原始顺序转换为候选作者列表
    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates.into_iter().map(Candidate::from).collect()
    }
}

/// 响应中的单个候选作者
#[derive(Debug, Clone, Deserialize)]
pub struct WireCandidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aff: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub documents: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl From<WireCandidate> for Candidate {
    fn from(wire: WireCandidate) -> Self {
        Candidate {
            id: wire.id,
            display_name: wire.name,
            affiliation: wire.aff,
            documents: wire.documents,
            city: wire.city,
        }
    }
}

/// `POST /process_author` 请求体
#[derive(Debug, Clone, Serialize)]
pub struct ProcessRequest {
    pub scopus_id: String,
    pub scopus_name: String,
    pub scholar_id: String,
}

impl ProcessRequest {
    pub fn new(identity: &ResolvedIdentity, record: &InputRecord) -> Self {
        Self {
            scopus_id: identity.id.clone(),
            scopus_name: identity.display_name.clone(),
            scholar_id: record.external_scholar_id().to_string(),
        }
    }
}

/// `POST /process_author` 响应体
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProcessResponse {
    pub status: String,
    #[serde(default)]
    pub folder: Option<String>,
    // 后端部分分支使用 "msg"
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
}

impl ProcessResponse {
    pub fn success(folder: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            folder: Some(folder.into()),
            message: None,
        }
    }

    pub fn with_status(status: impl Into<String>, message: Option<&str>) -> Self {
        Self {
            status: status.into(),
            folder: None,
            message: message.map(str::to_string),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
