use crate::error::{AppError, AppResult, FileError};
use crate::models::author::AuthorSlot;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 作者表单文件结构
///
/// ```toml
/// [[authors]]
/// nome = "Mario"
/// cognome = "Rossi"
/// scholar_id = "AbCdEf123"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct AuthorForm {
    #[serde(default)]
    pub authors: Vec<AuthorSlot>,
}

/// 解析表单内容
pub fn parse_author_form(content: &str, origin: &str) -> AppResult<Vec<AuthorSlot>> {
    let form: AuthorForm = toml::from_str(content).map_err(|source| {
        AppError::File(FileError::TomlParseFailed {
            path: origin.to_string(),
            source,
        })
    })?;
    Ok(form.authors)
}

/// 从 TOML 文件加载作者槽位
pub async fn load_author_form(path: &Path) -> AppResult<Vec<AuthorSlot>> {
    let origin = path.display().to_string();
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(origin.clone(), e))?;

    let slots = parse_author_form(&content, &origin)?;
    tracing::info!("正在加载: {} ({} 个槽位)", origin, slots.len());

    Ok(slots)
}
