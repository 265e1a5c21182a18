/// 作者后端 API 客户端
///
/// 封装 `/search_scopus` 与 `/process_author` 两个接口的调用逻辑
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{
    Candidate, InputRecord, ProcessRequest, ProcessResponse, ResolvedIdentity, SearchRequest,
    SearchResponse,
};
use crate::services::AuthorService;
use async_trait::async_trait;
use tracing::debug;

const SEARCH_ENDPOINT: &str = "search_scopus";
const PROCESS_ENDPOINT: &str = "process_author";

/// 后端 API 客户端
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: String,
}

impl DashboardClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Self {
        Self::with_client(reqwest::Client::new(), config.base_url_trimmed())
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> AppResult<reqwest::Response> {
        self.http
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))
    }
}

#[async_trait]
impl AuthorService for DashboardClient {
    async fn search(&self, record: &InputRecord) -> AppResult<Vec<Candidate>> {
        let request = SearchRequest::from(record);
        debug!("搜索 Payload: {:?}", request);

        let response = self.post(SEARCH_ENDPOINT, &request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::api_bad_response(SEARCH_ENDPOINT, status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::json_parse_failed(SEARCH_ENDPOINT, e))?;
        debug!("搜索结果: {} 个候选 (status: {:?})", body.candidates.len(), body.status);

        Ok(body.into_candidates())
    }

    async fn process(
        &self,
        identity: &ResolvedIdentity,
        record: &InputRecord,
    ) -> AppResult<ProcessResponse> {
        let request = ProcessRequest::new(identity, record);
        debug!("处理 Payload: {:?}", request);

        // 后端出错时返回 500 + JSON 错误体，这里只看响应体
        let response = self.post(PROCESS_ENDPOINT, &request).await?;
        let http_status = response.status();
        let body: ProcessResponse = response
            .json()
            .await
            .map_err(|e| AppError::json_parse_failed(PROCESS_ENDPOINT, e))?;
        debug!("处理结果 (HTTP {}): {:?}", http_status, body);

        Ok(body)
    }
}
