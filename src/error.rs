use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 选择门错误
    #[error("作者选择错误: {0}")]
    Gate(#[from] GateError),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): code={code}")]
    BadResponse { endpoint: String, code: u16 },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 基础地址无效
    #[error("BASE_URL 无效: '{value}'")]
    InvalidBaseUrl { value: String },
    /// 作者槽位数量无效
    #[error("MAX_AUTHORS 必须大于 0")]
    ZeroSlots,
}

/// 作者选择门错误
///
/// 前三种由 `choose` 的调用方看到，后三种只会出现在操作员一侧。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// 候选列表为空
    #[error("候选作者列表不能为空")]
    NoCandidates,
    /// 操作员通道已关闭
    #[error("操作员界面不可用")]
    OperatorUnavailable,
    /// 本次选择被新的调用替换
    #[error("选择请求已被替换")]
    Superseded,
    /// 操作员提交了过期的选择
    #[error("过期的选择请求 #{invocation}")]
    StaleInvocation { invocation: u64 },
    /// 当前没有待确认的选择
    #[error("当前没有待确认的选择")]
    NoPendingChoice,
    /// 索引超出范围
    #[error("索引 {index} 超出范围 [0, {max_index}]")]
    IndexOutOfRange { index: usize, max_index: usize },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建API错误响应
    pub fn api_bad_response(endpoint: impl Into<String>, code: u16) -> Self {
        AppError::Api(ApiError::BadResponse {
            endpoint: endpoint.into(),
            code,
        })
    }

    /// 创建JSON解析错误
    pub fn json_parse_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return AppError::File(FileError::NotFound { path });
        }
        AppError::File(FileError::ReadFailed { path, source })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
