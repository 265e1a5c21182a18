use crate::error::{AppResult, ConfigError};

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 后端服务地址（search / process / download 共用）
    pub base_url: String,
    /// 作者表单文件（TOML）
    pub authors_file: String,
    /// 表单中的作者槽位数量
    pub max_authors: usize,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            authors_file: "authors.toml".to_string(),
            max_authors: 5,
            output_log_file: "output.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("BASE_URL").unwrap_or(default.base_url),
            authors_file: std::env::var("AUTHORS_FILE").unwrap_or(default.authors_file),
            max_authors: std::env::var("MAX_AUTHORS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_authors),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
        }
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> AppResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl {
                value: self.base_url.clone(),
            }
            .into());
        }
        if self.max_authors == 0 {
            return Err(ConfigError::ZeroSlots.into());
        }
        Ok(())
    }

    /// 去掉末尾斜杠的服务地址
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
