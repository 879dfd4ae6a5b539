// 配置加载 - 源注册表与搜索参数
//
// 配置文件（默认 config.json）格式：
// {
//   "cache_time": 7200,
//   "api_site": {
//     "ffzy": { "api": "https://api.ffzyapi.com/api.php/provide/vod", "name": "非凡影视" }
//   }
// }
//
// 环境变量可覆盖部分字段：SEARCH_MAX_PAGE、SEARCH_TIMEOUT_SECS、CACHE_TIME

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;

use crate::external::SearchOptions;

/// 默认最大搜索页数
pub const DEFAULT_MAX_PAGES: u32 = 5;

/// 默认单次请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// 默认缓存时间（秒）
pub const DEFAULT_CACHE_TIME: u64 = 600;

/// 配置相关错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("无效的源配置 {key}: {reason}")]
    InvalidSite { key: String, reason: String },
}

/// 单个上游源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSite {
    /// 稳定的源标识
    pub key: String,
    /// 接口基础地址
    pub api: String,
    /// 显示名称
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// 搜索接口约定（所有源共用）
#[derive(Debug, Clone, PartialEq)]
pub struct SearchApiConfig {
    /// 首页搜索路径，后接编码后的关键词
    pub path: String,
    /// 分页搜索路径模板，包含 `{query}` 与 `{page}` 占位符
    pub page_path: String,
    /// 固定请求头
    pub headers: Vec<(String, String)>,
}

impl Default for SearchApiConfig {
    fn default() -> Self {
        Self {
            path: "?ac=videolist&wd=".to_string(),
            page_path: "?ac=videolist&wd={query}&pg={page}".to_string(),
            headers: vec![
                (
                    "User-Agent".to_string(),
                    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36".to_string(),
                ),
                ("Accept".to_string(), "application/json".to_string()),
            ],
        }
    }
}

/// 配置文件中的源条目
#[derive(Debug, Deserialize)]
struct SiteEntry {
    api: String,
    name: String,
    #[serde(default)]
    detail: Option<String>,
}

/// 配置文件结构
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    cache_time: Option<u64>,
    /// 保持文件中的顺序
    #[serde(default)]
    api_site: serde_json::Map<String, serde_json::Value>,
}

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 上游响应缓存时间（秒），0 表示不缓存
    pub cache_time: u64,
    pub sites: Vec<ApiSite>,
    pub search: SearchApiConfig,
    pub max_pages: u32,
    pub timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_time: DEFAULT_CACHE_TIME,
            sites: Vec::new(),
            search: SearchApiConfig::default(),
            max_pages: DEFAULT_MAX_PAGES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// 默认配置文件路径
    const DEFAULT_CONFIG_PATH: &'static str = "config.json";

    /// 从配置文件加载，并应用环境变量覆盖
    ///
    /// # 行为
    /// - 文件不存在：使用默认配置（没有任何源）
    /// - 文件格式错误或源配置无效：返回错误
    pub async fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_path =
            config_path.unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_PATH));

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).await?;
            let config = Self::from_json_str(&content)?;
            tracing::info!(
                "Loaded config from {:?} ({} sources)",
                config_path,
                config.sites.len()
            );
            config
        } else {
            tracing::warn!("配置文件 {:?} 不存在，使用默认配置（无可用源）", config_path);
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// 解析配置文件内容
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(content)?;

        let mut sites = Vec::with_capacity(file.api_site.len());
        for (key, value) in file.api_site {
            let entry: SiteEntry = serde_json::from_value(value)?;
            sites.push(Self::validate_site(key, entry)?);
        }

        Ok(Self {
            cache_time: file.cache_time.unwrap_or(DEFAULT_CACHE_TIME),
            sites,
            ..Self::default()
        })
    }

    /// 应用覆盖项
    ///
    /// `lookup` 通常是环境变量读取；无法解析的值会被忽略
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(max_pages) = lookup("SEARCH_MAX_PAGE").and_then(|v| v.trim().parse::<u32>().ok()) {
            self.max_pages = max_pages.max(1);
        }
        if let Some(secs) = lookup("SEARCH_TIMEOUT_SECS").and_then(|v| v.trim().parse::<u64>().ok()) {
            if secs > 0 {
                self.timeout = Duration::from_secs(secs);
            }
        }
        if let Some(cache_time) = lookup("CACHE_TIME").and_then(|v| v.trim().parse::<u64>().ok()) {
            self.cache_time = cache_time;
        }
    }

    /// 搜索调用使用的参数
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            timeout: self.timeout,
            max_pages: self.max_pages,
        }
    }

    /// 配置文件路径（CONFIG_PATH 环境变量）
    pub fn path_from_env() -> Option<PathBuf> {
        std::env::var("CONFIG_PATH").ok().map(PathBuf::from)
    }

    fn validate_site(key: String, entry: SiteEntry) -> Result<ApiSite, ConfigError> {
        if key.trim().is_empty() {
            return Err(ConfigError::InvalidSite {
                key,
                reason: "key 不能为空".to_string(),
            });
        }

        match url::Url::parse(&entry.api) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            Ok(parsed) => {
                return Err(ConfigError::InvalidSite {
                    key,
                    reason: format!("不支持的协议: {}", parsed.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::InvalidSite {
                    key,
                    reason: format!("api 地址无效: {}", e),
                });
            }
        }

        Ok(ApiSite {
            key,
            api: entry.api,
            name: entry.name,
            detail: entry.detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "cache_time": 7200,
        "api_site": {
            "zeta": { "api": "https://zeta.example/api.php/provide/vod", "name": "Zeta" },
            "alpha": { "api": "http://alpha.example/api", "name": "Alpha", "detail": "http://alpha.example" }
        }
    }"#;

    #[test]
    fn test_parse_preserves_site_order() {
        let config = AppConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.cache_time, 7200);
        let keys: Vec<&str> = config.sites.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(config.sites[1].detail.as_deref(), Some("http://alpha.example"));
        assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_rejects_invalid_api_url() {
        let json = r#"{ "api_site": { "bad": { "api": "not a url", "name": "Bad" } } }"#;
        let err = AppConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSite { ref key, .. } if key == "bad"));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let json = r#"{ "api_site": { "ftp": { "api": "ftp://x.example/", "name": "F" } } }"#;
        assert!(AppConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert!(config.sites.is_empty());
        assert_eq!(config.cache_time, DEFAULT_CACHE_TIME);
    }

    #[test]
    fn test_apply_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SEARCH_MAX_PAGE", "2"),
            ("SEARCH_TIMEOUT_SECS", "3"),
            ("CACHE_TIME", "0"),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.max_pages, 2);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.cache_time, 0);
    }

    #[test]
    fn test_apply_overrides_ignores_garbage() {
        let mut config = AppConfig::default();
        config.apply_overrides(|name| match name {
            "SEARCH_MAX_PAGE" => Some("lots".to_string()),
            "SEARCH_TIMEOUT_SECS" => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_max_pages_floor_is_one() {
        let mut config = AppConfig::default();
        config.apply_overrides(|name| (name == "SEARCH_MAX_PAGE").then(|| "0".to_string()));
        assert_eq!(config.max_pages, 1);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = AppConfig::load(Some(file.path().to_path_buf())).await.unwrap();
        assert_eq!(config.sites.len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(dir.path().join("missing.json"))).await.unwrap();
        assert!(config.sites.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupted_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = AppConfig::load(Some(file.path().to_path_buf())).await.unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
