//! 配置管理器
//!
//! 提供统一的配置接口，支持配置文件（TOML/JSON）、`.env`、环境变量和默认值，
//! 优先级：环境变量 > 配置文件 > 默认值

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{
    NamepackError, NamepackOptions, NamepackResult, DEFAULT_PROXY_URL, DEFAULT_STV_API_HOST,
    DEFAULT_TIMEOUT_SECS, DEFAULT_WIKIDICH_ELEMENT_ID,
};
use crate::env::EnvConfig;

/// 配置文件搜索路径
pub const CONFIG_PATHS: &[&str] = &[
    "./namepack.toml",
    "./namepack.json",
    "~/.config/namepack/config.toml",
];

const ENV_FILES: &[&str] = &[".env.local", ".env"];

pub const MAX_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_WEB_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_WEB_PORT: u16 = 7080;

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NamepackConfig {
    // 抓取配置
    pub proxy_url: String,
    pub stv_api_host: String,
    pub wikidich_element_id: String,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,

    // 输出配置
    pub output_dir: String,

    // Web配置
    pub web_bind_address: String,
    pub web_port: u16,
}

impl Default for NamepackConfig {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            stv_api_host: DEFAULT_STV_API_HOST.to_string(),
            wikidich_element_id: DEFAULT_WIKIDICH_ELEMENT_ID.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            output_dir: ".".to_string(),
            web_bind_address: DEFAULT_WEB_BIND_ADDRESS.to_string(),
            web_port: DEFAULT_WEB_PORT,
        }
    }
}

impl NamepackConfig {
    /// 验证配置
    pub fn validate(&self) -> NamepackResult<()> {
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(NamepackError::ConfigError(format!(
                "timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}, got {}",
                self.timeout_secs
            )));
        }
        for (name, value) in [
            ("proxy_url", &self.proxy_url),
            ("stv_api_host", &self.stv_api_host),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(NamepackError::ConfigError(format!(
                    "{name} must start with http:// or https://, got \"{value}\""
                )));
            }
        }
        if self.wikidich_element_id.trim().is_empty() {
            return Err(NamepackError::ConfigError(
                "wikidich_element_id cannot be empty".to_string(),
            ));
        }
        if self.output_dir.trim().is_empty() {
            return Err(NamepackError::ConfigError(
                "output_dir cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self, env: &EnvConfig) {
        if let Some(proxy_url) = &env.proxy_url {
            self.proxy_url = proxy_url.clone();
            tracing::info!("环境变量覆盖代理地址: {}", self.proxy_url);
        }
        if let Some(stv_api_host) = &env.stv_api_host {
            self.stv_api_host = stv_api_host.clone();
        }
        if let Some(element_id) = &env.wikidich_element_id {
            self.wikidich_element_id = element_id.clone();
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = timeout.as_secs();
        }
        if let Some(user_agent) = &env.user_agent {
            self.user_agent = Some(user_agent.clone());
        }
        if let Some(output_dir) = &env.output_dir {
            self.output_dir = output_dir.clone();
        }
        if let Some(bind) = &env.web_bind_address {
            self.web_bind_address = bind.clone();
        }
        if let Some(port) = env.web_port {
            self.web_port = port;
        }
    }

    /// 转换为抓取选项
    pub fn to_options(&self) -> NamepackOptions {
        NamepackOptions {
            proxy_url: self.proxy_url.clone(),
            stv_api_host: self.stv_api_host.trim_end_matches('/').to_string(),
            wikidich_element_id: self.wikidich_element_id.clone(),
            timeout: self.timeout_secs,
            user_agent: self.user_agent.clone(),
            silent: false,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.output_dir).as_ref())
    }
}

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: NamepackConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 按默认搜索路径加载配置
    pub fn new() -> NamepackResult<Self> {
        Self::with_path(None)
    }

    /// Loads `path` when given (it must exist), otherwise the first existing default path.
    pub fn with_path(path: Option<&str>) -> NamepackResult<Self> {
        Self::load_dotenv();

        let env = EnvConfig::from_env().map_err(|e| NamepackError::ConfigError(e.to_string()))?;

        let explicit = path.map(str::to_string).or_else(|| env.config_path.clone());
        let (mut config, source) = match explicit {
            Some(path) => {
                let expanded = shellexpand::tilde(&path).to_string();
                if !Path::new(&expanded).exists() {
                    return Err(NamepackError::ConfigError(format!(
                        "config file {expanded} does not exist"
                    )));
                }
                (Self::load_from_file(&expanded)?, Some(PathBuf::from(expanded)))
            }
            None => Self::load_config()?,
        };

        config.apply_env_overrides(&env);
        config.validate()?;

        Ok(Self { config, source })
    }

    /// 获取配置
    pub fn get_config(&self) -> &NamepackConfig {
        &self.config
    }

    /// 已加载的配置文件
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn load_config() -> NamepackResult<(NamepackConfig, Option<PathBuf>)> {
        for path in CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                let config = Self::load_from_file(&expanded_path)?;
                return Ok((config, Some(PathBuf::from(expanded_path.as_ref()))));
            }
        }

        tracing::debug!("未找到配置文件，使用默认配置");
        Ok((NamepackConfig::default(), None))
    }

    /// 从指定文件加载配置
    pub fn load_from_file(path: &str) -> NamepackResult<NamepackConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NamepackError::ConfigError(format!("读取配置文件失败 {path}: {e}")))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .map_err(|e| NamepackError::ConfigError(format!("解析JSON配置失败: {e}")))
        } else {
            toml::from_str(&content)
                .map_err(|e| NamepackError::ConfigError(format!("解析TOML配置失败: {e}")))
        }
    }

    fn load_dotenv() {
        for env_file in ENV_FILES {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::debug!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件（不覆盖已有文件）
    pub fn generate_example_config(path: &str) -> NamepackResult<()> {
        if Path::new(path).exists() {
            return Err(NamepackError::ConfigError(format!(
                "{path} already exists, refusing to overwrite it"
            )));
        }
        let content = toml::to_string_pretty(&NamepackConfig::default())
            .map_err(|e| NamepackError::ConfigError(format!("序列化配置失败: {e}")))?;
        std::fs::write(path, content)
            .map_err(|e| NamepackError::ConfigError(format!("写入配置文件失败: {e}")))?;
        Ok(())
    }
}
