//! Web 服务器配置

use crate::config::NamepackConfig;
use crate::core::{NamepackError, NamepackResult};

/// Web 服务器配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
}

impl WebConfig {
    /// 从应用配置创建（已包含环境变量覆盖）
    pub fn from_config(config: &NamepackConfig) -> Self {
        Self {
            bind_addr: config.web_bind_address.clone(),
            port: config.web_port,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// 验证配置
    pub fn validate(&self) -> NamepackResult<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(NamepackError::ConfigError(
                "Bind address cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(NamepackError::ConfigError("Port cannot be 0".to_string()));
        }
        Ok(())
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self::from_config(&NamepackConfig::default())
    }
}
