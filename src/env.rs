//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，配置文件中的值可被这里的变量覆盖

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 仅当变量被设置时返回值（用于覆盖配置文件）
    fn get_set() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "NAMEPACK_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }

    /// 配置文件路径
    pub struct ConfigPath;
    impl EnvVar<String> for ConfigPath {
        const NAME: &'static str = "NAMEPACK_CONFIG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Path of the configuration file to load";

        fn parse(value: &str) -> EnvResult<String> {
            non_empty(value, Self::NAME)
        }
    }
}

/// 抓取相关环境变量
pub mod fetch {
    use super::*;

    /// 抓取代理地址
    pub struct ProxyUrl;
    impl EnvVar<String> for ProxyUrl {
        const NAME: &'static str = "NAMEPACK_PROXY_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Scraping proxy used for the Sangtacviet name API";

        fn parse(value: &str) -> EnvResult<String> {
            parse_http_url(value, Self::NAME)
        }
    }

    /// Sangtacviet 接口主机
    pub struct StvApiHost;
    impl EnvVar<String> for StvApiHost {
        const NAME: &'static str = "NAMEPACK_STV_API_HOST";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Host that serves namesys.php for Sangtacviet";

        fn parse(value: &str) -> EnvResult<String> {
            parse_http_url(value, Self::NAME).map(|url| url.trim_end_matches('/').to_string())
        }
    }

    /// Wikidich 名称列表元素 id
    pub struct WikidichElementId;
    impl EnvVar<String> for WikidichElementId {
        const NAME: &'static str = "NAMEPACK_WIKIDICH_ELEMENT_ID";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Id of the element that holds the Wikidich name list";

        fn parse(value: &str) -> EnvResult<String> {
            non_empty(value, Self::NAME)
        }
    }

    /// 请求超时
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "NAMEPACK_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(30));
        const DESCRIPTION: &'static str = "Request timeout in seconds (1-300)";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_positive_usize(value, Self::NAME, 1, 300).map(|s| Duration::from_secs(s as u64))
        }
    }

    /// User-Agent
    pub struct UserAgent;
    impl EnvVar<String> for UserAgent {
        const NAME: &'static str = "NAMEPACK_USER_AGENT";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "User-Agent header sent with every request";

        fn parse(value: &str) -> EnvResult<String> {
            non_empty(value, Self::NAME)
        }
    }

    /// 导出目录
    pub struct OutputDir;
    impl EnvVar<String> for OutputDir {
        const NAME: &'static str = "NAMEPACK_OUTPUT_DIR";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Directory where exported name files are written";

        fn parse(value: &str) -> EnvResult<String> {
            non_empty(value, Self::NAME)
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "NAMEPACK_WEB_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Web server bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "NAMEPACK_WEB_PORT";
        const DEFAULT: Option<u16> = Some(7080);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })?;
            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port cannot be 0".to_string(),
                });
            }
            Ok(port)
        }
    }
}

/// 辅助函数
fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

fn parse_http_url(value: &str, var_name: &str) -> EnvResult<String> {
    let url = value.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(EnvError {
            variable: var_name.to_string(),
            message: "URL must start with http:// or https://".to_string(),
        })
    }
}

fn non_empty(value: &str, var_name: &str) -> EnvResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Value cannot be empty".to_string(),
        });
    }
    Ok(value.to_string())
}

/// 环境变量配置汇总
///
/// Only variables that are actually set carry a value; `None` leaves the configuration file
/// (or the built-in default) in charge.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    // 核心配置
    pub log_level: Option<String>,
    pub no_color: bool,
    pub config_path: Option<String>,

    // 抓取配置
    pub proxy_url: Option<String>,
    pub stv_api_host: Option<String>,
    pub wikidich_element_id: Option<String>,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub output_dir: Option<String>,

    // Web配置
    pub web_bind_address: Option<String>,
    pub web_port: Option<u16>,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            log_level: core::LogLevel::get_set()?,
            no_color: core::NoColor::get()?,
            config_path: core::ConfigPath::get_set()?,

            proxy_url: fetch::ProxyUrl::get_set()?,
            stv_api_host: fetch::StvApiHost::get_set()?,
            wikidich_element_id: fetch::WikidichElementId::get_set()?,
            timeout: fetch::Timeout::get_set()?,
            user_agent: fetch::UserAgent::get_set()?,
            output_dir: fetch::OutputDir::get_set()?,

            web_bind_address: web::BindAddress::get_set()?,
            web_port: web::Port::get_set()?,
        })
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&format!("- `{}`: {}\n", core::LogLevel::NAME, core::LogLevel::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n", core::NoColor::NAME, core::NoColor::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n", core::ConfigPath::NAME, core::ConfigPath::DESCRIPTION));

    docs.push_str("\n## Fetch Configuration\n\n");
    docs.push_str(&format!("- `{}`: {}\n", fetch::ProxyUrl::NAME, fetch::ProxyUrl::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n", fetch::StvApiHost::NAME, fetch::StvApiHost::DESCRIPTION));
    docs.push_str(&format!(
        "- `{}`: {}\n",
        fetch::WikidichElementId::NAME,
        fetch::WikidichElementId::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        fetch::Timeout::NAME,
        fetch::Timeout::DESCRIPTION,
        fetch::Timeout::DEFAULT
    ));
    docs.push_str(&format!("- `{}`: {}\n", fetch::UserAgent::NAME, fetch::UserAgent::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n", fetch::OutputDir::NAME, fetch::OutputDir::DESCRIPTION));

    docs.push_str("\n## Web Server Configuration\n\n");
    docs.push_str(&format!("- `{}`: {}\n", web::BindAddress::NAME, web::BindAddress::DESCRIPTION));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        web::Port::NAME,
        web::Port::DESCRIPTION,
        web::Port::DEFAULT
    ));

    docs
}
