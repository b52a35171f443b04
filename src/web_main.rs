//! Web 服务器主程序入口

#[cfg(feature = "web")]
use clap::Parser;
#[cfg(feature = "web")]
use namepack::config::ConfigManager;
#[cfg(feature = "web")]
use namepack::web::{WebConfig, WebServer};

// 配置文件和环境变量提供默认值，命令行参数优先
#[cfg(feature = "web")]
#[derive(Parser, Debug)]
#[command(
    name = "namepack-web",
    version,
    about = "Namepack Web Server",
    after_help = "ENVIRONMENT:\n    NAMEPACK_WEB_BIND_ADDRESS, NAMEPACK_WEB_PORT, NAMEPACK_PROXY_URL, NAMEPACK_LOG_LEVEL\n\nEXAMPLES:\n    namepack-web\n    namepack-web --bind 0.0.0.0 --port 3000"
)]
struct Args {
    /// Bind address [default: 127.0.0.1]
    #[arg(short, long, value_name = "ADDRESS")]
    bind: Option<String>,

    /// Port number [default: 7080]
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,
}

#[cfg(feature = "web")]
impl Args {
    fn web_config(&self, manager: &ConfigManager) -> WebConfig {
        let mut web_config = WebConfig::from_config(manager.get_config());
        if let Some(bind) = &self.bind {
            web_config.bind_addr = bind.clone();
        }
        if let Some(port) = self.port {
            web_config.port = port;
        }
        web_config
    }
}

#[cfg(feature = "web")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing();

    let manager = ConfigManager::with_path(args.config.as_deref())?;
    if let Some(source) = manager.source() {
        tracing::info!("使用配置文件 {}", source.display());
    }
    let web_config = args.web_config(&manager);

    // Web 模式下静默运行
    let mut options = manager.get_config().to_options();
    options.silent = true;

    let server = WebServer::new(web_config, options);
    server.start().await?;

    Ok(())
}

#[cfg(feature = "web")]
fn init_tracing() {
    use namepack::env::{core::LogLevel, EnvVar};
    use tracing_subscriber::EnvFilter;

    let level = LogLevel::get_set()
        .ok()
        .flatten()
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(not(feature = "web"))]
fn main() {
    eprintln!("Error: Web feature not enabled. Please compile with --features web");
    std::process::exit(1);
}
