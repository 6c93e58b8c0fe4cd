use clap::Parser;
use pkg_api::server::{ServerConfig, start_server};
use pkg_constants::network::DEFAULT_API_PORT;
use pkg_constants::quota::{DEFAULT_APPLY_TIMEOUT_SECS, DEFAULT_WARN_THRESHOLD_PERCENT};
use pkg_types::config::{ServerConfigFile, load_config_file};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "quotad", about = "organization quota control plane")]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = "/etc/quotad/config.yaml")]
    config: String,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Directory for organization record storage
    #[arg(long)]
    data_dir: Option<String>,

    /// Admin bearer token for the API
    #[arg(long)]
    token: Option<String>,

    /// Kubernetes API server URL
    #[arg(long)]
    kube_api_url: Option<String>,

    /// Bearer token for the Kubernetes API server
    #[arg(long)]
    kube_token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    // Load config file (returns defaults if file not found)
    let file_cfg: ServerConfigFile = load_config_file(&cli.config)?;
    info!("Config file: {}", cli.config);

    // Merge: CLI args > config file > defaults
    let port = cli.port.or(file_cfg.port).unwrap_or(DEFAULT_API_PORT);
    let data_dir = cli
        .data_dir
        .or(file_cfg.data_dir)
        .unwrap_or_else(|| "/tmp/quotad-data".to_string());
    let admin_token = cli
        .token
        .or(file_cfg.token)
        .unwrap_or_else(|| "demo-token-123".to_string());
    let kube_api_url = cli
        .kube_api_url
        .or(file_cfg.kube_api_url)
        .unwrap_or_else(|| "https://127.0.0.1:6443".to_string());
    let kube_token = cli.kube_token.or(file_cfg.kube_token).unwrap_or_default();
    let apply_timeout = Duration::from_secs(
        file_cfg
            .apply_timeout_secs
            .unwrap_or(DEFAULT_APPLY_TIMEOUT_SECS),
    );
    let warn_threshold = file_cfg
        .warn_threshold_percent
        .unwrap_or(DEFAULT_WARN_THRESHOLD_PERCENT);

    info!("Starting quotad");
    info!("  Port:          {}", port);
    info!("  Data dir:      {}", data_dir);
    info!("  Kube API:      {}", kube_api_url);
    info!("  Apply timeout: {}s", apply_timeout.as_secs());
    info!(
        "  Token:         {}***",
        &admin_token[..admin_token.len().min(4)]
    );

    let config = ServerConfig {
        addr: SocketAddr::from(([0, 0, 0, 0], port)),
        data_dir,
        admin_token,
        kube_api_url,
        kube_token,
        apply_timeout,
        warn_threshold,
    };

    start_server(config).await?;

    Ok(())
}
