use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use deepseek_gateway::chat::deepseek::DeepSeekClient;
use deepseek_gateway::chat::service::ChatService;
use deepseek_gateway::config::{Cli, Config};
use deepseek_gateway::server::api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "deepseek_gateway=debug,tower_http=debug"
    } else {
        "deepseek_gateway=info,tower_http=info"
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("deepseek-gateway v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration.
    let mut config = Config::load(&cli.config)?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    let config = Arc::new(config);

    info!(
        base_url = config.provider.base_url,
        model = config.provider.model,
        timeout_secs = config.provider.request_timeout_secs,
        "Configuration loaded"
    );

    // The provider client is the only external collaborator.
    let client = DeepSeekClient::new(&config.provider)?;
    let service = ChatService::new(Arc::new(client));

    let state = Arc::new(AppState {
        service,
        config: config.clone(),
    });

    let app = build_router(state);

    let listen_addr = config.server.listen.clone();
    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
