//! rac-correlation: HTTP service wrapping its routes in the correlation id middleware.

use rac_correlation::config::AppConfig;
use rac_correlation::server;

fn main() -> anyhow::Result<()> {
    // Parse CLI args
    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1).cloned())
        .or_else(|| args.get(1).filter(|a| !a.starts_with('-')).cloned())
        .or_else(|| std::env::var("RAC_CONFIG").ok())
        .unwrap_or_else(|| "rac-correlation.toml".to_string());

    // Load configuration
    let config = AppConfig::load(&config_path)?;

    // Build the tokio runtime first — tonic gRPC exporter needs a reactor context
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let _tracing_guard = rac_tracing::init_tracing(&config.tracing);

        tracing::info!(
            config_path = %config_path,
            listen_address = %config.server.listen_address,
            correlation_log_level = %config.correlation.log_level,
            echo_response_header = config.correlation.echo_response_header,
            "Starting rac-correlation"
        );

        server::run(config).await
    })
}
