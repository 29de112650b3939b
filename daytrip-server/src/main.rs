use daytrip_server::{Config, Server, init_logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    let _log_guard = init_logger(&config.log_level, config.log_json, config.log_dir.as_deref());

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Day-trip server starting...");

    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
