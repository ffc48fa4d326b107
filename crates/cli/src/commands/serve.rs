//! `ruchulu serve`: Start the HTTP API server.

use ruchulu_config::AppConfig;
use ruchulu_providers::select_path;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🌶️  Ruchulu Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Mode:      {}", config.genie.mode);
    println!("   Provider:  {}", select_path(&config));

    ruchulu_gateway::start(config).await?;

    Ok(())
}
