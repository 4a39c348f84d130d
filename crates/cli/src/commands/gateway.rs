//! `lengthwise gateway`: Start the HTTP API server.

use lengthwise_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("📏 Lengthwise Gateway");
    println!("   Listening:   {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:       {}", config.model);
    println!("   AI enabled:  {}", config.has_api_key());
    println!("   Origins:     {}", config.gateway.allowed_origins.join(", "));

    lengthwise_gateway::start(config).await?;

    Ok(())
}
