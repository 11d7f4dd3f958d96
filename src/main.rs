use tracing::{error, info};

use mediadrop::{Config, WebServer};

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    // Load configuration
    let config = match Config::load_with_env(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = mediadrop::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        mediadrop::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("mediadrop - media intake service");
    info!(
        upload_dir = %config.upload.dir,
        allowed_origin = %config.cors.allowed_origin,
        "Server configured on {}:{}",
        config.server.host,
        config.server.port
    );

    let server = match WebServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create web server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server stopped: {}", e);
        std::process::exit(1);
    }
}
