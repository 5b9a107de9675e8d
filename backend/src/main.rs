//! Salary Reports Backend - Main Entry Point
//!
//! Reads configuration from the environment and starts the API server.

use salary_api::{api::run_server, config::AppConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    println!("╔════════════════════════════════════════════════╗");
    println!("║   Salary Reports API                           ║");
    println!("║   Yearly summaries · Job titles · Insights     ║");
    println!("╚════════════════════════════════════════════════╝");
    println!();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("[CONFIG] {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    run_server(config).await
}
