//! Figure Store server binary

use figure_store::core::{Config, Server};
use figure_store::utils::logger;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config = Config::from_env();

    if config.is_production() {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory");
        logger::init_logger_with_file(None, config.logs_dir().to_str());
    } else {
        logger::init_logger();
    }

    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        work_dir = %config.work_dir,
        "Starting figure store server"
    );

    if let Err(e) = Server::new(config).run().await {
        tracing::error!("Server exited with error: {}", e);
        std::process::exit(1);
    }
}
