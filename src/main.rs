use netdash::config::Config;
use netdash::{logging, server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::load();
    logging::init_logging(config.default_log_level());

    tracing::info!("Make sure '{}' exists before opening the dashboard", config.data_file.display());
    server::run(config).await
}
