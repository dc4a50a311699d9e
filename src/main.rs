use snaplink::{config, server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;

    init_tracing(&config);
    config.print_summary();

    server::run(config).await
}

fn init_tracing(config: &config::Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
