mod cli;
mod prompt;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // los logs van a stderr; stdout queda para los bloques de estado
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lfg=info,dungeon=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    cli::run().await
}
