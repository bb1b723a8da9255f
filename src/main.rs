// src/main.rs

use gcalcron::{cli, install_crypto_provider, logging, run};
use tracing::error;

#[tokio::main]
async fn main() {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("gcalcron error: {err:?}");
        std::process::exit(1);
    }

    install_crypto_provider();

    if let Err(err) = run(args).await {
        error!(code = err.code(), error = ?err, "gcalcron stopped");
        std::process::exit(1);
    }
}
